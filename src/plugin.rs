//! Host-facing entry point.
//!
//! [`ParachutePlugin`] owns the configuration, the catalogue and the state
//! store, and exposes one method per host or shop callback. A plugin that
//! could not start (no shop, no configuration) is inert: every callback is
//! accepted and ignored.

use std::path::Path;

use log::{info, warn};
use thiserror::Error;

use crate::catalog::{Catalog, ParachuteCatalogAdapter};
use crate::config::{default_config_path, ConfigError, ParachuteConfig};
use crate::constants::{PLUGIN_NAME, PLUGIN_VERSION};
use crate::economy::{BuyCallback, Economy, EconomyError, HookResult, SellCallback, ToggleCallback};
use crate::host::{EntityIndex, Host, ResourceManifest};
use crate::router::{LifecycleEvent, LifecycleEventRouter};
use crate::simulator::{TickSimulator, TickSummary};
use crate::state::ParachuteStateStore;

/// Reasons the plugin stays inert.
#[derive(Debug, Error)]
pub enum PluginError {
    /// The shop plugin is not loaded.
    #[error("shop API is unavailable")]
    EconomyUnavailable,
    /// The configuration file could not be used.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The shop refused the parachute category.
    #[error(transparent)]
    Economy(#[from] EconomyError),
}

#[derive(Debug)]
struct Running {
    config: ParachuteConfig,
    catalog: Catalog,
    store: ParachuteStateStore,
}

/// Parachute plugin instance.
#[derive(Debug, Default)]
pub struct ParachutePlugin {
    running: Option<Running>,
}

impl ParachutePlugin {
    /// A plugin that ignores every callback.
    #[must_use]
    pub const fn inert() -> Self {
        Self { running: None }
    }

    /// Registers the configured items with `economy` and starts tracking.
    ///
    /// # Errors
    /// Returns [`PluginError::EconomyUnavailable`] when `economy` is `None`
    /// and [`PluginError::Economy`] when the shop rejects the category.
    pub fn start<E: Economy + ?Sized>(
        economy: Option<&mut E>,
        config: ParachuteConfig,
    ) -> Result<Self, PluginError> {
        let shop = economy.ok_or(PluginError::EconomyUnavailable)?;
        let catalog = ParachuteCatalogAdapter::register(shop, &config)?;
        info!(
            "{PLUGIN_NAME} {PLUGIN_VERSION}: {} of {} parachutes registered",
            catalog.registered_len(),
            config.items().len()
        );
        Ok(Self {
            running: Some(Running {
                config,
                catalog,
                store: ParachuteStateStore::new(),
            }),
        })
    }

    /// Loads the configuration next to `module_dir` and starts.
    ///
    /// Any failure is logged and yields an inert plugin.
    pub fn load<E: Economy + ?Sized>(economy: Option<&mut E>, module_dir: &Path) -> Self {
        let outcome = ParachuteConfig::load(default_config_path(module_dir))
            .map_err(PluginError::from)
            .and_then(|config| Self::start(economy, config));
        match outcome {
            Ok(plugin) => plugin,
            Err(e) => {
                warn!("{PLUGIN_NAME} disabled: {e}");
                Self::inert()
            }
        }
    }

    /// Whether the plugin started successfully.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Current parachute owners, when running.
    #[must_use]
    pub fn store(&self) -> Option<&ParachuteStateStore> {
        self.running.as_ref().map(|running| &running.store)
    }

    /// Active configuration, when running.
    #[must_use]
    pub fn config(&self) -> Option<&ParachuteConfig> {
        self.running.as_ref().map(|running| &running.config)
    }

    /// Host tick callback.
    pub fn on_tick<H: Host + ?Sized>(&mut self, host: &mut H) -> TickSummary {
        self.running.as_mut().map_or_else(TickSummary::default, |running| {
            TickSimulator::new(&mut running.store, running.config.tuning()).run(host)
        })
    }

    /// Shop buy callback.
    pub fn on_buy<H: Host + ?Sized>(&mut self, callback: BuyCallback, host: &mut H) -> HookResult {
        self.dispatch(callback.into(), host);
        HookResult::Continue
    }

    /// Shop sell callback.
    pub fn on_sell<H: Host + ?Sized>(&mut self, callback: SellCallback, host: &mut H) -> HookResult {
        self.dispatch(callback.into(), host);
        HookResult::Continue
    }

    /// Shop toggle callback. Unknown toggle states are ignored.
    pub fn on_toggle<H: Host + ?Sized>(
        &mut self,
        callback: ToggleCallback,
        host: &mut H,
    ) -> HookResult {
        match LifecycleEvent::try_from(callback) {
            Ok(event) => self.dispatch(event, host),
            Err(state) => warn!("ignoring toggle with unknown state {state}"),
        }
        HookResult::Continue
    }

    /// Host death notification.
    pub fn on_player_death<H: Host + ?Sized>(&mut self, entity: EntityIndex, host: &mut H) {
        self.dispatch(LifecycleEvent::Died { entity }, host);
    }

    /// Host disconnect notification.
    pub fn on_client_disconnect<H: Host + ?Sized>(&mut self, entity: EntityIndex, host: &mut H) {
        self.dispatch(LifecycleEvent::Disconnected { entity }, host);
    }

    /// Adds every configured model to the host's precache manifest.
    pub fn on_precache<M: ResourceManifest + ?Sized>(&self, manifest: &mut M) {
        if let Some(running) = self.running.as_ref() {
            for item in running.config.items() {
                manifest.add_resource(&item.model);
            }
        }
    }

    /// Routes an event to the lifecycle router.
    pub fn dispatch<H: Host + ?Sized>(&mut self, event: LifecycleEvent, host: &mut H) {
        if let Some(running) = self.running.as_mut() {
            LifecycleEventRouter::new(&mut running.store, &running.catalog).dispatch(event, host);
        }
    }
}
