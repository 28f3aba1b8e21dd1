//! Thread-safe handle for hosts without a single event thread.
//!
//! Each callback takes the lock for its whole duration, so a shop or death
//! event can never observe a tick scan half-way through the store.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::warn;

use crate::economy::{BuyCallback, HookResult, SellCallback, ToggleCallback};
use crate::host::{EntityIndex, Host, ResourceManifest};
use crate::plugin::ParachutePlugin;
use crate::simulator::TickSummary;

/// Cloneable, mutex-serialised [`ParachutePlugin`].
#[derive(Debug, Clone, Default)]
pub struct SharedPlugin {
    inner: Arc<Mutex<ParachutePlugin>>,
}

impl From<ParachutePlugin> for SharedPlugin {
    fn from(plugin: ParachutePlugin) -> Self {
        Self {
            inner: Arc::new(Mutex::new(plugin)),
        }
    }
}

impl SharedPlugin {
    /// Locks the plugin for a sequence of calls.
    ///
    /// A poisoned lock is recovered and logged.
    pub fn lock(&self) -> MutexGuard<'_, ParachutePlugin> {
        self.inner.lock().unwrap_or_else(|poisoned: PoisonError<_>| {
            warn!("parachute state lock was poisoned; continuing");
            poisoned.into_inner()
        })
    }

    /// See [`ParachutePlugin::on_tick`].
    pub fn on_tick<H: Host + ?Sized>(&self, host: &mut H) -> TickSummary {
        self.lock().on_tick(host)
    }

    /// See [`ParachutePlugin::on_buy`].
    pub fn on_buy<H: Host + ?Sized>(&self, callback: BuyCallback, host: &mut H) -> HookResult {
        self.lock().on_buy(callback, host)
    }

    /// See [`ParachutePlugin::on_sell`].
    pub fn on_sell<H: Host + ?Sized>(&self, callback: SellCallback, host: &mut H) -> HookResult {
        self.lock().on_sell(callback, host)
    }

    /// See [`ParachutePlugin::on_toggle`].
    pub fn on_toggle<H: Host + ?Sized>(&self, callback: ToggleCallback, host: &mut H) -> HookResult {
        self.lock().on_toggle(callback, host)
    }

    /// See [`ParachutePlugin::on_player_death`].
    pub fn on_player_death<H: Host + ?Sized>(&self, entity: EntityIndex, host: &mut H) {
        self.lock().on_player_death(entity, host);
    }

    /// See [`ParachutePlugin::on_client_disconnect`].
    pub fn on_client_disconnect<H: Host + ?Sized>(&self, entity: EntityIndex, host: &mut H) {
        self.lock().on_client_disconnect(entity, host);
    }

    /// See [`ParachutePlugin::on_precache`].
    pub fn on_precache<M: ResourceManifest + ?Sized>(&self, manifest: &mut M) {
        self.lock().on_precache(manifest);
    }
}
