#![cfg_attr(docsrs, feature(doc_cfg))]
//! Shop parachute: a purchasable item that slows a falling player.
//!
//! While the owner is airborne and holds "use", the parachute lowers their
//! gravity, eases their fall towards a terminal speed, and drags a canopy
//! prop along. The crate is engine-agnostic: the game server is reached
//! through [`Host`] and the shop plugin through [`Economy`].
pub mod catalog;
pub mod config;
pub mod constants;
pub mod economy;
pub mod host;
pub mod logging;
pub mod physics;
pub mod plugin;
pub mod router;
pub mod sandbox;
pub mod shared;
pub mod simulator;
pub mod state;
pub use constants::*;

// Re-export commonly used items
pub use catalog::{Catalog, ParachuteCatalogAdapter};
pub use config::{ConfigError, ItemConfig, ParachuteConfig, Tuning};
pub use economy::{
    BuyCallback, Economy, EconomyError, HookResult, ItemId, ItemRegistration, SellCallback,
    ToggleCallback,
};
pub use host::{EntityIndex, EntitySnapshot, Host, Motion, PropHandle, ResourceManifest};
pub use logging::init as init_logging;
pub use physics::{advance_sync_counter, next_vertical_velocity, target_fall_velocity};
pub use plugin::{ParachutePlugin, PluginError};
pub use router::{LifecycleEvent, LifecycleEventRouter, ToggleState};
pub use sandbox::{HostStats, Sandbox, SandboxPlayer, SandboxProp, SandboxShop};
pub use shared::SharedPlugin;
pub use simulator::{deactivate, deploy, TickSimulator, TickSummary};
pub use state::{ParachuteState, ParachuteStateStore};

pub mod prelude {
    //! Prelude exports used in documentation examples.
    //!
    //! ```rust,no_run
    //! use shop_parachute::prelude::*;
    //! ```

    pub use crate::EntityIndex;
    pub use crate::Host;
    pub use crate::LifecycleEvent;
    pub use crate::ParachuteConfig;
    pub use crate::ParachutePlugin;
    pub use crate::Tuning;
    pub use glam::Vec3;
}
