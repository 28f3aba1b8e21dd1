//! Fixed values shared across the plugin.

/// Human-readable plugin name reported to the host.
pub const PLUGIN_NAME: &str = "[SHOP] Parachute";
/// Plugin version reported to the host.
pub const PLUGIN_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Category every parachute item is registered under.
pub const CATEGORY_NAME: &str = "Parachute";
/// Default display name of [`CATEGORY_NAME`] shown by the shop menu.
pub const DEFAULT_CATEGORY_DISPLAY_NAME: &str = "Парашют";

/// Configuration path relative to the plugin's module directory.
pub const CONFIG_RELATIVE_PATH: &str = "../../configs/plugins/Shop/Parachute.json";

/// Gravity scale of an entity without a deployed parachute.
pub const NORMAL_GRAVITY_SCALE: f32 = 1.0;
/// Gravity scale applied while the parachute is deployed.
pub const DEFAULT_DEPLOY_GRAVITY_SCALE: f32 = 0.1;

/// Default terminal downward speed, in world units per second.
pub const DEFAULT_FALL_SPEED: f32 = 85.0;
/// Default per-tick easing step towards the terminal speed.
pub const DEFAULT_DECREASE_VEC: f32 = 50.0;
/// Default number of falling ticks between explicit entity teleports.
pub const DEFAULT_TELEPORT_TICKS: u32 = 300;

/// Fixed tick rate of the sandbox host.
pub const SANDBOX_TICK_RATE: f32 = 64.0;
/// Downward acceleration of the sandbox host at gravity scale 1.0.
pub const SANDBOX_GRAVITY: f32 = 800.0;
