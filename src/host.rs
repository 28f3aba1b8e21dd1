//! Contract consumed from the host game engine.
//!
//! The plugin never owns entities. It reads a [`EntitySnapshot`] right before
//! acting and writes back through [`Host`]. Every write may target an object
//! the host has already torn down, so implementations must treat writes to
//! unknown entities or props as no-ops.

use std::fmt;

use glam::Vec3;

/// Stable small-integer slot identifying a connected player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityIndex(pub u32);

impl From<u32> for EntityIndex {
    fn from(index: u32) -> Self {
        Self(index)
    }
}

impl EntityIndex {
    /// Returns the raw slot number.
    #[must_use]
    pub const fn into_inner(self) -> u32 {
        self.0
    }
}

impl fmt::Display for EntityIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Owned handle to a prop spawned through [`Host::spawn_prop`].
///
/// Exactly one parachute state owns a handle, and [`Host::destroy_prop`]
/// consumes it.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct PropHandle(u64);

impl PropHandle {
    /// Wraps a host-assigned prop identifier.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Host-assigned identifier of the prop.
    #[must_use]
    pub const fn raw(&self) -> u64 {
        self.0
    }
}

/// Position, rotation (pitch, yaw, roll in degrees) and velocity.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Motion {
    /// World-space origin.
    pub position: Vec3,
    /// Euler angles.
    pub rotation: Vec3,
    /// Linear velocity in world units per second.
    pub velocity: Vec3,
}

impl Motion {
    /// Copy of this motion with the vertical velocity replaced.
    #[must_use]
    pub const fn with_vertical_velocity(self, vz: f32) -> Self {
        Self {
            velocity: Vec3::new(self.velocity.x, self.velocity.y, vz),
            ..self
        }
    }
}

/// Per-tick view of a player as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntitySnapshot {
    /// The pawn is alive.
    pub alive: bool,
    /// The controller is a bot.
    pub bot: bool,
    /// The pawn touched the ground during the previous tick.
    pub on_ground_last_tick: bool,
    /// The "use" button is held.
    pub use_pressed: bool,
    /// The pawn is carrying a hostage.
    pub carrying_hostage: bool,
    /// Current gravity multiplier.
    pub gravity_scale: f32,
    /// Current transform and velocity.
    pub motion: Motion,
}

impl EntitySnapshot {
    /// Whether the tick scan should consider this player at all.
    #[must_use]
    pub const fn is_eligible(&self) -> bool {
        self.alive && !self.bot
    }
}

/// Engine services the parachute consumes.
#[cfg_attr(test, mockall::automock)]
pub trait Host {
    /// Snapshot of a player, or `None` when the slot is empty or invalid.
    fn entity(&self, entity: EntityIndex) -> Option<EntitySnapshot>;

    /// Sets the pawn's gravity multiplier.
    fn set_gravity_scale(&mut self, entity: EntityIndex, scale: f32);

    /// Overwrites the pawn's velocity and lets the engine integrate it.
    fn set_velocity(&mut self, entity: EntityIndex, velocity: Vec3);

    /// Explicitly repositions the pawn.
    fn teleport(&mut self, entity: EntityIndex, motion: &Motion);

    /// Creates a purely visual prop with `model` at `motion`.
    ///
    /// The prop must not collide and must not be simulated by the engine; the
    /// caller moves it explicitly every tick.
    fn spawn_prop(&mut self, model: &str, motion: &Motion) -> Option<PropHandle>;

    /// Whether the prop still exists on the host.
    fn prop_is_valid(&self, prop: &PropHandle) -> bool;

    /// Moves the prop.
    fn teleport_prop(&mut self, prop: &PropHandle, motion: &Motion);

    /// Removes the prop from the world.
    fn destroy_prop(&mut self, prop: PropHandle);
}

/// Resource manifest filled while the host precaches assets.
pub trait ResourceManifest {
    /// Marks `path` for preloading.
    fn add_resource(&mut self, path: &str);
}

impl ResourceManifest for Vec<String> {
    fn add_resource(&mut self, path: &str) {
        self.push(path.to_owned());
    }
}
