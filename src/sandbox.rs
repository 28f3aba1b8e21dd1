//! In-memory host and shop.
//!
//! The sandbox stands in for the game server in the drop demo and the
//! integration tests. Players fall under a constant gravity scaled by their
//! gravity multiplier and land on a flat floor at `z = 0`. Props are plain
//! records that only move when teleported. Every write is counted in
//! [`HostStats`].

use glam::Vec3;
use hashbrown::HashMap;

use crate::constants::{NORMAL_GRAVITY_SCALE, SANDBOX_GRAVITY, SANDBOX_TICK_RATE};
use crate::economy::{Economy, EconomyError, ItemId, ItemRegistration};
use crate::host::{EntityIndex, EntitySnapshot, Host, Motion, PropHandle};

/// Simulated player.
#[derive(Debug, Clone, PartialEq)]
pub struct SandboxPlayer {
    /// Pawn is alive.
    pub alive: bool,
    /// Controlled by a bot.
    pub bot: bool,
    /// Touched the floor during the last [`Sandbox::advance`].
    pub on_ground: bool,
    /// "Use" is held.
    pub use_pressed: bool,
    /// Carrying a hostage.
    pub carrying_hostage: bool,
    /// Gravity multiplier.
    pub gravity_scale: f32,
    /// Transform and velocity.
    pub motion: Motion,
}

impl SandboxPlayer {
    /// Airborne human at `position`, at rest, not pressing anything.
    #[must_use]
    pub fn at(position: Vec3) -> Self {
        Self {
            alive: true,
            bot: false,
            on_ground: position.z <= 0.0,
            use_pressed: false,
            carrying_hostage: false,
            gravity_scale: NORMAL_GRAVITY_SCALE,
            motion: Motion {
                position,
                ..Motion::default()
            },
        }
    }

    fn snapshot(&self) -> EntitySnapshot {
        EntitySnapshot {
            alive: self.alive,
            bot: self.bot,
            on_ground_last_tick: self.on_ground,
            use_pressed: self.use_pressed,
            carrying_hostage: self.carrying_hostage,
            gravity_scale: self.gravity_scale,
            motion: self.motion,
        }
    }

    fn integrate(&mut self, dt: f32) {
        self.motion.velocity.z -= SANDBOX_GRAVITY * self.gravity_scale * dt;
        self.motion.position += self.motion.velocity * dt;
        self.on_ground = self.motion.position.z <= 0.0;
        if self.on_ground {
            self.motion.position.z = 0.0;
            self.motion.velocity.z = self.motion.velocity.z.max(0.0);
        }
    }
}

/// Simulated canopy prop.
#[derive(Debug, Clone, PartialEq)]
pub struct SandboxProp {
    /// Model it was spawned with.
    pub model: String,
    /// Last transform written.
    pub motion: Motion,
}

/// Write counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HostStats {
    /// Explicit pawn teleports.
    pub entity_teleports: usize,
    /// Velocity-only writes.
    pub velocity_writes: usize,
    /// Gravity multiplier writes.
    pub gravity_writes: usize,
    /// Props created.
    pub props_spawned: usize,
    /// Prop teleports.
    pub prop_teleports: usize,
    /// Props destroyed.
    pub props_destroyed: usize,
}

/// In-memory [`Host`].
#[derive(Debug, Default)]
pub struct Sandbox {
    players: HashMap<EntityIndex, SandboxPlayer>,
    props: HashMap<u64, SandboxProp>,
    next_prop: u64,
    stats: HostStats,
}

impl Sandbox {
    /// Empty world.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Connects a player, replacing any previous occupant of the slot.
    pub fn connect(&mut self, entity: EntityIndex, player: SandboxPlayer) {
        self.players.insert(entity, player);
    }

    /// Removes a player from the world.
    pub fn disconnect(&mut self, entity: EntityIndex) -> Option<SandboxPlayer> {
        self.players.remove(&entity)
    }

    /// Simulated player in `entity`.
    #[must_use]
    pub fn player(&self, entity: EntityIndex) -> Option<&SandboxPlayer> {
        self.players.get(&entity)
    }

    /// Mutable simulated player in `entity`.
    pub fn player_mut(&mut self, entity: EntityIndex) -> Option<&mut SandboxPlayer> {
        self.players.get_mut(&entity)
    }

    /// Live prop with raw id `raw`.
    #[must_use]
    pub fn prop(&self, raw: u64) -> Option<&SandboxProp> {
        self.props.get(&raw)
    }

    /// Number of props in the world.
    #[must_use]
    pub fn prop_count(&self) -> usize {
        self.props.len()
    }

    /// Deletes a prop behind the plugin's back.
    pub fn remove_prop(&mut self, raw: u64) -> Option<SandboxProp> {
        self.props.remove(&raw)
    }

    /// Write counters so far.
    #[must_use]
    pub const fn stats(&self) -> HostStats {
        self.stats
    }

    /// Integrates every living player over one tick.
    pub fn advance(&mut self) {
        let dt = SANDBOX_TICK_RATE.recip();
        for player in self.players.values_mut().filter(|player| player.alive) {
            player.integrate(dt);
        }
    }
}

impl Host for Sandbox {
    fn entity(&self, entity: EntityIndex) -> Option<EntitySnapshot> {
        self.players.get(&entity).map(SandboxPlayer::snapshot)
    }

    fn set_gravity_scale(&mut self, entity: EntityIndex, scale: f32) {
        if let Some(player) = self.players.get_mut(&entity) {
            player.gravity_scale = scale;
            self.stats.gravity_writes += 1;
        }
    }

    fn set_velocity(&mut self, entity: EntityIndex, velocity: Vec3) {
        if let Some(player) = self.players.get_mut(&entity) {
            player.motion.velocity = velocity;
            self.stats.velocity_writes += 1;
        }
    }

    fn teleport(&mut self, entity: EntityIndex, motion: &Motion) {
        if let Some(player) = self.players.get_mut(&entity) {
            player.motion = *motion;
            self.stats.entity_teleports += 1;
        }
    }

    fn spawn_prop(&mut self, model: &str, motion: &Motion) -> Option<PropHandle> {
        self.next_prop += 1;
        self.props.insert(
            self.next_prop,
            SandboxProp {
                model: model.to_owned(),
                motion: *motion,
            },
        );
        self.stats.props_spawned += 1;
        Some(PropHandle::new(self.next_prop))
    }

    fn prop_is_valid(&self, prop: &PropHandle) -> bool {
        self.props.contains_key(&prop.raw())
    }

    fn teleport_prop(&mut self, prop: &PropHandle, motion: &Motion) {
        if let Some(record) = self.props.get_mut(&prop.raw()) {
            record.motion = *motion;
            self.stats.prop_teleports += 1;
        }
    }

    fn destroy_prop(&mut self, prop: PropHandle) {
        if self.props.remove(&prop.raw()).is_some() {
            self.stats.props_destroyed += 1;
        }
    }
}

/// In-memory [`Economy`] handing out sequential item ids from 1.
#[derive(Debug, Default)]
pub struct SandboxShop {
    categories: Vec<(String, String)>,
    items: Vec<(ItemId, ItemRegistration)>,
    bound: Vec<ItemId>,
}

impl SandboxShop {
    /// Empty shop.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registered items in registration order.
    #[must_use]
    pub fn items(&self) -> &[(ItemId, ItemRegistration)] {
        &self.items
    }

    /// Item registered under `key`.
    #[must_use]
    pub fn item_id(&self, key: &str) -> Option<ItemId> {
        self.items
            .iter()
            .find(|(_, registration)| registration.key == key)
            .map(|(id, _)| *id)
    }

    /// Whether callbacks were bound for `item`.
    #[must_use]
    pub fn is_bound(&self, item: ItemId) -> bool {
        self.bound.contains(&item)
    }

    /// Categories as `(name, display name)`.
    #[must_use]
    pub fn categories(&self) -> &[(String, String)] {
        &self.categories
    }
}

impl Economy for SandboxShop {
    fn create_category(&mut self, name: &str, display_name: &str) -> Result<(), EconomyError> {
        if !self.categories.iter().any(|(existing, _)| existing == name) {
            self.categories
                .push((name.to_owned(), display_name.to_owned()));
        }
        Ok(())
    }

    fn add_item(&mut self, item: &ItemRegistration) -> Result<ItemId, EconomyError> {
        if self.item_id(&item.key).is_some() {
            return Err(EconomyError::Registration {
                key: item.key.clone(),
                reason: "key already registered".to_owned(),
            });
        }
        let next = i32::try_from(self.items.len())
            .ok()
            .and_then(|count| count.checked_add(1))
            .ok_or_else(|| EconomyError::Registration {
                key: item.key.clone(),
                reason: "item table full".to_owned(),
            })?;
        let id = ItemId(next);
        self.items.push((id, item.clone()));
        Ok(id)
    }

    fn bind_callbacks(&mut self, item: ItemId) -> Result<(), EconomyError> {
        if !self.items.iter().any(|(id, _)| *id == item) {
            return Err(EconomyError::Binding {
                item,
                reason: "unknown item".to_owned(),
            });
        }
        self.bound.push(item);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    fn free_fall_accelerates_downwards() {
        let mut world = Sandbox::new();
        world.connect(EntityIndex(1), SandboxPlayer::at(Vec3::new(0.0, 0.0, 1000.0)));
        world.advance();
        let player = world.player(EntityIndex(1)).expect("player connected");
        assert_relative_eq!(player.motion.velocity.z, -SANDBOX_GRAVITY / SANDBOX_TICK_RATE);
        assert!(!player.on_ground);
    }

    #[rstest]
    fn landing_clamps_to_floor() {
        let mut world = Sandbox::new();
        let mut player = SandboxPlayer::at(Vec3::new(0.0, 0.0, 1.0));
        player.motion.velocity.z = -500.0;
        world.connect(EntityIndex(1), player);
        world.advance();
        let landed = world.player(EntityIndex(1)).expect("player connected");
        assert!(landed.on_ground);
        assert_relative_eq!(landed.motion.position.z, 0.0);
        assert_relative_eq!(landed.motion.velocity.z, 0.0);
    }

    #[rstest]
    fn writes_to_missing_targets_are_ignored() {
        let mut world = Sandbox::new();
        world.set_gravity_scale(EntityIndex(3), 0.1);
        world.teleport_prop(&PropHandle::new(99), &Motion::default());
        world.destroy_prop(PropHandle::new(99));
        assert_eq!(world.stats(), HostStats::default());
    }

    #[rstest]
    fn shop_assigns_sequential_ids() {
        let mut shop = SandboxShop::new();
        let registration = |key: &str| ItemRegistration {
            key: key.to_owned(),
            display_name: key.to_owned(),
            category: "Parachute".to_owned(),
            price: 1,
            sell_price: 1,
            duration: 0,
        };
        assert_eq!(shop.add_item(&registration("a")), Ok(ItemId(1)));
        assert_eq!(shop.add_item(&registration("b")), Ok(ItemId(2)));
        assert!(shop.add_item(&registration("a")).is_err());
        assert!(shop.bind_callbacks(ItemId(5)).is_err());
    }
}
