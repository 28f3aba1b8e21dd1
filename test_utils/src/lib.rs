//! Utility helpers for tests.
//!
//! [`Harness`] wires a [`ParachutePlugin`] to the in-memory sandbox host and
//! shop so scenarios can be written as a sequence of player actions.

pub mod fixtures;

use glam::Vec3;
use shop_parachute::{
    BuyCallback, EntityIndex, HostStats, ItemId, ParachuteConfig, ParachutePlugin,
    ParachuteState, Sandbox, SandboxPlayer, SandboxProp, SandboxShop, SellCallback, TickSummary,
    ToggleCallback, CATEGORY_NAME,
};

/// Plugin, sandbox host and sandbox shop under test.
#[derive(Debug)]
pub struct Harness {
    /// Plugin under test.
    pub plugin: ParachutePlugin,
    /// Simulated server.
    pub world: Sandbox,
    /// Simulated shop.
    pub shop: SandboxShop,
}

impl Harness {
    /// Starts a plugin with `config` against a fresh sandbox shop.
    ///
    /// # Panics
    /// Panics if the sandbox shop rejects the parachute category.
    #[must_use]
    pub fn new(config: ParachuteConfig) -> Self {
        let mut shop = SandboxShop::new();
        let plugin = ParachutePlugin::start(Some(&mut shop), config)
            .unwrap_or_else(|e| panic!("plugin failed to start: {e}"));
        Self {
            plugin,
            world: Sandbox::new(),
            shop,
        }
    }

    /// Connects an airborne, idle player at `altitude`.
    pub fn join(&mut self, entity: u32, altitude: f32) {
        self.world.connect(
            EntityIndex(entity),
            SandboxPlayer::at(Vec3::new(0.0, 0.0, altitude)),
        );
    }

    /// Mutable access to a connected player.
    ///
    /// # Panics
    /// Panics if the player is not connected.
    pub fn player_mut(&mut self, entity: u32) -> &mut SandboxPlayer {
        self.world
            .player_mut(EntityIndex(entity))
            .unwrap_or_else(|| panic!("player {entity} is not connected"))
    }

    /// Connected player.
    ///
    /// # Panics
    /// Panics if the player is not connected.
    #[must_use]
    pub fn player(&self, entity: u32) -> &SandboxPlayer {
        self.world
            .player(EntityIndex(entity))
            .unwrap_or_else(|| panic!("player {entity} is not connected"))
    }

    /// Presses or releases "use".
    pub fn hold_use(&mut self, entity: u32, pressed: bool) {
        self.player_mut(entity).use_pressed = pressed;
    }

    /// Sets the player's vertical velocity.
    pub fn set_vz(&mut self, entity: u32, vz: f32) {
        self.player_mut(entity).motion.velocity.z = vz;
    }

    /// Item id the shop assigned to `key`, or `ItemId(0)` when unknown.
    #[must_use]
    pub fn item_id(&self, key: &str) -> ItemId {
        self.shop.item_id(key).unwrap_or(ItemId(0))
    }

    /// Fires the shop's buy callback.
    pub fn buy(&mut self, entity: u32, key: &str) {
        let callback = BuyCallback {
            entity: EntityIndex(entity),
            item_id: self.item_id(key),
            category: CATEGORY_NAME.to_owned(),
            key: key.to_owned(),
            price: 100,
            sell_price: 50,
            duration: 0,
            count: 1,
        };
        self.plugin.on_buy(callback, &mut self.world);
    }

    /// Fires the shop's sell callback.
    pub fn sell(&mut self, entity: u32, key: &str) {
        let callback = SellCallback {
            entity: EntityIndex(entity),
            item_id: self.item_id(key),
            key: key.to_owned(),
            sell_price: 50,
        };
        self.plugin.on_sell(callback, &mut self.world);
    }

    /// Fires the shop's toggle callback with a raw state.
    pub fn toggle(&mut self, entity: u32, key: &str, state: i32) {
        let callback = ToggleCallback {
            entity: EntityIndex(entity),
            item_id: self.item_id(key),
            key: key.to_owned(),
            state,
        };
        self.plugin.on_toggle(callback, &mut self.world);
    }

    /// Kills the player and notifies the plugin.
    pub fn kill(&mut self, entity: u32) {
        self.player_mut(entity).alive = false;
        self.plugin
            .on_player_death(EntityIndex(entity), &mut self.world);
    }

    /// Disconnects the player and notifies the plugin.
    pub fn disconnect(&mut self, entity: u32) {
        self.plugin
            .on_client_disconnect(EntityIndex(entity), &mut self.world);
        self.world.disconnect(EntityIndex(entity));
    }

    /// One plugin tick followed by one sandbox integration step.
    pub fn tick(&mut self) -> TickSummary {
        let summary = self.plugin.on_tick(&mut self.world);
        self.world.advance();
        summary
    }

    /// One plugin tick without integrating gravity, so velocities only change
    /// through the plugin.
    pub fn tick_frozen(&mut self) -> TickSummary {
        self.plugin.on_tick(&mut self.world)
    }

    /// Parachute state of `entity`, if any.
    #[must_use]
    pub fn state(&self, entity: u32) -> Option<&ParachuteState> {
        self.plugin
            .store()
            .and_then(|store| store.get(EntityIndex(entity)))
    }

    /// Prop currently owned by `entity`, if it still exists.
    #[must_use]
    pub fn prop_of(&self, entity: u32) -> Option<&SandboxProp> {
        self.state(entity)
            .and_then(|state| state.prop.as_ref())
            .and_then(|prop| self.world.prop(prop.raw()))
    }

    /// Sandbox write counters.
    #[must_use]
    pub const fn stats(&self) -> HostStats {
        self.world.stats()
    }
}
