//! Per-player parachute ownership.
//!
//! [`ParachuteStateStore`] maps each [`EntityIndex`] to its parachute. It is
//! the only place parachute states are created or destroyed; the router and the
//! tick simulator borrow it explicitly.

use hashbrown::HashMap;

use crate::constants::NORMAL_GRAVITY_SCALE;
use crate::economy::ItemId;
use crate::host::{EntityIndex, PropHandle};

/// Parachute owned by one player.
#[derive(Debug, PartialEq)]
pub struct ParachuteState {
    item_id: ItemId,
    model_path: String,
    /// The parachute is deployed.
    pub is_active: bool,
    /// Falling ticks since the last explicit teleport.
    pub ticks_since_sync: u32,
    /// Canopy prop; present only while deployed.
    pub prop: Option<PropHandle>,
    /// Gravity scale to write back when the parachute folds.
    pub restore_gravity: f32,
}

impl ParachuteState {
    /// Creates an inactive parachute.
    #[must_use]
    pub fn new(item_id: ItemId, model_path: impl Into<String>) -> Self {
        Self {
            item_id,
            model_path: model_path.into(),
            is_active: false,
            ticks_since_sync: 0,
            prop: None,
            restore_gravity: NORMAL_GRAVITY_SCALE,
        }
    }

    /// Shop item backing this parachute.
    #[must_use]
    pub const fn item_id(&self) -> ItemId {
        self.item_id
    }

    /// Prop model captured when the parachute was acquired.
    #[must_use]
    pub fn model_path(&self) -> &str {
        &self.model_path
    }
}

/// Parachute states keyed by entity.
#[derive(Debug, Default)]
pub struct ParachuteStateStore {
    states: HashMap<EntityIndex, ParachuteState>,
}

impl ParachuteStateStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a fresh inactive parachute for `entity`.
    ///
    /// Returns the state it replaced so the caller can release its prop.
    pub fn upsert(
        &mut self,
        entity: EntityIndex,
        item_id: ItemId,
        model_path: impl Into<String>,
    ) -> Option<ParachuteState> {
        self.states
            .insert(entity, ParachuteState::new(item_id, model_path))
    }

    /// Removes and returns the parachute of `entity`.
    pub fn remove(&mut self, entity: EntityIndex) -> Option<ParachuteState> {
        self.states.remove(&entity)
    }

    /// Parachute of `entity`, if any.
    #[must_use]
    pub fn get(&self, entity: EntityIndex) -> Option<&ParachuteState> {
        self.states.get(&entity)
    }

    /// Mutable parachute of `entity`, if any.
    pub fn get_mut(&mut self, entity: EntityIndex) -> Option<&mut ParachuteState> {
        self.states.get_mut(&entity)
    }

    /// Whether `entity` owns a parachute.
    #[must_use]
    pub fn has(&self, entity: EntityIndex) -> bool {
        self.states.contains_key(&entity)
    }

    /// Owners in ascending entity order.
    #[must_use]
    pub fn owners(&self) -> Vec<EntityIndex> {
        let mut owners: Vec<EntityIndex> = self.states.keys().copied().collect();
        owners.sort_unstable();
        owners
    }

    /// Number of owners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Whether nobody owns a parachute.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
