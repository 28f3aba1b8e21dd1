//! Ownership lifecycle: purchase, toggle, sale, death and disconnect.
//!
//! Each player moves between three states:
//!
//! | state            | store entry | canopy |
//! |------------------|-------------|--------|
//! | none             | absent      | -      |
//! | owned, folded    | present     | none   |
//! | owned, deployed  | present     | prop   |
//!
//! Purchases and toggle-on install a folded parachute; sales, toggle-off and
//! disconnects remove the entry; death only folds a deployed parachute.
//! A sale or toggle-off only removes the entry when it names the item that
//! backs the parachute, so giving up an older item keeps the newer one.
//! Every transition out of the deployed state releases gravity and the prop
//! before the entry is touched.

use log::debug;

use crate::catalog::Catalog;
use crate::economy::ItemId;
use crate::host::{EntityIndex, Host};
use crate::simulator::{deactivate, release_prop};
use crate::state::{ParachuteState, ParachuteStateStore};

/// Requested equip state carried by a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleState {
    /// Unequip.
    Off,
    /// Equip.
    On,
}

impl TryFrom<i32> for ToggleState {
    type Error = i32;

    fn try_from(raw: i32) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(Self::Off),
            1 => Ok(Self::On),
            other => Err(other),
        }
    }
}

/// Input to [`LifecycleEventRouter::dispatch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// The shop sold an item to a player.
    Purchased {
        /// Buyer.
        entity: EntityIndex,
        /// Item instance.
        item_id: ItemId,
        /// Configuration key.
        key: String,
    },
    /// The player sold the item back.
    Sold {
        /// Seller.
        entity: EntityIndex,
        /// Item instance.
        item_id: ItemId,
        /// Configuration key.
        key: String,
        /// Refund reported with the sale; zero for toggle-off.
        sell_price: i32,
    },
    /// The player equipped or unequipped the item.
    Toggled {
        /// Owner.
        entity: EntityIndex,
        /// Item instance.
        item_id: ItemId,
        /// Configuration key.
        key: String,
        /// Requested state.
        state: ToggleState,
    },
    /// The player's pawn died.
    Died {
        /// Victim.
        entity: EntityIndex,
    },
    /// The player left the server.
    Disconnected {
        /// Leaving player.
        entity: EntityIndex,
    },
}

/// Applies lifecycle events to the state store.
pub struct LifecycleEventRouter<'a> {
    store: &'a mut ParachuteStateStore,
    catalog: &'a Catalog,
}

impl<'a> LifecycleEventRouter<'a> {
    /// Borrows the store and the model catalogue.
    pub const fn new(store: &'a mut ParachuteStateStore, catalog: &'a Catalog) -> Self {
        Self { store, catalog }
    }

    /// Routes one event. Events for players without a parachute are no-ops.
    pub fn dispatch<H: Host + ?Sized>(&mut self, event: LifecycleEvent, host: &mut H) {
        match event {
            LifecycleEvent::Purchased {
                entity,
                item_id,
                key,
            } => self.acquire(entity, item_id, &key, host),
            LifecycleEvent::Toggled {
                entity,
                item_id,
                key,
                state: ToggleState::On,
            } => self.acquire(entity, item_id, &key, host),
            LifecycleEvent::Toggled {
                entity,
                item_id,
                key,
                state: ToggleState::Off,
            } => self.relinquish(entity, item_id, &key, 0, host),
            LifecycleEvent::Sold {
                entity,
                item_id,
                key,
                sell_price,
            } => self.relinquish(entity, item_id, &key, sell_price, host),
            LifecycleEvent::Died { entity } => self.fold_on_death(entity, host),
            LifecycleEvent::Disconnected { entity } => self.forget(entity, host),
        }
    }

    fn acquire<H: Host + ?Sized>(
        &mut self,
        entity: EntityIndex,
        item_id: ItemId,
        key: &str,
        host: &mut H,
    ) {
        let Some(model) = self.catalog.model_for(key) else {
            debug!("player {entity}: `{key}` is not a configured parachute");
            return;
        };
        if let Some(previous) = self.store.upsert(entity, item_id, model) {
            release(previous, entity, host);
        }
        debug!("player {entity}: owns {item_id} (`{key}`)");
    }

    fn relinquish<H: Host + ?Sized>(
        &mut self,
        entity: EntityIndex,
        item_id: ItemId,
        key: &str,
        sell_price: i32,
        host: &mut H,
    ) {
        let Some(owned) = self.store.get(entity).map(ParachuteState::item_id) else {
            return;
        };
        if owned != item_id {
            debug!(
                "player {entity}: gave up `{key}` but keeps {owned} (`{}`)",
                self.catalog.key_for(owned).unwrap_or("unregistered")
            );
            return;
        }
        if let Some(state) = self.store.remove(entity) {
            release(state, entity, host);
            debug!("player {entity}: gave up {item_id} (`{key}`) for {sell_price}");
        }
    }

    fn fold_on_death<H: Host + ?Sized>(&mut self, entity: EntityIndex, host: &mut H) {
        if let Some(state) = self.store.get_mut(entity).filter(|state| state.is_active) {
            deactivate(state, entity, host);
        }
    }

    fn forget<H: Host + ?Sized>(&mut self, entity: EntityIndex, host: &mut H) {
        if let Some(state) = self.store.remove(entity) {
            release_prop(state.prop, host);
            debug!("player {entity}: disconnected, parachute dropped");
        }
    }
}

fn release<H: Host + ?Sized>(mut state: ParachuteState, entity: EntityIndex, host: &mut H) {
    if state.is_active {
        deactivate(&mut state, entity, host);
    } else {
        release_prop(state.prop.take(), host);
    }
}
