//! Bridge between the configuration file and the shop plugin.
//!
//! [`ParachuteCatalogAdapter::register`] publishes every configured item in
//! file order, one registration at a time, so the shop hands out item ids
//! deterministically. Shop callbacks are converted into
//! [`LifecycleEvent`]s by the `From`/`TryFrom` impls at the bottom of this
//! module.

use hashbrown::HashMap;
use log::{error, info};

use crate::config::ParachuteConfig;
use crate::constants::CATEGORY_NAME;
use crate::economy::{
    BuyCallback, Economy, EconomyError, ItemId, ItemRegistration, SellCallback, ToggleCallback,
};
use crate::router::{LifecycleEvent, ToggleState};

/// Lookup tables built from the configuration and the shop's replies.
#[derive(Debug, Default, Clone)]
pub struct Catalog {
    models: HashMap<String, String>,
    registered: HashMap<ItemId, String>,
}

impl Catalog {
    /// Model lookup for every configured key, with nothing registered.
    #[must_use]
    pub fn from_config(config: &ParachuteConfig) -> Self {
        let models = config
            .items()
            .iter()
            .map(|item| (item.key.clone(), item.model.clone()))
            .collect();
        Self {
            models,
            registered: HashMap::new(),
        }
    }

    /// Prop model configured for `key`.
    #[must_use]
    pub fn model_for(&self, key: &str) -> Option<&str> {
        self.models.get(key).map(String::as_str)
    }

    /// Configuration key the shop registered under `item`.
    #[must_use]
    pub fn key_for(&self, item: ItemId) -> Option<&str> {
        self.registered.get(&item).map(String::as_str)
    }

    /// Number of items the shop accepted.
    #[must_use]
    pub fn registered_len(&self) -> usize {
        self.registered.len()
    }
}

/// Publishes configured parachutes to the shop.
pub struct ParachuteCatalogAdapter;

impl ParachuteCatalogAdapter {
    /// Creates the category and registers every configured item in order.
    ///
    /// An item the shop rejects is logged and skipped; the remaining items
    /// are still registered.
    ///
    /// # Errors
    /// Returns the shop's error when the category itself cannot be created.
    pub fn register<E: Economy + ?Sized>(
        economy: &mut E,
        config: &ParachuteConfig,
    ) -> Result<Catalog, EconomyError> {
        economy.create_category(CATEGORY_NAME, &config.tuning().category_name)?;

        let mut catalog = Catalog::from_config(config);
        for item in config.items() {
            let registration = ItemRegistration {
                key: item.key.clone(),
                display_name: item.name.clone(),
                category: CATEGORY_NAME.to_owned(),
                price: item.price,
                sell_price: item.sell_price,
                duration: item.duration,
            };
            match Self::register_one(economy, &registration) {
                Ok(id) => {
                    info!("registered parachute `{}` as {id}", item.key);
                    catalog.registered.insert(id, item.key.clone());
                }
                Err(e) => error!("skipping parachute `{}`: {e}", item.key),
            }
        }
        Ok(catalog)
    }

    fn register_one<E: Economy + ?Sized>(
        economy: &mut E,
        registration: &ItemRegistration,
    ) -> Result<ItemId, EconomyError> {
        let id = economy.add_item(registration)?;
        economy.bind_callbacks(id)?;
        Ok(id)
    }
}

impl From<BuyCallback> for LifecycleEvent {
    fn from(callback: BuyCallback) -> Self {
        Self::Purchased {
            entity: callback.entity,
            item_id: callback.item_id,
            key: callback.key,
        }
    }
}

impl From<SellCallback> for LifecycleEvent {
    fn from(callback: SellCallback) -> Self {
        Self::Sold {
            entity: callback.entity,
            item_id: callback.item_id,
            key: callback.key,
            sell_price: callback.sell_price,
        }
    }
}

impl TryFrom<ToggleCallback> for LifecycleEvent {
    type Error = i32;

    /// Fails with the raw state when it is neither `0` nor `1`.
    fn try_from(callback: ToggleCallback) -> Result<Self, Self::Error> {
        let state = ToggleState::try_from(callback.state)?;
        Ok(Self::Toggled {
            entity: callback.entity,
            item_id: callback.item_id,
            key: callback.key,
            state,
        })
    }
}
