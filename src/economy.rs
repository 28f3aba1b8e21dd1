//! Contract consumed from the shop (economy) plugin.
//!
//! The shop owns pricing, currency and ownership persistence. This crate only
//! registers items, asks for their callbacks and reacts to the callback
//! payloads below.

use std::fmt;

use thiserror::Error;

use crate::host::EntityIndex;

/// Shop-assigned identifier of a registered item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(pub i32);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item {}", self.0)
    }
}

/// Answer returned to the shop from every callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookResult {
    /// Let the shop finish its own processing.
    Continue,
    /// Abort the shop's processing.
    Stop,
}

/// Item registration request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRegistration {
    /// Unique key from the configuration file.
    pub key: String,
    /// Name shown in the shop menu.
    pub display_name: String,
    /// Category the item belongs to.
    pub category: String,
    /// Purchase price.
    pub price: i32,
    /// Refund when sold.
    pub sell_price: i32,
    /// Ownership duration, interpreted by the shop.
    pub duration: i32,
}

/// Failure reported by the shop plugin.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EconomyError {
    /// The category could not be created.
    #[error("failed to create category `{name}`: {reason}")]
    Category {
        /// Category name.
        name: String,
        /// Shop-provided reason.
        reason: String,
    },
    /// An item could not be registered.
    #[error("failed to register item `{key}`: {reason}")]
    Registration {
        /// Configuration key of the item.
        key: String,
        /// Shop-provided reason.
        reason: String,
    },
    /// Callbacks could not be attached to an item.
    #[error("failed to bind callbacks for {item}: {reason}")]
    Binding {
        /// Registered item.
        item: ItemId,
        /// Shop-provided reason.
        reason: String,
    },
}

/// Shop plugin API.
///
/// Registration may be asynchronous inside the shop, but every method here
/// returns only once the operation has completed.
#[cfg_attr(test, mockall::automock)]
pub trait Economy {
    /// Creates the category items are listed under.
    ///
    /// # Errors
    /// Returns [`EconomyError::Category`] when the shop rejects the category.
    fn create_category(&mut self, name: &str, display_name: &str) -> Result<(), EconomyError>;

    /// Registers one item and returns its identifier.
    ///
    /// # Errors
    /// Returns [`EconomyError::Registration`] when the shop rejects the item.
    fn add_item(&mut self, item: &ItemRegistration) -> Result<ItemId, EconomyError>;

    /// Routes the buy, sell and toggle callbacks of `item` to this plugin.
    ///
    /// # Errors
    /// Returns [`EconomyError::Binding`] when the item is unknown to the shop.
    fn bind_callbacks(&mut self, item: ItemId) -> Result<(), EconomyError>;
}

/// Payload of the shop's buy callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuyCallback {
    /// Buyer.
    pub entity: EntityIndex,
    /// Purchased item.
    pub item_id: ItemId,
    /// Category of the item.
    pub category: String,
    /// Configuration key of the item.
    pub key: String,
    /// Price paid.
    pub price: i32,
    /// Refund on sale.
    pub sell_price: i32,
    /// Ownership duration.
    pub duration: i32,
    /// Number of items bought.
    pub count: i32,
}

/// Payload of the shop's sell callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SellCallback {
    /// Seller.
    pub entity: EntityIndex,
    /// Sold item.
    pub item_id: ItemId,
    /// Configuration key of the item.
    pub key: String,
    /// Refund credited by the shop.
    pub sell_price: i32,
}

/// Payload of the shop's toggle callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleCallback {
    /// Owner toggling the item.
    pub entity: EntityIndex,
    /// Toggled item.
    pub item_id: ItemId,
    /// Configuration key of the item.
    pub key: String,
    /// Raw toggle state; `1` equips, `0` unequips.
    pub state: i32,
}
