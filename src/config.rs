//! Parachute configuration loaded from the shop's JSON file.
//!
//! The file is a single JSON object. Object-valued keys describe purchasable
//! items, keyed by their unique shop key; scalar keys tune the descent:
//!
//! ```json
//! {
//!   "FallSpeed": 85,
//!   "Linear": true,
//!   "DecreaseVec": 50,
//!   "TeleportTicks": 300,
//!   "DisableWhenCarryingHostage": false,
//!   "parachute_red": {
//!     "name": "Red parachute",
//!     "price": 1000,
//!     "sellprice": 500,
//!     "duration": 0,
//!     "model": "models/parachute/red.vmdl"
//!   }
//! }
//! ```
//!
//! Items keep the order in which they appear in the file, which fixes the
//! order they are registered with the shop. Missing tuning keys fall back to
//! the defaults in [`crate::constants`]; unknown scalar keys are ignored.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::constants::{
    CONFIG_RELATIVE_PATH, DEFAULT_CATEGORY_DISPLAY_NAME, DEFAULT_DECREASE_VEC,
    DEFAULT_DEPLOY_GRAVITY_SCALE, DEFAULT_FALL_SPEED, DEFAULT_TELEPORT_TICKS,
};

/// Errors raised while reading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The file is not valid JSON.
    #[error("malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),
    /// The top-level JSON value is not an object.
    #[error("configuration root must be a JSON object")]
    NotAnObject,
    /// An item entry is missing a field or has the wrong type.
    #[error("item `{key}` is invalid: {source}")]
    InvalidItem {
        /// Item key.
        key: String,
        /// Field-level error.
        source: serde_json::Error,
    },
    /// The tuning scalars have the wrong types.
    #[error("invalid tuning values: {0}")]
    InvalidTuning(serde_json::Error),
    /// A tuning value is outside its usable range.
    #[error("`{field}` = {value} is out of range ({expected})")]
    OutOfRange {
        /// Configuration key.
        field: &'static str,
        /// Rejected value.
        value: f32,
        /// Accepted range.
        expected: &'static str,
    },
}

/// One purchasable parachute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemConfig {
    /// Unique shop key.
    pub key: String,
    /// Name shown in the shop.
    pub name: String,
    /// Purchase price.
    pub price: i32,
    /// Refund when sold.
    pub sell_price: i32,
    /// Ownership duration, interpreted by the shop.
    pub duration: i32,
    /// Prop model path.
    pub model: String,
}

#[derive(Deserialize)]
struct RawItem {
    name: String,
    price: i32,
    #[serde(rename = "sellprice")]
    sell_price: i32,
    duration: i32,
    model: String,
}

/// Descent tuning shared by every parachute.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Tuning {
    /// Terminal downward speed magnitude.
    pub fall_speed: f32,
    /// Snap to the terminal speed as soon as the fall is no faster than it.
    pub linear: bool,
    /// Per-tick easing step; zero snaps immediately.
    pub decrease_vec: f32,
    /// Falling ticks between explicit entity teleports.
    pub teleport_ticks: u32,
    /// Refuse to deploy while carrying a hostage.
    pub disable_when_carrying_hostage: bool,
    /// Gravity multiplier while deployed.
    pub gravity_scale: f32,
    /// Display name of the shop category.
    pub category_name: String,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            fall_speed: DEFAULT_FALL_SPEED,
            linear: true,
            decrease_vec: DEFAULT_DECREASE_VEC,
            teleport_ticks: DEFAULT_TELEPORT_TICKS,
            disable_when_carrying_hostage: false,
            gravity_scale: DEFAULT_DEPLOY_GRAVITY_SCALE,
            category_name: DEFAULT_CATEGORY_DISPLAY_NAME.to_owned(),
        }
    }
}

impl Tuning {
    fn validate(&self) -> Result<(), ConfigError> {
        check_range("FallSpeed", self.fall_speed, "finite, >= 0")?;
        check_range("GravityScale", self.gravity_scale, "finite, >= 0")?;
        if !self.decrease_vec.is_finite() {
            return Err(ConfigError::OutOfRange {
                field: "DecreaseVec",
                value: self.decrease_vec,
                expected: "finite",
            });
        }
        Ok(())
    }
}

fn check_range(field: &'static str, value: f32, expected: &'static str) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            expected,
        })
    }
}

/// Parsed configuration file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParachuteConfig {
    items: Vec<ItemConfig>,
    tuning: Tuning,
}

impl ParachuteConfig {
    /// Builds a configuration from already-parsed parts.
    #[must_use]
    pub const fn new(items: Vec<ItemConfig>, tuning: Tuning) -> Self {
        Self { items, tuning }
    }

    /// Reads and parses the file at `path`.
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] when the file cannot be read, otherwise any
    /// error from [`ParachuteConfig::from_json_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = path.as_ref();
        let text = fs::read_to_string(file).map_err(|source| ConfigError::Io {
            path: file.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Parses configuration text.
    ///
    /// # Errors
    /// Returns an error when the text is not a JSON object, an item entry is
    /// incomplete, or a tuning value has the wrong type or range.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let root: Value = serde_json::from_str(text)?;
        let Value::Object(entries) = root else {
            return Err(ConfigError::NotAnObject);
        };

        let mut items = Vec::new();
        let mut scalars = Map::new();
        for (key, value) in entries {
            if value.is_object() {
                let raw: RawItem = serde_json::from_value(value)
                    .map_err(|source| ConfigError::InvalidItem {
                        key: key.clone(),
                        source,
                    })?;
                items.push(ItemConfig {
                    key,
                    name: raw.name,
                    price: raw.price,
                    sell_price: raw.sell_price,
                    duration: raw.duration,
                    model: raw.model,
                });
            } else {
                scalars.insert(key, value);
            }
        }

        let tuning: Tuning =
            serde_json::from_value(Value::Object(scalars)).map_err(ConfigError::InvalidTuning)?;
        tuning.validate()?;
        Ok(Self { items, tuning })
    }

    /// Items in file order.
    #[must_use]
    pub fn items(&self) -> &[ItemConfig] {
        &self.items
    }

    /// Looks up an item by its shop key.
    #[must_use]
    pub fn item(&self, key: &str) -> Option<&ItemConfig> {
        self.items.iter().find(|item| item.key == key)
    }

    /// Descent tuning.
    #[must_use]
    pub const fn tuning(&self) -> &Tuning {
        &self.tuning
    }
}

/// Location of the configuration file relative to the plugin's directory.
#[must_use]
pub fn default_config_path(module_dir: &Path) -> PathBuf {
    module_dir.join(CONFIG_RELATIVE_PATH)
}
