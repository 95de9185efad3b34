//! Task store configuration.
//!
//! Every field has a default so partial JSON documents are accepted.

use crate::model::task::TaskId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Slot key used by default for the task collection.
pub const DEFAULT_SLOT_KEY: &str = "tasks";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Key of the persistence slot holding the serialized collection.
    pub slot_key: String,
    /// First value produced by the store's ID generator.
    pub id_base: TaskId,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            slot_key: DEFAULT_SLOT_KEY.to_string(),
            id_base: 0,
        }
    }
}

impl StoreConfig {
    /// Parses a JSON config document.
    ///
    /// # Errors
    /// - [`ConfigError::Parse`] when the document is not valid JSON for this
    ///   shape.
    /// - [`ConfigError::EmptySlotKey`] when `slot_key` is blank.
    pub fn from_json(source: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(source).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.slot_key.trim().is_empty() {
            return Err(ConfigError::EmptySlotKey);
        }
        Ok(())
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    EmptySlotKey,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid store config: {err}"),
            Self::EmptySlotKey => write!(f, "invalid store config: slot_key cannot be empty"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::EmptySlotKey => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, StoreConfig, DEFAULT_SLOT_KEY};

    #[test]
    fn partial_json_keeps_defaults() {
        let config = StoreConfig::from_json(r#"{"id_base": 100}"#).unwrap();
        assert_eq!(config.slot_key, DEFAULT_SLOT_KEY);
        assert_eq!(config.id_base, 100);
    }

    #[test]
    fn blank_slot_key_is_rejected() {
        let err = StoreConfig::from_json(r#"{"slot_key": "  "}"#).unwrap_err();
        assert!(matches!(err, ConfigError::EmptySlotKey));
    }
}
