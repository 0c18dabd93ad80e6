use serde::{Deserialize, Serialize};
use std::fmt;

/// Errors from item construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ItemError {
    #[error("item name must not be empty")]
    EmptyName,
}

/// A named token carried along a production line.
///
/// Producers and receivers each hold one as their key; the keys at the two
/// ends of a chain must compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Item {
    name: String,
}

impl Item {
    pub fn new(name: impl Into<String>) -> Result<Self, ItemError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ItemError::EmptyName);
        }
        Ok(Self { name })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
