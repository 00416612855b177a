//! Product categories.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level product category.
///
/// Matches the `category` column of the `products` table, which stores the
/// lowercase name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Men,
    Women,
    Unisex,
}

/// Error parsing a category from a string.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown category: {0}")]
pub struct CategoryParseError(String);

impl Category {
    /// All categories, in storefront display order.
    pub const ALL: [Self; 3] = [Self::Women, Self::Men, Self::Unisex];

    /// The lowercase column value for this category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Men => "men",
            Self::Women => "women",
            Self::Unisex => "unisex",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = CategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "men" => Ok(Self::Men),
            "women" => Ok(Self::Women),
            "unisex" => Ok(Self::Unisex),
            other => Err(CategoryParseError(other.to_owned())),
        }
    }
}
