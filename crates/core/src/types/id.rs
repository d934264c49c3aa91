//! Product identifiers.
//!
//! Products have no identity in the catalog source; the loader assigns each
//! record its 1-based position in the response. The id is therefore only stable
//! as long as the source keeps its ordering.

use core::fmt;
use core::num::NonZeroU32;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`ProductId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProductIdError {
    /// The input is not an unsigned integer.
    #[error("product id must be a positive integer: {0}")]
    NotANumber(String),
    /// Product ids start at 1.
    #[error("product id cannot be zero")]
    Zero,
}

/// A type-safe product identifier (1-based).
///
/// # Example
///
/// ```rust
/// # use dessert_cart_core::ProductId;
/// let first = ProductId::from_position(0);
/// assert_eq!(first.get(), 1);
/// assert_eq!("1".parse::<ProductId>().unwrap(), first);
/// assert!("0".parse::<ProductId>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(NonZeroU32);

impl ProductId {
    /// Create an ID from a raw value, rejecting zero.
    #[must_use]
    pub const fn new(id: u32) -> Option<Self> {
        match NonZeroU32::new(id) {
            Some(id) => Some(Self(id)),
            None => None,
        }
    }

    /// Create the ID of the record at `index` (0-based) in load order.
    ///
    /// Saturates at `u32::MAX` for absurdly large catalogs.
    #[must_use]
    pub fn from_position(index: usize) -> Self {
        let position = u32::try_from(index)
            .ok()
            .and_then(|i| i.checked_add(1))
            .unwrap_or(u32::MAX);
        Self(NonZeroU32::new(position).unwrap_or(NonZeroU32::MAX))
    }

    /// Get the underlying value.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProductId {
    type Err = ProductIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s
            .trim()
            .parse::<u32>()
            .map_err(|_| ProductIdError::NotANumber(s.to_owned()))?;
        Self::new(raw).ok_or(ProductIdError::Zero)
    }
}

impl From<ProductId> for u32 {
    fn from(id: ProductId) -> Self {
        id.get()
    }
}
