//! Per-card pending quantity.

use core::fmt;

use serde::{Deserialize, Serialize};

/// The quantity a shopper has dialled in on a product card before adding it.
///
/// Never below 1, with no upper bound. This is UI-local state: it is not part
/// of the cart and is never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct PendingQuantity(u32);

impl PendingQuantity {
    /// The value every freshly rendered card starts from.
    pub const INITIAL: Self = Self(1);

    /// Create a pending quantity, clamping to the minimum of 1.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        if value == 0 { Self::INITIAL } else { Self(value) }
    }

    /// One more.
    #[must_use]
    pub const fn increased(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// One fewer, but never below 1.
    #[must_use]
    pub const fn decreased(self) -> Self {
        Self::new(self.0.saturating_sub(1))
    }

    /// Apply a signed step from a `+`/`-` control.
    #[must_use]
    pub const fn stepped(self, step: i32) -> Self {
        if step > 0 {
            self.increased()
        } else if step < 0 {
            self.decreased()
        } else {
            self
        }
    }

    /// Get the value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl Default for PendingQuantity {
    fn default() -> Self {
        Self::INITIAL
    }
}

impl From<u32> for PendingQuantity {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl From<PendingQuantity> for u32 {
    fn from(quantity: PendingQuantity) -> Self {
        quantity.0
    }
}

impl fmt::Display for PendingQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_one() {
        assert_eq!(PendingQuantity::default().get(), 1);
    }

    #[test]
    fn test_clamped_to_one() {
        assert_eq!(PendingQuantity::new(0).get(), 1);
        assert_eq!(PendingQuantity::INITIAL.decreased().get(), 1);
    }

    #[test]
    fn test_no_upper_bound() {
        let mut quantity = PendingQuantity::INITIAL;
        for _ in 0..99 {
            quantity = quantity.increased();
        }
        assert_eq!(quantity.get(), 100);
    }

    #[test]
    fn test_stepped() {
        let quantity = PendingQuantity::new(3);
        assert_eq!(quantity.stepped(1).get(), 4);
        assert_eq!(quantity.stepped(-1).get(), 2);
        assert_eq!(quantity.stepped(0).get(), 3);
    }
}
