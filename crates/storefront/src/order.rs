//! Order confirmation flow.
//!
//! Two states: [`OrderState::Shopping`] and [`OrderState::Confirmed`].
//!
//! ```text
//! Shopping --confirm (cart non-empty)--> Confirmed
//! Confirmed --start new order--> Shopping   (clears the cart)
//! ```
//!
//! Confirming takes a [`Receipt`] snapshot of the cart. The receipt is plain
//! data; later cart edits do not touch it.

use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use crate::cart_store::CartStore;
use crate::views::{CartItemView, line_items};

/// Frozen copy of the cart at confirmation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub order_number: Uuid,
    pub confirmed_at: DateTime<Utc>,
    pub items: Vec<CartItemView>,
    pub item_count: u32,
    pub total: String,
}

impl Receipt {
    fn snapshot(store: &CartStore) -> Self {
        Self {
            order_number: Uuid::new_v4(),
            confirmed_at: Utc::now(),
            items: line_items(store.cart(), store.catalog()),
            item_count: store.total_item_count(),
            total: store.total_price().display(),
        }
    }

    /// Short, human-friendly order reference.
    #[must_use]
    pub fn reference(&self) -> String {
        let simple = self.order_number.simple().to_string();
        simple.chars().take(8).collect::<String>().to_uppercase()
    }

    /// Confirmation time formatted for display.
    #[must_use]
    pub fn confirmed_at_display(&self) -> String {
        self.confirmed_at.format("%Y-%m-%d %H:%M UTC").to_string()
    }
}

/// Where the shopper is in the order flow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OrderState {
    #[default]
    Shopping,
    Confirmed(Box<Receipt>),
}

/// Drives the confirmation state machine.
#[derive(Debug, Default)]
pub struct OrderFlow {
    state: OrderState,
}

impl OrderFlow {
    /// Start in [`OrderState::Shopping`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &OrderState {
        &self.state
    }

    /// The receipt being shown, if confirmed.
    #[must_use]
    pub fn receipt(&self) -> Option<&Receipt> {
        match &self.state {
            OrderState::Confirmed(receipt) => Some(receipt.as_ref()),
            OrderState::Shopping => None,
        }
    }

    /// Whether the confirmation view is visible.
    #[must_use]
    pub const fn is_confirmed(&self) -> bool {
        matches!(self.state, OrderState::Confirmed(_))
    }

    /// Confirm the order.
    ///
    /// Only fires from Shopping with a non-empty cart; returns whether the
    /// transition happened.
    pub fn confirm(&mut self, store: &CartStore) -> bool {
        if self.is_confirmed() || store.cart().is_empty() {
            return false;
        }
        let receipt = Receipt::snapshot(store);
        info!(
            order = %receipt.order_number,
            items = receipt.item_count,
            total = %receipt.total,
            "Order confirmed"
        );
        self.state = OrderState::Confirmed(Box::new(receipt));
        true
    }

    /// Leave the confirmation view and start over with an empty cart.
    ///
    /// Only fires from Confirmed; returns whether the transition happened.
    pub fn start_new_order(&mut self, store: &mut CartStore) -> bool {
        if !self.is_confirmed() {
            return false;
        }
        store.clear();
        self.state = OrderState::Shopping;
        info!("New order started");
        true
    }
}
