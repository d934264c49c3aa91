//! Core types for Dessert Cart.
//!
//! This module provides type-safe wrappers for the cart domain.

pub mod cart;
pub mod catalog;
pub mod id;
pub mod price;
pub mod quantity;

pub use cart::{Cart, CartEntry};
pub use catalog::{Catalog, Product};
pub use id::{ProductId, ProductIdError};
pub use price::{Price, PriceError};
pub use quantity::PendingQuantity;
