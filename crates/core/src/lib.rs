//! Dessert Cart Core - Shared cart and catalog types.
//!
//! This crate provides the domain types used across all Dessert Cart components:
//! - `storefront` - The storefront widget server (catalog grid, cart panel, receipts)
//! - `cli` - Command-line tools for inspecting catalogs and persisted carts
//!
//! # Architecture
//!
//! The core crate contains only types and pure operations - no I/O, no HTTP
//! clients, no storage. Side effects (persisting, re-rendering) are layered on
//! top by the storefront's cart store.
//!
//! # Modules
//!
//! - [`types`] - Product identifiers, prices, the catalog, and the cart itself

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
