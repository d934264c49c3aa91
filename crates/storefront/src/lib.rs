//! Dessert Cart storefront library.
//!
//! This crate provides the storefront functionality as a library,
//! allowing it to be tested and reused.
//!
//! # Architecture
//!
//! - [`catalog`] fetches and parses the product catalog
//! - [`storage`] persists the cart in a single key-value slot
//! - [`cart_store`] owns the cart and keeps it saved and projected
//! - [`order`] drives the confirmation flow
//! - [`views`] projects catalog and cart into template data
//! - [`app`] ties these together behind the loading lifecycle
//! - [`routes`] exposes the whole thing over HTMX-driven HTTP

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod app;
pub mod cart_store;
pub mod catalog;
pub mod config;
pub mod error;
pub mod order;
pub mod routes;
pub mod state;
pub mod storage;
pub mod views;
