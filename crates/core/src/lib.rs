//! Farmgate Core - Shared types library.
//!
//! This crate provides common types used across all Farmgate components:
//! - `client` - Marketplace client library (cart, checkout, API access)
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps
//! it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, statuses, and units

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
