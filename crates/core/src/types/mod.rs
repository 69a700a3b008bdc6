//! Core types for Farmgate.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod status;
pub mod unit;

pub use id::*;
pub use price::{CurrencyCode, Price};
pub use status::OrderStatus;
pub use unit::UnitOfMeasure;
