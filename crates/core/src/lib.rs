//! Coffee Shop Core - Shared types library.
//!
//! This crate provides common types used across the Coffee Shop components:
//! - `storefront` - Catalog and cart persistence plus the application state
//! - `integration-tests` - Black-box tests of the storefront library
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP clients. The optional `sqlite` feature adds `sqlx` encode/decode
//! support so the types can be bound and read directly by the store.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and prices

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
