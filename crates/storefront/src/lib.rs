//! Coffee Shop Storefront library.
//!
//! Catalog and cart persistence in a local embedded store, the remote catalog
//! client, and the application state the rendering layer calls into.
//!
//! # Modules
//!
//! - [`db`] - Local store: schema, catalog and cart repositories
//! - [`catalog`] - Remote catalog client
//! - [`models`] - Products, cart lines and the derived cart view
//! - [`search`] - Catalog filtering
//! - [`state`] - Application state and user-facing operations

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod search;
pub mod state;

pub use error::AppError;
pub use state::{AppState, CatalogLoad, CatalogSource, ViewMode};
