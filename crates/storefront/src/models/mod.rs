//! Domain models for the storefront.
//!
//! - [`product`] - Catalog records as fetched from the remote source
//! - [`cart`] - Persisted cart lines and the derived cart view

pub mod cart;
pub mod product;

pub use cart::{CartItem, CartLineView, CartView, ProductSnapshot, QuantityChange};
pub use product::Product;
