//! Integration tests for catalog persistence.
//!
//! The catalog container is replaced wholesale on every successful fetch and
//! read back only as a fallback.

#![allow(clippy::unwrap_used)]

use coffee_shop_integration_tests::{memory_store, product, sample_catalog};

// =============================================================================
// Round Trip
// =============================================================================

#[tokio::test]
async fn test_replace_all_then_load_all_returns_same_records() {
    let store = memory_store().await;
    let products = sample_catalog();

    store.catalog().replace_all(&products).await.unwrap();

    let mut loaded = store.catalog().load_all().await.unwrap();
    loaded.sort_by_key(|p| p.id);
    assert_eq!(loaded, products);
}

#[tokio::test]
async fn test_round_trip_is_independent_of_input_order() {
    let forward = memory_store().await;
    let reversed = memory_store().await;
    let products = sample_catalog();
    let mut backwards = products.clone();
    backwards.reverse();

    forward.catalog().replace_all(&products).await.unwrap();
    reversed.catalog().replace_all(&backwards).await.unwrap();

    assert_eq!(
        forward.catalog().load_all().await.unwrap(),
        reversed.catalog().load_all().await.unwrap()
    );
}

#[tokio::test]
async fn test_empty_catalog_is_not_an_error() {
    let store = memory_store().await;

    store.catalog().replace_all(&[]).await.unwrap();
    assert!(store.catalog().load_all().await.unwrap().is_empty());
}

// =============================================================================
// Replacement Policy
// =============================================================================

#[tokio::test]
async fn test_refresh_updates_changed_records() {
    let store = memory_store().await;
    store.catalog().replace_all(&sample_catalog()).await.unwrap();

    let repriced = product(2, "Golden Sunrise", "9.49");
    store
        .catalog()
        .replace_all(std::slice::from_ref(&repriced))
        .await
        .unwrap();

    let loaded = store.catalog().load_all().await.unwrap();
    let golden = loaded.iter().find(|p| p.id == repriced.id).unwrap();
    assert_eq!(golden, &repriced);
}

#[tokio::test]
async fn test_refresh_keeps_records_missing_from_new_list() {
    let store = memory_store().await;
    store.catalog().replace_all(&sample_catalog()).await.unwrap();

    store
        .catalog()
        .replace_all(&[product(4, "Cold Brew", "5.00")])
        .await
        .unwrap();

    assert_eq!(store.catalog().load_all().await.unwrap().len(), 4);
}
