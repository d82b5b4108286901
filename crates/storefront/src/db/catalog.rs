//! Catalog repository.
//!
//! The `products` container mirrors the last successfully fetched catalog.
//! It is written wholesale and read back only when the remote source fails.

use sqlx::SqlitePool;
use tracing::instrument;

use super::StoreError;
use crate::models::Product;

/// Repository for the `products` container.
pub struct CatalogRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CatalogRepository<'a> {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Upsert every product by id in one write transaction.
    ///
    /// Records missing from `products` are left in place.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Transaction` if any write fails; nothing is
    /// persisted in that case.
    #[instrument(skip_all, fields(count = products.len()))]
    pub async fn replace_all(&self, products: &[Product]) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        for product in products {
            sqlx::query(
                r"
                INSERT INTO products (id, name, price, description, image_url)
                VALUES (?1, ?2, ?3, ?4, ?5)
                ON CONFLICT (id) DO UPDATE SET
                    name = excluded.name,
                    price = excluded.price,
                    description = excluded.description,
                    image_url = excluded.image_url
                ",
            )
            .bind(product.id)
            .bind(&product.name)
            .bind(product.price)
            .bind(&product.description)
            .bind(&product.image_url)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        tracing::debug!("Catalog persisted");
        Ok(())
    }

    /// Every persisted product, in key order.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Transaction` if the read fails.
    pub async fn load_all(&self) -> Result<Vec<Product>, StoreError> {
        let products = sqlx::query_as::<_, Product>(
            r"
            SELECT id, name, price, description, image_url
            FROM products
            ORDER BY id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }
}
