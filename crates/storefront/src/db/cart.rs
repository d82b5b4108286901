//! Cart repository.
//!
//! Mutations that depend on the current line (add, set quantity) read and
//! write inside one transaction so a concurrent caller cannot slip a write
//! in between.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::instrument;

use coffee_shop_core::ProductId;

use super::StoreError;
use crate::models::{CartItem, ProductSnapshot, QuantityChange};

/// Repository for the `cart` container.
pub struct CartRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Add one unit of a product.
    ///
    /// An existing line gets `quantity + 1`. Otherwise a new line is created
    /// with quantity 1 and the snapshot's name, price and image.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Transaction` if the read or write fails, or
    /// `StoreError::InvalidQuantity` if the line is already at the maximum.
    #[instrument(skip(self, snapshot))]
    pub async fn upsert_on_add(
        &self,
        id: ProductId,
        snapshot: &ProductSnapshot,
    ) -> Result<CartItem, StoreError> {
        let mut tx = self.pool.begin().await?;

        let item = match fetch_item(&mut tx, id).await? {
            Some(mut existing) => {
                let quantity = existing.quantity;
                existing.quantity = quantity
                    .checked_add(1)
                    .ok_or(StoreError::InvalidQuantity(i64::from(quantity) + 1))?;
                write_quantity(&mut tx, id, existing.quantity).await?;
                tracing::debug!(quantity = existing.quantity, "Cart line incremented");
                existing
            }
            None => {
                let item = CartItem {
                    id,
                    name: snapshot.name.clone(),
                    image_url: snapshot.image_url.clone(),
                    price: snapshot.price,
                    quantity: 1,
                };
                sqlx::query(
                    r"
                    INSERT INTO cart (id, name, image_url, price, quantity)
                    VALUES (?1, ?2, ?3, ?4, ?5)
                    ",
                )
                .bind(item.id)
                .bind(&item.name)
                .bind(&item.image_url)
                .bind(item.price)
                .bind(item.quantity)
                .execute(&mut *tx)
                .await?;
                tracing::debug!("Cart line created");
                item
            }
        };

        tx.commit().await?;
        Ok(item)
    }

    /// Set a line's quantity; zero or less deletes the line.
    ///
    /// A missing line is left missing whatever the requested quantity.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Transaction` if the read or write fails, or
    /// `StoreError::InvalidQuantity` if `new_quantity` is too large to store.
    #[instrument(skip(self))]
    pub async fn set_quantity(
        &self,
        id: ProductId,
        new_quantity: i64,
    ) -> Result<QuantityChange, StoreError> {
        let mut tx = self.pool.begin().await?;

        let Some(mut item) = fetch_item(&mut tx, id).await? else {
            tracing::debug!("No cart line to update");
            return Ok(QuantityChange::Missing);
        };

        let change = if new_quantity > 0 {
            item.quantity = u32::try_from(new_quantity)
                .map_err(|_| StoreError::InvalidQuantity(new_quantity))?;
            write_quantity(&mut tx, id, item.quantity).await?;
            tracing::debug!(quantity = item.quantity, "Cart line quantity updated");
            QuantityChange::Updated(item)
        } else {
            delete_item(&mut tx, id).await?;
            tracing::debug!("Cart line removed at zero quantity");
            QuantityChange::Removed
        };

        tx.commit().await?;
        Ok(change)
    }

    /// Delete a line. Returns whether a line existed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Transaction` if the delete fails.
    #[instrument(skip(self))]
    pub async fn remove(&self, id: ProductId) -> Result<bool, StoreError> {
        let mut tx = self.pool.begin().await?;
        let removed = delete_item(&mut tx, id).await?;
        tx.commit().await?;
        Ok(removed)
    }

    /// Get a single line.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Transaction` if the read fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<CartItem>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        fetch_item(&mut conn, id).await
    }

    /// Every line, in key order.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Transaction` if the read fails.
    pub async fn load_all(&self) -> Result<Vec<CartItem>, StoreError> {
        let items = sqlx::query_as::<_, CartItem>(
            r"
            SELECT id, name, image_url, price, quantity
            FROM cart
            ORDER BY id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(items)
    }
}

async fn fetch_item(
    conn: &mut SqliteConnection,
    id: ProductId,
) -> Result<Option<CartItem>, StoreError> {
    let item = sqlx::query_as::<_, CartItem>(
        r"
        SELECT id, name, image_url, price, quantity
        FROM cart
        WHERE id = ?1
        ",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(item)
}

async fn write_quantity(
    conn: &mut SqliteConnection,
    id: ProductId,
    quantity: u32,
) -> Result<(), StoreError> {
    sqlx::query("UPDATE cart SET quantity = ?1 WHERE id = ?2")
        .bind(quantity)
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

async fn delete_item(conn: &mut SqliteConnection, id: ProductId) -> Result<bool, StoreError> {
    let result = sqlx::query("DELETE FROM cart WHERE id = ?1")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}
