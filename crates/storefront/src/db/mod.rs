//! Local embedded store for the catalog and the cart.
//!
//! # Store: `CoffeeShopDB`
//!
//! A single SQLite database holds all durable state:
//!
//! ## Containers
//!
//! - `products` - Last successfully fetched catalog, keyed by product id
//! - `cart` - Cart lines, keyed by the product id they were created from
//!
//! # Schema version
//!
//! The version lives in `PRAGMA user_version`. Opening a store upgrades it
//! step by step to [`SCHEMA_VERSION`]; a store written by a newer schema is
//! refused with [`StoreError::Open`].
//!
//! # Transactions
//!
//! Every repository call runs in its own transaction. Read-modify-write
//! sequences (get, then put or delete) share that transaction. The pool holds
//! exactly one connection, so transactions never interleave.

pub mod cart;
pub mod catalog;

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{SqliteConnection, SqlitePool};
use tokio::sync::OnceCell;
use tracing::instrument;

pub use cart::CartRepository;
pub use catalog::CatalogRepository;

/// Fixed store name.
pub const STORE_NAME: &str = "CoffeeShopDB";

/// Current schema version.
pub const SCHEMA_VERSION: i64 = 1;

/// Container holding catalog records.
pub const PRODUCTS_CONTAINER: &str = "products";

/// Container holding cart lines.
pub const CART_CONTAINER: &str = "cart";

/// Upgrade steps. Entry `n` moves a store from version `n` to `n + 1`.
const UPGRADES: &[&[&str]] = &[&[
    r"
    CREATE TABLE IF NOT EXISTS products (
        id INTEGER PRIMARY KEY NOT NULL,
        name TEXT NOT NULL,
        price TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        image_url TEXT NOT NULL DEFAULT ''
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS cart (
        id INTEGER PRIMARY KEY NOT NULL,
        name TEXT NOT NULL,
        image_url TEXT NOT NULL DEFAULT '',
        price TEXT NOT NULL,
        quantity INTEGER NOT NULL CHECK (quantity > 0)
    )
    ",
]];

/// Errors from the local store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store could not be opened: storage unavailable, bad location,
    /// or blocked by an incompatible schema version.
    #[error("failed to open store: {0}")]
    Open(String),

    /// A get, put, delete or commit inside an open store failed.
    #[error("transaction failed: {0}")]
    Transaction(#[from] sqlx::Error),

    /// A quantity does not fit the stored integer type.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(i64),
}

/// An open store. Cheap to clone; all clones share one connection pool.
#[derive(Debug, Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Open the store at `database_url`, creating and upgrading it as needed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Open` if the URL is invalid, the database cannot
    /// be opened, read or upgraded, or its schema version is newer than
    /// [`SCHEMA_VERSION`].
    #[instrument(skip_all)]
    pub async fn open(database_url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| StoreError::Open(format!("invalid database url: {e}")))?
            .create_if_missing(true);

        // One connection: transactions are serialized, and in-memory stores
        // live exactly as long as the pool.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Open(e.to_string()))?;

        let mut conn = pool
            .acquire()
            .await
            .map_err(|e| StoreError::Open(e.to_string()))?;
        // Locked, unreadable or too-new stores all fail the open.
        let version = upgrade_schema(&mut *conn).await.map_err(|e| match e {
            StoreError::Open(message) => StoreError::Open(message),
            other => StoreError::Open(other.to_string()),
        })?;
        drop(conn);

        tracing::info!(store = STORE_NAME, version, "Store opened");
        Ok(Self { pool })
    }

    /// Get a reference to the connection pool.
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Catalog repository bound to this store.
    #[must_use]
    pub const fn catalog(&self) -> CatalogRepository<'_> {
        CatalogRepository::new(&self.pool)
    }

    /// Cart repository bound to this store.
    #[must_use]
    pub const fn cart(&self) -> CartRepository<'_> {
        CartRepository::new(&self.pool)
    }

    /// Close the pool, waiting for the connection to be released.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Read the schema version stored in the database.
///
/// # Errors
///
/// Returns `StoreError::Transaction` if the pragma cannot be read.
pub async fn schema_version(conn: &mut SqliteConnection) -> Result<i64, StoreError> {
    let version = sqlx::query_scalar::<_, i64>("PRAGMA user_version")
        .fetch_one(&mut *conn)
        .await?;
    Ok(version)
}

/// Bring the schema up to [`SCHEMA_VERSION`], returning the resulting version.
///
/// Each step runs in its own transaction together with its version bump.
/// Containers that already exist are left untouched.
///
/// # Errors
///
/// Returns `StoreError::Open` if the stored version is newer than supported,
/// or `StoreError::Transaction` if a step fails (the step is rolled back).
pub async fn upgrade_schema(conn: &mut SqliteConnection) -> Result<i64, StoreError> {
    let mut version = schema_version(conn).await?;

    if version > SCHEMA_VERSION {
        return Err(StoreError::Open(format!(
            "store {STORE_NAME} has schema version {version}, newest supported is {SCHEMA_VERSION}"
        )));
    }

    while version < SCHEMA_VERSION {
        let step = usize::try_from(version)
            .ok()
            .and_then(|index| UPGRADES.get(index))
            .ok_or_else(|| StoreError::Open(format!("no upgrade from schema version {version}")))?;

        let mut tx = sqlx::Connection::begin(&mut *conn).await?;
        for statement in *step {
            sqlx::query(statement).execute(&mut *tx).await?;
        }
        let next = version + 1;
        sqlx::query(&format!("PRAGMA user_version = {next}"))
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        tracing::info!(from = version, to = next, "Store schema upgraded");
        version = next;
    }

    Ok(version)
}

/// Lazily opened, shared handle to the local store.
///
/// Every operation asks for the handle. The first successful open is kept and
/// handed to all later callers; callers racing the first open wait for that
/// same attempt. A failed open is not remembered, so a later call tries again.
#[derive(Debug)]
pub struct LocalStore {
    database_url: String,
    store: OnceCell<Store>,
}

impl LocalStore {
    /// Create a handle for the store at `database_url` without opening it.
    #[must_use]
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            store: OnceCell::new(),
        }
    }

    /// Get the open store, opening it on first use.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Open` if the store cannot be opened.
    pub async fn handle(&self) -> Result<&Store, StoreError> {
        self.store
            .get_or_try_init(|| Store::open(&self.database_url))
            .await
    }

    /// Whether the store has been opened.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.store.initialized()
    }
}
