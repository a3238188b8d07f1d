//! # Catalog Resolution
//!
//! Maps a scanned identifier to product data.
//!
//! ## Resolver Stack
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ScanPipeline                                                           │
//! │       │ resolve("RT101")                                                │
//! │       ▼                                                                 │
//! │  CachingCatalog (optional)  ── hit ──► Found(Product)                   │
//! │       │ miss                                                            │
//! │       ▼                                                                 │
//! │  DatabaseCatalog / InMemoryCatalog                                      │
//! │       │                                                                 │
//! │       ├── row found        → Found(Product)      (cached)               │
//! │       ├── no row / retired → NotFound            (not cached)           │
//! │       └── store error      → Unavailable(reason) (not cached)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Resolvers never return errors. `NotFound` and `Unavailable` are both
//! "this scan is ignored"; they are kept apart only so logs can tell a bad
//! label from a broken store.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use basket_core::validation::{validate_price_cents, validate_product_name};
use basket_core::{CoreResult, Product};
use basket_db::Database;

// =============================================================================
// Resolution
// =============================================================================

/// Outcome of a catalog lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The identifier names an active catalog item.
    Found(Product),

    /// The catalog answered and has no such item.
    NotFound,

    /// The catalog could not answer (store down, timeout).
    Unavailable(String),
}

impl Resolution {
    /// Returns the product when found.
    pub fn product(&self) -> Option<&Product> {
        match self {
            Resolution::Found(product) => Some(product),
            _ => None,
        }
    }
}

/// Looks up catalog identifiers.
///
/// Implementations may be slow; the pipeline awaits one lookup at a time so
/// scans keep their arrival order.
#[async_trait]
pub trait CatalogResolver: Send + Sync {
    /// Resolves one identifier.
    async fn resolve(&self, identifier: &str) -> Resolution;
}

// =============================================================================
// Database Catalog
// =============================================================================

/// Resolver backed by the local SQLite catalog.
#[derive(Debug, Clone)]
pub struct DatabaseCatalog {
    db: Database,
}

impl DatabaseCatalog {
    /// Creates a resolver over an open database.
    pub fn new(db: Database) -> Self {
        DatabaseCatalog { db }
    }
}

#[async_trait]
impl CatalogResolver for DatabaseCatalog {
    async fn resolve(&self, identifier: &str) -> Resolution {
        match self.db.catalog().get_by_id(identifier).await {
            Ok(Some(product)) => Resolution::Found(product),
            Ok(None) => Resolution::NotFound,
            Err(e) => {
                warn!(identifier = %identifier, error = %e, "Catalog lookup failed");
                Resolution::Unavailable(e.to_string())
            }
        }
    }
}

// =============================================================================
// In-Memory Catalog
// =============================================================================

/// Resolver over a fixed map, for tests and demos.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    items: HashMap<String, Product>,
}

impl InMemoryCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a product keyed by its id, validating name and price.
    pub fn insert(&mut self, product: Product) -> CoreResult<()> {
        validate_product_name(&product.name)?;
        validate_price_cents(product.price_cents)?;
        self.items.insert(product.id.clone(), product);
        Ok(())
    }

    /// Builder-style insert.
    pub fn with_product(mut self, product: Product) -> CoreResult<Self> {
        self.insert(product)?;
        Ok(self)
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Checks if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<Product> for InMemoryCatalog {
    /// Collects products without validation (test fixtures).
    fn from_iter<I: IntoIterator<Item = Product>>(iter: I) -> Self {
        InMemoryCatalog {
            items: iter.into_iter().map(|p| (p.id.clone(), p)).collect(),
        }
    }
}

#[async_trait]
impl CatalogResolver for InMemoryCatalog {
    async fn resolve(&self, identifier: &str) -> Resolution {
        match self.items.get(identifier) {
            Some(product) => Resolution::Found(product.clone()),
            None => Resolution::NotFound,
        }
    }
}

// =============================================================================
// Caching Catalog
// =============================================================================

/// Session cache in front of another resolver.
///
/// Only `Found` results are cached: prices are stable within a session, but
/// a miss may be fixed by a catalog refresh and a failure may be transient.
pub struct CachingCatalog<R> {
    inner: R,
    cache: RwLock<HashMap<String, Product>>,
}

impl<R: CatalogResolver> CachingCatalog<R> {
    /// Wraps a resolver.
    pub fn new(inner: R) -> Self {
        CachingCatalog {
            inner,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Number of cached products.
    pub async fn cached_len(&self) -> usize {
        self.cache.read().await.len()
    }

    /// Drops every cached product (e.g. after a catalog refresh).
    pub async fn invalidate(&self) {
        self.cache.write().await.clear();
    }
}

#[async_trait]
impl<R: CatalogResolver> CatalogResolver for CachingCatalog<R> {
    async fn resolve(&self, identifier: &str) -> Resolution {
        if let Some(product) = self.cache.read().await.get(identifier) {
            debug!(identifier = %identifier, "Catalog cache hit");
            return Resolution::Found(product.clone());
        }

        let resolution = self.inner.resolve(identifier).await;
        if let Resolution::Found(ref product) = resolution {
            self.cache
                .write()
                .await
                .insert(identifier.to_string(), product.clone());
        }
        resolution
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
