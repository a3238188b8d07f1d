//! # basket-db: Catalog Store for the Smart Basket Kiosk
//!
//! Local SQLite storage for the product catalog. Every scan is resolved
//! against this store before it may touch the basket.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Smart Basket Data Flow                             │
//! │                                                                         │
//! │  Scan (identifier, tag)                                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  basket-engine::DatabaseCatalog                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     basket-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────────┐  ┌─────────────┐  │   │
//! │  │   │   Database    │    │ CatalogRepository │  │ Migrations  │  │   │
//! │  │   │   (pool.rs)   │◄───│ get_by_id         │  │ (embedded)  │  │   │
//! │  │   │  SqlitePool   │    │ upsert / retire   │  │ 001_catalog │  │   │
//! │  │   └───────────────┘    └───────────────────┘  └─────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (e.g. ~/.local/share/smart-basket/catalog.db)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use basket_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("catalog.db")).await?;
//! let apple = db.catalog().get_by_id("RT101").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::catalog::CatalogRepository;
