//! # Repository Module
//!
//! ```text
//! CatalogResolver (basket-engine)
//!      │  db.catalog().get_by_id("RT101")
//!      ▼
//! CatalogRepository
//! ├── get_by_id(&self, id)      active items only
//! ├── upsert(&self, product)
//! ├── deactivate(&self, id)
//! ├── list_active(&self)
//! └── count(&self)
//!      │
//!      ▼
//! catalog_items (SQLite)
//! ```

pub mod catalog;
