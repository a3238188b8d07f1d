//! # basket-engine: Scan Pipeline and Basket Controller
//!
//! Runs the kiosk: a producer task turns raw scans into resolved scans, and
//! a single consumer task owns the basket session.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Smart Basket Engine                              │
//! │                                                                         │
//! │  ┌────────────┐   RawScan   ┌──────────────────┐                        │
//! │  │ ScanSource │ ──────────► │   ScanPipeline   │ ◄── CatalogResolver    │
//! │  │ camera/RFID│             │  (producer task) │     (DB, cache, map)   │
//! │  │ console    │             └────────┬─────────┘                        │
//! │  └────────────┘                      │ ResolvedScan (bounded FIFO)      │
//! │                                      ▼                                  │
//! │  BasketHandle ──── Command ──► ┌──────────────────┐                     │
//! │  (UI: budget,                  │ BasketController │──► BasketObserver   │
//! │   checkout, reset)  ◄─ reply ─ │ (consumer task)  │    (presentation)   │
//! │                                │  BasketSession   │                     │
//! │                                └──────────────────┘                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`catalog`] - `CatalogResolver` and its implementations
//! - [`source`] - `ScanSource`, raw scans, console line parsing
//! - [`pipeline`] - The resolving producer task
//! - [`controller`] - The consumer loop, its handle and observer seam
//! - [`config`] - TOML + environment configuration
//! - [`error`] - Engine error types

pub mod catalog;
pub mod config;
pub mod controller;
pub mod error;
pub mod pipeline;
pub mod source;

// Re-exports for convenience
pub use catalog::{CachingCatalog, CatalogResolver, DatabaseCatalog, InMemoryCatalog, Resolution};
pub use config::KioskConfig;
pub use controller::{
    BasketController, BasketHandle, BasketObserver, ControllerOptions, NoOpObserver, Notice,
};
pub use error::{EngineError, EngineResult};
pub use pipeline::{PipelineOptions, ResolvedScan, ScanPipeline};
pub use source::{parse_scan_line, ChannelScanSource, RawScan, ScanPoll, ScanSource};
