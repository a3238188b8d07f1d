//! # Smart Basket Kiosk Entry Point
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Smart Basket Kiosk                               │
//! │                                                                         │
//! │  stdin ──► "RT101 A1"      scan   ──► ScanPipeline ──► BasketController │
//! │            ":budget 500"   command ──────────────────► BasketHandle     │
//! │                                                                         │
//! │  stdout ◄── ConsoleObserver (basket table, notices, checkout payload)   │
//! │  stderr ◄── tracing logs                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Startup Sequence
//! 1. Initialize tracing (logging)
//! 2. Load `kiosk.toml` + environment overrides
//! 3. Open the catalog database & run migrations (fatal on failure)
//! 4. Spawn the scan pipeline and basket controller
//! 5. Serve stdin until `:quit` or end of input

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match basket_kiosk_lib::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("basket-kiosk: {}", e);
            ExitCode::FAILURE
        }
    }
}
