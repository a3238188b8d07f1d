//! # Scan Pipeline
//!
//! The producer half of the kiosk: polls a [`ScanSource`], resolves each
//! scan against the catalog, and forwards the result to the controller.
//!
//! ## Task Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      ScanPipeline task                                  │
//! │                                                                         │
//! │  loop {                                                                 │
//! │    source.next_scan() ─┬─ Idle      → sleep(idle_backoff)               │
//! │                        ├─ Exhausted → stop                              │
//! │                        └─ Scanned   → Tag::parse(effective tag)         │
//! │                                        │ invalid → warn, drop           │
//! │                                        ▼                                │
//! │                                  resolver.resolve(identifier)           │
//! │                                        │                                │
//! │                                        ▼                                │
//! │                        tx.send(ResolvedScan) ── bounded FIFO ──►        │
//! │  }                                                    BasketController  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The pipeline never touches basket state. One scan is resolved at a time,
//! so resolved scans reach the controller in the order they were read.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use basket_core::Tag;

use crate::catalog::{CatalogResolver, Resolution};
use crate::source::{ScanPoll, ScanSource};

/// Default wait after an `Idle` poll.
pub const DEFAULT_IDLE_BACKOFF: Duration = Duration::from_millis(50);

/// A scan after catalog resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedScan {
    /// Identifier that was looked up.
    pub identifier: String,

    /// Validated unit tag.
    pub tag: Tag,

    /// Lookup outcome.
    pub resolution: Resolution,
}

/// Pipeline tuning.
#[derive(Debug, Clone, Copy)]
pub struct PipelineOptions {
    /// Capacity of the channel to the controller.
    pub capacity: usize,

    /// Wait after a poll that found nothing.
    pub idle_backoff: Duration,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        PipelineOptions {
            capacity: 64,
            idle_backoff: DEFAULT_IDLE_BACKOFF,
        }
    }
}

/// Spawns and runs the producer task.
pub struct ScanPipeline<S> {
    source: S,
    resolver: Arc<dyn CatalogResolver>,
    tx: mpsc::Sender<ResolvedScan>,
    idle_backoff: Duration,
}

impl<S: ScanSource + 'static> ScanPipeline<S> {
    /// Spawns the pipeline with the default idle backoff.
    ///
    /// Returns the task handle and the receiving end for the controller.
    pub fn spawn(
        source: S,
        resolver: Arc<dyn CatalogResolver>,
        capacity: usize,
    ) -> (JoinHandle<()>, mpsc::Receiver<ResolvedScan>) {
        Self::spawn_with(
            source,
            resolver,
            PipelineOptions {
                capacity,
                ..Default::default()
            },
        )
    }

    /// Spawns the pipeline with explicit options.
    pub fn spawn_with(
        source: S,
        resolver: Arc<dyn CatalogResolver>,
        options: PipelineOptions,
    ) -> (JoinHandle<()>, mpsc::Receiver<ResolvedScan>) {
        let (tx, rx) = mpsc::channel(options.capacity.max(1));

        let pipeline = ScanPipeline {
            source,
            resolver,
            tx,
            idle_backoff: options.idle_backoff,
        };

        (tokio::spawn(pipeline.run()), rx)
    }

    /// Runs until the source is exhausted or the controller goes away.
    async fn run(mut self) {
        info!("Scan pipeline starting");

        loop {
            let raw = match self.source.next_scan().await {
                ScanPoll::Scanned(raw) => raw,
                ScanPoll::Idle => {
                    tokio::time::sleep(self.idle_backoff).await;
                    continue;
                }
                ScanPoll::Exhausted => {
                    info!("Scan source exhausted");
                    break;
                }
            };

            let tag = match Tag::parse(raw.effective_tag()) {
                Ok(tag) => tag,
                Err(e) => {
                    warn!(identifier = %raw.identifier, error = %e, "Dropping scan with invalid tag");
                    continue;
                }
            };

            let resolution = self.resolver.resolve(&raw.identifier).await;
            debug!(
                identifier = %raw.identifier,
                tag = %tag,
                found = resolution.product().is_some(),
                "Scan resolved"
            );

            let resolved = ResolvedScan {
                identifier: raw.identifier,
                tag,
                resolution,
            };

            if self.tx.send(resolved).await.is_err() {
                info!("Controller gone, stopping scan pipeline");
                break;
            }
        }

        info!("Scan pipeline stopped");
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InMemoryCatalog;
    use crate::source::{ChannelScanSource, RawScan};
    use async_trait::async_trait;
    use basket_core::Product;
    use std::collections::VecDeque;

    fn catalog() -> Arc<dyn CatalogResolver> {
        Arc::new(
            vec![
                Product::new("RT101", "Apple", 250),
                Product::new("RT103", "Bread", 120),
            ]
            .into_iter()
            .collect::<InMemoryCatalog>(),
        )
    }

    /// Replays a fixed list of polls.
    struct ScriptedSource(VecDeque<ScanPoll>);

    #[async_trait]
    impl ScanSource for ScriptedSource {
        async fn next_scan(&mut self) -> ScanPoll {
            self.0.pop_front().unwrap_or(ScanPoll::Exhausted)
        }
    }

    #[tokio::test]
    async fn test_resolves_in_order() {
        let (tx, source) = ChannelScanSource::new(8);
        let (task, mut rx) = ScanPipeline::spawn(source, catalog(), 8);

        tx.send(RawScan::new("RT101", "A1")).await.unwrap();
        tx.send(RawScan::new("RT999", "Z1")).await.unwrap();
        tx.send(RawScan::new("RT103", "B1")).await.unwrap();
        drop(tx);

        let first = rx.recv().await.unwrap();
        assert_eq!(first.tag.as_str(), "A1");
        assert_eq!(first.resolution.product().unwrap().name, "Apple");

        let second = rx.recv().await.unwrap();
        assert_eq!(second.identifier, "RT999");
        assert_eq!(second.resolution, Resolution::NotFound);

        let third = rx.recv().await.unwrap();
        assert_eq!(third.tag.as_str(), "B1");

        assert!(rx.recv().await.is_none());
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_idle_polls_and_bad_tags_are_skipped() {
        let source = ScriptedSource(VecDeque::from(vec![
            ScanPoll::Idle,
            ScanPoll::Scanned(RawScan::new("RT101", "   ")),
            ScanPoll::Idle,
            ScanPoll::Scanned(RawScan::untagged("RT103")),
            ScanPoll::Exhausted,
        ]));
        let (task, mut rx) = ScanPipeline::spawn_with(
            source,
            catalog(),
            PipelineOptions {
                capacity: 4,
                idle_backoff: Duration::from_millis(1),
            },
        );

        let only = rx.recv().await.unwrap();
        assert_eq!(only.tag.as_str(), "RT103");
        assert!(rx.recv().await.is_none());
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_stops_when_receiver_dropped() {
        let (tx, source) = ChannelScanSource::new(8);
        let (task, rx) = ScanPipeline::spawn(source, catalog(), 1);
        drop(rx);

        tx.send(RawScan::new("RT101", "A1")).await.unwrap();
        task.await.unwrap();
    }
}
