//! # Scan Sources
//!
//! Where raw scans come from: a camera decoder, an RFID reader, or a line of
//! text typed at the console.
//!
//! ## Poll Contract
//! ```text
//! next_scan().await
//!      │
//!      ├── Scanned(RawScan)  one decoded code: identifier + optional tag
//!      ├── Idle              nothing this cycle (empty frame); not an error
//!      └── Exhausted         the source is finished; the pipeline stops
//! ```

use async_trait::async_trait;
use tokio::sync::mpsc;

// =============================================================================
// Raw Scan
// =============================================================================

/// One decoded scan, before catalog resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawScan {
    /// Catalog identifier printed on the label.
    pub identifier: String,

    /// Per-unit tag, when the label carries one.
    pub tag: Option<String>,
}

impl RawScan {
    /// A scan that carries both an identifier and a unit tag.
    pub fn new(identifier: impl Into<String>, tag: impl Into<String>) -> Self {
        RawScan {
            identifier: identifier.into(),
            tag: Some(tag.into()),
        }
    }

    /// A scan whose label carries only the catalog identifier.
    pub fn untagged(identifier: impl Into<String>) -> Self {
        RawScan {
            identifier: identifier.into(),
            tag: None,
        }
    }

    /// The tag used for the ledger: the unit tag, or the identifier itself
    /// when the label has none.
    ///
    /// Untagged labels therefore behave as one unit per identifier.
    pub fn effective_tag(&self) -> &str {
        self.tag.as_deref().unwrap_or(&self.identifier)
    }
}

/// Parses a console line `"<identifier> [tag]"` into a scan.
///
/// Returns `None` for blank lines. Tokens after the tag are ignored.
pub fn parse_scan_line(line: &str) -> Option<RawScan> {
    let mut parts = line.split_whitespace();
    let identifier = parts.next()?;

    Some(RawScan {
        identifier: identifier.to_string(),
        tag: parts.next().map(str::to_string),
    })
}

// =============================================================================
// Scan Source
// =============================================================================

/// Result of one poll of a scan source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanPoll {
    /// A code was decoded.
    Scanned(RawScan),

    /// No code this cycle.
    Idle,

    /// The source has nothing more to deliver.
    Exhausted,
}

/// A producer of raw scans.
///
/// ## Removal Depends on the Tag
/// A unit leaves the basket only when it is scanned again with the
/// **identical** tag. Sources must deliver a unit's tag byte-for-byte the
/// same on every read; a decoder that normalizes, truncates or re-encodes
/// tags will make units impossible to remove.
#[async_trait]
pub trait ScanSource: Send {
    /// Waits for the next poll result.
    async fn next_scan(&mut self) -> ScanPoll;
}

/// Scan source fed through an mpsc channel.
///
/// The console kiosk and the tests push [`RawScan`]s into the sender; the
/// source reports `Exhausted` once every sender is dropped.
pub struct ChannelScanSource {
    rx: mpsc::Receiver<RawScan>,
}

impl ChannelScanSource {
    /// Creates a source and the sender that feeds it.
    pub fn new(capacity: usize) -> (mpsc::Sender<RawScan>, Self) {
        let (tx, rx) = mpsc::channel(capacity);
        (tx, ChannelScanSource { rx })
    }
}

#[async_trait]
impl ScanSource for ChannelScanSource {
    async fn next_scan(&mut self) -> ScanPoll {
        match self.rx.recv().await {
            Some(scan) => ScanPoll::Scanned(scan),
            None => ScanPoll::Exhausted,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scan_line() {
        assert_eq!(parse_scan_line("RT101 A1"), Some(RawScan::new("RT101", "A1")));
        assert_eq!(parse_scan_line("  RT101  "), Some(RawScan::untagged("RT101")));
        assert_eq!(parse_scan_line("RT101 A1 extra"), Some(RawScan::new("RT101", "A1")));
        assert_eq!(parse_scan_line("   "), None);
        assert_eq!(parse_scan_line(""), None);
    }

    #[test]
    fn test_effective_tag() {
        assert_eq!(RawScan::new("RT101", "A1").effective_tag(), "A1");
        assert_eq!(RawScan::untagged("RT101").effective_tag(), "RT101");
    }

    #[tokio::test]
    async fn test_channel_source_exhausts_when_senders_drop() {
        let (tx, mut source) = ChannelScanSource::new(4);
        tx.send(RawScan::new("RT101", "A1")).await.unwrap();
        drop(tx);

        assert_eq!(
            source.next_scan().await,
            ScanPoll::Scanned(RawScan::new("RT101", "A1"))
        );
        assert_eq!(source.next_scan().await, ScanPoll::Exhausted);
    }
}
