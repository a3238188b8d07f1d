//! # Basket Controller
//!
//! The single consumer that owns the [`BasketSession`]. Resolved scans from
//! the pipeline and commands from the UI are served one at a time on one
//! task, so no two mutations ever interleave.
//!
//! ## Controller Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        BasketController                                 │
//! │                                                                         │
//! │  ScanPipeline ── ResolvedScan ──┐                                       │
//! │                                 ▼                                       │
//! │                         ┌───────────────┐                               │
//! │  BasketHandle ─Command─►│ select! loop  │──► BasketSession (owned)       │
//! │   set_budget            │  scans first  │        │                      │
//! │   checkout              └───────┬───────┘        │ post-recompute       │
//! │   reset / snapshot              │                ▼ snapshot             │
//! │   shutdown    ◄── oneshot reply ┘        BasketObserver                 │
//! │                                           basket_changed / notify       │
//! │                                           scan_ignored / checkout_ready │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Scans already queued are applied before the next command, so a checkout
//! requested after a scan always includes it.

use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use basket_core::{
    BasketSession, BasketSnapshot, BasketUpdate, CheckoutPayload, LedgerChange, Money, Product,
};

use crate::error::{EngineError, EngineResult};
use crate::pipeline::ResolvedScan;

// =============================================================================
// Observer
// =============================================================================

/// User-facing notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The total just went above the budget.
    BudgetExceeded { total: Money, budget: Money },

    /// Budget text was rejected; the previous budget still applies.
    InvalidBudget(String),

    /// Checkout was requested with an empty basket.
    EmptyCheckout,
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notice::BudgetExceeded { total, budget } => {
                write!(f, "Budget exceeded: total {} is over budget {}", total, budget)
            }
            Notice::InvalidBudget(input) => {
                write!(f, "Invalid budget '{}': enter a number like 500 or 99.50", input)
            }
            Notice::EmptyCheckout => write!(f, "Basket is empty: scan items before checking out"),
        }
    }
}

/// Receives basket events (implemented by the presentation layer).
///
/// Every call happens on the controller task after the session has
/// recomputed, so the snapshot passed in is always consistent.
pub trait BasketObserver: Send + Sync {
    /// The basket contents, total, budget or status changed.
    fn basket_changed(&self, snapshot: &BasketSnapshot);

    /// A notification to show the customer.
    fn notify(&self, notice: &Notice);

    /// A scan did not resolve and left the basket untouched.
    fn scan_ignored(&self, scan: &ResolvedScan);

    /// A checkout payload is ready for encoding.
    fn checkout_ready(&self, payload: &CheckoutPayload);
}

/// No-op observer for testing.
pub struct NoOpObserver;

impl BasketObserver for NoOpObserver {
    fn basket_changed(&self, _snapshot: &BasketSnapshot) {}
    fn notify(&self, _notice: &Notice) {}
    fn scan_ignored(&self, _scan: &ResolvedScan) {}
    fn checkout_ready(&self, _payload: &CheckoutPayload) {}
}

// =============================================================================
// Commands
// =============================================================================

enum Command {
    SetBudget {
        input: String,
        reply: oneshot::Sender<EngineResult<BasketSnapshot>>,
    },
    Checkout {
        reply: oneshot::Sender<EngineResult<CheckoutPayload>>,
    },
    Reset {
        reply: oneshot::Sender<BasketSnapshot>,
    },
    Snapshot {
        reply: oneshot::Sender<BasketSnapshot>,
    },
    Shutdown,
}

/// Controller tuning.
#[derive(Debug, Clone, Copy)]
pub struct ControllerOptions {
    /// Capacity of the command channel.
    pub command_capacity: usize,

    /// Whether `reset` also clears the budget.
    pub clear_budget_on_reset: bool,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        ControllerOptions {
            command_capacity: 16,
            clear_budget_on_reset: false,
        }
    }
}

// =============================================================================
// Handle
// =============================================================================

/// Cloneable handle for driving a running controller.
#[derive(Clone)]
pub struct BasketHandle {
    tx: mpsc::Sender<Command>,
}

impl BasketHandle {
    /// Sets the budget from keypad text.
    ///
    /// ## Errors
    /// `EngineError::Core(CoreError::InvalidBudget)` when the text is not a
    /// valid amount; the previous budget is kept.
    pub async fn set_budget(&self, input: impl Into<String>) -> EngineResult<BasketSnapshot> {
        let input = input.into();
        self.request(|reply| Command::SetBudget { input, reply })
            .await?
    }

    /// Builds the checkout payload. The basket is not cleared.
    ///
    /// ## Errors
    /// `EngineError::Core(CoreError::EmptyCheckout)` when the basket is empty.
    pub async fn checkout(&self) -> EngineResult<CheckoutPayload> {
        self.request(|reply| Command::Checkout { reply }).await?
    }

    /// Empties the basket.
    pub async fn reset(&self) -> EngineResult<BasketSnapshot> {
        self.request(|reply| Command::Reset { reply }).await
    }

    /// Returns the current snapshot.
    pub async fn snapshot(&self) -> EngineResult<BasketSnapshot> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    /// Signals the controller to stop.
    pub async fn shutdown(&self) -> EngineResult<()> {
        self.tx
            .send(Command::Shutdown)
            .await
            .map_err(|_| EngineError::ChannelClosed("Basket controller stopped".into()))
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> EngineResult<T> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(make(reply_tx))
            .await
            .map_err(|_| EngineError::ChannelClosed("Basket controller stopped".into()))?;
        reply_rx
            .await
            .map_err(|_| EngineError::ChannelClosed("Basket controller dropped reply".into()))
    }
}

// =============================================================================
// Controller
// =============================================================================

/// Owns the session and serves scans and commands.
pub struct BasketController {
    session: BasketSession,
    scans: mpsc::Receiver<ResolvedScan>,
    commands: mpsc::Receiver<Command>,
    observer: Arc<dyn BasketObserver>,
    clear_budget_on_reset: bool,
}

impl BasketController {
    /// Creates a controller and its handle.
    pub fn new(
        session: BasketSession,
        scans: mpsc::Receiver<ResolvedScan>,
        observer: Arc<dyn BasketObserver>,
        options: ControllerOptions,
    ) -> (Self, BasketHandle) {
        let (tx, commands) = mpsc::channel(options.command_capacity.max(1));

        let controller = BasketController {
            session,
            scans,
            commands,
            observer,
            clear_budget_on_reset: options.clear_budget_on_reset,
        };

        (controller, BasketHandle { tx })
    }

    /// Creates the controller and runs it on a new task.
    ///
    /// The task yields the final session when the loop ends.
    pub fn spawn(
        session: BasketSession,
        scans: mpsc::Receiver<ResolvedScan>,
        observer: Arc<dyn BasketObserver>,
        options: ControllerOptions,
    ) -> (JoinHandle<BasketSession>, BasketHandle) {
        let (controller, handle) = Self::new(session, scans, observer, options);
        (tokio::spawn(controller.run()), handle)
    }

    /// Runs the controller loop.
    ///
    /// Ends on `Shutdown`, or once the scan channel is closed and every
    /// handle has been dropped.
    ///
    /// ## Ordering
    /// The select is biased toward scans: every scan already queued is
    /// applied before the next command, so a checkout reflects all scans
    /// that reached the controller first. The flip side is that commands
    /// wait while scans keep arriving; an unbroken stream of scans (a
    /// stuck reader repeating a tag) holds back `Checkout` and `Reset`
    /// until it pauses. Physical scanners leave gaps between reads, and
    /// the pipeline's bounded channel caps how much can be queued.
    pub async fn run(mut self) -> BasketSession {
        info!("Basket controller starting");
        self.observer.basket_changed(self.session.snapshot());

        let mut scans_open = true;
        let mut commands_open = true;

        loop {
            tokio::select! {
                biased;

                scan = self.scans.recv(), if scans_open => match scan {
                    Some(scan) => self.apply_scan(scan),
                    None => {
                        debug!("Scan channel closed");
                        scans_open = false;
                    }
                },

                command = self.commands.recv(), if commands_open => match command {
                    Some(Command::Shutdown) => {
                        info!("Basket controller received shutdown");
                        break;
                    }
                    Some(command) => self.handle_command(command),
                    None => {
                        debug!("All basket handles dropped");
                        commands_open = false;
                    }
                },

                else => break,
            }
        }

        info!(
            entries = self.session.ledger().len(),
            total_cents = self.session.snapshot().total_cents,
            "Basket controller stopped"
        );
        self.session
    }

    fn apply_scan(&mut self, scan: ResolvedScan) {
        let product = match scan.resolution.product() {
            Some(product) => product.clone(),
            None => {
                warn!(
                    identifier = %scan.identifier,
                    tag = %scan.tag,
                    resolution = ?scan.resolution,
                    "Ignoring unresolved scan"
                );
                self.observer.scan_ignored(&scan);
                return;
            }
        };

        let name = product.name.clone();
        let update = self.session.apply_scan(scan.tag.clone(), product);

        let snapshot = self.session.snapshot();
        debug!(
            tag = %scan.tag,
            identifier = %scan.identifier,
            change = ?update.change,
            total_cents = snapshot.total_cents,
            status = %snapshot.status,
            "Basket updated"
        );

        if update.change == Some(LedgerChange::Added) {
            self.warn_on_mixed_prices(&name);
        }

        self.publish(update);
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::SetBudget { input, reply } => {
                let result = match self.session.set_budget_from_input(&input) {
                    Ok(update) => {
                        info!(
                            budget_cents = ?self.session.snapshot().budget_cents,
                            status = %self.session.snapshot().status,
                            "Budget set"
                        );
                        self.publish(update);
                        Ok(self.session.snapshot().clone())
                    }
                    Err(e) => {
                        warn!(input = %input, error = %e, "Rejected budget input");
                        self.observer.notify(&Notice::InvalidBudget(input));
                        Err(e.into())
                    }
                };
                Self::reply(reply, result);
            }

            Command::Checkout { reply } => {
                let result = match self.session.checkout() {
                    Ok(payload) => {
                        info!(
                            checkout_id = %payload.checkout_id,
                            items = payload.item_count,
                            total_cents = payload.total_cents,
                            "Checkout payload built"
                        );
                        self.observer.checkout_ready(&payload);
                        Ok(payload)
                    }
                    Err(e) => {
                        warn!(error = %e, "Checkout rejected");
                        self.observer.notify(&Notice::EmptyCheckout);
                        Err(e.into())
                    }
                };
                Self::reply(reply, result);
            }

            Command::Reset { reply } => {
                let snapshot = self.session.reset(self.clear_budget_on_reset).clone();
                info!(clear_budget = self.clear_budget_on_reset, "Basket reset");
                self.observer.basket_changed(&snapshot);
                Self::reply(reply, snapshot);
            }

            Command::Snapshot { reply } => {
                Self::reply(reply, self.session.snapshot().clone());
            }

            Command::Shutdown => {}
        }
    }

    /// Pushes a post-recompute update to the observer.
    fn publish(&self, update: BasketUpdate) {
        if let Some(alert) = update.alert {
            warn!(
                total_cents = alert.total.cents(),
                budget_cents = alert.budget.cents(),
                "Budget exceeded"
            );
            self.observer.notify(&Notice::BudgetExceeded {
                total: alert.total,
                budget: alert.budget,
            });
        }
        self.observer.basket_changed(self.session.snapshot());
    }

    fn warn_on_mixed_prices(&self, name: &str) {
        let Some(row) = self.session.view().get(name) else {
            return;
        };
        if !row.mixed_prices {
            return;
        }

        let prices: Vec<i64> = self
            .session
            .ledger()
            .entries()
            .iter()
            .map(|e| &e.product)
            .filter(|p: &&Product| p.name == name)
            .map(|p| p.price_cents)
            .collect();
        warn!(
            name = %name,
            shown_cents = row.unit_price_cents,
            prices = ?prices,
            "Units with the same name carry different prices"
        );
    }

    fn reply<T>(reply: oneshot::Sender<T>, value: T) {
        if reply.send(value).is_err() {
            error!("Basket handle dropped before reply");
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
