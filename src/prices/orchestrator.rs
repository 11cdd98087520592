//! Upcoming-hours fetch orchestration
//!
//! One cycle prices every slot of a [`FetchCycle`] concurrently. Each
//! resolution is written into the board as soon as it arrives; the completion
//! check runs in the same critical section as the write, so the one-shot
//! completion fires exactly once, after the last slot resolves.
//!
//! The current-hour price is tagged with the cycle it was fetched for and
//! published in the same snapshot stream; a superseded cycle cannot
//! overwrite it.

use crate::error::{PorssiError, Result};
use crate::logging::{StructuredLogger, get_logger};
use crate::prices::board::{BoardSnapshot, CurrentPrice, PriceBoard, PriceQuote};
use crate::prices::client::PriceSource;
use crate::prices::slot::{FetchCycle, HourSlot};
use chrono::NaiveDateTime;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{oneshot, watch};

/// What happened to a single resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RecordOutcome {
    /// Belongs to a superseded cycle
    Stale,
    /// Slot outside the cycle or already resolved
    Ignored,
    Recorded,
    /// Recorded and it was the last outstanding slot
    Completed,
}

/// Board plus bookkeeping for the active cycle
struct CycleState {
    cycle_id: u64,
    cycle: Option<FetchCycle>,
    board: PriceBoard,
    current: CurrentPrice,
    completion: Option<oneshot::Sender<Arc<BoardSnapshot>>>,
}

impl CycleState {
    fn new() -> Self {
        Self {
            cycle_id: 0,
            cycle: None,
            board: PriceBoard::new(),
            current: CurrentPrice::Loading,
            completion: None,
        }
    }

    /// Replace the board and arm a fresh completion signal
    fn begin(&mut self, cycle: FetchCycle) -> (u64, oneshot::Receiver<Arc<BoardSnapshot>>) {
        let (tx, rx) = oneshot::channel();
        self.cycle_id += 1;
        self.cycle = Some(cycle);
        self.board = PriceBoard::new();
        self.current = CurrentPrice::Loading;
        // Dropping the previous sender wakes its waiter with an error
        self.completion = Some(tx);
        if self.total_slots() == 0 {
            self.fire_completion();
        }
        (self.cycle_id, rx)
    }

    fn total_slots(&self) -> usize {
        self.cycle.as_ref().map_or(0, FetchCycle::len)
    }

    fn record(&mut self, cycle_id: u64, slot: HourSlot, quote: PriceQuote) -> RecordOutcome {
        if cycle_id != self.cycle_id {
            return RecordOutcome::Stale;
        }
        let in_cycle = self.cycle.as_ref().is_some_and(|c| c.contains(&slot));
        if !in_cycle || !self.board.insert(slot, quote) {
            return RecordOutcome::Ignored;
        }
        if self.board.len() == self.total_slots() && self.fire_completion() {
            RecordOutcome::Completed
        } else {
            RecordOutcome::Recorded
        }
    }

    /// Store the current price if `cycle_id` is still active
    fn record_current(&mut self, cycle_id: u64, current: CurrentPrice) -> bool {
        if cycle_id != self.cycle_id {
            return false;
        }
        self.current = current;
        true
    }

    /// Fire the one-shot; false if it already fired
    fn fire_completion(&mut self) -> bool {
        match self.completion.take() {
            Some(tx) => {
                // Receiver may be gone; the cycle still counts as complete
                let _ = tx.send(Arc::new(self.snapshot()));
                true
            }
            None => false,
        }
    }

    fn snapshot(&self) -> BoardSnapshot {
        match &self.cycle {
            Some(cycle) => BoardSnapshot::from_board(
                self.cycle_id,
                cycle.reference(),
                cycle.len(),
                self.current,
                &self.board,
            ),
            None => BoardSnapshot::empty(),
        }
    }
}

/// State shared between the orchestrator and its fetch tasks
struct Shared {
    state: Mutex<CycleState>,
    snapshot_tx: watch::Sender<Arc<BoardSnapshot>>,
    logger: StructuredLogger,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, CycleState> {
        // The guarded data stays consistent even if a holder panicked
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, cycle_id: u64, slot: HourSlot, quote: PriceQuote) -> RecordOutcome {
        let mut state = self.lock();
        let outcome = state.record(cycle_id, slot, quote);
        match outcome {
            RecordOutcome::Recorded | RecordOutcome::Completed => {
                self.snapshot_tx.send_replace(Arc::new(state.snapshot()));
            }
            RecordOutcome::Stale | RecordOutcome::Ignored => {}
        }
        drop(state);

        let logger = self.logger.for_cycle(cycle_id);
        match outcome {
            RecordOutcome::Completed => logger.info("Fetch cycle complete"),
            RecordOutcome::Stale => {
                logger.debug(&format!("Dropping late result for {} from old cycle", slot));
            }
            RecordOutcome::Ignored => {
                logger.warn(&format!("Ignoring unexpected result for {}", slot));
            }
            RecordOutcome::Recorded => {}
        }
        outcome
    }

    fn record_current(&self, cycle_id: u64, current: CurrentPrice) -> bool {
        let mut state = self.lock();
        let accepted = state.record_current(cycle_id, current);
        if accepted {
            self.snapshot_tx.send_replace(Arc::new(state.snapshot()));
        }
        drop(state);

        if !accepted {
            self.logger
                .for_cycle(cycle_id)
                .debug("Dropping current price from old cycle");
        }
        accepted
    }
}

/// Waits for one cycle to finish
pub struct CycleHandle {
    cycle_id: u64,
    total_slots: usize,
    completion: oneshot::Receiver<Arc<BoardSnapshot>>,
}

impl CycleHandle {
    pub const fn cycle_id(&self) -> u64 {
        self.cycle_id
    }

    pub const fn total_slots(&self) -> usize {
        self.total_slots
    }

    /// Resolve with the complete board, or fail if a newer cycle replaced this one first
    pub async fn wait(self) -> Result<Arc<BoardSnapshot>> {
        let cycle_id = self.cycle_id;
        self.completion.await.map_err(|_| {
            PorssiError::generic(format!(
                "Fetch cycle {} was superseded before completion",
                cycle_id
            ))
        })
    }
}

/// Prices the rest of today and all of tomorrow, one request per hour
pub struct PriceFetchOrchestrator {
    source: Arc<dyn PriceSource>,
    shared: Arc<Shared>,
}

impl PriceFetchOrchestrator {
    pub fn new(source: Arc<dyn PriceSource>) -> Self {
        let (snapshot_tx, _rx) = watch::channel(Arc::new(BoardSnapshot::empty()));
        Self {
            source,
            shared: Arc::new(Shared {
                state: Mutex::new(CycleState::new()),
                snapshot_tx,
                logger: get_logger("orchestrator"),
            }),
        }
    }

    /// Start a cycle for `reference`; must run inside a Tokio runtime
    ///
    /// The previous board is discarded immediately. Fetches are detached and
    /// run to completion even if the returned handle is dropped.
    pub fn start_cycle(&self, reference: NaiveDateTime) -> CycleHandle {
        let cycle = FetchCycle::starting_at(reference);
        let slots = cycle.slots().to_vec();
        let total_slots = slots.len();

        let (cycle_id, completion) = {
            let mut state = self.shared.lock();
            let armed = state.begin(cycle);
            self.shared
                .snapshot_tx
                .send_replace(Arc::new(state.snapshot()));
            armed
        };

        self.shared.logger.for_cycle(cycle_id).info(&format!(
            "Starting fetch cycle at {} for {} slots",
            reference, total_slots
        ));

        for slot in slots {
            let source = Arc::clone(&self.source);
            let shared = Arc::clone(&self.shared);
            tokio::spawn(async move {
                let quote = source.fetch(&slot).await;
                shared.record(cycle_id, slot, quote);
            });
        }

        CycleHandle {
            cycle_id,
            total_slots,
            completion,
        }
    }

    /// Start a cycle and wait for all of its slots
    pub async fn run_cycle(&self, reference: NaiveDateTime) -> Result<Arc<BoardSnapshot>> {
        self.start_cycle(reference).wait().await
    }

    /// Price the slot containing `reference`, outside any cycle
    pub async fn fetch_current(&self, reference: NaiveDateTime) -> CurrentPrice {
        CurrentPrice::from(self.source.fetch(&HourSlot::containing(reference)).await)
    }

    /// Attach the current price to cycle `cycle_id`
    ///
    /// Returns false, leaving the board untouched, if a newer cycle has
    /// started since.
    pub fn publish_current(&self, cycle_id: u64, current: CurrentPrice) -> bool {
        self.shared.record_current(cycle_id, current)
    }

    /// Latest board snapshot
    pub fn snapshot(&self) -> Arc<BoardSnapshot> {
        self.shared.snapshot_tx.borrow().clone()
    }

    /// Observe every board change
    pub fn subscribe(&self) -> watch::Receiver<Arc<BoardSnapshot>> {
        self.shared.snapshot_tx.subscribe()
    }
}
