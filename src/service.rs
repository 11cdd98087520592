//! Price service: current price plus the upcoming-hours board
//!
//! Owns the orchestrator and drives refreshes on demand or on a fixed
//! interval. At most one refresh runs at a time.

use crate::config::Config;
use crate::error::Result;
use crate::logging::{StructuredLogger, get_logger};
use crate::prices::{
    BoardSnapshot, CurrentPrice, PorssisahkoClient, PriceFetchOrchestrator, PriceSource,
    local_now, render_overview,
};
use chrono::NaiveDateTime;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, watch};

pub struct PriceService {
    config: Config,
    tz: chrono_tz::Tz,
    orchestrator: PriceFetchOrchestrator,
    refresh_lock: Arc<Mutex<()>>,
    logger: StructuredLogger,
}

impl PriceService {
    /// Build a service backed by the porssisahko.net client
    pub fn new(config: Config) -> Result<Self> {
        let client = PorssisahkoClient::new(&config.api)?;
        Self::with_source(config, Arc::new(client))
    }

    /// Build a service backed by any price source
    pub fn with_source(config: Config, source: Arc<dyn PriceSource>) -> Result<Self> {
        let tz = config.display.tz()?;
        Ok(Self {
            config,
            tz,
            orchestrator: PriceFetchOrchestrator::new(source),
            refresh_lock: Arc::new(Mutex::new(())),
            logger: get_logger("service"),
        })
    }

    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Wall-clock time in the configured timezone
    pub fn now_local(&self) -> NaiveDateTime {
        local_now(self.tz)
    }

    /// Current-hour price of the latest cycle
    pub fn current_price(&self) -> CurrentPrice {
        self.board().current
    }

    pub fn board(&self) -> Arc<BoardSnapshot> {
        self.orchestrator.snapshot()
    }

    pub fn subscribe_board(&self) -> watch::Receiver<Arc<BoardSnapshot>> {
        self.orchestrator.subscribe()
    }

    /// Fetch the current price and run a full cycle for `reference`, concurrently
    ///
    /// Does not take the refresh lock; a later call supersedes this one.
    pub async fn refresh_at(&self, reference: NaiveDateTime) -> Result<Arc<BoardSnapshot>> {
        let handle = self.orchestrator.start_cycle(reference);
        let cycle_id = handle.cycle_id();

        let current = async {
            let current = self.orchestrator.fetch_current(reference).await;
            if self.orchestrator.publish_current(cycle_id, current)
                && current == CurrentPrice::Unavailable
            {
                self.logger.for_cycle(cycle_id).warn("Current price unavailable");
            }
        };
        let ((), board) = tokio::join!(current, handle.wait());
        let board = board?;

        // Prefer the latest snapshot; it also carries the current price
        let latest = self.orchestrator.snapshot();
        let board = if latest.cycle_id == cycle_id { latest } else { board };

        let available = board.entries.iter().filter(|e| e.price.is_some()).count();
        self.logger.info(&format!(
            "Refresh done: {}/{} hourly prices available",
            available, board.total_slots
        ));
        Ok(board)
    }

    /// Refresh using the current local time, after any refresh in flight
    pub async fn refresh(&self) -> Result<Arc<BoardSnapshot>> {
        let _permit = self.refresh_lock.lock().await;
        self.refresh_at(self.now_local()).await
    }

    /// Start a background refresh unless one is already running
    ///
    /// Returns false without doing anything while another refresh holds the lock.
    pub fn spawn_refresh(self: &Arc<Self>) -> bool {
        let Ok(permit) = Arc::clone(&self.refresh_lock).try_lock_owned() else {
            return false;
        };
        let service = Arc::clone(self);
        tokio::spawn(async move {
            let _permit = permit;
            if let Err(e) = service.refresh_at(service.now_local()).await {
                service
                    .logger
                    .debug(&format!("Background refresh ended early: {}", e));
            }
        });
        true
    }

    /// Text overview of the latest state
    pub fn overview_text(&self) -> String {
        let board = self.board();
        render_overview(&board.current, &board, &self.config.display)
    }

    /// Refresh now, then every `refresh_interval_minutes`; never returns
    pub async fn run(self: Arc<Self>) {
        let period = Duration::from_secs(self.config.refresh_interval_minutes.max(1) * 60);
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        self.logger.info(&format!(
            "Refresh loop started; interval {} min",
            period.as_secs() / 60
        ));
        loop {
            ticker.tick().await;
            if let Err(e) = self.refresh().await {
                self.logger.warn(&format!("Scheduled refresh failed: {}", e));
            }
        }
    }
}
