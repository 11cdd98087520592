//! porssisahko.net spot price integration
//!
//! Hour slots and fetch cycles, the HTTP price client, the concurrent
//! fetch orchestrator and the presentation helpers built on its snapshots.

pub mod band;
pub mod board;
pub mod client;
pub mod orchestrator;
pub mod overview;
pub mod slot;

pub use band::PriceBand;
pub use board::{BoardEntry, BoardSnapshot, CurrentPrice, PriceBoard, PriceQuote};
pub use client::{PorssisahkoClient, PriceSource};
pub use orchestrator::{CycleHandle, PriceFetchOrchestrator};
pub use overview::{format_current, render_overview};
pub use slot::{FetchCycle, HourSlot};

/// Local wall-clock time in `tz`
pub fn local_now(tz: chrono_tz::Tz) -> chrono::NaiveDateTime {
    chrono::Utc::now().with_timezone(&tz).naive_local()
}
