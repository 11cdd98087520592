//! # Porssi - Finnish spot electricity price board
//!
//! Fetches hourly spot prices from the porssisahko.net API and keeps an
//! always-consistent board of the upcoming hours, fed by many concurrent
//! per-hour requests.
//!
//! ## Architecture
//!
//! - `config`: Configuration management and validation
//! - `logging`: Structured logging and tracing
//! - `prices`: Hour slots, the HTTP price client and the fetch orchestrator
//! - `service`: Current price state and the refresh loop
//! - `web`: HTTP API and server-sent board updates

pub mod config;
pub mod error;
pub mod logging;
pub mod prices;
pub mod service;
#[cfg(feature = "web")]
pub mod web;

// Re-export commonly used types
pub use config::Config;
pub use error::{PorssiError, Result};
pub use service::PriceService;
