use crate::config::DisplayConfig;
use serde::Serialize;

/// Coarse price classification used for colour-coding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriceBand {
    Cheap,
    Normal,
    Expensive,
}

impl PriceBand {
    /// Classify a price (c/kWh) against the configured thresholds
    pub fn classify(price: f64, display: &DisplayConfig) -> Self {
        if price <= display.cheap_threshold {
            Self::Cheap
        } else if price >= display.expensive_threshold {
            Self::Expensive
        } else {
            Self::Normal
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cheap => "CHEAP",
            Self::Normal => "NORMAL",
            Self::Expensive => "EXPENSIVE",
        }
    }
}
