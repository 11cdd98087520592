use super::slot::HourSlot;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

/// Outcome of fetching one slot
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceQuote {
    /// Price in cents per kWh
    Price(f64),
    /// Fetch or decode failed; final for the cycle
    Unavailable,
}

impl PriceQuote {
    pub const fn price(&self) -> Option<f64> {
        match self {
            Self::Price(p) => Some(*p),
            Self::Unavailable => None,
        }
    }

    pub const fn is_available(&self) -> bool {
        matches!(self, Self::Price(_))
    }
}

impl From<Option<f64>> for PriceQuote {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::Unavailable, Self::Price)
    }
}

/// State of the standalone current-hour price
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(tag = "state", content = "price", rename_all = "snake_case")]
pub enum CurrentPrice {
    /// Fetch not issued or still in flight
    #[default]
    Loading,
    Available(f64),
    /// Fetch resolved without a price
    Unavailable,
}

impl From<PriceQuote> for CurrentPrice {
    fn from(quote: PriceQuote) -> Self {
        match quote {
            PriceQuote::Price(p) => Self::Available(p),
            PriceQuote::Unavailable => Self::Unavailable,
        }
    }
}

/// Slot-keyed results of one fetch cycle
///
/// Entries are only ever added; the first write for a slot wins.
#[derive(Debug, Clone, Default)]
pub struct PriceBoard {
    entries: BTreeMap<HourSlot, PriceQuote>,
}

impl PriceBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a quote; returns false if the slot already had one
    pub fn insert(&mut self, slot: HourSlot, quote: PriceQuote) -> bool {
        match self.entries.entry(slot) {
            Entry::Vacant(v) => {
                v.insert(quote);
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    pub fn get(&self, slot: &HourSlot) -> Option<PriceQuote> {
        self.entries.get(slot).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in slot order
    pub fn iter(&self) -> impl Iterator<Item = (&HourSlot, &PriceQuote)> {
        self.entries.iter()
    }
}

/// One row of a board snapshot
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoardEntry {
    #[serde(flatten)]
    pub slot: HourSlot,
    pub price: Option<f64>,
}

/// Read-only view of the board handed to presentation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardSnapshot {
    /// Zero before the first cycle starts
    pub cycle_id: u64,
    pub reference: Option<NaiveDateTime>,
    pub total_slots: usize,
    /// True until every slot of the cycle has resolved
    pub loading: bool,
    /// Current-hour price fetched alongside this cycle
    pub current: CurrentPrice,
    /// Resolved slots, ordered by slot
    pub entries: Vec<BoardEntry>,
}

impl BoardSnapshot {
    /// Snapshot published before any cycle has run
    pub const fn empty() -> Self {
        Self {
            cycle_id: 0,
            reference: None,
            total_slots: 0,
            loading: true,
            current: CurrentPrice::Loading,
            entries: Vec::new(),
        }
    }

    pub(crate) fn from_board(
        cycle_id: u64,
        reference: NaiveDateTime,
        total_slots: usize,
        current: CurrentPrice,
        board: &PriceBoard,
    ) -> Self {
        Self {
            cycle_id,
            reference: Some(reference),
            total_slots,
            loading: board.len() < total_slots,
            current,
            entries: board
                .iter()
                .map(|(slot, quote)| BoardEntry {
                    slot: *slot,
                    price: quote.price(),
                })
                .collect(),
        }
    }

    pub fn resolved(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, slot: &HourSlot) -> Option<&BoardEntry> {
        self.entries
            .binary_search_by(|e| e.slot.cmp(slot))
            .ok()
            .and_then(|idx| self.entries.get(idx))
    }
}

impl Default for BoardSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}
