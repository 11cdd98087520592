use crate::error::{PorssiError, Result};
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde::Serialize;
use std::fmt;

/// Hours in a priced day
pub const HOURS_PER_DAY: u8 = 24;

/// One priced hour: calendar date plus hour-of-day (0..=23)
///
/// Ordering is by date, then hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct HourSlot {
    date: NaiveDate,
    hour: u8,
}

impl HourSlot {
    /// Build a slot, rejecting hours outside 0..=23
    pub fn new(date: NaiveDate, hour: u8) -> Result<Self> {
        if hour >= HOURS_PER_DAY {
            return Err(PorssiError::validation(
                "hour",
                format!("Hour must be 0..=23, got {}", hour),
            ));
        }
        Ok(Self { date, hour })
    }

    /// The slot a wall-clock instant falls into
    pub fn containing(instant: NaiveDateTime) -> Self {
        Self {
            date: instant.date(),
            // hour() is always < 24
            hour: instant.hour() as u8,
        }
    }

    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    pub const fn hour(&self) -> u8 {
        self.hour
    }

    /// `date` query value, `yyyy-MM-dd`
    pub fn date_param(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    /// `hour` query value, zero-padded `HH`
    pub fn hour_param(&self) -> String {
        format!("{:02}", self.hour)
    }
}

impl fmt::Display for HourSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:00",
            self.date.year(),
            self.date.month(),
            self.date.day(),
            self.hour
        )
    }
}

/// The slots requested by one orchestration run
///
/// Rest of the reference day from its current hour, plus every hour of the
/// following day. Slots are kept sorted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchCycle {
    reference: NaiveDateTime,
    slots: Vec<HourSlot>,
}

impl FetchCycle {
    /// Derive the slot set for a reference instant
    pub fn starting_at(reference: NaiveDateTime) -> Self {
        let today = reference.date();
        let current_hour = HourSlot::containing(reference).hour;

        let mut slots = Vec::with_capacity(usize::from(2 * HOURS_PER_DAY - current_hour));
        slots.extend((current_hour..HOURS_PER_DAY).map(|hour| HourSlot { date: today, hour }));
        // succ_opt is only None at NaiveDate::MAX
        if let Some(tomorrow) = today.succ_opt() {
            slots.extend((0..HOURS_PER_DAY).map(|hour| HourSlot {
                date: tomorrow,
                hour,
            }));
        }

        Self { reference, slots }
    }

    pub const fn reference(&self) -> NaiveDateTime {
        self.reference
    }

    pub fn slots(&self) -> &[HourSlot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn contains(&self, slot: &HourSlot) -> bool {
        self.slots.binary_search(slot).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(date: &str, hour: u32) -> NaiveDateTime {
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .unwrap()
            .and_hms_opt(hour, 17, 42)
            .unwrap()
    }

    fn slot(date: &str, hour: u8) -> HourSlot {
        HourSlot::new(NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(), hour).unwrap()
    }

    #[test]
    fn rejects_out_of_range_hour() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert!(HourSlot::new(date, 23).is_ok());
        assert!(HourSlot::new(date, 24).is_err());
    }

    #[test]
    fn query_params_are_padded() {
        let s = slot("2024-03-09", 7);
        assert_eq!(s.date_param(), "2024-03-09");
        assert_eq!(s.hour_param(), "07");
        assert_eq!(s.to_string(), "2024-03-09 07:00");
    }

    #[test]
    fn ordering_is_date_then_hour() {
        assert!(slot("2024-01-01", 23) < slot("2024-01-02", 0));
        assert!(slot("2024-01-02", 3) < slot("2024-01-02", 4));
    }

    #[test]
    fn five_am_reference_yields_43_slots() {
        let cycle = FetchCycle::starting_at(
            NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(5, 0, 0)
                .unwrap(),
        );
        assert_eq!(cycle.len(), 43);
        assert_eq!(cycle.slots().first(), Some(&slot("2024-01-01", 5)));
        assert_eq!(cycle.slots().last(), Some(&slot("2024-01-02", 23)));
        assert!(cycle.contains(&slot("2024-01-01", 23)));
        assert!(cycle.contains(&slot("2024-01-02", 0)));
        assert!(!cycle.contains(&slot("2024-01-01", 4)));
    }

    #[test]
    fn every_hour_covers_rest_of_today_and_all_of_tomorrow() {
        for hour in 0..24u32 {
            let cycle = FetchCycle::starting_at(at("2024-12-31", hour));
            assert_eq!(cycle.len(), 48 - hour as usize, "hour {}", hour);

            let today: Vec<u8> = cycle
                .slots()
                .iter()
                .filter(|s| s.date_param() == "2024-12-31")
                .map(HourSlot::hour)
                .collect();
            let tomorrow: Vec<u8> = cycle
                .slots()
                .iter()
                .filter(|s| s.date_param() == "2025-01-01")
                .map(HourSlot::hour)
                .collect();
            assert_eq!(today, (hour as u8..24).collect::<Vec<_>>());
            assert_eq!(tomorrow, (0..24).collect::<Vec<_>>());

            let mut deduped = cycle.slots().to_vec();
            deduped.dedup();
            assert_eq!(deduped.len(), cycle.len());
        }
    }

    #[test]
    fn leap_day_rolls_into_march() {
        let cycle = FetchCycle::starting_at(at("2024-02-29", 23));
        assert_eq!(cycle.len(), 25);
        assert_eq!(cycle.slots()[1], slot("2024-03-01", 0));
    }
}
