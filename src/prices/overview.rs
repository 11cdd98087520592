use crate::config::DisplayConfig;
use crate::prices::band::PriceBand;
use crate::prices::board::{BoardSnapshot, CurrentPrice};

/// Current price as a single display string
///
/// The price is shown at full precision in its shortest round-trip form,
/// always with a decimal point (`5.0`, `12.345`).
pub fn format_current(current: &CurrentPrice) -> String {
    match current {
        CurrentPrice::Loading => "Loading...".to_string(),
        CurrentPrice::Available(p) => format!("{:?} cents/kWh", p),
        CurrentPrice::Unavailable => "Failed to load".to_string(),
    }
}

/// Human-friendly hourly overview of the current price and the board
pub fn render_overview(
    current: &CurrentPrice,
    snapshot: &BoardSnapshot,
    display: &DisplayConfig,
) -> String {
    let header = snapshot.reference.map_or_else(
        || "Electricity price overview | no data yet".to_string(),
        |r| format!("Electricity price overview | {}", r.format("%Y-%m-%d")),
    );
    let mut lines = vec![header];

    let mut current_line = format!("Current price: {}", format_current(current));
    if let CurrentPrice::Available(p) = current {
        current_line.push_str(&format!(" ({})", PriceBand::classify(*p, display).as_str()));
    }
    lines.push(current_line);

    for entry in &snapshot.entries {
        match entry.price {
            Some(p) => lines.push(format!(
                "  {}  {:>7.2} cents/kWh  {}",
                entry.slot,
                p,
                PriceBand::classify(p, display).as_str()
            )),
            None => lines.push(format!("  {}  unavailable", entry.slot)),
        }
    }

    if snapshot.loading {
        lines.push(format!(
            "(loading {}/{})",
            snapshot.resolved(),
            snapshot.total_slots
        ));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prices::board::BoardEntry;
    use crate::prices::slot::HourSlot;
    use chrono::NaiveDate;

    fn snapshot(loading: bool) -> BoardSnapshot {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        BoardSnapshot {
            cycle_id: 1,
            reference: date.and_hms_opt(22, 10, 0),
            total_slots: 26,
            loading,
            current: CurrentPrice::Available(3.25),
            entries: vec![
                BoardEntry {
                    slot: HourSlot::new(date, 22).unwrap(),
                    price: Some(3.25),
                },
                BoardEntry {
                    slot: HourSlot::new(date, 23).unwrap(),
                    price: None,
                },
            ],
        }
    }

    #[test]
    fn renders_rows_and_loading_marker() {
        let text = render_overview(
            &CurrentPrice::Available(3.25),
            &snapshot(true),
            &DisplayConfig::default(),
        );
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Electricity price overview | 2024-01-01");
        assert_eq!(lines[1], "Current price: 3.25 cents/kWh (CHEAP)");
        assert_eq!(lines[2], "  2024-01-01 22:00     3.25 cents/kWh  CHEAP");
        assert_eq!(lines[3], "  2024-01-01 23:00  unavailable");
        assert_eq!(lines[4], "(loading 2/26)");
    }

    #[test]
    fn distinguishes_loading_from_failure() {
        assert_eq!(format_current(&CurrentPrice::Loading), "Loading...");
        assert_eq!(format_current(&CurrentPrice::Unavailable), "Failed to load");
        assert_eq!(
            format_current(&CurrentPrice::Available(5.0)),
            "5.0 cents/kWh"
        );
        assert_eq!(
            format_current(&CurrentPrice::Available(12.345)),
            "12.345 cents/kWh"
        );
        let text = render_overview(
            &CurrentPrice::Unavailable,
            &BoardSnapshot::empty(),
            &DisplayConfig::default(),
        );
        assert!(text.starts_with("Electricity price overview | no data yet"));
        assert!(text.contains("Current price: Failed to load"));
    }
}
