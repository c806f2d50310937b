//! In-memory tables shared by unit tests.

use chrono::NaiveDate;

use crate::models::{Cell, ObservationDate, SummaryRow, SummaryTable};

pub fn june(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
}

pub fn hubs(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

/// Builds a summary table with `Hub Name`, `MTD SR` and one column per June day.
pub fn summary_table(days: &[u32], rows: &[(&str, Option<f64>, Vec<Option<f64>>)]) -> SummaryTable {
    let mut columns = vec!["Hub Name".to_string(), "MTD SR".to_string()];
    let observation_dates: Vec<ObservationDate> = days
        .iter()
        .enumerate()
        .map(|(offset, day)| {
            let label = format!("2025-06-{day:02} 00:00:00");
            columns.push(label.clone());
            ObservationDate {
                column: offset + 2,
                label,
                date: june(*day),
            }
        })
        .collect();

    let rows = rows
        .iter()
        .map(|(hub, mtd_sr, values)| {
            let mut cells = vec![
                Cell::Text(hub.to_string()),
                mtd_sr.map(Cell::Number).unwrap_or(Cell::Empty),
            ];
            cells.extend(values.iter().map(|value| value.map(Cell::Number).unwrap_or(Cell::Empty)));
            SummaryRow {
                hub: hub.to_string(),
                mtd_sr: *mtd_sr,
                cells,
            }
        })
        .collect();

    SummaryTable {
        columns,
        observation_dates,
        rows,
    }
}

/// Hub `A` = [10, 0, 20], hub `B` = [0, 0, 5] over June 1..=3.
pub fn scenario_table() -> SummaryTable {
    summary_table(
        &[1, 2, 3],
        &[
            ("A", Some(30.0), vec![Some(10.0), Some(0.0), Some(20.0)]),
            ("B", Some(5.0), vec![Some(0.0), Some(0.0), Some(5.0)]),
        ],
    )
}
