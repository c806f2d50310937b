use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::debug;

use crate::models::{
    ComparisonEntry, ComparisonRelation, DetailRow, ObservationDate, SummaryRow, SummaryTable,
    TrendMatrix, TrendRow,
};

/// Selected hubs that have a row, first occurrence of each, in selection order.
fn select<'a>(rows: &'a [SummaryRow], selected_hubs: &[String]) -> Vec<&'a SummaryRow> {
    let mut picked: Vec<&SummaryRow> = Vec::new();
    for hub in selected_hubs {
        if picked.iter().any(|row| &row.hub == hub) {
            continue;
        }
        match rows.iter().find(|row| &row.hub == hub) {
            Some(row) => picked.push(row),
            None => debug!(hub = %hub, "selected hub has no summary row"),
        }
    }
    picked
}

fn dates_ascending(observation_dates: &[ObservationDate]) -> Vec<&ObservationDate> {
    let mut dates: Vec<&ObservationDate> = observation_dates.iter().collect();
    dates.sort_by_key(|date| date.date);
    dates
}

pub fn build_trend_matrix(
    rows: &[SummaryRow],
    observation_dates: &[ObservationDate],
    selected_hubs: &[String],
) -> TrendMatrix {
    let selected = select(rows, selected_hubs);
    if selected.is_empty() {
        return TrendMatrix::default();
    }

    let mut dropped = 0usize;
    let mut trend_rows = Vec::new();
    for date in dates_ascending(observation_dates) {
        let values: Vec<Option<f64>> = selected.iter().map(|row| row.value_on(date)).collect();
        // Absent cells are not zero; only an all-zero day is dropped.
        if values.iter().all(|value| *value == Some(0.0)) {
            dropped += 1;
        } else {
            trend_rows.push(TrendRow {
                date: date.date,
                values,
            });
        }
    }
    debug!(kept = trend_rows.len(), dropped, "built trend matrix");

    TrendMatrix {
        hubs: selected.iter().map(|row| row.hub.clone()).collect(),
        rows: trend_rows,
    }
}

pub fn build_comparison_relation(
    rows: &[SummaryRow],
    observation_dates: &[ObservationDate],
    selected_hubs: &[String],
) -> ComparisonRelation {
    let selected = select(rows, selected_hubs);

    let entries = dates_ascending(observation_dates)
        .into_iter()
        .flat_map(|date| {
            selected.iter().filter_map(move |row| {
                row.value_on(date)
                    .filter(|sales| *sales > 0.0)
                    .map(|sales| ComparisonEntry {
                        date: date.date,
                        hub: row.hub.clone(),
                        sales,
                    })
            })
        })
        .collect::<Vec<_>>();
    debug!(entries = entries.len(), "built comparison relation");

    ComparisonRelation { entries }
}

/// Long → wide: `(date, hub) → sales`.
pub fn pivot_wide(relation: &ComparisonRelation) -> BTreeMap<(NaiveDate, String), f64> {
    relation
        .entries
        .iter()
        .map(|entry| ((entry.date, entry.hub.clone()), entry.sales))
        .collect()
}

pub fn detail_row(table: &SummaryTable, hub: &str) -> Option<DetailRow> {
    let row = table.row(hub)?;
    let fields = table
        .columns
        .iter()
        .zip(&row.cells)
        .filter(|(_, cell)| !cell.is_empty())
        .map(|(label, cell)| (label.clone(), cell.clone()))
        .collect();

    Some(DetailRow {
        hub: row.hub.clone(),
        fields,
    })
}
