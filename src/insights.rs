use tracing::{debug, warn};

use crate::error::{DashboardError, DashboardResult};
use crate::models::{InsightFact, ObservationDate, SummaryRow, UnavailableInsight};

/// First index holding the best value under `better`; later equal values never win.
fn first_best<T, F>(items: impl IntoIterator<Item = (T, f64)>, better: F) -> Option<(T, f64)>
where
    F: Fn(f64, f64) -> bool,
{
    items.into_iter().fold(None, |best, (item, value)| match best {
        Some((_, current)) if !better(value, current) => best,
        _ => Some((item, value)),
    })
}

pub fn top_performer(rows: &[SummaryRow]) -> DashboardResult<InsightFact> {
    let (row, value) = first_best(
        rows.iter().filter_map(|row| row.mtd_sr.map(|value| (row, value))),
        |candidate, current| candidate > current,
    )
    .ok_or_else(|| DashboardError::InsufficientData("no hub has an MTD SR value".to_string()))?;

    Ok(InsightFact::TopPerformer {
        hub: row.hub.clone(),
        value,
    })
}

pub fn lowest_performer(rows: &[SummaryRow]) -> DashboardResult<InsightFact> {
    let (row, value) = first_best(
        rows.iter().filter_map(|row| row.mtd_sr.map(|value| (row, value))),
        |candidate, current| candidate < current,
    )
    .ok_or_else(|| DashboardError::InsufficientData("no hub has an MTD SR value".to_string()))?;

    Ok(InsightFact::LowestPerformer {
        hub: row.hub.clone(),
        value,
    })
}

/// Sample standard deviation; `None` below two observations.
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let count = values.len() as f64;
    let mean = values.iter().sum::<f64>() / count;
    let variance = values
        .iter()
        .map(|value| (value - mean).powi(2))
        .sum::<f64>()
        / (count - 1.0);
    Some(variance.sqrt())
}

pub fn most_consistent(
    rows: &[SummaryRow],
    dates: &[ObservationDate],
) -> DashboardResult<InsightFact> {
    let deviations = rows.iter().filter_map(|row| {
        let observed: Vec<f64> = row.daily_values(dates).flatten().collect();
        let deviation = sample_std_dev(&observed);
        if deviation.is_none() {
            debug!(hub = %row.hub, observations = observed.len(), "too few observations for deviation");
        }
        deviation.map(|value| (row, value))
    });

    let (row, std_dev) = first_best(deviations, |candidate, current| candidate < current)
        .ok_or_else(|| {
            DashboardError::InsufficientData(
                "every hub has fewer than 2 daily observations".to_string(),
            )
        })?;

    Ok(InsightFact::MostConsistent {
        hub: row.hub.clone(),
        std_dev,
    })
}

pub fn peak_day(rows: &[SummaryRow], dates: &[ObservationDate]) -> DashboardResult<InsightFact> {
    if rows.is_empty() {
        return Err(DashboardError::InsufficientData("no hub rows".to_string()));
    }

    let totals = dates.iter().map(|date| {
        let total: f64 = rows.iter().filter_map(|row| row.value_on(date)).sum();
        (date, total)
    });

    let (date, total) = first_best(totals, |candidate, current| candidate > current)
        .ok_or_else(|| DashboardError::InsufficientData("no daily columns".to_string()))?;

    Ok(InsightFact::PeakDay {
        date: date.date,
        total,
    })
}

pub fn per_hub_peak_day(
    rows: &[SummaryRow],
    dates: &[ObservationDate],
    hub: &str,
) -> DashboardResult<InsightFact> {
    let row = rows
        .iter()
        .find(|row| row.hub == hub)
        .ok_or_else(|| DashboardError::InsufficientData(format!("no row for hub `{hub}`")))?;

    let observed = dates
        .iter()
        .filter_map(|date| row.value_on(date).map(|value| (date, value)));

    let (date, value) = first_best(observed, |candidate, current| candidate > current)
        .ok_or_else(|| {
            DashboardError::InsufficientData(format!("hub `{hub}` has no daily observations"))
        })?;

    Ok(InsightFact::PerHubPeakDay {
        hub: row.hub.clone(),
        date: date.date,
        value,
    })
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsightSet {
    pub facts: Vec<InsightFact>,
    pub unavailable: Vec<UnavailableInsight>,
}

impl InsightSet {
    pub fn record(&mut self, insight: &str, outcome: DashboardResult<InsightFact>) {
        match outcome {
            Ok(fact) => self.facts.push(fact),
            Err(err) => {
                warn!(insight, error = %err, "insight unavailable");
                self.unavailable.push(UnavailableInsight {
                    insight: insight.to_string(),
                    reason: err.to_string(),
                });
            }
        }
    }
}

/// Runs every insight over `rows` in a fixed order; the per-hub peak day
/// is included when `inspect` names a hub.
pub fn collect_insights(
    rows: &[SummaryRow],
    dates: &[ObservationDate],
    inspect: Option<&str>,
) -> InsightSet {
    let mut set = InsightSet::default();
    set.record("top performer", top_performer(rows));
    set.record("lowest performer", lowest_performer(rows));
    set.record("most consistent", most_consistent(rows, dates));
    set.record("peak day", peak_day(rows, dates));
    if let Some(hub) = inspect {
        set.record("hub peak day", per_hub_peak_day(rows, dates, hub));
    }
    set
}
