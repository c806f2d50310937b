use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// A single spreadsheet cell after loading.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
    DateTime(NaiveDateTime),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Numeric view of the cell; numeric text is accepted, anything else is absent.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(value) if value.is_finite() => Some(*value),
            Cell::Text(text) => text
                .trim()
                .replace(',', "")
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite()),
            _ => None,
        }
    }

    /// Text form used for column labels and hub names.
    pub fn label(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Number(value) => Some(value.to_string()),
            Cell::Text(text) => {
                let trimmed = text.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Cell::DateTime(value) => Some(value.format("%Y-%m-%d %H:%M:%S").to_string()),
        }
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Number(value) => write!(f, "{value:.2}"),
            Cell::Text(text) => f.write_str(text),
            Cell::DateTime(value) => write!(f, "{}", value.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

/// A per-day column of the summary sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObservationDate {
    pub column: usize,
    pub label: String,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub hub: String,
    pub mtd_sr: Option<f64>,
    /// Every cell of the row, aligned with `SummaryTable::columns`.
    pub cells: Vec<Cell>,
}

impl SummaryRow {
    pub fn value_on(&self, date: &ObservationDate) -> Option<f64> {
        self.cells.get(date.column).and_then(Cell::as_f64)
    }

    pub fn daily_values<'a>(
        &'a self,
        dates: &'a [ObservationDate],
    ) -> impl Iterator<Item = Option<f64>> + 'a {
        dates.iter().map(move |date| self.value_on(date))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryTable {
    pub columns: Vec<String>,
    pub observation_dates: Vec<ObservationDate>,
    pub rows: Vec<SummaryRow>,
}

impl SummaryTable {
    /// Distinct hub names in table order.
    pub fn hubs(&self) -> Vec<String> {
        let mut hubs: Vec<String> = Vec::new();
        for row in &self.rows {
            if !hubs.contains(&row.hub) {
                hubs.push(row.hub.clone());
            }
        }
        hubs
    }

    pub fn row(&self, hub: &str) -> Option<&SummaryRow> {
        self.rows.iter().find(|row| row.hub == hub)
    }

    /// First row of each hub in `hubs`, in table order. Later duplicate
    /// rows are skipped, matching `row`.
    pub fn rows_for(&self, hubs: &[String]) -> Vec<SummaryRow> {
        let mut picked: Vec<SummaryRow> = Vec::new();
        for row in &self.rows {
            if hubs.contains(&row.hub) && !picked.iter().any(|seen| seen.hub == row.hub) {
                picked.push(row.clone());
            }
        }
        picked
    }
}

/// A sheet loaded without any schema beyond its header row.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SheetTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadedWorkbook {
    pub summary: SummaryTable,
    pub hub_wise: SheetTable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendRow {
    pub date: NaiveDate,
    /// One value per entry of `TrendMatrix::hubs`.
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TrendMatrix {
    pub hubs: Vec<String>,
    pub rows: Vec<TrendRow>,
}

impl TrendMatrix {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonEntry {
    pub date: NaiveDate,
    pub hub: String,
    pub sales: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ComparisonRelation {
    pub entries: Vec<ComparisonEntry>,
}

impl ComparisonRelation {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One hub's full record as label/value pairs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailRow {
    pub hub: String,
    pub fields: Vec<(String, Cell)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HubKpi {
    pub hub: String,
    pub mtd_sr: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InsightFact {
    TopPerformer { hub: String, value: f64 },
    LowestPerformer { hub: String, value: f64 },
    MostConsistent { hub: String, std_dev: f64 },
    PeakDay { date: NaiveDate, total: f64 },
    PerHubPeakDay { hub: String, date: NaiveDate, value: f64 },
}

/// An insight that could not be computed, with the reason.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnavailableInsight {
    pub insight: String,
    pub reason: String,
}
