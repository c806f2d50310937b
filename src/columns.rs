//! Classification of summary-sheet column labels.
//!
//! A column holds a daily observation iff its label contains the reporting
//! year and is not the boundary label of the following month's first day.

use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime};

use crate::config::{ReportingPeriod, HUB_COLUMN, MTD_COLUMN};
use crate::error::{DashboardError, DashboardResult};
use crate::models::ObservationDate;

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y/%m/%d %H:%M:%S"];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d-%m-%Y", "%d/%m/%Y"];

/// Where the required columns of the summary sheet live.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnLayout {
    pub hub: usize,
    pub mtd_sr: usize,
    pub observation_dates: Vec<ObservationDate>,
}

pub fn is_observation_label(label: &str, period: &ReportingPeriod) -> bool {
    label.contains(&period.year_token()) && label != period.boundary_label()
}

pub fn parse_label_date(label: &str) -> Option<NaiveDate> {
    let label = label.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(label, format).ok())
        .map(|datetime| datetime.date())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(label, format).ok())
        })
}

/// Observation columns in table order. Each date may appear only once.
pub fn observation_dates(
    labels: &[String],
    period: &ReportingPeriod,
) -> DashboardResult<Vec<ObservationDate>> {
    let dates: Vec<ObservationDate> = labels
        .iter()
        .enumerate()
        .filter(|(_, label)| is_observation_label(label, period))
        .map(|(column, label)| {
            let date = parse_label_date(label).ok_or_else(|| {
                DashboardError::SchemaMismatch(format!(
                    "column `{label}` looks like a {} date but cannot be parsed",
                    period.year
                ))
            })?;
            Ok(ObservationDate {
                column,
                label: label.clone(),
                date,
            })
        })
        .collect::<DashboardResult<_>>()?;

    let mut seen = HashSet::new();
    if let Some(repeat) = dates.iter().find(|date| !seen.insert(date.date)) {
        return Err(DashboardError::SchemaMismatch(format!(
            "column `{}` repeats the date {}",
            repeat.label, repeat.date
        )));
    }
    Ok(dates)
}

pub fn classify_columns(
    labels: &[String],
    period: &ReportingPeriod,
) -> DashboardResult<ColumnLayout> {
    let position = |name: &str| {
        labels
            .iter()
            .position(|label| label == name)
            .ok_or_else(|| DashboardError::SchemaMismatch(format!("missing `{name}` column")))
    };

    Ok(ColumnLayout {
        hub: position(HUB_COLUMN)?,
        mtd_sr: position(MTD_COLUMN)?,
        observation_dates: observation_dates(labels, period)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::june;

    fn june_2025() -> ReportingPeriod {
        ReportingPeriod::new(2025, 6).unwrap()
    }

    fn labels(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn boundary_column_is_not_an_observation() {
        let period = june_2025();
        assert!(is_observation_label("2025-06-30 00:00:00", &period));
        assert!(!is_observation_label("2025-07-01 00:00:00", &period));
        assert!(!is_observation_label("MTD SR", &period));
        assert!(!is_observation_label("2024-06-01 00:00:00", &period));
    }

    #[test]
    fn parses_common_label_shapes() {
        assert_eq!(parse_label_date("2025-06-03 00:00:00"), Some(june(3)));
        assert_eq!(parse_label_date("2025-06-03"), Some(june(3)));
        assert_eq!(parse_label_date("03/06/2025"), Some(june(3)));
        assert_eq!(parse_label_date("not a date"), None);
    }

    #[test]
    fn classifies_summary_header() {
        let header = labels(&[
            "Hub Name",
            "Region",
            "MTD SR",
            "2025-06-01 00:00:00",
            "2025-06-02 00:00:00",
            "2025-07-01 00:00:00",
        ]);
        let layout = classify_columns(&header, &june_2025()).unwrap();

        assert_eq!(layout.hub, 0);
        assert_eq!(layout.mtd_sr, 2);
        let columns: Vec<usize> = layout.observation_dates.iter().map(|d| d.column).collect();
        assert_eq!(columns, vec![3, 4]);
        assert_eq!(layout.observation_dates[1].date, june(2));
    }

    #[test]
    fn missing_required_columns_is_schema_mismatch() {
        let header = labels(&["Hub Name", "2025-06-01 00:00:00"]);
        let err = classify_columns(&header, &june_2025()).unwrap_err();
        assert!(matches!(err, DashboardError::SchemaMismatch(message) if message.contains("MTD SR")));
    }

    #[test]
    fn repeated_date_is_schema_mismatch() {
        let header = labels(&["Hub Name", "MTD SR", "2025-06-01", "2025-06-01 00:00:00"]);
        let err = classify_columns(&header, &june_2025()).unwrap_err();
        assert!(
            matches!(err, DashboardError::SchemaMismatch(message) if message.contains("2025-06-01 00:00:00"))
        );
    }

    #[test]
    fn unparseable_year_label_is_schema_mismatch() {
        let header = labels(&["Hub Name", "MTD SR", "Target 2025"]);
        assert!(matches!(
            classify_columns(&header, &june_2025()),
            Err(DashboardError::SchemaMismatch(_))
        ));
    }
}
