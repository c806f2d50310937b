use std::path::PathBuf;

use chrono::{Datelike, NaiveDate};

use crate::error::{DashboardError, DashboardResult};

pub const DEFAULT_WORKBOOK: &str = "Sales Realization Report-Jun'25.xlsx";
pub const DEFAULT_SUMMARY_SHEET: &str = "Sales Realisation Summary";
pub const DEFAULT_HUB_WISE_SHEET: &str = "Hub Wise Sales Realisation";
pub const HUB_COLUMN: &str = "Hub Name";
pub const MTD_COLUMN: &str = "MTD SR";

/// The month a workbook reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportingPeriod {
    pub year: i32,
    pub month: u32,
}

impl ReportingPeriod {
    pub fn new(year: i32, month: u32) -> DashboardResult<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
            DashboardError::SchemaMismatch(format!("invalid reporting period {year}-{month:02}"))
        })?;
        Ok(Self { year, month })
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// First day of the following month, which the sheet carries as a
    /// cumulative spillover column.
    pub fn boundary_date(&self) -> NaiveDate {
        let first = self.first_day();
        let (year, month) = if first.month() == 12 {
            (first.year() + 1, 1)
        } else {
            (first.year(), first.month() + 1)
        };
        NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MAX)
    }

    pub fn year_token(&self) -> String {
        self.year.to_string()
    }

    pub fn boundary_label(&self) -> String {
        format!("{} 00:00:00", self.boundary_date().format("%Y-%m-%d"))
    }

    /// e.g. "June 2025"
    pub fn label(&self) -> String {
        self.first_day().format("%B %Y").to_string()
    }
}

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub workbook: PathBuf,
    pub summary_sheet: String,
    pub hub_wise_sheet: String,
    pub period: ReportingPeriod,
}

impl DashboardConfig {
    pub fn new(
        workbook: PathBuf,
        summary_sheet: String,
        hub_wise_sheet: String,
        year: i32,
        month: u32,
    ) -> DashboardResult<Self> {
        Ok(Self {
            workbook,
            summary_sheet,
            hub_wise_sheet,
            period: ReportingPeriod::new(year, month)?,
        })
    }
}
