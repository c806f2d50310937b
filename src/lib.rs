//! Sales realisation dashboard core: loads the monthly workbook, reshapes
//! per-day hub columns for charting and derives summary insights.

pub mod cache;
pub mod columns;
pub mod config;
pub mod error;
#[cfg(test)]
mod fixtures;
pub mod insights;
pub mod loader;
pub mod models;
pub mod report;
pub mod reshape;
pub mod view;
