use serde::Serialize;
use tracing::info;

use crate::config::ReportingPeriod;
use crate::insights::{collect_insights, per_hub_peak_day};
use crate::models::{
    ComparisonRelation, DetailRow, HubKpi, InsightFact, LoadedWorkbook, SummaryTable,
    TrendMatrix, UnavailableInsight,
};
use crate::reshape::{build_comparison_relation, build_trend_matrix, detail_row};

pub const DEFAULT_SELECTION_SIZE: usize = 5;

/// Everything the dashboard shows for one hub selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub period: String,
    pub selected_hubs: Vec<String>,
    pub kpis: Vec<HubKpi>,
    pub trend: TrendMatrix,
    pub comparison: ComparisonRelation,
    pub detail: Option<DetailRow>,
    pub insights: Vec<InsightFact>,
    pub unavailable_insights: Vec<UnavailableInsight>,
}

/// The explicit selection, or the first hubs of the table when none is given.
pub fn resolve_selection(table: &SummaryTable, requested: &[String]) -> Vec<String> {
    if requested.is_empty() {
        table.hubs().into_iter().take(DEFAULT_SELECTION_SIZE).collect()
    } else {
        requested.to_vec()
    }
}

pub fn resolve_inspected(table: &SummaryTable, requested: Option<&str>) -> Option<String> {
    requested
        .map(str::to_string)
        .or_else(|| table.hubs().into_iter().next())
}

pub fn hub_kpis(table: &SummaryTable, selected_hubs: &[String]) -> Vec<HubKpi> {
    selected_hubs
        .iter()
        .filter_map(|hub| table.row(hub))
        .map(|row| HubKpi {
            hub: row.hub.clone(),
            mtd_sr: row.mtd_sr,
        })
        .collect()
}

pub fn build_view(
    workbook: &LoadedWorkbook,
    period: &ReportingPeriod,
    requested_hubs: &[String],
    inspect: Option<&str>,
) -> DashboardView {
    let table = &workbook.summary;
    let selected_hubs = resolve_selection(table, requested_hubs);
    let inspected = resolve_inspected(table, inspect);
    let selected_rows = table.rows_for(&selected_hubs);
    let dates = &table.observation_dates;

    let trend = build_trend_matrix(&table.rows, dates, &selected_hubs);
    let comparison = build_comparison_relation(&table.rows, dates, &selected_hubs);
    let detail = inspected.as_deref().and_then(|hub| detail_row(table, hub));

    let mut insights = collect_insights(&selected_rows, dates, None);
    if let Some(hub) = inspected.as_deref() {
        // The inspected hub need not be part of the selection.
        insights.record("hub peak day", per_hub_peak_day(&table.rows, dates, hub));
    }

    info!(
        hubs = selected_hubs.len(),
        trend_days = trend.rows.len(),
        comparison_entries = comparison.entries.len(),
        insights = insights.facts.len(),
        "dashboard view built"
    );

    DashboardView {
        period: period.label(),
        kpis: hub_kpis(table, &selected_hubs),
        selected_hubs,
        trend,
        comparison,
        detail,
        insights: insights.facts,
        unavailable_insights: insights.unavailable,
    }
}
