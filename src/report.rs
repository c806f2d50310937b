use std::fmt::Write;
use std::io;

use crate::error::DashboardResult;
use crate::models::{ComparisonRelation, InsightFact, SheetTable};
use crate::view::DashboardView;

const HUB_WISE_PREVIEW_ROWS: usize = 10;

fn format_value(value: Option<f64>) -> String {
    value.map(|value| format!("{value:.2}")).unwrap_or_else(|| "-".to_string())
}

pub fn describe_insight(fact: &InsightFact) -> String {
    match fact {
        InsightFact::TopPerformer { hub, value } => {
            format!("**Top performer:** {hub} with MTD SR {value:.2}")
        }
        InsightFact::LowestPerformer { hub, value } => {
            format!("**Lowest performer:** {hub} with MTD SR {value:.2}")
        }
        InsightFact::MostConsistent { hub, std_dev } => {
            format!("**Most consistent:** {hub} (daily std dev {std_dev:.2})")
        }
        InsightFact::PeakDay { date, total } => format!(
            "**Peak day:** {} with {total:.2} total across hubs",
            date.format("%b-%d")
        ),
        InsightFact::PerHubPeakDay { hub, date, value } => format!(
            "**{hub} peak day:** {} with {value:.2}",
            date.format("%b-%d")
        ),
    }
}

pub fn build_report(view: &DashboardView, hub_wise: &SheetTable) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Sales Realisation Dashboard - {}", view.period);
    let _ = writeln!(output, "Hubs: {}", view.selected_hubs.join(", "));
    let _ = writeln!(output);
    let _ = writeln!(output, "## Summary KPIs");

    if view.kpis.is_empty() {
        let _ = writeln!(output, "No selected hub is present in the summary sheet.");
    } else {
        for kpi in &view.kpis {
            let _ = writeln!(output, "- {} - MTD SR: {}", kpi.hub, format_value(kpi.mtd_sr));
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Day-wise Sales Realisation Trend");

    if view.trend.is_empty() {
        let _ = writeln!(output, "No activity recorded for the selected hubs.");
    } else {
        let _ = writeln!(output, "| Date | {} |", view.trend.hubs.join(" | "));
        let _ = writeln!(output, "|---|{}", "---|".repeat(view.trend.hubs.len()));
        for row in &view.trend.rows {
            let values: Vec<String> = row.values.iter().map(|value| format_value(*value)).collect();
            let _ = writeln!(output, "| {} | {} |", row.date.format("%b-%d"), values.join(" | "));
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Hub Comparison");

    if view.comparison.is_empty() {
        let _ = writeln!(output, "No positive sales to compare.");
    } else {
        let _ = writeln!(output, "| Date | Hub | Sales |");
        let _ = writeln!(output, "|---|---|---|");
        for entry in &view.comparison.entries {
            let _ = writeln!(
                output,
                "| {} | {} | {:.2} |",
                entry.date.format("%b-%d"),
                entry.hub,
                entry.sales
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Detailed Hub View");

    match &view.detail {
        Some(detail) => {
            let _ = writeln!(output, "| Field | {} |", detail.hub);
            let _ = writeln!(output, "|---|---|");
            for (label, cell) in &detail.fields {
                let _ = writeln!(output, "| {label} | {cell} |");
            }
        }
        None => {
            let _ = writeln!(output, "No hub selected for inspection.");
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Insights");

    for fact in &view.insights {
        let _ = writeln!(output, "- {}", describe_insight(fact));
    }
    for missing in &view.unavailable_insights {
        let _ = writeln!(output, "- _{} unavailable: {}_", missing.insight, missing.reason);
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Hub Wise Sales Realisation");

    if hub_wise.rows.is_empty() {
        let _ = writeln!(output, "The hub-wise sheet has no rows.");
    } else {
        let _ = writeln!(
            output,
            "{} rows across {} columns (first {} shown).",
            hub_wise.rows.len(),
            hub_wise.columns.len(),
            HUB_WISE_PREVIEW_ROWS.min(hub_wise.rows.len())
        );
        let _ = writeln!(output);
        let _ = writeln!(output, "| {} |", hub_wise.columns.join(" | "));
        let _ = writeln!(output, "|{}", "---|".repeat(hub_wise.columns.len()));
        for row in hub_wise.rows.iter().take(HUB_WISE_PREVIEW_ROWS) {
            let cells: Vec<String> = row.iter().map(|cell| cell.to_string()).collect();
            let _ = writeln!(output, "| {} |", cells.join(" | "));
        }
    }

    output
}

/// Long-format `date,hub,sales` rows.
pub fn write_comparison_csv<W: io::Write>(
    relation: &ComparisonRelation,
    writer: W,
) -> DashboardResult<usize> {
    let mut writer = csv::Writer::from_writer(writer);
    for entry in &relation.entries {
        writer.serialize(entry)?;
    }
    writer.flush()?;
    Ok(relation.entries.len())
}
