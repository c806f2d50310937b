use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use sales_realisation_dashboard::cache::WorkbookCache;
use sales_realisation_dashboard::config::{
    DashboardConfig, DEFAULT_HUB_WISE_SHEET, DEFAULT_SUMMARY_SHEET, DEFAULT_WORKBOOK,
};
use sales_realisation_dashboard::{report, reshape, view};

#[derive(Parser)]
#[command(name = "sr-dashboard")]
#[command(about = "Monthly sales realisation dashboard by hub", long_about = None)]
struct Cli {
    /// Workbook holding the summary and hub-wise sheets
    #[arg(long, env = "SR_WORKBOOK", default_value = DEFAULT_WORKBOOK, global = true)]
    workbook: PathBuf,
    #[arg(long, default_value = DEFAULT_SUMMARY_SHEET, global = true)]
    summary_sheet: String,
    #[arg(long, default_value = DEFAULT_HUB_WISE_SHEET, global = true)]
    hub_wise_sheet: String,
    /// Reporting year
    #[arg(long, default_value_t = 2025, global = true)]
    year: i32,
    /// Reporting month (1-12)
    #[arg(long, default_value_t = 6, global = true)]
    month: u32,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Selection {
    /// Hub to include; repeat for several (defaults to the first five)
    #[arg(long = "hub")]
    hubs: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List hubs in the summary sheet
    Hubs,
    /// Show MTD SR for the selected hubs
    Kpis {
        #[command(flatten)]
        selection: Selection,
    },
    /// Print insights for the selected hubs
    Insights {
        #[command(flatten)]
        selection: Selection,
        /// Hub whose peak day is reported
        #[arg(long)]
        inspect: Option<String>,
    },
    /// Generate a markdown dashboard
    Report {
        #[command(flatten)]
        selection: Selection,
        #[arg(long)]
        inspect: Option<String>,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
    /// Write the dashboard view as JSON
    Export {
        #[command(flatten)]
        selection: Selection,
        #[arg(long)]
        inspect: Option<String>,
        #[arg(long, default_value = "dashboard.json")]
        out: PathBuf,
    },
    /// Write the hub comparison as long-format CSV
    ExportComparison {
        #[command(flatten)]
        selection: Selection,
        #[arg(long, default_value = "comparison.csv")]
        out: PathBuf,
    },
}

fn init_logging() {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    let config = DashboardConfig::new(
        cli.workbook,
        cli.summary_sheet,
        cli.hub_wise_sheet,
        cli.year,
        cli.month,
    )
    .context("invalid reporting period")?;

    let mut cache = WorkbookCache::default();
    let workbook = cache
        .load(&config)
        .with_context(|| format!("failed to load {}", config.workbook.display()))?;
    let table = &workbook.summary;

    match cli.command {
        Commands::Hubs => {
            for hub in table.hubs() {
                println!("{hub}");
            }
        }
        Commands::Kpis { selection } => {
            let selected = view::resolve_selection(table, &selection.hubs);
            let kpis = view::hub_kpis(table, &selected);

            if kpis.is_empty() {
                println!("No selected hub is present in the summary sheet.");
                return Ok(());
            }

            println!("MTD SR for selected hubs:");
            for kpi in kpis {
                match kpi.mtd_sr {
                    Some(value) => println!("- {}: {:.2}", kpi.hub, value),
                    None => println!("- {}: n/a", kpi.hub),
                }
            }
        }
        Commands::Insights { selection, inspect } => {
            let view = view::build_view(
                &workbook,
                &config.period,
                &selection.hubs,
                inspect.as_deref(),
            );
            println!("Insights for {}:", view.period);
            for fact in &view.insights {
                println!("- {}", report::describe_insight(fact));
            }
            for missing in &view.unavailable_insights {
                println!("- {} unavailable: {}", missing.insight, missing.reason);
            }
        }
        Commands::Report {
            selection,
            inspect,
            out,
        } => {
            let view = view::build_view(
                &workbook,
                &config.period,
                &selection.hubs,
                inspect.as_deref(),
            );
            let report = report::build_report(&view, &workbook.hub_wise);
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            info!(path = %out.display(), "report written");
            println!("Report written to {}.", out.display());
        }
        Commands::Export {
            selection,
            inspect,
            out,
        } => {
            let view = view::build_view(
                &workbook,
                &config.period,
                &selection.hubs,
                inspect.as_deref(),
            );
            let json = serde_json::to_string_pretty(&view)?;
            std::fs::write(&out, json)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Dashboard exported to {}.", out.display());
        }
        Commands::ExportComparison { selection, out } => {
            let selected = view::resolve_selection(table, &selection.hubs);
            let relation = reshape::build_comparison_relation(
                &table.rows,
                &table.observation_dates,
                &selected,
            );
            let file = std::fs::File::create(&out)
                .with_context(|| format!("failed to create {}", out.display()))?;
            let written = report::write_comparison_csv(&relation, file)?;
            println!("Wrote {written} comparison rows to {}.", out.display());
        }
    }

    Ok(())
}
