use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use calamine::{open_workbook_auto, Data, DataType, Reader, Sheets};
use tracing::{debug, info, warn};

use crate::columns::classify_columns;
use crate::config::{DashboardConfig, ReportingPeriod};
use crate::error::{DashboardError, DashboardResult};
use crate::models::{Cell, LoadedWorkbook, SheetTable, SummaryRow, SummaryTable};

pub fn load_workbook(config: &DashboardConfig) -> DashboardResult<LoadedWorkbook> {
    let path = config.workbook.as_path();
    if !path.exists() {
        return Err(DashboardError::SourceNotFound {
            path: path.to_path_buf(),
        });
    }

    info!(path = %path.display(), "opening workbook");
    let mut workbook = open_workbook_auto(path)?;
    let available = workbook.sheet_names().to_vec();

    let summary_grid = read_sheet(&mut workbook, &available, &config.summary_sheet)?;
    let hub_wise_grid = read_sheet(&mut workbook, &available, &config.hub_wise_sheet)?;

    let summary = summary_from_grid(summary_grid, &config.period)?;
    let hub_wise = sheet_from_grid(hub_wise_grid, 1);
    info!(
        hubs = summary.rows.len(),
        days = summary.observation_dates.len(),
        hub_wise_rows = hub_wise.rows.len(),
        "workbook loaded"
    );

    Ok(LoadedWorkbook { summary, hub_wise })
}

fn read_sheet(
    workbook: &mut Sheets<BufReader<File>>,
    available: &[String],
    sheet: &str,
) -> DashboardResult<Vec<Vec<Cell>>> {
    ensure_sheet(available, sheet)?;
    let range = workbook.worksheet_range(sheet)?;
    debug!(sheet, rows = range.height(), columns = range.width(), "read sheet");

    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_from_data).collect())
        .collect())
}

pub fn ensure_sheet(available: &[String], sheet: &str) -> DashboardResult<()> {
    if available.iter().any(|name| name == sheet) {
        Ok(())
    } else {
        Err(DashboardError::SheetNotFound {
            sheet: sheet.to_string(),
            available: available.to_vec(),
        })
    }
}

pub fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::Float(value) => Cell::Number(*value),
        Data::Int(value) => Cell::Number(*value as f64),
        Data::String(text) if text.trim().is_empty() => Cell::Empty,
        Data::String(text) => Cell::Text(text.trim().to_string()),
        Data::DateTime(_) | Data::DateTimeIso(_) => match data.as_datetime() {
            Some(datetime) => Cell::DateTime(datetime),
            None => Cell::Text(data.to_string()),
        },
        other => Cell::Text(other.to_string()),
    }
}

/// Uses row `header_row` as the header and everything below it as data.
/// Rows above the header are banners and are dropped.
pub fn sheet_from_grid(grid: Vec<Vec<Cell>>, header_row: usize) -> SheetTable {
    let mut rows = grid.into_iter().skip(header_row);
    let Some(header) = rows.next() else {
        return SheetTable::default();
    };

    let columns = header
        .iter()
        .enumerate()
        .map(|(index, cell)| cell.label().unwrap_or_else(|| format!("Unnamed: {index}")))
        .collect::<Vec<_>>();

    let rows = rows
        .filter(|row| row.iter().any(|cell| !cell.is_empty()))
        .map(|mut row| {
            row.resize(columns.len(), Cell::Empty);
            row
        })
        .collect();

    SheetTable { columns, rows }
}

pub fn summary_from_grid(
    grid: Vec<Vec<Cell>>,
    period: &ReportingPeriod,
) -> DashboardResult<SummaryTable> {
    let sheet = sheet_from_grid(grid, 0);
    let layout = classify_columns(&sheet.columns, period)?;
    debug!(
        hub_column = layout.hub,
        mtd_column = layout.mtd_sr,
        days = layout.observation_dates.len(),
        "classified summary columns"
    );

    let mut rows: Vec<SummaryRow> = Vec::with_capacity(sheet.rows.len());
    for cells in sheet.rows {
        let Some(hub) = cells[layout.hub].label() else {
            debug!("skipping summary row without a hub name");
            continue;
        };
        if rows.iter().any(|row| row.hub == hub) {
            warn!(hub = %hub, "duplicate hub row; lookups use the first occurrence");
        }
        rows.push(SummaryRow {
            hub,
            mtd_sr: cells[layout.mtd_sr].as_f64(),
            cells,
        });
    }

    Ok(SummaryTable {
        columns: sheet.columns,
        observation_dates: layout.observation_dates,
        rows,
    })
}

pub fn workbook_modified(path: &Path) -> DashboardResult<std::time::SystemTime> {
    if !path.exists() {
        return Err(DashboardError::SourceNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(std::fs::metadata(path)?.modified()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::june;
    use chrono::NaiveDate;

    fn text(value: &str) -> Cell {
        Cell::Text(value.to_string())
    }

    fn date_header(day: u32, month: u32) -> Cell {
        Cell::DateTime(
            NaiveDate::from_ymd_opt(2025, month, day)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        )
    }

    fn june_2025() -> ReportingPeriod {
        ReportingPeriod::new(2025, 6).unwrap()
    }

    #[test]
    fn summary_grid_becomes_typed_table() {
        let grid = vec![
            vec![
                text("Hub Name"),
                text("MTD SR"),
                date_header(1, 6),
                date_header(2, 6),
                date_header(1, 7),
            ],
            vec![
                text("North"),
                Cell::Number(91.5),
                Cell::Number(10.0),
                Cell::Empty,
                Cell::Number(300.0),
            ],
            vec![Cell::Empty, Cell::Number(1.0), Cell::Number(1.0)],
            vec![text("South"), text("45.25"), Cell::Number(0.0), text("n/a")],
        ];

        let table = summary_from_grid(grid, &june_2025()).unwrap();

        assert_eq!(table.columns[2], "2025-06-01 00:00:00");
        assert_eq!(table.observation_dates.len(), 2);
        assert_eq!(table.observation_dates[0].date, june(1));
        assert_eq!(table.hubs(), vec!["North".to_string(), "South".to_string()]);

        let south = table.row("South").unwrap();
        assert_eq!(south.mtd_sr, Some(45.25));
        assert_eq!(south.cells.len(), table.columns.len());
        let values: Vec<Option<f64>> = south.daily_values(&table.observation_dates).collect();
        assert_eq!(values, vec![Some(0.0), None]);
    }

    #[test]
    fn missing_mtd_column_is_schema_mismatch() {
        let grid = vec![
            vec![text("Hub Name"), date_header(1, 6)],
            vec![text("North"), Cell::Number(1.0)],
        ];
        assert!(matches!(
            summary_from_grid(grid, &june_2025()),
            Err(DashboardError::SchemaMismatch(_))
        ));
    }

    #[test]
    fn hub_wise_sheet_skips_banner_row() {
        let grid = vec![
            vec![text("Hub Wise Sales Realisation - June 2025")],
            vec![text("Hub"), text("Target"), Cell::Empty],
            vec![text("North"), Cell::Number(100.0)],
            vec![Cell::Empty, Cell::Empty, Cell::Empty],
        ];

        let sheet = sheet_from_grid(grid, 1);

        assert_eq!(sheet.columns, vec!["Hub", "Target", "Unnamed: 2"]);
        assert_eq!(sheet.rows.len(), 1);
        assert_eq!(sheet.rows[0][2], Cell::Empty);
    }

    #[test]
    fn empty_grid_yields_empty_sheet() {
        assert_eq!(sheet_from_grid(Vec::new(), 1), SheetTable::default());
    }

    #[test]
    fn unknown_sheet_lists_available_ones() {
        let available = vec!["Sales Realisation Summary".to_string()];
        let err = ensure_sheet(&available, "Hub Wise Sales Realisation").unwrap_err();
        match err {
            DashboardError::SheetNotFound { sheet, available } => {
                assert_eq!(sheet, "Hub Wise Sales Realisation");
                assert_eq!(available, vec!["Sales Realisation Summary".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_file_is_source_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let config = DashboardConfig::new(
            dir.path().join("missing.xlsx"),
            "Sales Realisation Summary".to_string(),
            "Hub Wise Sales Realisation".to_string(),
            2025,
            6,
        )
        .unwrap();

        assert!(matches!(
            load_workbook(&config),
            Err(DashboardError::SourceNotFound { .. })
        ));
    }

    fn fixture_config(summary_sheet: &str, hub_wise_sheet: &str) -> DashboardConfig {
        DashboardConfig::new(
            Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/sales_realisation_jun25.xlsx"),
            summary_sheet.to_string(),
            hub_wise_sheet.to_string(),
            2025,
            6,
        )
        .unwrap()
    }

    #[test]
    fn loads_workbook_from_disk() {
        let config = fixture_config("Sales Realisation Summary", "Hub Wise Sales Realisation");
        let loaded = load_workbook(&config).unwrap();
        let summary = &loaded.summary;

        assert_eq!(
            summary.columns,
            vec![
                "Hub Name",
                "Region",
                "MTD SR",
                "2025-06-01 00:00:00",
                "2025-06-02 00:00:00",
                "2025-06-03 00:00:00",
                "2025-07-01 00:00:00",
            ]
        );
        let days: Vec<(usize, NaiveDate)> = summary
            .observation_dates
            .iter()
            .map(|date| (date.column, date.date))
            .collect();
        assert_eq!(days, vec![(3, june(1)), (4, june(2)), (5, june(3))]);

        assert_eq!(summary.hubs(), vec!["North".to_string(), "South".to_string()]);
        let north = summary.row("North").unwrap();
        assert_eq!(north.mtd_sr, Some(91.5));
        let values: Vec<Option<f64>> = north.daily_values(&summary.observation_dates).collect();
        assert_eq!(values, vec![Some(10.0), Some(0.0), Some(20.0)]);

        assert_eq!(loaded.hub_wise.columns, vec!["Hub", "Target", "Achieved"]);
        assert_eq!(loaded.hub_wise.rows.len(), 2);
        assert_eq!(loaded.hub_wise.rows[1][0], text("South"));
    }

    #[test]
    fn loaded_workbook_feeds_the_trend_matrix() {
        let config = fixture_config("Sales Realisation Summary", "Hub Wise Sales Realisation");
        let summary = load_workbook(&config).unwrap().summary;
        let selection = vec!["North".to_string(), "South".to_string()];

        let matrix = crate::reshape::build_trend_matrix(
            &summary.rows,
            &summary.observation_dates,
            &selection,
        );
        let dates: Vec<NaiveDate> = matrix.rows.iter().map(|row| row.date).collect();
        assert_eq!(dates, vec![june(1), june(3)]);
    }

    #[test]
    fn missing_sheet_in_workbook_is_sheet_not_found() {
        let config = fixture_config("Sales Realisation Summary", "Hub Wise (old)");
        match load_workbook(&config) {
            Err(DashboardError::SheetNotFound { sheet, available }) => {
                assert_eq!(sheet, "Hub Wise (old)");
                assert_eq!(
                    available,
                    vec![
                        "Sales Realisation Summary".to_string(),
                        "Hub Wise Sales Realisation".to_string(),
                    ]
                );
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn calamine_cells_are_normalised() {
        assert_eq!(cell_from_data(&Data::Int(4)), Cell::Number(4.0));
        assert_eq!(cell_from_data(&Data::String("  ".to_string())), Cell::Empty);
        assert_eq!(
            cell_from_data(&Data::String(" Hub Name ".to_string())),
            text("Hub Name")
        );
        assert_eq!(cell_from_data(&Data::Bool(true)), text("true"));
    }
}
