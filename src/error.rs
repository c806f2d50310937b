use std::path::PathBuf;

pub type DashboardResult<T> = Result<T, DashboardError>;

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// The workbook path does not exist.
    #[error("source workbook not found: {}", .path.display())]
    SourceNotFound { path: PathBuf },

    /// A named sheet is missing from the workbook.
    #[error("sheet `{sheet}` not found (available: {})", .available.join(", "))]
    SheetNotFound {
        sheet: String,
        available: Vec<String>,
    },

    /// Required columns are missing or a column label cannot be interpreted.
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    /// Not enough observations to compute an insight.
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    #[error("workbook error: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
