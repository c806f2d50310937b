//! Loaded workbooks kept for the lifetime of the process.
//!
//! An entry is reused while the file's modification time is unchanged.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;

use tracing::debug;

use crate::config::{DashboardConfig, ReportingPeriod};
use crate::error::DashboardResult;
use crate::loader::{load_workbook, workbook_modified};
use crate::models::LoadedWorkbook;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SourceKey {
    path: PathBuf,
    summary_sheet: String,
    hub_wise_sheet: String,
    period: (i32, u32),
}

impl SourceKey {
    fn from_config(config: &DashboardConfig) -> Self {
        let path = config
            .workbook
            .canonicalize()
            .unwrap_or_else(|_| config.workbook.clone());
        let ReportingPeriod { year, month } = config.period;
        Self {
            path,
            summary_sheet: config.summary_sheet.clone(),
            hub_wise_sheet: config.hub_wise_sheet.clone(),
            period: (year, month),
        }
    }
}

#[derive(Debug)]
struct CachedWorkbook {
    modified: SystemTime,
    workbook: Arc<LoadedWorkbook>,
}

#[derive(Debug, Default)]
pub struct WorkbookCache {
    entries: HashMap<SourceKey, CachedWorkbook>,
}

impl WorkbookCache {
    pub fn load(&mut self, config: &DashboardConfig) -> DashboardResult<Arc<LoadedWorkbook>> {
        self.get_or_load_with(config, || load_workbook(config))
    }

    pub fn get_or_load_with<F>(
        &mut self,
        config: &DashboardConfig,
        load: F,
    ) -> DashboardResult<Arc<LoadedWorkbook>>
    where
        F: FnOnce() -> DashboardResult<LoadedWorkbook>,
    {
        let modified = workbook_modified(&config.workbook)?;
        let key = SourceKey::from_config(config);

        if let Some(cached) = self.entries.get(&key) {
            if cached.modified == modified {
                debug!(path = %key.path.display(), "workbook cache hit");
                return Ok(Arc::clone(&cached.workbook));
            }
            debug!(path = %key.path.display(), "workbook changed on disk; reloading");
        }

        let workbook = Arc::new(load()?);
        self.entries.insert(
            key,
            CachedWorkbook {
                modified,
                workbook: Arc::clone(&workbook),
            },
        );
        Ok(workbook)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
