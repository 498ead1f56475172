use crate::core::extractors::linkedin_details;
use crate::core::pacing::Pacer;
use crate::core::urls::{cell_url, is_linkedin_job_url, preview};
use crate::domain::model::{
    CellUpdate, ColumnLayout, JobDetails, MissingFields, RowOutcome, RunSummary, TrackerSheet,
};
use crate::domain::ports::{Browser, Pipeline, Workbook};
use crate::utils::error::Result;

/// A LinkedIn row that still lacks at least one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailsTask {
    pub row: u32,
    pub url: String,
    pub missing: MissingFields,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailsColumns {
    pub link: u32,
    pub company: u32,
    pub job_title: u32,
    pub days_ago: u32,
}

impl DetailsColumns {
    pub fn resolve(layout: &ColumnLayout, sheet: &TrackerSheet) -> Self {
        Self {
            link: layout.link.resolve(sheet),
            company: layout.company.resolve(sheet),
            job_title: layout.job_title.resolve(sheet),
            days_ago: layout.days_ago.resolve(sheet),
        }
    }
}

/// Finds every LinkedIn row with an empty company, title or days cell.
pub fn find_incomplete_rows(sheet: &TrackerSheet, columns: &DetailsColumns) -> Vec<DetailsTask> {
    sheet
        .rows
        .iter()
        .filter_map(|row| {
            let url = row.cell(columns.link).and_then(cell_url)?;
            if !is_linkedin_job_url(&url) {
                return None;
            }

            let missing = MissingFields {
                company: row.value(columns.company).is_none(),
                job_title: row.value(columns.job_title).is_none(),
                days_ago: row.value(columns.days_ago).is_none(),
            };

            missing.any().then(|| DetailsTask {
                row: row.row,
                url,
                missing,
            })
        })
        .collect()
}

/// Cell writes for the fields that were missing and that the page provided.
/// Existing values are never overwritten.
pub fn plan_updates(
    task: &DetailsTask,
    details: &JobDetails,
    columns: &DetailsColumns,
) -> Vec<CellUpdate> {
    let mut updates = Vec::new();

    if let Some(company) = details.company.as_ref().filter(|_| task.missing.company) {
        updates.push(CellUpdate::Text {
            row: task.row,
            column: columns.company,
            value: company.clone(),
        });
    }

    if let Some(title) = details.job_title.as_ref().filter(|_| task.missing.job_title) {
        updates.push(CellUpdate::Link {
            row: task.row,
            column: columns.job_title,
            value: title.clone(),
            url: task.url.clone(),
        });
    }

    if let Some(days) = details.days_ago.filter(|_| task.missing.days_ago) {
        updates.push(CellUpdate::Number {
            row: task.row,
            column: columns.days_ago,
            value: f64::from(days),
        });
    }

    updates
}

fn field_name(update: &CellUpdate, columns: &DetailsColumns) -> String {
    match update.column() {
        c if c == columns.company => "company".to_string(),
        c if c == columns.job_title => "job title".to_string(),
        c if c == columns.days_ago => "days ago".to_string(),
        c => format!("column {}", c),
    }
}

/// Fills Company / Job Title / How long ago (Days) for LinkedIn rows.
/// The workbook is saved after every row that changed, so a crash loses at most one row.
pub struct DetailsPipeline<W: Workbook> {
    workbook: W,
    layout: ColumnLayout,
    pacer: Pacer,
    columns: Option<DetailsColumns>,
    dirty: bool,
}

impl<W: Workbook> DetailsPipeline<W> {
    pub fn new(workbook: W, layout: ColumnLayout, pacer: Pacer) -> Self {
        Self {
            workbook,
            layout,
            pacer,
            columns: None,
            dirty: false,
        }
    }

    pub fn workbook(&self) -> &W {
        &self.workbook
    }

    fn columns(&mut self) -> Result<DetailsColumns> {
        if let Some(columns) = self.columns {
            return Ok(columns);
        }
        let sheet = self.workbook.load()?;
        let columns = DetailsColumns::resolve(&self.layout, &sheet);
        self.columns = Some(columns);
        Ok(columns)
    }
}

#[async_trait::async_trait]
impl<W: Workbook> Pipeline for DetailsPipeline<W> {
    type Task = DetailsTask;

    fn name(&self) -> &str {
        "details"
    }

    fn describe(&self, task: &DetailsTask) -> (u32, String) {
        (task.row, preview(&task.url, 60))
    }

    async fn extract(&mut self) -> Result<Vec<DetailsTask>> {
        tracing::info!("📖 Reading {}...", self.workbook.location());
        let sheet = self.workbook.load()?;
        tracing::debug!("Headers found: {:?}", sheet.headers);
        tracing::info!("Total rows: {}", sheet.row_count() + 1);

        let columns = DetailsColumns::resolve(&self.layout, &sheet);
        self.columns = Some(columns);

        let tasks = find_incomplete_rows(&sheet, &columns);
        tracing::info!(
            "🔍 Found {} rows with LinkedIn URLs that need processing",
            tasks.len()
        );

        for task in tasks.iter().take(10) {
            tracing::info!(
                "  Row {}: {} (missing {})",
                task.row,
                preview(&task.url, 60),
                task.missing.describe()
            );
        }
        if tasks.len() > 10 {
            tracing::info!("  ... and {} more", tasks.len() - 10);
        }

        Ok(tasks)
    }

    async fn process(&mut self, browser: &dyn Browser, task: &DetailsTask) -> Result<RowOutcome> {
        let columns = self.columns()?;

        let details = match linkedin_details(browser, &task.url, &self.pacer).await {
            Ok(details) => details,
            Err(e) if e.is_row_recoverable() => {
                tracing::warn!("  ❌ Failed to extract details: {}", e);
                return Ok(RowOutcome::Failed(e.to_string()));
            }
            Err(e) => return Err(e),
        };

        let updates = plan_updates(task, &details, &columns);
        if updates.is_empty() {
            tracing::warn!("  ❌ Page did not provide any of: {}", task.missing.describe());
            return Ok(RowOutcome::Failed(format!(
                "not found on page: {}",
                task.missing.describe()
            )));
        }

        for update in &updates {
            match update {
                CellUpdate::Text { value, .. } => tracing::info!("  Company: {}", value),
                CellUpdate::Link { value, .. } => {
                    tracing::info!("  Job Title: {} (with hyperlink)", value)
                }
                CellUpdate::Number { value, .. } => tracing::info!("  Days ago: {}", value),
            }
        }

        self.workbook.apply(&updates)?;
        self.dirty = true;
        self.workbook.save()?;
        self.dirty = false;
        tracing::info!("  💾 Saved to file.");

        Ok(RowOutcome::Filled(
            updates.iter().map(|u| field_name(u, &columns)).collect(),
        ))
    }

    async fn finish(&mut self, summary: &RunSummary) -> Result<String> {
        if self.dirty {
            self.workbook.save()?;
            self.dirty = false;
        }
        tracing::debug!(
            "Details run finished: {} filled of {} planned",
            summary.succeeded(),
            summary.planned
        );
        Ok(self.workbook.location())
    }
}
