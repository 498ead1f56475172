use crate::core::catalog::{
    category_file_name, render_error_log, render_header, CatalogEntry, CategoryIndex, EntryState,
    ERRORS_FILE, NOT_AVAILABLE, NO_DESCRIPTION, TIMESTAMP_FORMAT,
};
use crate::core::extractors::extract_posting;
use crate::core::pacing::Pacer;
use crate::core::urls::{cell_url, is_linkedin_job_url, preview};
use crate::domain::model::{ColumnLayout, RowOutcome, RunSummary, TrackerSheet};
use crate::domain::ports::{Browser, Pipeline, Storage, Workbook};
use crate::utils::error::Result;
use std::collections::{HashMap, HashSet};

/// A tracker row queued for description extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptionTask {
    pub category: String,
    pub file_name: String,
    pub row: u32,
    pub url: Option<String>,
    pub sheet_company: Option<String>,
    pub sheet_title: Option<String>,
    /// The category file already has a SKIPPED/ERROR entry for this URL.
    pub retry: bool,
}

/// Rows of one category in sheet order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRows {
    pub category: String,
    pub rows: Vec<DescriptionTask>,
}

/// Groups rows by their trimmed, non-empty category, keeping first-seen category order.
pub fn group_by_category(sheet: &TrackerSheet, layout: &ColumnLayout) -> Vec<CategoryRows> {
    let category_col = layout.category.resolve(sheet);
    let company_col = layout.company.resolve(sheet);
    let title_col = layout.job_title.resolve(sheet);

    let mut groups: Vec<CategoryRows> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for row in &sheet.rows {
        let Some(category) = row.value(category_col) else {
            continue;
        };

        let task = DescriptionTask {
            category: category.to_string(),
            file_name: category_file_name(category),
            row: row.row,
            url: row.cell(title_col).and_then(cell_url),
            sheet_company: row.value(company_col).map(str::to_string),
            sheet_title: row.value(title_col).map(str::to_string),
            retry: false,
        };

        let index = *positions.entry(category.to_string()).or_insert_with(|| {
            groups.push(CategoryRows {
                category: category.to_string(),
                rows: Vec::new(),
            });
            groups.len() - 1
        });
        groups[index].rows.push(task);
    }

    groups
}

fn timestamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Writes each category's job descriptions to `<category>_jobs.txt`, appending to
/// files from earlier runs and skipping URLs those files already contain.
pub struct DescriptionsPipeline<S: Storage, W: Workbook> {
    storage: S,
    workbook: W,
    layout: ColumnLayout,
    pacer: Pacer,
    categories: Vec<String>,
    existing_files: HashSet<String>,
    started: HashSet<String>,
    errors: Vec<String>,
}

impl<S: Storage, W: Workbook> DescriptionsPipeline<S, W> {
    pub fn new(storage: S, workbook: W, layout: ColumnLayout, pacer: Pacer) -> Self {
        Self {
            storage,
            workbook,
            layout,
            pacer,
            categories: Vec::new(),
            existing_files: HashSet::new(),
            started: HashSet::new(),
            errors: Vec::new(),
        }
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    async fn read_index(&self, file_name: &str) -> CategoryIndex {
        match self.storage.read_file(file_name).await {
            Ok(bytes) => CategoryIndex::parse(&String::from_utf8_lossy(&bytes)),
            Err(e) => {
                tracing::warn!("⚠️ Could not read existing file {}: {}", file_name, e);
                CategoryIndex::default()
            }
        }
    }

    async fn start_category(&mut self, task: &DescriptionTask) -> Result<()> {
        if self.started.contains(&task.category) {
            return Ok(());
        }

        let exists = self.existing_files.contains(&task.file_name);
        tracing::info!("{}", "=".repeat(60));
        tracing::info!("📂 Processing category: {}", task.category);

        let header = render_header(&task.category, exists, &timestamp());
        self.storage
            .append_file(&task.file_name, header.as_bytes())
            .await?;
        self.started.insert(task.category.clone());
        Ok(())
    }

    async fn append(&self, task: &DescriptionTask, entry: CatalogEntry) -> Result<()> {
        self.storage
            .append_file(&task.file_name, entry.render().as_bytes())
            .await
    }
}

#[async_trait::async_trait]
impl<S: Storage, W: Workbook> Pipeline for DescriptionsPipeline<S, W> {
    type Task = DescriptionTask;

    fn name(&self) -> &str {
        "descriptions"
    }

    fn describe(&self, task: &DescriptionTask) -> (u32, String) {
        let label = match &task.url {
            Some(url) => preview(url, 50),
            None => format!("{} (no URL)", task.category),
        };
        (task.row, label)
    }

    fn needs_browser(&self, task: &DescriptionTask) -> bool {
        task.url.is_some()
    }

    async fn extract(&mut self) -> Result<Vec<DescriptionTask>> {
        tracing::info!("📖 Reading {}...", self.workbook.location());
        let sheet = self.workbook.load()?;
        tracing::debug!("Headers found: {:?}", sheet.headers);

        let groups = group_by_category(&sheet, &self.layout);
        let total: usize = groups.iter().map(|g| g.rows.len()).sum();
        let linkedin = groups
            .iter()
            .flat_map(|g| g.rows.iter())
            .filter(|t| t.url.as_deref().is_some_and(is_linkedin_job_url))
            .count();

        tracing::info!(
            "🔍 Found {} jobs across {} categories",
            total,
            groups.len()
        );
        tracing::info!("LinkedIn jobs: {}", linkedin);
        tracing::info!("Non-LinkedIn/No URL: {}", total - linkedin);

        self.categories = groups.iter().map(|g| g.category.clone()).collect();
        tracing::info!("Categories: {:?}", self.categories);

        let mut tasks = Vec::new();
        let (mut already_done, mut retrying) = (0usize, 0usize);

        for group in groups {
            let Some(file_name) = group.rows.first().map(|t| t.file_name.clone()) else {
                continue;
            };

            let index = if self.storage.exists(&file_name).await {
                self.existing_files.insert(file_name.clone());
                self.read_index(&file_name).await
            } else {
                CategoryIndex::default()
            };

            let mut queued = 0usize;
            for mut task in group.rows {
                match index.state_of(task.url.as_deref()) {
                    EntryState::Done => already_done += 1,
                    EntryState::Retry => {
                        task.retry = true;
                        retrying += 1;
                        queued += 1;
                        tasks.push(task);
                    }
                    EntryState::New => {
                        queued += 1;
                        tasks.push(task);
                    }
                }
            }

            if !index.is_empty() {
                tracing::info!(
                    "  {}: {} done, {} skipped (retrying), {} to process",
                    group.category,
                    index.extracted.len(),
                    index.skipped.len(),
                    queued
                );
            }
        }

        tracing::info!(
            "Total: {} jobs already extracted, {} previously skipped (retrying), {} to process",
            already_done,
            retrying,
            tasks.len()
        );

        if tasks.is_empty() {
            tracing::info!("No new jobs to extract. All jobs are already in the text files.");
        }

        Ok(tasks)
    }

    async fn process(
        &mut self,
        browser: &dyn Browser,
        task: &DescriptionTask,
    ) -> Result<RowOutcome> {
        self.start_category(task).await?;

        let company = task.sheet_company.as_deref().unwrap_or(NOT_AVAILABLE);
        let job_title = task.sheet_title.as_deref().unwrap_or(NOT_AVAILABLE);

        let Some(url) = task.url.as_deref() else {
            let message = format!("Row {}: No URL", task.row);
            tracing::warn!("  Skipping: {}", message);
            self.errors.push(message);
            self.append(
                task,
                CatalogEntry::Status {
                    company: company.to_string(),
                    job_title: job_title.to_string(),
                    url: None,
                    status: "SKIPPED - No URL".to_string(),
                },
            )
            .await?;
            return Ok(RowOutcome::Skipped("No URL".to_string()));
        };

        tracing::info!("  URL: {}", preview(url, 50));

        match extract_posting(browser, url, &self.pacer).await {
            Ok(posting) => {
                let company = posting.company.as_deref().unwrap_or(company).to_string();
                let job_title = posting.job_title.as_deref().unwrap_or(job_title).to_string();
                let description = posting
                    .description
                    .unwrap_or_else(|| NO_DESCRIPTION.to_string());

                tracing::info!("  Company: {}", company);
                tracing::info!("  Title: {}", job_title);
                tracing::info!("  Description: {} chars", description.chars().count());

                self.append(
                    task,
                    CatalogEntry::Description {
                        company,
                        job_title,
                        url: url.to_string(),
                        description,
                    },
                )
                .await?;
                Ok(RowOutcome::Extracted)
            }
            Err(e) if e.is_row_recoverable() => {
                tracing::warn!("  ❌ ERROR: Failed to extract: {}", e);
                self.errors.push(format!(
                    "Row {}: Failed to extract - {}",
                    task.row,
                    preview(url, 50)
                ));
                self.append(
                    task,
                    CatalogEntry::Status {
                        company: company.to_string(),
                        job_title: job_title.to_string(),
                        url: Some(url.to_string()),
                        status: "ERROR - Failed to extract description".to_string(),
                    },
                )
                .await?;
                Ok(RowOutcome::Failed(e.to_string()))
            }
            Err(e) => Err(e),
        }
    }

    async fn finish(&mut self, summary: &RunSummary) -> Result<String> {
        if !self.errors.is_empty() {
            let log = render_error_log(&self.errors, &timestamp());
            self.storage.write_file(ERRORS_FILE, log.as_bytes()).await?;
            tracing::warn!(
                "⚠️ {} errors logged to {}",
                self.errors.len(),
                self.storage.location(ERRORS_FILE)
            );
        }

        tracing::debug!(
            "Descriptions run finished: {} extracted of {} planned",
            summary.succeeded(),
            summary.planned
        );
        tracing::info!("Output files for categories: {:?}", self.categories);
        Ok(self.storage.location(""))
    }
}
