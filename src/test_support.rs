//! In-memory doubles for the ports, shared by the unit tests.

use crate::adapters::browser::document;
use crate::domain::model::{CellUpdate, SheetCell, SheetRow, TrackerSheet};
use crate::domain::ports::{Browser, Storage, Workbook};
use crate::utils::error::{EtlError, Result};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Serves canned HTML per URL; unknown URLs behave like a 404.
#[derive(Default)]
pub struct FixtureBrowser {
    pages: HashMap<String, String>,
    /// Clicking the selector swaps the current page for this HTML.
    clickable: HashMap<String, String>,
    /// Queries on these selectors time out.
    failing: HashSet<String>,
    current: Mutex<Option<String>>,
    clicks: Mutex<Vec<String>>,
    visits: Mutex<Vec<String>>,
}

impl FixtureBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }

    pub fn with_click(mut self, selector: &str, html_after: &str) -> Self {
        self.clickable
            .insert(selector.to_string(), html_after.to_string());
        self
    }

    pub fn failing_on(mut self, selector: &str) -> Self {
        self.failing.insert(selector.to_string());
        self
    }

    pub async fn clicks(&self) -> Vec<String> {
        self.clicks.lock().await.clone()
    }

    pub async fn visits(&self) -> Vec<String> {
        self.visits.lock().await.clone()
    }

    async fn page(&self) -> Result<String> {
        self.current.lock().await.clone().ok_or(EtlError::NoPageError)
    }

    async fn page_for(&self, selector: &str) -> Result<String> {
        if self.failing.contains(selector) {
            return Err(EtlError::TimeoutError {
                selector: selector.to_string(),
            });
        }
        self.page().await
    }
}

#[async_trait]
impl Browser for FixtureBrowser {
    async fn goto(&self, url: &str) -> Result<()> {
        self.visits.lock().await.push(url.to_string());
        let html = self.pages.get(url).ok_or_else(|| EtlError::PageLoadError {
            url: url.to_string(),
            status: 404,
        })?;
        *self.current.lock().await = Some(html.clone());
        Ok(())
    }

    async fn wait_for(&self, selector: &str, _timeout: Duration) -> Result<()> {
        let html = self.page_for(selector).await?;
        if document::matches(&html, selector)? {
            Ok(())
        } else {
            Err(EtlError::TimeoutError {
                selector: selector.to_string(),
            })
        }
    }

    async fn text(&self, selector: &str) -> Result<Option<String>> {
        document::first_text(&self.page_for(selector).await?, selector)
    }

    async fn texts(&self, selector: &str) -> Result<Vec<String>> {
        document::all_texts(&self.page_for(selector).await?, selector)
    }

    async fn inner_html(&self, selector: &str) -> Result<Option<String>> {
        document::first_inner_html(&self.page_for(selector).await?, selector)
    }

    async fn click(&self, selector: &str) -> Result<bool> {
        let Some(html) = self.clickable.get(selector) else {
            return Ok(false);
        };
        self.clicks.lock().await.push(selector.to_string());
        *self.current.lock().await = Some(html.clone());
        Ok(true)
    }

    async fn close(&self) -> Result<()> {
        *self.current.lock().await = None;
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct MemoryStorage {
    files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn put(&self, path: &str, data: &[u8]) {
        self.files.lock().await.insert(path.to_string(), data.to_vec());
    }

    pub async fn text(&self, path: &str) -> Option<String> {
        let files = self.files.lock().await;
        files
            .get(path)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }
}

impl Storage for MemoryStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let files = self.files.lock().await;
        files.get(path).cloned().ok_or_else(|| {
            EtlError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("File not found: {}", path),
            ))
        })
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        self.files
            .lock()
            .await
            .insert(path.to_string(), data.to_vec());
        Ok(())
    }

    async fn append_file(&self, path: &str, data: &[u8]) -> Result<()> {
        self.files
            .lock()
            .await
            .entry(path.to_string())
            .or_default()
            .extend_from_slice(data);
        Ok(())
    }

    async fn exists(&self, path: &str) -> bool {
        self.files.lock().await.contains_key(path)
    }

    fn location(&self, path: &str) -> String {
        format!("memory://{}", path)
    }
}

pub struct MemoryWorkbook {
    sheet: TrackerSheet,
    saves: usize,
}

impl MemoryWorkbook {
    pub fn new(sheet: TrackerSheet) -> Self {
        Self { sheet, saves: 0 }
    }

    pub fn saves(&self) -> usize {
        self.saves
    }

    pub fn row(&self, row: u32) -> Option<&SheetRow> {
        self.sheet.rows.iter().find(|r| r.row == row)
    }
}

impl Workbook for MemoryWorkbook {
    fn load(&self) -> Result<TrackerSheet> {
        Ok(self.sheet.clone())
    }

    fn apply(&mut self, updates: &[CellUpdate]) -> Result<()> {
        for update in updates {
            let row = update.row();
            let index = match self.sheet.rows.iter().position(|r| r.row == row) {
                Some(index) => index,
                None => {
                    self.sheet.rows.push(SheetRow::new(row));
                    self.sheet.rows.len() - 1
                }
            };
            let cell = match update {
                CellUpdate::Text { value, .. } => SheetCell::text(value.clone()),
                CellUpdate::Number { value, .. } => SheetCell::text(value.to_string()),
                CellUpdate::Link { value, url, .. } => SheetCell::link(value.clone(), url.clone()),
            };
            self.sheet.rows[index].cells.insert(update.column(), cell);
        }
        Ok(())
    }

    fn save(&mut self) -> Result<()> {
        self.saves += 1;
        Ok(())
    }

    fn location(&self) -> String {
        "memory://tracker.xlsx".to_string()
    }
}
