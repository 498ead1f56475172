use crate::domain::model::{CellUpdate, RowOutcome, RunSummary, TrackerSheet};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn append_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn exists(&self, path: &str) -> impl std::future::Future<Output = bool> + Send;
    /// Human-readable location of `path`, used in log lines and return values.
    fn location(&self, path: &str) -> String;
}

/// The spreadsheet the jobs are driven from.
pub trait Workbook: Send + Sync {
    fn load(&self) -> Result<TrackerSheet>;
    fn apply(&mut self, updates: &[CellUpdate]) -> Result<()>;
    fn save(&mut self) -> Result<()>;
    fn location(&self) -> String;
}

/// A single browser session. Element queries use CSS selectors against the
/// page most recently opened with [`Browser::goto`]; "not found" is `Ok(None)`.
#[async_trait]
pub trait Browser: Send + Sync {
    async fn goto(&self, url: &str) -> Result<()>;
    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<()>;
    /// Trimmed text of the first match.
    async fn text(&self, selector: &str) -> Result<Option<String>>;
    /// Trimmed text of every match, in document order.
    async fn texts(&self, selector: &str) -> Result<Vec<String>>;
    async fn inner_html(&self, selector: &str) -> Result<Option<String>>;
    /// Clicks the first match; `Ok(false)` when nothing matched or the page cannot be interacted with.
    async fn click(&self, selector: &str) -> Result<bool>;
    async fn close(&self) -> Result<()>;
}

#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn Browser>>;
}

/// One job: collect tasks from the spreadsheet, process each with the browser, then persist.
#[async_trait]
pub trait Pipeline: Send {
    type Task: Send + Sync;

    fn name(&self) -> &str;
    /// Worksheet row and short label used for progress lines and the report.
    fn describe(&self, task: &Self::Task) -> (u32, String);
    /// Whether processing the task loads a page. A run whose tasks all answer
    /// `false` never starts a browser session.
    fn needs_browser(&self, _task: &Self::Task) -> bool {
        true
    }
    async fn extract(&mut self) -> Result<Vec<Self::Task>>;
    async fn process(&mut self, browser: &dyn Browser, task: &Self::Task) -> Result<RowOutcome>;
    async fn finish(&mut self, summary: &RunSummary) -> Result<String>;
}
