use crate::core::pacing::Pacer;
use crate::domain::model::RunSummary;
use crate::domain::ports::{Browser, BrowserLauncher, Pipeline};
use crate::utils::error::{EtlError, Result};
use crate::utils::monitor::SystemMonitor;
use async_trait::async_trait;
use std::time::Duration;

/// Stands in for a session when no task loads a page; every query fails.
struct NoBrowser;

#[async_trait]
impl Browser for NoBrowser {
    async fn goto(&self, _url: &str) -> Result<()> {
        Err(EtlError::NoPageError)
    }

    async fn wait_for(&self, _selector: &str, _timeout: Duration) -> Result<()> {
        Err(EtlError::NoPageError)
    }

    async fn text(&self, _selector: &str) -> Result<Option<String>> {
        Err(EtlError::NoPageError)
    }

    async fn texts(&self, _selector: &str) -> Result<Vec<String>> {
        Err(EtlError::NoPageError)
    }

    async fn inner_html(&self, _selector: &str) -> Result<Option<String>> {
        Err(EtlError::NoPageError)
    }

    async fn click(&self, _selector: &str) -> Result<bool> {
        Ok(false)
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// Runs a [`Pipeline`] end to end with a single browser session.
pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    pacer: Pacer,
    monitor: SystemMonitor,
    limit: Option<usize>,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P, pacer: Pacer) -> Self {
        Self {
            pipeline,
            pacer,
            monitor: SystemMonitor::new(false),
            limit: None,
        }
    }

    pub fn new_with_monitoring(pipeline: P, pacer: Pacer, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            pacer,
            monitor: SystemMonitor::new(monitor_enabled),
            limit: None,
        }
    }

    /// Processes at most `limit` tasks per run; the rest wait for the next run.
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub fn into_pipeline(self) -> P {
        self.pipeline
    }

    /// Only collects the tasks; no browser is started and nothing is written.
    pub async fn plan(&mut self) -> Result<Vec<P::Task>> {
        let mut tasks = self.pipeline.extract().await?;
        if let Some(limit) = self.limit {
            tasks.truncate(limit);
        }
        Ok(tasks)
    }

    pub async fn run(&mut self, launcher: &dyn BrowserLauncher) -> Result<RunSummary> {
        tracing::info!("🚀 Starting {} run", self.pipeline.name());

        let tasks = self.plan().await?;
        self.monitor.log_stats("Extract");

        let mut summary = RunSummary::new(self.pipeline.name(), tasks.len());

        if tasks.is_empty() {
            tracing::info!("✅ Nothing to process, every row is already complete");
            let location = self.pipeline.finish(&summary).await?;
            tracing::debug!("Finished without changes: {}", location);
            return Ok(summary);
        }

        let browser: Box<dyn Browser> =
            if tasks.iter().any(|task| self.pipeline.needs_browser(task)) {
                tracing::info!("🌐 Setting up browser...");
                launcher.launch().await?
            } else {
                tracing::info!("No row needs a page load, browser not started");
                Box::new(NoBrowser)
            };

        let processed = self.process_all(browser.as_ref(), &tasks, &mut summary).await;

        // 無論成功與否都要關閉瀏覽器
        if let Err(e) = browser.close().await {
            tracing::warn!("⚠️ Failed to close browser session: {}", e);
        }
        processed?;
        self.monitor.log_stats("Process");

        let location = self.pipeline.finish(&summary).await?;
        tracing::info!(
            "✅ Done! Processed {} rows ({} ok, {} skipped, {} failed)",
            summary.processed(),
            summary.succeeded(),
            summary.skipped(),
            summary.failed()
        );
        tracing::info!("📁 Output saved to: {}", location);
        self.monitor.log_final_stats();

        Ok(summary)
    }

    async fn process_all(
        &mut self,
        browser: &dyn Browser,
        tasks: &[P::Task],
        summary: &mut RunSummary,
    ) -> Result<()> {
        let total = tasks.len();

        for (i, task) in tasks.iter().enumerate() {
            let (row, label) = self.pipeline.describe(task);
            tracing::info!("[{}/{}] Processing row {}: {}", i + 1, total, row, label);

            let outcome = self.pipeline.process(browser, task).await?;
            let visited = outcome.visited();
            summary.record(row, label, outcome);

            if visited && i + 1 < total {
                self.pacer.between().await;
            }
        }

        Ok(())
    }
}
