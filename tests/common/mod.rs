#![allow(dead_code)]

use async_trait::async_trait;
use job_tracker_etl::adapters::browser::document;
use job_tracker_etl::core::{Browser, BrowserLauncher};
use job_tracker_etl::{EtlError, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use umya_spreadsheet::Hyperlink;

/// Serves canned pages and records every URL opened, across sessions.
#[derive(Clone, Default)]
pub struct FixtureLauncher {
    pages: HashMap<String, String>,
    visits: Arc<Mutex<Vec<String>>>,
    launches: Arc<AtomicUsize>,
}

impl FixtureLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }

    pub fn visits(&self) -> Vec<String> {
        self.visits.lock().unwrap().clone()
    }

    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BrowserLauncher for FixtureLauncher {
    async fn launch(&self) -> Result<Box<dyn Browser>> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FixtureBrowser {
            pages: self.pages.clone(),
            visits: self.visits.clone(),
            current: Mutex::new(None),
        }))
    }
}

pub struct FixtureBrowser {
    pages: HashMap<String, String>,
    visits: Arc<Mutex<Vec<String>>>,
    current: Mutex<Option<String>>,
}

impl FixtureBrowser {
    fn page(&self) -> Result<String> {
        self.current.lock().unwrap().clone().ok_or(EtlError::NoPageError)
    }
}

#[async_trait]
impl Browser for FixtureBrowser {
    async fn goto(&self, url: &str) -> Result<()> {
        self.visits.lock().unwrap().push(url.to_string());
        let html = self.pages.get(url).cloned().ok_or_else(|| EtlError::PageLoadError {
            url: url.to_string(),
            status: 404,
        })?;
        *self.current.lock().unwrap() = Some(html);
        Ok(())
    }

    async fn wait_for(&self, selector: &str, _timeout: Duration) -> Result<()> {
        if document::matches(&self.page()?, selector)? {
            Ok(())
        } else {
            Err(EtlError::TimeoutError {
                selector: selector.to_string(),
            })
        }
    }

    async fn text(&self, selector: &str) -> Result<Option<String>> {
        document::first_text(&self.page()?, selector)
    }

    async fn texts(&self, selector: &str) -> Result<Vec<String>> {
        document::all_texts(&self.page()?, selector)
    }

    async fn inner_html(&self, selector: &str) -> Result<Option<String>> {
        document::first_inner_html(&self.page()?, selector)
    }

    async fn click(&self, _selector: &str) -> Result<bool> {
        Ok(false)
    }

    async fn close(&self) -> Result<()> {
        *self.current.lock().unwrap() = None;
        Ok(())
    }
}

/// A cell to seed a test workbook with.
pub enum Seed<'a> {
    Text(&'a str),
    Link(&'a str, &'a str),
}

/// Writes a one-sheet workbook: `headers` in row 1, then one row per entry of `rows`.
pub fn write_workbook(dir: &Path, headers: &[&str], rows: &[Vec<Option<Seed>>]) -> PathBuf {
    let path = dir.join("Job Tracker.xlsx");
    let mut book = umya_spreadsheet::new_file();
    let sheet = book.get_sheet_mut(&0).unwrap();

    for (i, header) in headers.iter().enumerate() {
        sheet.get_cell_mut((i as u32 + 1, 1)).set_value(*header);
    }

    for (r, row) in rows.iter().enumerate() {
        for (c, seed) in row.iter().enumerate() {
            let coordinate = (c as u32 + 1, r as u32 + 2);
            match seed {
                Some(Seed::Text(value)) => {
                    sheet.get_cell_mut(coordinate).set_value(*value);
                }
                Some(Seed::Link(value, url)) => {
                    let mut link = Hyperlink::default();
                    link.set_url(*url);
                    sheet
                        .get_cell_mut(coordinate)
                        .set_value(*value)
                        .set_hyperlink(link);
                }
                None => {}
            }
        }
    }

    umya_spreadsheet::writer::xlsx::write(&book, &path).unwrap();
    path
}

pub fn linkedin_page(title: &str, company: &str, posted: &str, description: &str) -> String {
    format!(
        r#"<html><body>
  <section class="top-card-layout__card">
    <h1 class="top-card-layout__title">{title}</h1>
    <span class="topcard__flavor"><a class="topcard__org-name-link" href="/company/x">{company}</a></span>
    <span class="posted-time-ago__text">{posted}</span>
  </section>
  <div class="show-more-less-html__markup">{description}</div>
</body></html>"#
    )
}
