//! Per-category description files.
//!
//! Each category gets `<category>_jobs.txt`. Entries are separated by a line of
//! dashes; the URL line of each entry is how later runs know what is already done.

use crate::core::urls::{normalize_url, sanitize_filename};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

pub const ENTRY_DELIMITER_WIDTH: usize = 40;
pub const HEADER_RULE_WIDTH: usize = 60;
pub const ERRORS_FILE: &str = "extraction_errors.txt";
pub const NOT_AVAILABLE: &str = "N/A";
pub const NO_DESCRIPTION: &str = "No description available";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

static ENTRY_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-{40,}").expect("static pattern"));
static ENTRY_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"URL: (https?://\S+)").expect("static pattern"));

pub fn category_file_name(category: &str) -> String {
    format!("{}_jobs.txt", sanitize_filename(category))
}

/// Normalized URLs already present in a category file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryIndex {
    pub extracted: HashSet<String>,
    pub skipped: HashSet<String>,
}

/// What to do with a row given the category file's index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    Done,
    Retry,
    New,
}

impl CategoryIndex {
    pub fn parse(content: &str) -> Self {
        let mut index = Self::default();

        for entry in ENTRY_SPLIT.split(content) {
            let Some(caps) = ENTRY_URL.captures(entry) else {
                continue;
            };
            let Some(key) = normalize_url(&caps[1]) else {
                continue;
            };

            if entry.contains("Status: SKIPPED") || entry.contains("Status: ERROR") {
                index.skipped.insert(key);
            } else {
                index.extracted.insert(key);
            }
        }

        index
    }

    pub fn state_of(&self, url: Option<&str>) -> EntryState {
        match url.and_then(normalize_url) {
            Some(key) if self.extracted.contains(&key) => EntryState::Done,
            Some(key) if self.skipped.contains(&key) => EntryState::Retry,
            _ => EntryState::New,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.extracted.is_empty() && self.skipped.is_empty()
    }
}

/// A record appended to a category file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogEntry {
    Description {
        company: String,
        job_title: String,
        url: String,
        description: String,
    },
    Status {
        company: String,
        job_title: String,
        url: Option<String>,
        status: String,
    },
}

impl CatalogEntry {
    pub fn render(&self) -> String {
        let delimiter = "-".repeat(ENTRY_DELIMITER_WIDTH);
        match self {
            CatalogEntry::Description {
                company,
                job_title,
                url,
                description,
            } => format!(
                "Company: {}\nJob Title: {}\nURL: {}\n\n{}\n\n{}\n\n",
                company, job_title, url, description, delimiter
            ),
            CatalogEntry::Status {
                company,
                job_title,
                url,
                status,
            } => format!(
                "Company: {}\nJob Title: {}\nURL: {}\nStatus: {}\n\n{}\n\n",
                company,
                job_title,
                url.as_deref().unwrap_or(NOT_AVAILABLE),
                status,
                delimiter
            ),
        }
    }
}

/// Header written once per category per run; `timestamp` is already formatted.
pub fn render_header(category: &str, file_exists: bool, timestamp: &str) -> String {
    let rule = "=".repeat(HEADER_RULE_WIDTH);
    if file_exists {
        format!("\n{}\nAppended: {}\n{}\n\n", rule, timestamp, rule)
    } else {
        format!(
            "{}\nCategory: {}\nGenerated: {}\n{}\n\n",
            rule, category, timestamp, rule
        )
    }
}

pub fn render_error_log(errors: &[String], timestamp: &str) -> String {
    let mut out = format!(
        "Extraction Errors - {}\n{}\n\n",
        timestamp,
        "=".repeat(HEADER_RULE_WIDTH)
    );
    for error in errors {
        out.push_str(error);
        out.push('\n');
    }
    out
}
