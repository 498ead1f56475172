use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// One worksheet cell: its display value and, when present, the hyperlink target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetCell {
    pub value: Option<String>,
    pub hyperlink: Option<String>,
}

impl SheetCell {
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            hyperlink: None,
        }
    }

    pub fn link(value: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            hyperlink: Some(url.into()),
        }
    }

    /// Trimmed value, `None` when the cell is blank.
    pub fn trimmed(&self) -> Option<&str> {
        self.value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    pub fn is_blank(&self) -> bool {
        self.trimmed().is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetRow {
    /// 1-based worksheet row number
    pub row: u32,
    pub cells: BTreeMap<u32, SheetCell>,
}

impl SheetRow {
    pub fn new(row: u32) -> Self {
        Self {
            row,
            cells: BTreeMap::new(),
        }
    }

    pub fn with_cell(mut self, column: u32, cell: SheetCell) -> Self {
        self.cells.insert(column, cell);
        self
    }

    pub fn cell(&self, column: u32) -> Option<&SheetCell> {
        self.cells.get(&column)
    }

    pub fn value(&self, column: u32) -> Option<&str> {
        self.cell(column).and_then(SheetCell::trimmed)
    }
}

/// In-memory view of the tracker worksheet: header names and the data rows below them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerSheet {
    pub headers: HashMap<String, u32>,
    pub rows: Vec<SheetRow>,
}

impl TrackerSheet {
    pub fn column(&self, header: &str, fallback: u32) -> u32 {
        self.headers.get(header).copied().unwrap_or(fallback)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Header name plus the column used when the header is absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub header: String,
    pub fallback: u32,
}

impl ColumnSpec {
    pub fn new(header: &str, fallback: u32) -> Self {
        Self {
            header: header.to_string(),
            fallback,
        }
    }

    pub fn resolve(&self, sheet: &TrackerSheet) -> u32 {
        sheet.column(&self.header, self.fallback)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnLayout {
    pub category: ColumnSpec,
    pub link: ColumnSpec,
    pub company: ColumnSpec,
    pub job_title: ColumnSpec,
    pub days_ago: ColumnSpec,
}

impl ColumnLayout {
    /// Layout of the details sheet: link in B, company D, title E, days F.
    pub fn details() -> Self {
        Self {
            category: ColumnSpec::new("Category", 1),
            link: ColumnSpec::new("Link", 2),
            company: ColumnSpec::new("Company", 4),
            job_title: ColumnSpec::new("Job Title", 5),
            days_ago: ColumnSpec::new("How long ago (Days)", 6),
        }
    }

    /// Layout of the tracker used for descriptions: category A, company B, linked title C.
    pub fn descriptions() -> Self {
        Self {
            category: ColumnSpec::new("Category", 1),
            link: ColumnSpec::new("Link", 2),
            company: ColumnSpec::new("Company", 2),
            job_title: ColumnSpec::new("Job Title", 3),
            days_ago: ColumnSpec::new("How long ago (Days)", 6),
        }
    }
}

/// Which of the tracked fields a row still lacks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingFields {
    pub company: bool,
    pub job_title: bool,
    pub days_ago: bool,
}

impl MissingFields {
    pub fn any(&self) -> bool {
        self.company || self.job_title || self.days_ago
    }

    pub fn describe(&self) -> String {
        let mut names = Vec::new();
        if self.company {
            names.push("company");
        }
        if self.job_title {
            names.push("job title");
        }
        if self.days_ago {
            names.push("days ago");
        }
        names.join(", ")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDetails {
    pub company: Option<String>,
    pub job_title: Option<String>,
    pub days_ago: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPosting {
    pub company: Option<String>,
    pub job_title: Option<String>,
    pub description: Option<String>,
}

/// A single write against the workbook. Rows and columns are 1-based.
#[derive(Debug, Clone, PartialEq)]
pub enum CellUpdate {
    Text { row: u32, column: u32, value: String },
    Number { row: u32, column: u32, value: f64 },
    Link { row: u32, column: u32, value: String, url: String },
}

impl CellUpdate {
    pub fn row(&self) -> u32 {
        match self {
            CellUpdate::Text { row, .. }
            | CellUpdate::Number { row, .. }
            | CellUpdate::Link { row, .. } => *row,
        }
    }

    pub fn column(&self) -> u32 {
        match self {
            CellUpdate::Text { column, .. }
            | CellUpdate::Number { column, .. }
            | CellUpdate::Link { column, .. } => *column,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteKind {
    LinkedIn,
    Greenhouse,
    Workday,
    Lever,
    Oracle,
    HrmDirect,
    Generic,
}

impl fmt::Display for SiteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SiteKind::LinkedIn => "linkedin",
            SiteKind::Greenhouse => "greenhouse",
            SiteKind::Workday => "workday",
            SiteKind::Lever => "lever",
            SiteKind::Oracle => "oracle",
            SiteKind::HrmDirect => "hrmdirect",
            SiteKind::Generic => "generic",
        };
        f.write_str(name)
    }
}

/// Result of processing one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "lowercase")]
pub enum RowOutcome {
    /// Spreadsheet cells were written.
    Filled(Vec<String>),
    /// A description entry was written.
    Extracted,
    /// Nothing to fetch (e.g. no URL); the browser was not used.
    Skipped(String),
    /// The page was visited but extraction failed.
    Failed(String),
}

impl RowOutcome {
    pub fn status(&self) -> &'static str {
        match self {
            RowOutcome::Filled(_) => "filled",
            RowOutcome::Extracted => "extracted",
            RowOutcome::Skipped(_) => "skipped",
            RowOutcome::Failed(_) => "failed",
        }
    }

    pub fn detail(&self) -> String {
        match self {
            RowOutcome::Filled(fields) => fields.join(", "),
            RowOutcome::Extracted => String::new(),
            RowOutcome::Skipped(reason) | RowOutcome::Failed(reason) => reason.clone(),
        }
    }

    /// Whether the browser loaded a page for this task, which is what pacing applies to.
    pub fn visited(&self) -> bool {
        !matches!(self, RowOutcome::Skipped(_))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RowOutcome::Filled(_) | RowOutcome::Extracted)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedRow {
    pub row: u32,
    pub target: String,
    pub outcome: RowOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub pipeline: String,
    pub planned: usize,
    pub rows: Vec<ProcessedRow>,
}

impl RunSummary {
    pub fn new(pipeline: impl Into<String>, planned: usize) -> Self {
        Self {
            pipeline: pipeline.into(),
            planned,
            rows: Vec::new(),
        }
    }

    pub fn record(&mut self, row: u32, target: impl Into<String>, outcome: RowOutcome) {
        self.rows.push(ProcessedRow {
            row,
            target: target.into(),
            outcome,
        });
    }

    pub fn processed(&self) -> usize {
        self.rows.len()
    }

    pub fn succeeded(&self) -> usize {
        self.rows.iter().filter(|r| r.outcome.is_success()).count()
    }

    pub fn skipped(&self) -> usize {
        self.rows
            .iter()
            .filter(|r| matches!(r.outcome, RowOutcome::Skipped(_)))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.rows
            .iter()
            .filter(|r| matches!(r.outcome, RowOutcome::Failed(_)))
            .count()
    }
}
