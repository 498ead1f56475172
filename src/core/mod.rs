pub mod catalog;
pub mod etl;
pub mod extractors;
pub mod html_text;
pub mod pacing;
pub mod posted;
pub mod report;
pub mod urls;

pub use crate::domain::model::{RowOutcome, RunSummary, TrackerSheet};
pub use crate::domain::ports::{Browser, BrowserLauncher, Pipeline, Storage, Workbook};
pub use crate::utils::error::Result;
