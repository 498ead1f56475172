pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(test)]
mod test_support;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{LocalStorage, XlsxWorkbook};
pub use app::pipelines::{DescriptionsPipeline, DetailsPipeline};
pub use config::{JobKind, ScrapeConfig, Settings};
pub use core::etl::EtlEngine;
pub use utils::error::{EtlError, Result};
