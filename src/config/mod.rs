#[cfg(feature = "cli")]
pub mod cli;
pub mod settings;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use settings::{JobKind, Settings};
pub use toml_config::{BrowserConfig, DriverKind, ScrapeConfig};
