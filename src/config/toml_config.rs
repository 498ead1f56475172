use crate::core::pacing::{DelayRange, Pacer};
use crate::domain::model::ColumnLayout;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{
    validate_delay_range, validate_non_empty_string, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:4444";
pub const MAX_DELAY_SECS: f64 = 300.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum DriverKind {
    /// Drive Chrome through a WebDriver endpoint (chromedriver)
    #[default]
    #[serde(alias = "chrome")]
    #[cfg_attr(feature = "cli", value(name = "webdriver"))]
    WebDriver,
    /// Plain HTTP GET of the server-rendered page
    Http,
}

/// Optional TOML configuration file. Every table and key may be omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    pub browser: BrowserConfig,
    pub pacing: PacingConfig,
    pub columns: ColumnsConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub driver: DriverKind,
    pub webdriver_url: String,
    pub headless: bool,
    pub user_agent: String,
    pub window_width: u32,
    pub window_height: u32,
    pub page_load_timeout_secs: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            driver: DriverKind::WebDriver,
            webdriver_url: DEFAULT_WEBDRIVER_URL.to_string(),
            headless: false,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            window_width: 1920,
            window_height: 1080,
            page_load_timeout_secs: 30,
        }
    }
}

impl BrowserConfig {
    pub fn page_load_timeout(&self) -> Duration {
        Duration::from_secs(self.page_load_timeout_secs)
    }
}

/// Delay ranges in seconds as `[min, max]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    pub page_settle: Option<[f64; 2]>,
    pub between_rows: Option<[f64; 2]>,
    pub expand: Option<[f64; 2]>,
    pub linkedin_timeout_secs: Option<u64>,
    pub site_timeout_secs: Option<u64>,
}

impl PacingConfig {
    pub fn apply(&self, base: Pacer) -> Pacer {
        let range = |r: Option<[f64; 2]>, fallback: DelayRange| {
            r.map(|[min, max]| DelayRange::new(min, max))
                .unwrap_or(fallback)
        };

        Pacer {
            page_settle: range(self.page_settle, base.page_settle),
            between_rows: range(self.between_rows, base.between_rows),
            expand: range(self.expand, base.expand),
            linkedin_timeout: self
                .linkedin_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(base.linkedin_timeout),
            site_timeout: self
                .site_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(base.site_timeout),
        }
    }

    fn ranges(&self) -> [(&'static str, Option<[f64; 2]>); 3] {
        [
            ("pacing.page_settle", self.page_settle),
            ("pacing.between_rows", self.between_rows),
            ("pacing.expand", self.expand),
        ]
    }
}

/// Header-name overrides for the tracker columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnsConfig {
    pub category: Option<String>,
    pub link: Option<String>,
    pub company: Option<String>,
    pub job_title: Option<String>,
    pub days_ago: Option<String>,
}

impl ColumnsConfig {
    pub fn apply(&self, mut layout: ColumnLayout) -> ColumnLayout {
        let overrides = [
            (&self.category, &mut layout.category),
            (&self.link, &mut layout.link),
            (&self.company, &mut layout.company),
            (&self.job_title, &mut layout.job_title),
            (&self.days_ago, &mut layout.days_ago),
        ];
        for (name, column) in overrides {
            if let Some(name) = name {
                column.header = name.clone();
            }
        }
        layout
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: Option<String>,
    pub workbook: Option<String>,
}

impl ScrapeConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${WEBDRIVER_URL})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        use std::sync::LazyLock;

        static ENV_VAR: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("static pattern"));

        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }
}

impl Validate for ScrapeConfig {
    fn validate(&self) -> Result<()> {
        if self.browser.driver == DriverKind::WebDriver {
            validate_url("browser.webdriver_url", &self.browser.webdriver_url)?;
        }
        validate_non_empty_string("browser.user_agent", &self.browser.user_agent)?;

        for (field, range) in self.pacing.ranges() {
            if let Some([min, max]) = range {
                validate_delay_range(field, min, max, MAX_DELAY_SECS)?;
            }
        }

        let headers = [
            ("columns.category", &self.columns.category),
            ("columns.link", &self.columns.link),
            ("columns.company", &self.columns.company),
            ("columns.job_title", &self.columns.job_title),
            ("columns.days_ago", &self.columns.days_ago),
        ];
        for (field, header) in headers {
            if let Some(header) = header {
                validate_non_empty_string(field, header)?;
            }
        }

        Ok(())
    }
}
