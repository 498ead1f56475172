use crate::config::toml_config::{BrowserConfig, DriverKind, ScrapeConfig, MAX_DELAY_SECS};
use crate::core::pacing::Pacer;
use crate::domain::model::ColumnLayout;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_delay_range, validate_file_extension, validate_non_empty_string, validate_path,
    validate_positive_number, validate_url, Validate,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_WORKBOOK: &str = "Job Tracker.xlsx";
pub const DEFAULT_OUTPUT_DIR: &str = "job_descriptions";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobKind {
    Details,
    Descriptions,
}

impl JobKind {
    pub fn name(&self) -> &'static str {
        match self {
            JobKind::Details => "details",
            JobKind::Descriptions => "descriptions",
        }
    }
}

/// Everything one run needs, after the config file and the command line are merged.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub job: JobKind,
    pub workbook: String,
    pub output_dir: String,
    pub limit: Option<usize>,
    pub dry_run: bool,
    pub report: Option<String>,
    pub monitor: bool,
    pub browser: BrowserConfig,
    pub pacer: Pacer,
    pub layout: ColumnLayout,
}

impl Settings {
    pub fn new(job: JobKind) -> Self {
        let (pacer, layout) = match job {
            JobKind::Details => (Pacer::for_details(), ColumnLayout::details()),
            JobKind::Descriptions => (Pacer::for_descriptions(), ColumnLayout::descriptions()),
        };

        Self {
            job,
            workbook: DEFAULT_WORKBOOK.to_string(),
            output_dir: DEFAULT_OUTPUT_DIR.to_string(),
            limit: None,
            dry_run: false,
            report: None,
            monitor: false,
            browser: BrowserConfig::default(),
            pacer,
            layout,
        }
    }

    /// 套用設定檔的值 (命令列參數之後再覆蓋)
    pub fn with_file(mut self, config: &ScrapeConfig) -> Self {
        self.browser = config.browser.clone();
        self.pacer = config.pacing.apply(self.pacer);
        self.layout = config.columns.apply(self.layout);
        if let Some(workbook) = &config.output.workbook {
            self.workbook = workbook.clone();
        }
        if let Some(dir) = &config.output.dir {
            self.output_dir = dir.clone();
        }
        self
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("workbook", &self.workbook)?;
        validate_file_extension("workbook", &self.workbook, &["xlsx", "xlsm"])?;

        if self.job == JobKind::Descriptions {
            validate_path("output_dir", &self.output_dir)?;
        }

        if let Some(limit) = self.limit {
            validate_positive_number("limit", limit, 1)?;
        }

        if let Some(report) = &self.report {
            validate_file_extension("report", report, &["csv"])?;
        }

        if self.browser.driver == DriverKind::WebDriver && !self.dry_run {
            validate_url("webdriver_url", &self.browser.webdriver_url)?;
        }
        validate_positive_number(
            "browser.page_load_timeout_secs",
            self.browser.page_load_timeout_secs as usize,
            1,
        )?;

        let delays = [
            ("pacing.page_settle", self.pacer.page_settle),
            ("pacing.between_rows", self.pacer.between_rows),
            ("pacing.expand", self.pacer.expand),
        ];
        for (field, range) in delays {
            validate_delay_range(field, range.min_secs, range.max_secs, MAX_DELAY_SECS)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_per_job() {
        let details = Settings::new(JobKind::Details);
        assert_eq!(details.workbook, "Job Tracker.xlsx");
        assert_eq!(details.layout.company.fallback, 4);
        assert_eq!(details.pacer, Pacer::for_details());
        assert!(details.validate().is_ok());

        let descriptions = Settings::new(JobKind::Descriptions);
        assert_eq!(descriptions.output_dir, "job_descriptions");
        assert_eq!(descriptions.layout.company.fallback, 2);
        assert!(descriptions.validate().is_ok());
    }

    #[test]
    fn test_file_values_are_applied() {
        let config = ScrapeConfig::from_toml_str(
            r#"
[browser]
driver = "http"

[columns]
category = "Area"

[output]
workbook = "tracker.xlsm"
dir = "out/descriptions"
"#,
        )
        .unwrap();

        let settings = Settings::new(JobKind::Descriptions).with_file(&config);
        assert_eq!(settings.browser.driver, DriverKind::Http);
        assert_eq!(settings.layout.category.header, "Area");
        assert_eq!(settings.workbook, "tracker.xlsm");
        assert_eq!(settings.output_dir, "out/descriptions");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validation_failures() {
        let mut settings = Settings::new(JobKind::Details);
        settings.workbook = "tracker.csv".to_string();
        assert!(settings.validate().is_err());

        let mut settings = Settings::new(JobKind::Details);
        settings.limit = Some(0);
        assert!(settings.validate().is_err());

        let mut settings = Settings::new(JobKind::Details);
        settings.report = Some("report.txt".to_string());
        assert!(settings.validate().is_err());

        let mut settings = Settings::new(JobKind::Details);
        settings.browser.webdriver_url = "localhost:4444".to_string();
        assert!(settings.validate().is_err());

        // dry runs never open a browser
        settings.dry_run = true;
        assert!(settings.validate().is_ok());
    }
}
