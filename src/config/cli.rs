use crate::config::settings::{JobKind, Settings};
use crate::config::toml_config::{DriverKind, ScrapeConfig};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "job-tracker-etl")]
#[command(about = "Fill a job tracker workbook and collect job descriptions from LinkedIn")]
pub struct CliConfig {
    #[arg(short, long, global = true, help = "TOML configuration file")]
    pub config: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[arg(long, global = true, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,

    #[arg(long, global = true, value_enum)]
    pub driver: Option<DriverKind>,

    #[arg(long, global = true, help = "WebDriver endpoint, e.g. http://localhost:4444")]
    pub webdriver_url: Option<String>,

    #[arg(long, global = true, help = "Run Chrome without a window")]
    pub headless: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Fill missing company, job title and days-ago cells in the workbook
    Details(JobArgs),
    /// Write the job descriptions of every category to text files
    Descriptions(DescriptionArgs),
}

#[derive(Debug, Clone, Args)]
pub struct JobArgs {
    #[arg(short, long, help = "Tracker workbook (.xlsx)")]
    pub workbook: Option<String>,

    #[arg(long, help = "Process at most this many rows")]
    pub limit: Option<usize>,

    #[arg(long, help = "List the rows that would be processed and exit")]
    pub dry_run: bool,

    #[arg(long, help = "Write a CSV report of the processed rows")]
    pub report: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct DescriptionArgs {
    #[command(flatten)]
    pub job: JobArgs,

    #[arg(short, long, help = "Directory for the <category>_jobs.txt files")]
    pub output_dir: Option<String>,
}

impl CliConfig {
    pub fn job(&self) -> JobKind {
        match self.command {
            Command::Details(_) => JobKind::Details,
            Command::Descriptions(_) => JobKind::Descriptions,
        }
    }

    fn job_args(&self) -> &JobArgs {
        match &self.command {
            Command::Details(args) => args,
            Command::Descriptions(args) => &args.job,
        }
    }

    /// 合併設定檔與命令列參數，命令列優先
    pub fn resolve(&self) -> Result<Settings> {
        let mut settings = Settings::new(self.job());

        if let Some(path) = &self.config {
            tracing::info!("📄 Loading configuration from {}", path);
            let file = ScrapeConfig::from_file(path)?;
            file.validate()?;
            settings = settings.with_file(&file);
        }

        let args = self.job_args();
        if let Some(workbook) = &args.workbook {
            settings.workbook = workbook.clone();
        }
        if let Command::Descriptions(DescriptionArgs {
            output_dir: Some(dir),
            ..
        }) = &self.command
        {
            settings.output_dir = dir.clone();
        }
        settings.limit = args.limit.or(settings.limit);
        settings.dry_run = args.dry_run;
        settings.report = args.report.clone();
        settings.monitor = self.monitor;

        if let Some(driver) = self.driver {
            settings.browser.driver = driver;
        }
        if let Some(url) = &self.webdriver_url {
            settings.browser.webdriver_url = url.clone();
        }
        if self.headless {
            settings.browser.headless = true;
        }

        settings.validate()?;
        Ok(settings)
    }
}
