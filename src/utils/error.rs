use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("WebDriver command failed: {0}")]
    WebDriverError(#[from] fantoccini::error::CmdError),

    #[error("WebDriver session could not be created: {0}")]
    SessionError(#[from] fantoccini::error::NewSessionError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Workbook error ({path}): {message}")]
    WorkbookError { path: String, message: String },

    #[error("Page load failed for {url}: HTTP {status}")]
    PageLoadError { url: String, status: u16 },

    #[error("Timed out waiting for '{selector}'")]
    TimeoutError { selector: String },

    #[error("Invalid selector '{selector}': {message}")]
    SelectorError { selector: String, message: String },

    #[error("No page loaded in the browser session")]
    NoPageError,

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Browser,
    Network,
    Storage,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ConfigValidationError { .. } | EtlError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            EtlError::WebDriverError(_)
            | EtlError::SessionError(_)
            | EtlError::TimeoutError { .. }
            | EtlError::SelectorError { .. }
            | EtlError::NoPageError => ErrorCategory::Browser,
            EtlError::HttpError(_) | EtlError::PageLoadError { .. } => ErrorCategory::Network,
            EtlError::IoError(_) | EtlError::WorkbookError { .. } | EtlError::CsvError(_) => {
                ErrorCategory::Storage
            }
            EtlError::ProcessingError { .. } => ErrorCategory::Data,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Browser => match self {
                // 無法建立瀏覽器會話時整個流程無法進行
                EtlError::SessionError(_) => ErrorSeverity::Critical,
                _ => ErrorSeverity::Medium,
            },
            ErrorCategory::Configuration | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    /// 單一列的擷取失敗可以略過，其餘錯誤會中止執行
    pub fn is_row_recoverable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Browser | ErrorCategory::Network
        ) && !matches!(self, EtlError::SessionError(_))
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::SessionError(_) => {
                "Start chromedriver (e.g. `chromedriver --port=4444`) or pass --driver http"
            }
            EtlError::WebDriverError(_) | EtlError::TimeoutError { .. } => {
                "The page may have changed or loaded slowly; re-run to retry the remaining rows"
            }
            EtlError::HttpError(_) | EtlError::PageLoadError { .. } => {
                "Check the network connection; rows left incomplete are retried on the next run"
            }
            EtlError::WorkbookError { .. } => {
                "Make sure the workbook exists, is an .xlsx file and is not open in another program"
            }
            EtlError::IoError(_) | EtlError::CsvError(_) => {
                "Check that the output directory exists and is writable"
            }
            EtlError::ConfigValidationError { .. } | EtlError::InvalidConfigValueError { .. } => {
                "Review the command-line flags and the TOML configuration file"
            }
            EtlError::SelectorError { .. } | EtlError::NoPageError => {
                "This is a bug in the extractor tables; please report it"
            }
            EtlError::ProcessingError { .. } => "Inspect the input spreadsheet for unexpected values",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Browser => format!("Browser automation failed: {}", self),
            ErrorCategory::Network => format!("Could not reach the job page: {}", self),
            ErrorCategory::Storage => format!("Could not read or write files: {}", self),
            ErrorCategory::Data => format!("Unexpected data: {}", self),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
