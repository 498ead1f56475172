use crate::utils::error::{EtlError, Result};
use std::path::Path;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field_name: &str, value: impl ToString, reason: impl Into<String>) -> EtlError {
    EtlError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// WebDriver endpoints are plain http(s) URLs.
pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(invalid(field_name, url_str, "URL cannot be empty"));
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(invalid(
                field_name,
                url_str,
                format!("Unsupported URL scheme: {}", scheme),
            )),
        },
        Err(e) => Err(invalid(
            field_name,
            url_str,
            format!("Invalid URL format: {}", e),
        )),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(invalid(field_name, path, "Path cannot be empty"));
    }
    if path.contains('\0') {
        return Err(invalid(field_name, path, "Path contains null bytes"));
    }
    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(invalid(
            field_name,
            value,
            format!("Value must be at least {}", min_value),
        ));
    }
    Ok(())
}

/// 檔案副檔名檢查 (不分大小寫)
pub fn validate_file_extension(field_name: &str, file: &str, allowed_extensions: &[&str]) -> Result<()> {
    let extension = Path::new(file)
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or_else(|| invalid(field_name, file, "File has no extension or invalid filename"))?;

    if allowed_extensions
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(extension))
    {
        Ok(())
    } else {
        Err(invalid(
            field_name,
            file,
            format!(
                "Unsupported file extension: {}. Allowed extensions: {}",
                extension,
                allowed_extensions.join(", ")
            ),
        ))
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(
            field_name,
            value,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(invalid(
            field_name,
            value,
            format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

/// A `[min, max]` delay in seconds: both bounds within `0..=limit` and `min <= max`.
pub fn validate_delay_range(field_name: &str, min: f64, max: f64, limit: f64) -> Result<()> {
    validate_range(field_name, min, 0.0, limit)?;
    validate_range(field_name, max, 0.0, limit)?;
    if min > max {
        return Err(invalid(
            field_name,
            format!("[{}, {}]", min, max),
            "Minimum must not exceed maximum",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("webdriver_url", "http://localhost:4444").is_ok());
        assert!(validate_url("webdriver_url", "https://grid.example.com/wd/hub").is_ok());
        assert!(validate_url("webdriver_url", "").is_err());
        assert!(validate_url("webdriver_url", "localhost").is_err());
        assert!(validate_url("webdriver_url", "ws://localhost:4444").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("limit", 5, 1).is_ok());
        assert!(validate_positive_number("limit", 0, 1).is_err());
    }

    #[test]
    fn test_validate_file_extension() {
        assert!(validate_file_extension("workbook", "Job Tracker.xlsx", &["xlsx", "xlsm"]).is_ok());
        assert!(validate_file_extension("workbook", "TRACKER.XLSX", &["xlsx", "xlsm"]).is_ok());
        assert!(validate_file_extension("workbook", "Job Tracker.csv", &["xlsx", "xlsm"]).is_err());
        assert!(validate_file_extension("workbook", "tracker", &["xlsx"]).is_err());
    }

    #[test]
    fn test_validate_delay_range() {
        assert!(validate_delay_range("pacing.page_settle", 2.0, 4.0, 300.0).is_ok());
        assert!(validate_delay_range("pacing.page_settle", 0.0, 0.0, 300.0).is_ok());
        assert!(validate_delay_range("pacing.page_settle", -1.0, 4.0, 300.0).is_err());
        assert!(validate_delay_range("pacing.between_rows", 6.0, 3.0, 300.0).is_err());
        assert!(validate_delay_range("pacing.expand", 1.0, 900.0, 300.0).is_err());
    }

    #[test]
    fn test_validate_path_and_strings() {
        assert!(validate_path("output_dir", "job_descriptions").is_ok());
        assert!(validate_path("output_dir", "").is_err());
        assert!(validate_path("output_dir", "bad\0path").is_err());
        assert!(validate_non_empty_string("columns.company", "Company").is_ok());
        assert!(validate_non_empty_string("columns.company", "   ").is_err());
    }
}
