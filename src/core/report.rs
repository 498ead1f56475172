use crate::domain::model::RunSummary;
use crate::utils::error::{EtlError, Result};
use std::path::Path;

pub const REPORT_HEADER: [&str; 5] = ["pipeline", "row", "target", "status", "detail"];

/// Serializes a run summary as CSV, one line per processed row.
pub fn render_csv(summary: &RunSummary) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(REPORT_HEADER)?;

    for row in &summary.rows {
        let row_number = row.row.to_string();
        let detail = row.outcome.detail();
        writer.write_record([
            summary.pipeline.as_str(),
            row_number.as_str(),
            row.target.as_str(),
            row.outcome.status(),
            detail.as_str(),
        ])?;
    }

    let bytes = writer.into_inner().map_err(|e| EtlError::ProcessingError {
        message: format!("Failed to flush CSV report: {}", e),
    })?;
    String::from_utf8(bytes).map_err(|e| EtlError::ProcessingError {
        message: format!("CSV report is not valid UTF-8: {}", e),
    })
}

pub fn write_csv(summary: &RunSummary, path: &Path) -> Result<()> {
    let content = render_csv(summary)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    tracing::info!("🧾 Report written to {}", path.display());
    Ok(())
}
