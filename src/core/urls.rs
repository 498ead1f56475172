use crate::domain::model::{SheetCell, SiteKind};
use regex::Regex;
use std::sync::LazyLock;

static LINKEDIN_JOB_PATTERNS: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        Regex::new(r"linkedin\.com/jobs/view/\d+").expect("static pattern"),
        Regex::new(r"linkedin\.com/jobs/search.*currentJobId=\d+").expect("static pattern"),
    ]
});

static LINKEDIN_VIEW_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"linkedin\.com/jobs/view/(\d+)").expect("static pattern"));

static FILENAME_RESERVED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[<>:"/\\|?*]"#).expect("static pattern"));

pub fn is_linkedin_job_url(url: &str) -> bool {
    !url.is_empty() && LINKEDIN_JOB_PATTERNS.iter().any(|re| re.is_match(url))
}

/// Comparison key for a job URL: LinkedIn views collapse to their job id,
/// everything else loses its query string and trailing slash.
pub fn normalize_url(url: &str) -> Option<String> {
    if url.is_empty() {
        return None;
    }

    if let Some(caps) = LINKEDIN_VIEW_ID.captures(url) {
        return Some(format!("linkedin.com/jobs/view/{}", &caps[1]));
    }

    let base = url.split('?').next().unwrap_or(url);
    Some(base.trim_end_matches('/').to_string())
}

impl SiteKind {
    pub fn detect(url: &str) -> Self {
        if url.contains("linkedin.com") {
            SiteKind::LinkedIn
        } else if url.contains("greenhouse.io") {
            SiteKind::Greenhouse
        } else if url.contains("myworkdayjobs.com") || url.contains("workday.com") {
            SiteKind::Workday
        } else if url.contains("lever.co") {
            SiteKind::Lever
        } else if url.contains("oraclecloud.com") {
            SiteKind::Oracle
        } else if url.contains("hrmdirect.com") {
            SiteKind::HrmDirect
        } else {
            SiteKind::Generic
        }
    }
}

pub fn sanitize_filename(name: &str) -> String {
    FILENAME_RESERVED.replace_all(name, "").into_owned()
}

/// URL held by a cell: the hyperlink target wins over the displayed text,
/// and displayed text only counts when it is itself an http(s) URL.
pub fn cell_url(cell: &SheetCell) -> Option<String> {
    if let Some(target) = cell.hyperlink.as_deref().filter(|t| !t.trim().is_empty()) {
        return Some(target.trim().to_string());
    }
    cell.trimmed()
        .filter(|v| v.starts_with("http://") || v.starts_with("https://"))
        .map(str::to_string)
}

/// Shortens a URL for progress lines.
pub fn preview(url: &str, max_chars: usize) -> String {
    if url.chars().count() <= max_chars {
        url.to_string()
    } else {
        let head: String = url.chars().take(max_chars).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_linkedin_job_url() {
        assert!(is_linkedin_job_url(
            "https://www.linkedin.com/jobs/view/3812345678/?refId=abc"
        ));
        assert!(is_linkedin_job_url(
            "https://www.linkedin.com/jobs/search/?keywords=fpga&currentJobId=3812345678"
        ));
        assert!(!is_linkedin_job_url("https://www.linkedin.com/jobs/search/?keywords=fpga"));
        assert!(!is_linkedin_job_url("https://boards.greenhouse.io/acme/jobs/123"));
        assert!(!is_linkedin_job_url(""));
    }

    #[test]
    fn test_normalize_url() {
        assert_eq!(
            normalize_url("https://www.linkedin.com/jobs/view/3812345678/?trackingId=xyz").as_deref(),
            Some("linkedin.com/jobs/view/3812345678")
        );
        assert_eq!(
            normalize_url("https://boards.greenhouse.io/acme/jobs/123/?gh_src=1").as_deref(),
            Some("https://boards.greenhouse.io/acme/jobs/123")
        );
        assert_eq!(normalize_url(""), None);
    }

    #[test]
    fn test_site_kind_detection() {
        assert_eq!(SiteKind::detect("https://www.linkedin.com/jobs/view/1"), SiteKind::LinkedIn);
        assert_eq!(SiteKind::detect("https://boards.greenhouse.io/x"), SiteKind::Greenhouse);
        assert_eq!(
            SiteKind::detect("https://acme.wd5.myworkdayjobs.com/en-US/careers/job/1"),
            SiteKind::Workday
        );
        assert_eq!(SiteKind::detect("https://jobs.lever.co/acme/1"), SiteKind::Lever);
        assert_eq!(SiteKind::detect("https://x.fa.oraclecloud.com/hcm"), SiteKind::Oracle);
        assert_eq!(SiteKind::detect("https://acme.hrmdirect.com/employment/job-opening.php"), SiteKind::HrmDirect);
        assert_eq!(SiteKind::detect("https://careers.acme.com/job/1"), SiteKind::Generic);
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("Digital/Analog: RF?"), "DigitalAnalog RF");
        assert_eq!(sanitize_filename("Mixed-Signal"), "Mixed-Signal");
    }

    #[test]
    fn test_cell_url_prefers_hyperlink() {
        let linked = SheetCell::link("FPGA Engineer", "https://www.linkedin.com/jobs/view/42");
        assert_eq!(
            cell_url(&linked).as_deref(),
            Some("https://www.linkedin.com/jobs/view/42")
        );

        let plain = SheetCell::text(" https://jobs.lever.co/acme/1 ");
        assert_eq!(cell_url(&plain).as_deref(), Some("https://jobs.lever.co/acme/1"));

        assert_eq!(cell_url(&SheetCell::text("FPGA Engineer")), None);
        assert_eq!(cell_url(&SheetCell::default()), None);
    }

    #[test]
    fn test_preview() {
        assert_eq!(preview("short", 10), "short");
        assert_eq!(preview("abcdefghijkl", 5), "abcde...");
    }
}
