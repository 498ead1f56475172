mod common;

use common::{linkedin_page, write_workbook, Seed};
use httpmock::prelude::*;
use job_tracker_etl::adapters::browser::{HttpBrowser, HttpLauncher};
use job_tracker_etl::core::extractors::{extract_posting, linkedin_details};
use job_tracker_etl::core::pacing::Pacer;
use job_tracker_etl::core::Browser;
use job_tracker_etl::domain::model::ColumnLayout;
use job_tracker_etl::{DescriptionsPipeline, EtlEngine, EtlError, LocalStorage, XlsxWorkbook};
use std::time::Duration;
use tempfile::TempDir;

const USER_AGENT: &str = "job-tracker-test/1.0";

const CAREERS_PAGE: &str = r#"<html><body>
  <nav><a href="/">Home</a></nav>
  <h1 class="posting-title">Mixed-Signal Verification Engineer</h1>
  <div class="company-name">Umbrella Semiconductors</div>
  <div class="job-description">
    <p>Join the mixed-signal team verifying PLLs and data converters.</p>
    <ul><li>Real-number modeling</li><li>Coverage closure</li></ul>
  </div>
</body></html>"#;

fn browser() -> HttpBrowser {
    HttpBrowser::new(USER_AGENT, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_linkedin_details_over_http() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/jobs/view/301")
                .header("user-agent", USER_AGENT);
            then.status(200)
                .header("content-type", "text/html")
                .body(linkedin_page(
                    "Staff DFT Engineer",
                    "Hooli",
                    "Reposted 3 days ago",
                    "<p>Scan insertion.</p>",
                ));
        })
        .await;

    let browser = browser();
    let details = linkedin_details(&browser, &server.url("/jobs/view/301"), &Pacer::immediate())
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(details.job_title.as_deref(), Some("Staff DFT Engineer"));
    assert_eq!(details.company.as_deref(), Some("Hooli"));
    assert_eq!(details.days_ago, Some(3));
    assert_eq!(
        browser.current_url().await,
        Some(server.url("/jobs/view/301"))
    );
}

#[tokio::test]
async fn test_generic_posting_over_http() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/careers/42");
            then.status(200).body(CAREERS_PAGE);
        })
        .await;

    let posting = extract_posting(&browser(), &server.url("/careers/42"), &Pacer::immediate())
        .await
        .unwrap();

    assert_eq!(
        posting.job_title.as_deref(),
        Some("Mixed-Signal Verification Engineer")
    );
    assert_eq!(posting.company.as_deref(), Some("Umbrella Semiconductors"));
    let description = posting.description.unwrap();
    assert!(description.starts_with("Join the mixed-signal team"));
    assert!(description.contains("• Coverage closure"));
}

#[tokio::test]
async fn test_missing_page_is_a_page_load_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/jobs/view/404");
            then.status(404).body("gone");
        })
        .await;

    let browser = browser();
    let err = browser
        .goto(&server.url("/jobs/view/404"))
        .await
        .unwrap_err();

    assert!(matches!(err, EtlError::PageLoadError { status: 404, .. }));
    assert!(err.is_row_recoverable());
    assert!(browser.current_url().await.is_none());
    assert!(matches!(
        browser.text("h1").await.unwrap_err(),
        EtlError::NoPageError
    ));
}

#[tokio::test]
async fn test_descriptions_run_with_http_launcher() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    let page = server
        .mock_async(|when, then| {
            when.method(GET).path("/careers/42");
            then.status(200).body(CAREERS_PAGE);
        })
        .await;

    let dir = TempDir::new()?;
    let url = server.url("/careers/42");
    let workbook = write_workbook(
        dir.path(),
        &["Category", "Company", "Job Title"],
        &[vec![
            Some(Seed::Text("Mixed Signal")),
            Some(Seed::Text("Umbrella")),
            Some(Seed::Link("Verification", &url)),
        ]],
    );
    let output = dir.path().join("out");

    let pipeline = DescriptionsPipeline::new(
        LocalStorage::new(&output),
        XlsxWorkbook::open(&workbook)?,
        ColumnLayout::descriptions(),
        Pacer::immediate(),
    );
    let mut engine = EtlEngine::new(pipeline, Pacer::immediate());
    let summary = engine
        .run(&HttpLauncher::new(USER_AGENT, Duration::from_secs(5)))
        .await?;

    page.assert_async().await;
    assert_eq!(summary.succeeded(), 1);

    let content = std::fs::read_to_string(output.join("Mixed Signal_jobs.txt"))?;
    assert!(content.contains("Company: Umbrella Semiconductors"));
    assert!(content.contains("PLLs and data converters"));
    Ok(())
}
