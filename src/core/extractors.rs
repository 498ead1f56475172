//! Selector tables and extraction routines for the job boards we know about.
//!
//! Every routine works against the [`Browser`] port, so the same tables drive a
//! WebDriver session and the plain HTTP fetcher.

use crate::core::html_text::format_description;
use crate::core::pacing::Pacer;
use crate::core::posted::{looks_like_posted_time, parse_posted_time};
use crate::domain::model::{JobDetails, JobPosting, SiteKind};
use crate::domain::ports::Browser;
use crate::utils::error::Result;
use std::time::Duration;

pub mod linkedin {
    pub const TITLE: &[&str] = &[
        "h1.top-card-layout__title",
        "h1.topcard__title",
        "h1[class*='job-title']",
        ".job-details-jobs-unified-top-card__job-title h1",
        ".jobs-unified-top-card__job-title",
        "h1",
    ];

    pub const COMPANY: &[&str] = &[
        "a.topcard__org-name-link",
        ".topcard__flavor a",
        "a[class*='company-name']",
        ".job-details-jobs-unified-top-card__company-name a",
        ".jobs-unified-top-card__company-name a",
        ".top-card-layout__card a[data-tracking-control-name*='company']",
        "a[href*='/company/']",
    ];

    pub const POSTED: &[&str] = &[
        ".posted-time-ago__text",
        ".topcard__flavor--metadata span",
        "span[class*='posted']",
        ".job-details-jobs-unified-top-card__primary-description-container span",
        ".jobs-unified-top-card__posted-date",
    ];

    /// The description job uses a shorter title/company list than the details job.
    pub const POSTING_TITLE: &[&str] = &["h1.top-card-layout__title", "h1.topcard__title", "h1"];
    pub const POSTING_COMPANY: &[&str] = &[
        "a.topcard__org-name-link",
        ".topcard__flavor a",
        "a[href*='/company/']",
    ];

    pub const SHOW_MORE: &str = ".show-more-less-html__button--more";

    pub const DESCRIPTION: &[&str] = &[
        ".show-more-less-html__markup",
        ".description__text",
        ".jobs-description__content",
        ".jobs-box__html-content",
        "div[class*='description']",
        ".job-details",
    ];
}

pub mod greenhouse {
    pub const TITLE: &[&str] = &["h1.app-title, h1[class*='title']"];
    pub const COMPANY: &[&str] = &[".company-name, [class*='company']"];
    pub const DESCRIPTION: &[&str] = &["#content, .content, [class*='description']"];
}

pub mod workday {
    pub const TITLE: &[&str] = &[
        "[data-automation-id='jobPostingHeader'], h2[data-automation-id='jobTitle'], h1",
    ];
    pub const DESCRIPTION: &[&str] =
        &["[data-automation-id='jobPostingDescription'], [class*='jobDescription']"];
}

pub mod hrmdirect {
    pub const TITLE: &[&str] = &[".careersTitle, h1"];
    pub const DESCRIPTION: &[&str] = &[".jobDesc, div.jobDesc"];
    pub const FALLBACK_DESCRIPTION: &[&str] = &[".reqResult, #content, body"];
}

pub mod generic {
    pub const TITLE: &[&str] = &[
        "h1[class*='title']",
        "h1[class*='job']",
        "h1[class*='posting']",
        "h1[data-automation*='title']",
        ".job-title",
        ".posting-title",
        "h1",
        "h2[class*='title']",
    ];

    pub const COMPANY: &[&str] = &[
        "[class*='company']",
        "[data-automation*='company']",
        ".employer-name",
        ".company-name",
        "a[href*='/company']",
    ];

    pub const DESCRIPTION: &[&str] = &[
        "[class*='description']",
        "[class*='job-content']",
        "[data-automation*='description']",
        ".job-details",
        "[class*='posting-content']",
        "[class*='job-body']",
        "article",
        ".content",
    ];

    /// A container shorter than this is navigation chrome, not a description.
    pub const MIN_HTML_CHARS: usize = 100;
    pub const MIN_TEXT_CHARS: usize = 50;
}

/// Minimum sizes a description candidate has to reach to be accepted.
#[derive(Debug, Clone, Copy)]
struct DescriptionRule {
    min_html_chars: usize,
    min_text_chars: usize,
}

impl DescriptionRule {
    const ANY: Self = Self {
        min_html_chars: 0,
        min_text_chars: 0,
    };
}

/// Text of the first selector whose first match has non-empty text.
pub async fn first_text(browser: &dyn Browser, selectors: &[&str]) -> Result<Option<String>> {
    for selector in selectors {
        if let Some(text) = browser.text(selector).await? {
            if !text.is_empty() {
                return Ok(Some(text));
            }
        }
    }
    Ok(None)
}

/// Text of the first matching element (across selectors, in order) that reads as a posting age.
pub async fn first_posted_time(browser: &dyn Browser, selectors: &[&str]) -> Result<Option<String>> {
    for selector in selectors {
        let texts = browser.texts(selector).await?;
        if let Some(found) = texts.into_iter().find(|t| looks_like_posted_time(t)) {
            return Ok(Some(found));
        }
    }
    Ok(None)
}

async fn first_description(
    browser: &dyn Browser,
    selectors: &[&str],
    rule: DescriptionRule,
) -> Result<Option<String>> {
    // 文字太短的候選也記下來，沒有更長的就用最後一個
    let mut last_candidate = None;
    for selector in selectors {
        let Some(html) = browser.inner_html(selector).await? else {
            continue;
        };
        if html.is_empty() || html.chars().count() <= rule.min_html_chars {
            continue;
        }
        let text = format_description(&html);
        if !text.is_empty() && text.chars().count() > rule.min_text_chars {
            return Ok(Some(text));
        }
        last_candidate = Some(text);
    }
    Ok(last_candidate.filter(|text| !text.is_empty()))
}

async fn open(browser: &dyn Browser, url: &str, timeout: Duration, pacer: &Pacer) -> Result<()> {
    browser.goto(url).await?;
    pacer.settle().await;
    browser.wait_for("body", timeout).await
}

/// Company, title and posting age from a LinkedIn job page.
pub async fn linkedin_details(browser: &dyn Browser, url: &str, pacer: &Pacer) -> Result<JobDetails> {
    open(browser, url, pacer.linkedin_timeout, pacer).await?;

    let job_title = first_text(browser, linkedin::TITLE).await?;
    let company = first_text(browser, linkedin::COMPANY).await?;
    let posted = first_posted_time(browser, linkedin::POSTED).await?;
    let days_ago = posted.as_deref().and_then(parse_posted_time);

    tracing::debug!(
        "LinkedIn details: title={:?} company={:?} posted={:?}",
        job_title,
        company,
        posted
    );

    Ok(JobDetails {
        company,
        job_title,
        days_ago,
    })
}

/// Full posting from a LinkedIn job page, expanding the truncated description first.
pub async fn linkedin_posting(browser: &dyn Browser, url: &str, pacer: &Pacer) -> Result<JobPosting> {
    open(browser, url, pacer.linkedin_timeout, pacer).await?;

    let job_title = first_text(browser, linkedin::POSTING_TITLE).await?;
    let company = first_text(browser, linkedin::POSTING_COMPANY).await?;

    // 按鈕不存在或已展開都沒關係
    match browser.click(linkedin::SHOW_MORE).await {
        Ok(true) => pacer.after_expand().await,
        Ok(false) => {}
        Err(e) => tracing::debug!("Show more not clickable: {}", e),
    }

    let description = first_description(browser, linkedin::DESCRIPTION, DescriptionRule::ANY).await?;

    Ok(JobPosting {
        company,
        job_title,
        description,
    })
}

pub async fn generic_posting(browser: &dyn Browser, url: &str, pacer: &Pacer) -> Result<JobPosting> {
    open(browser, url, pacer.site_timeout, pacer).await?;

    let job_title = first_text(browser, generic::TITLE).await?;
    let company = first_text(browser, generic::COMPANY).await?;
    let description = first_description(
        browser,
        generic::DESCRIPTION,
        DescriptionRule {
            min_html_chars: generic::MIN_HTML_CHARS,
            min_text_chars: generic::MIN_TEXT_CHARS,
        },
    )
    .await?;

    Ok(JobPosting {
        company,
        job_title,
        description,
    })
}

async fn greenhouse_posting(browser: &dyn Browser, url: &str, pacer: &Pacer) -> Result<JobPosting> {
    open(browser, url, pacer.site_timeout, pacer).await?;

    Ok(JobPosting {
        job_title: first_text(browser, greenhouse::TITLE).await?,
        company: first_text(browser, greenhouse::COMPANY).await?,
        description: first_description(browser, greenhouse::DESCRIPTION, DescriptionRule::ANY)
            .await?,
    })
}

async fn workday_posting(browser: &dyn Browser, url: &str, pacer: &Pacer) -> Result<JobPosting> {
    open(browser, url, pacer.site_timeout, pacer).await?;

    Ok(JobPosting {
        job_title: first_text(browser, workday::TITLE).await?,
        company: None,
        description: first_description(browser, workday::DESCRIPTION, DescriptionRule::ANY).await?,
    })
}

async fn hrmdirect_posting(browser: &dyn Browser, url: &str, pacer: &Pacer) -> Result<JobPosting> {
    open(browser, url, pacer.site_timeout, pacer).await?;

    let job_title = first_text(browser, hrmdirect::TITLE).await?;
    let description =
        match first_description(browser, hrmdirect::DESCRIPTION, DescriptionRule::ANY).await? {
            Some(text) => Some(text),
            None => {
                first_description(browser, hrmdirect::FALLBACK_DESCRIPTION, DescriptionRule::ANY)
                    .await?
            }
        };

    Ok(JobPosting {
        company: None,
        job_title,
        description,
    })
}

/// Dispatches on the job board behind `url`. Board-specific extractors fall back
/// to the generic tables when they fail; Workday also falls back when it found
/// no description.
pub async fn extract_posting(browser: &dyn Browser, url: &str, pacer: &Pacer) -> Result<JobPosting> {
    let site = SiteKind::detect(url);
    tracing::info!("    Site type: {}", site);

    let attempt = match site {
        SiteKind::LinkedIn => return linkedin_posting(browser, url, pacer).await,
        SiteKind::Greenhouse => greenhouse_posting(browser, url, pacer).await,
        SiteKind::Workday => match workday_posting(browser, url, pacer).await {
            Ok(posting) if posting.description.is_none() => {
                tracing::debug!("Workday page had no description, trying generic selectors");
                return generic_posting(browser, url, pacer).await;
            }
            other => other,
        },
        SiteKind::HrmDirect => hrmdirect_posting(browser, url, pacer).await,
        SiteKind::Lever | SiteKind::Oracle | SiteKind::Generic => {
            return generic_posting(browser, url, pacer).await
        }
    };

    match attempt {
        Ok(posting) => Ok(posting),
        Err(e) if e.is_row_recoverable() => {
            tracing::warn!("    {} error: {}", site, e);
            generic_posting(browser, url, pacer).await
        }
        Err(e) => Err(e),
    }
}
