use crate::adapters::browser::document;
use crate::domain::ports::{Browser, BrowserLauncher};
use crate::utils::error::{EtlError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct LoadedPage {
    url: String,
    html: String,
}

/// Fetches pages with plain HTTP GETs and answers selector queries from the
/// server-rendered HTML. Nothing is executed, so clicks are no-ops; LinkedIn's
/// guest job pages already carry the full description markup.
pub struct HttpBrowser {
    client: Client,
    page: RwLock<Option<LoadedPage>>,
}

impl HttpBrowser {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            page: RwLock::new(None),
        })
    }

    async fn html(&self) -> Result<String> {
        let page = self.page.read().await;
        page.as_ref()
            .map(|p| p.html.clone())
            .ok_or(EtlError::NoPageError)
    }

    pub async fn current_url(&self) -> Option<String> {
        self.page.read().await.as_ref().map(|p| p.url.clone())
    }
}

#[async_trait]
impl Browser for HttpBrowser {
    async fn goto(&self, url: &str) -> Result<()> {
        tracing::debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        tracing::debug!("Page response status: {}", status);

        if !status.is_success() {
            *self.page.write().await = None;
            return Err(EtlError::PageLoadError {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let html = response.text().await?;
        *self.page.write().await = Some(LoadedPage {
            url: url.to_string(),
            html,
        });
        Ok(())
    }

    async fn wait_for(&self, selector: &str, _timeout: Duration) -> Result<()> {
        // 靜態頁面不會再變化，找不到就等同逾時
        if document::matches(&self.html().await?, selector)? {
            Ok(())
        } else {
            Err(EtlError::TimeoutError {
                selector: selector.to_string(),
            })
        }
    }

    async fn text(&self, selector: &str) -> Result<Option<String>> {
        document::first_text(&self.html().await?, selector)
    }

    async fn texts(&self, selector: &str) -> Result<Vec<String>> {
        document::all_texts(&self.html().await?, selector)
    }

    async fn inner_html(&self, selector: &str) -> Result<Option<String>> {
        document::first_inner_html(&self.html().await?, selector)
    }

    async fn click(&self, selector: &str) -> Result<bool> {
        tracing::trace!("Ignoring click on '{}' for static page", selector);
        Ok(false)
    }

    async fn close(&self) -> Result<()> {
        *self.page.write().await = None;
        Ok(())
    }
}

pub struct HttpLauncher {
    user_agent: String,
    timeout: Duration,
}

impl HttpLauncher {
    pub fn new(user_agent: impl Into<String>, timeout: Duration) -> Self {
        Self {
            user_agent: user_agent.into(),
            timeout,
        }
    }
}

#[async_trait]
impl BrowserLauncher for HttpLauncher {
    async fn launch(&self) -> Result<Box<dyn Browser>> {
        tracing::info!("🌐 Using HTTP page fetcher");
        Ok(Box::new(HttpBrowser::new(&self.user_agent, self.timeout)?))
    }
}
