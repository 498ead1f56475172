use crate::config::toml_config::BrowserConfig;
use crate::domain::ports::{Browser, BrowserLauncher};
use crate::utils::error::{EtlError, Result};
use async_trait::async_trait;
use fantoccini::error::CmdError;
use fantoccini::wd::TimeoutConfiguration;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::{json, Map, Value};
use std::time::Duration;

/// A Chrome session driven over the WebDriver protocol.
pub struct WebDriverBrowser {
    client: Client,
}

impl WebDriverBrowser {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    async fn find(&self, selector: &str) -> Result<Option<fantoccini::elements::Element>> {
        match self.client.find(Locator::Css(selector)).await {
            Ok(element) => Ok(Some(element)),
            Err(e) if e.is_no_such_element() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl Browser for WebDriverBrowser {
    async fn goto(&self, url: &str) -> Result<()> {
        tracing::debug!("Navigating to {}", url);
        self.client.goto(url).await?;
        Ok(())
    }

    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<()> {
        match self
            .client
            .wait()
            .at_most(timeout)
            .for_element(Locator::Css(selector))
            .await
        {
            Ok(_) => Ok(()),
            Err(CmdError::WaitTimeout) => Err(EtlError::TimeoutError {
                selector: selector.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    async fn text(&self, selector: &str) -> Result<Option<String>> {
        match self.find(selector).await? {
            Some(element) => Ok(Some(element.text().await?.trim().to_string())),
            None => Ok(None),
        }
    }

    async fn texts(&self, selector: &str) -> Result<Vec<String>> {
        let elements = self.client.find_all(Locator::Css(selector)).await?;
        let mut texts = Vec::with_capacity(elements.len());
        for element in elements {
            texts.push(element.text().await?.trim().to_string());
        }
        Ok(texts)
    }

    async fn inner_html(&self, selector: &str) -> Result<Option<String>> {
        match self.find(selector).await? {
            Some(element) => Ok(Some(element.html(true).await?)),
            None => Ok(None),
        }
    }

    async fn click(&self, selector: &str) -> Result<bool> {
        let Some(element) = self.find(selector).await? else {
            return Ok(false);
        };

        // 按鈕可能被遮住或尚未可點擊，不影響後續擷取
        match element.click().await {
            Ok(()) => Ok(true),
            Err(e) => {
                tracing::debug!("Click on '{}' failed: {}", selector, e);
                Ok(false)
            }
        }
    }

    async fn close(&self) -> Result<()> {
        self.client.clone().close().await?;
        tracing::info!("🔒 Browser session closed");
        Ok(())
    }
}

/// Opens Chrome sessions against a running chromedriver (or Selenium grid).
pub struct WebDriverLauncher {
    settings: BrowserConfig,
}

impl WebDriverLauncher {
    pub fn new(settings: BrowserConfig) -> Self {
        Self { settings }
    }

    pub fn chrome_args(&self) -> Vec<String> {
        let mut args = vec![
            "--no-sandbox".to_string(),
            "--disable-dev-shm-usage".to_string(),
            "--disable-gpu".to_string(),
            format!(
                "--window-size={},{}",
                self.settings.window_width, self.settings.window_height
            ),
            format!("--user-agent={}", self.settings.user_agent),
        ];
        if self.settings.headless {
            args.push("--headless=new".to_string());
        }
        args
    }

    pub fn capabilities(&self) -> Map<String, Value> {
        let mut caps = Map::new();
        caps.insert("browserName".to_string(), json!("chrome"));
        caps.insert(
            "goog:chromeOptions".to_string(),
            json!({ "args": self.chrome_args() }),
        );
        caps
    }
}

#[async_trait]
impl BrowserLauncher for WebDriverLauncher {
    async fn launch(&self) -> Result<Box<dyn Browser>> {
        tracing::info!(
            "🌐 Connecting to WebDriver at {} (headless: {})",
            self.settings.webdriver_url,
            self.settings.headless
        );

        let client = ClientBuilder::native()
            .capabilities(self.capabilities())
            .connect(&self.settings.webdriver_url)
            .await?;

        client
            .update_timeouts(TimeoutConfiguration::new(
                None,
                Some(self.settings.page_load_timeout()),
                None,
            ))
            .await?;

        tracing::info!("✅ Browser ready");
        Ok(Box::new(WebDriverBrowser::new(client)))
    }
}
