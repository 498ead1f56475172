pub mod document;
pub mod http;
pub mod webdriver;

use crate::config::toml_config::{BrowserConfig, DriverKind};
use crate::domain::ports::BrowserLauncher;

pub use http::{HttpBrowser, HttpLauncher};
pub use webdriver::{WebDriverBrowser, WebDriverLauncher};

/// 依設定選擇瀏覽器實作
pub fn launcher_for(settings: &BrowserConfig) -> Box<dyn BrowserLauncher> {
    match settings.driver {
        DriverKind::WebDriver => Box::new(WebDriverLauncher::new(settings.clone())),
        DriverKind::Http => Box::new(HttpLauncher::new(
            settings.user_agent.clone(),
            settings.page_load_timeout(),
        )),
    }
}
