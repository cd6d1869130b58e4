pub mod connection;
pub mod headless;

pub use connection::connect_to_form_page;
pub use headless::launch_headless_form_page;

use crate::config::Config;
use anyhow::Result;
use chromiumoxide::{Browser, Page};

/// 按配置打开表单页面：无头模式启动新浏览器，否则连接调试端口
pub async fn open_form_page(config: &Config) -> Result<(Browser, Page)> {
    if config.headless {
        launch_headless_form_page(&config.target_url, config.browser_executable.as_deref()).await
    } else {
        connect_to_form_page(config.browser_debug_port, &config.target_url, &config.app_name).await
    }
}
