use anyhow::{Context, Result};
use chromiumoxide::{Browser, Page};
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, error, info};

/// 连接到已开启调试端口的浏览器，并找到表单页面
///
/// 优先复用标题包含 `page_title` 的已打开页面，找不到时新建页面并导航到 `form_url`。
pub async fn connect_to_form_page(
    port: u16,
    form_url: &str,
    page_title: &str,
) -> Result<(Browser, Page)> {
    let browser_url = format!("http://localhost:{}", port);
    info!("正在连接到浏览器: {}", browser_url);
    debug!("表单 URL: {}, 页面标题: {}", form_url, page_title);

    let (browser, mut handler) = Browser::connect(&browser_url)
        .await
        .with_context(|| format!("无法连接到浏览器 (端口: {})", port))?;
    debug!("浏览器连接成功");

    // 在后台处理浏览器事件
    tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    // 等待浏览器状态同步
    sleep(tokio::time::Duration::from_millis(300)).await;

    let pages = browser.pages().await.context("获取页面列表失败")?;
    debug!("获取到 {} 个页面", pages.len());

    for p in pages.iter() {
        if let Ok(Some(title)) = p.get_title().await {
            debug!("检查页面标题: {}", title);
            if title.contains(page_title) {
                info!("✓ 找到表单页面: {}", title);
                return Ok((browser, p.clone()));
            }
        }
    }
    debug!("未找到已打开的表单页面，将新建页面");

    let page = browser.new_page("about:blank").await.map_err(|e| {
        error!("创建新页面失败: {}", e);
        e
    })?;
    page.goto(form_url).await.map_err(|e| {
        error!("导航到 {} 失败: {}", form_url, e);
        e
    })?;
    info!("已导航到: {}", form_url);

    Ok((browser, page))
}
