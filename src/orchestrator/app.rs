//! 应用生命周期
//!
//! 按运行模式持有资源：浏览器模式打开表单页面并提交一次，
//! 档案模式批量提交目录中的全部档案。

use anyhow::{Context, Result};
use tracing::{error, info, warn};

use super::profile_runner::run_profiles;
use crate::browser;
use crate::clients::{HttpPredictionClient, PagePredictionClient};
use crate::config::{Config, RunMode};
use crate::infrastructure::JsExecutor;
use crate::models::load_all_profiles;
use crate::services::ReportWriter;
use crate::utils::logging;
use crate::view::{FormBinding, PageView};
use crate::workflow::{RequestOrchestrator, SubmitOutcome};

/// 应用主结构
pub struct App {
    config: Config,
}

impl App {
    /// 初始化应用：校验配置、输出配置状态、初始化运行日志
    pub async fn initialize(config: Config) -> Result<Self> {
        let errors = config.validate();
        if !errors.is_empty() {
            for e in &errors {
                error!("❌ 配置错误: {}", e);
            }
            anyhow::bail!("配置无效，共 {} 处错误", errors.len());
        }

        config.log_status();
        logging::init_log_file(&config.output_log_file, &config.app_name)
            .with_context(|| format!("无法初始化日志文件: {}", config.output_log_file))?;

        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<()> {
        match self.config.run_mode {
            RunMode::Browser => self.run_browser().await,
            RunMode::Profiles => self.run_profiles().await,
        }
    }

    /// 浏览器模式：绑定页面表单并提交一次
    async fn run_browser(&self) -> Result<()> {
        logging::log_startup(&self.config.app_name, &self.config.app_version, "浏览器模式");

        // browser 句柄必须存活到提交结束
        let (_browser, page) = browser::open_form_page(&self.config).await?;
        let executor = JsExecutor::new(page);

        let orchestrator = RequestOrchestrator::bind(
            PageView::new(&executor),
            PagePredictionClient::new(&executor),
            FormBinding::default(),
        )
        .await
        .context("表单页面缺少必需的输入框")?;

        if self.config.load_sample_data {
            let filled = orchestrator.load_sample_data().await;
            info!("✓ 已填入示例数据 ({} 个字段)", filled);
        }

        let writer = ReportWriter::with_path(&self.config.output_log_file);
        let outcome = orchestrator.submit().await;
        match &outcome {
            SubmitOutcome::Succeeded(prediction) => info!("✅ 伤病风险预测: {}", prediction),
            SubmitOutcome::Failed(e) => error!("❌ 预测失败: {}", e),
            SubmitOutcome::Ignored => warn!("⚠️ 已有提交在进行，本次忽略"),
        }
        if let Err(e) = writer.write(1, &self.config.target_url, &outcome) {
            warn!("写入运行日志失败: {:#}", e);
        }

        let success = usize::from(outcome.is_success());
        logging::print_final_stats(success, 1 - success, 1, &self.config.output_log_file);
        Ok(())
    }

    /// 档案模式：直接请求评分服务，逐份提交
    async fn run_profiles(&self) -> Result<()> {
        logging::log_startup(&self.config.app_name, &self.config.app_version, "档案批量模式");

        info!("\n📁 正在扫描球员档案...");
        let profiles = load_all_profiles(&self.config.profile_folder).await?;
        if profiles.is_empty() {
            warn!("⚠️ 没有找到待处理的TOML档案，程序结束");
            return Ok(());
        }
        info!("✓ 找到 {} 份球员档案", profiles.len());

        let client = HttpPredictionClient::new(&self.config);
        info!("评分接口: {}", client.endpoint());
        let writer = ReportWriter::with_path(&self.config.output_log_file);

        let stats = run_profiles(&profiles, &client, &writer).await;
        logging::print_final_stats(
            stats.success,
            stats.failed,
            stats.total,
            &self.config.output_log_file,
        );

        Ok(())
    }
}
