//! # Injury Risk Submit
//!
//! NBA 球员伤病风险预测的请求编排程序：
//! 采集九项特征 → 校验 → 提交评分服务 → 渲染结果或错误
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（Page），只暴露能力
//! - `JsExecutor` - 唯一的 page owner，提供 eval() 能力
//!
//! ### ② 能力层（View / Clients / Services）
//! - `view/` - 表单读写能力：`PageView`（浏览器页面）、`MemoryView`（内存表单）
//! - `clients/` - 评分请求能力：`PagePredictionClient`、`HttpPredictionClient`
//! - `services/` - 运行报告写入能力
//!
//! ### ③ 流程层（Workflow）
//! - `RequestOrchestrator` - 一次提交的完整周期
//! - `SubmissionState` - 提交中标记、周期阶段、最近一次结果
//!
//! ### ④ 编排层（Orchestration）
//! - `App` - 按运行模式持有资源
//! - `profile_runner` - 批量提交球员档案

pub mod browser;
pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod view;
pub mod workflow;

pub use utils::logging as logger;

// 重新导出常用类型
pub use browser::open_form_page;
pub use clients::{HttpPredictionClient, PagePredictionClient, PredictionClient};
pub use config::{Config, RunMode};
pub use error::{ConfigError, PredictError, PredictResult};
pub use infrastructure::JsExecutor;
pub use models::{FeatureField, FeatureRecord, PlayerProfile, Prediction};
pub use orchestrator::App;
pub use view::{FormBinding, FormView, MemoryView, PageView};
pub use workflow::{CyclePhase, RequestOrchestrator, SubmitOutcome};
