//! 档案批量提交 - 编排层
//!
//! 逐份档案构建内存表单，走一遍完整的提交周期，并把结果追加到运行日志。
//! 档案之间严格串行：同一时刻只有一个周期在进行。

use tracing::{debug, error, info, warn};

use crate::clients::PredictionClient;
use crate::models::PlayerProfile;
use crate::services::ReportWriter;
use crate::view::{FormBinding, MemoryView};
use crate::workflow::{RequestOrchestrator, SubmitOutcome};

/// 批量提交统计
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProfileStats {
    pub success: usize,
    pub failed: usize,
    pub total: usize,
}

/// 依次提交全部档案
pub async fn run_profiles<C: PredictionClient>(
    profiles: &[PlayerProfile],
    client: &C,
    writer: &ReportWriter,
) -> ProfileStats {
    let mut stats = ProfileStats {
        total: profiles.len(),
        ..Default::default()
    };

    for (idx, profile) in profiles.iter().enumerate() {
        let index = idx + 1;
        if submit_profile(profile, index, stats.total, client, writer).await {
            stats.success += 1;
        } else {
            stats.failed += 1;
        }
    }

    stats
}

/// 提交单份档案，返回是否成功
async fn submit_profile<C: PredictionClient>(
    profile: &PlayerProfile,
    index: usize,
    total: usize,
    client: &C,
    writer: &ReportWriter,
) -> bool {
    let name = profile.display_name();
    info!("\n{}", "─".repeat(60));
    info!("[{}/{}] 📤 提交档案: {}", index, total, name);
    if let Some(path) = &profile.file_path {
        debug!("[{}/{}] 档案文件: {}", index, total, path);
    }

    let view = MemoryView::from_profile(profile);
    let orchestrator = match RequestOrchestrator::bind(view, client, FormBinding::default()).await {
        Ok(orchestrator) => orchestrator,
        Err(e) => {
            error!("[{}/{}] ❌ 表单绑定失败: {}", index, total, e);
            if let Err(write_err) = writer.write_skipped(index, &name, &e.to_string()) {
                warn!("写入运行日志失败: {:#}", write_err);
            }
            return false;
        }
    };

    let outcome = orchestrator.submit().await;
    match &outcome {
        SubmitOutcome::Succeeded(prediction) => {
            info!("[{}/{}] ✅ 伤病风险: {}", index, total, prediction)
        }
        SubmitOutcome::Failed(e) => error!("[{}/{}] ❌ 提交失败: {}", index, total, e),
        SubmitOutcome::Ignored => warn!("[{}/{}] ⚠️ 提交被忽略", index, total),
    }

    if let Err(e) = writer.write(index, &name, &outcome) {
        warn!("写入运行日志失败: {:#}", e);
    }

    outcome.is_success()
}
