//! 运行报告写入服务 - 业务能力层
//!
//! 只负责"追加一行提交结果"能力，不关心流程

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::io::Write;
use tracing::debug;

use crate::workflow::SubmitOutcome;

/// 运行报告写入服务
///
/// 职责：
/// - 每份档案的结果写成一行，追加到运行日志
/// - 不关心档案的加载和提交顺序
pub struct ReportWriter {
    log_file_path: String,
}

impl ReportWriter {
    /// 写入指定的日志文件
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            log_file_path: path.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.log_file_path
    }

    /// 追加一份档案的提交结果
    pub fn write(&self, index: usize, profile_name: &str, outcome: &SubmitOutcome) -> Result<()> {
        let line = format_line(index, profile_name, outcome);
        debug!("写入报告: {}", line.trim_end());

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_file_path)
            .with_context(|| format!("无法打开日志文件: {}", self.log_file_path))?;
        file.write_all(line.as_bytes())?;

        Ok(())
    }

    /// 追加一条无法提交的记录（表单绑定失败等）
    pub fn write_skipped(&self, index: usize, profile_name: &str, reason: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_file_path)
            .with_context(|| format!("无法打开日志文件: {}", self.log_file_path))?;
        writeln!(file, "[{}] {} | 跳过 | {}", index, profile_name, reason)?;
        Ok(())
    }
}

fn format_line(index: usize, profile_name: &str, outcome: &SubmitOutcome) -> String {
    match outcome {
        SubmitOutcome::Succeeded(prediction) => {
            format!("[{}] {} | 成功 | {}\n", index, profile_name, prediction.display_text())
        }
        SubmitOutcome::Failed(err) => format!("[{}] {} | 失败 | {}\n", index, profile_name, err),
        SubmitOutcome::Ignored => format!("[{}] {} | 忽略\n", index, profile_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PredictError;
    use crate::models::Prediction;

    #[test]
    fn lines_describe_each_outcome() {
        let ok = SubmitOutcome::Succeeded(Prediction::Score(0.8734));
        assert_eq!(format_line(1, "A", &ok), "[1] A | 成功 | 0.873\n");

        let failed = SubmitOutcome::Failed(PredictError::service_failure(Some(
            "Model unavailable".to_string(),
        )));
        assert_eq!(format_line(2, "B", &failed), "[2] B | 失败 | Model unavailable\n");
    }

    #[test]
    fn appends_to_existing_file() {
        let path = std::env::temp_dir().join(format!("injury_risk_report_{}.txt", std::process::id()));
        std::fs::write(&path, "header\n").unwrap();

        let writer = ReportWriter::with_path(path.to_string_lossy().to_string());
        writer
            .write(1, "A", &SubmitOutcome::Succeeded(Prediction::Score(0.5)))
            .unwrap();
        writer.write_skipped(2, "B", "missing input").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "header\n[1] A | 成功 | 0.500\n[2] B | 跳过 | missing input\n");
        let _ = std::fs::remove_file(&path);
    }
}
