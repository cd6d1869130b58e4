//! 结果与错误的渲染
//!
//! 这些操作没有失败路径：展示元素缺失时退化为 `alert` 兜底（渲染），
//! 或直接忽略（清除、忙碌状态）。

use tracing::debug;

use super::{FormBinding, FormView};
use crate::models::Prediction;

/// 展示预测结果
pub async fn render_result<V: FormView>(view: &V, binding: &FormBinding, prediction: &Prediction) {
    let text = prediction.display_text();
    let written = view.set_text(&binding.result_value, &text).await;
    let shown = written && view.set_visible(&binding.result_container, true).await;
    if !shown {
        view.alert(&format!("Injury risk prediction: {}", text)).await;
    }
}

/// 展示错误信息
pub async fn render_error<V: FormView>(view: &V, binding: &FormBinding, message: &str) {
    let written = view.set_text(&binding.error_container, message).await;
    let shown = written && view.set_visible(&binding.error_container, true).await;
    if !shown {
        view.alert(message).await;
    }
}

/// 隐藏结果区域
pub async fn clear_result<V: FormView>(view: &V, binding: &FormBinding) {
    if !view.set_visible(&binding.result_container, false).await {
        debug!("结果容器不存在，跳过清除");
    }
    view.set_text(&binding.result_value, "").await;
}

/// 隐藏错误区域
pub async fn clear_error<V: FormView>(view: &V, binding: &FormBinding) {
    if view.set_visible(&binding.error_container, false).await {
        view.set_text(&binding.error_container, "").await;
    } else {
        debug!("错误容器不存在，跳过清除");
    }
}

/// 切换提交按钮的忙碌状态
pub async fn set_busy<V: FormView>(view: &V, binding: &FormBinding, busy: bool) {
    if !view.set_busy(&binding.submit_button, busy).await {
        debug!("提交按钮不存在，跳过忙碌状态切换 (busy={})", busy);
    }
}
