//! 浏览器页面表单
//!
//! 通过 `JsExecutor` 在真实页面里读写 DOM 元素。

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use super::memory::BUSY_LABEL;
use super::FormView;
use crate::infrastructure::JsExecutor;

/// 读取输入框的脚本返回值
///
/// 包一层对象，`null` 结果在 CDP 中不带 value 字段。
#[derive(Debug, Deserialize)]
struct ReadOutcome {
    found: bool,
    value: String,
}

/// 基于浏览器页面的表单视图
pub struct PageView<'a> {
    executor: &'a JsExecutor,
}

impl<'a> PageView<'a> {
    pub fn new(executor: &'a JsExecutor) -> Self {
        Self { executor }
    }

    /// 执行脚本；失败时记录日志并返回 `None`
    async fn run<T: DeserializeOwned>(&self, action: &str, script: String) -> Option<T> {
        match self.executor.eval_as::<T>(script).await {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("页面脚本执行失败 ({}): {:#}", action, e);
                None
            }
        }
    }

    /// 对元素执行一段语句，元素不存在时返回 false
    async fn with_element(&self, action: &str, id: &str, body: &str) -> bool {
        let script = format!(
            r#"
            (() => {{
                const el = document.getElementById({id});
                if (!el) return false;
                {body}
                return true;
            }})()
            "#,
            id = js_string(id),
            body = body,
        );
        let found = self.run::<bool>(action, script).await.unwrap_or(false);
        if !found {
            debug!("页面元素不存在: #{} ({})", id, action);
        }
        found
    }
}

impl FormView for PageView<'_> {
    async fn read_value(&self, id: &str) -> Option<String> {
        let script = format!(
            r#"
            (() => {{
                const el = document.getElementById({});
                if (!el) return {{ found: false, value: "" }};
                return {{ found: true, value: el.value == null ? "" : String(el.value) }};
            }})()
            "#,
            js_string(id)
        );
        self.run::<ReadOutcome>("read_value", script)
            .await
            .filter(|outcome| outcome.found)
            .map(|outcome| outcome.value)
    }

    async fn write_value(&self, id: &str, value: &str) -> bool {
        let body = format!(
            r#"el.value = {};
                el.dispatchEvent(new Event("input", {{ bubbles: true }}));"#,
            js_string(value)
        );
        self.with_element("write_value", id, &body).await
    }

    async fn has_element(&self, id: &str) -> bool {
        self.with_element("has_element", id, "").await
    }

    async fn set_text(&self, id: &str, text: &str) -> bool {
        let body = format!("el.textContent = {};", js_string(text));
        self.with_element("set_text", id, &body).await
    }

    async fn set_visible(&self, id: &str, visible: bool) -> bool {
        let body = format!(
            r#"el.style.display = {visible} ? "" : "none";
                el.classList.toggle("hidden", !{visible});"#,
            visible = visible
        );
        self.with_element("set_visible", id, &body).await
    }

    async fn set_busy(&self, id: &str, busy: bool) -> bool {
        let body = if busy {
            format!(
                r#"if (el.dataset.label === undefined) el.dataset.label = el.innerHTML;
                el.disabled = true;
                el.innerHTML = '<span class="spinner"></span> ' + {};"#,
                js_string(BUSY_LABEL)
            )
        } else {
            r#"if (el.dataset.label !== undefined) {
                    el.innerHTML = el.dataset.label;
                    delete el.dataset.label;
                }
                el.disabled = false;"#
                .to_string()
        };
        self.with_element("set_busy", id, &body).await
    }

    async fn alert(&self, message: &str) {
        // 延后弹出，避免 alert 阻塞 evaluate 调用
        let script = format!(
            "(() => {{ setTimeout(() => window.alert({}), 0); return true; }})()",
            js_string(message)
        );
        let _ = self.run::<bool>("alert", script).await;
    }
}

/// 转成 JS 字符串字面量
fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn js_string_escapes_quotes_and_newlines() {
        assert_eq!(js_string("age"), "\"age\"");
        assert_eq!(js_string("a\"b\nc"), r#""a\"b\nc""#);
    }
}
