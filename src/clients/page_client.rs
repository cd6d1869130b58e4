/// 页面内评分请求
///
/// 在表单页面里用 fetch 请求相对路径 `/predict`，由页面所在的源解析地址，
/// 与页面自身脚本发出的请求完全一致。
use serde::Deserialize;
use tracing::{debug, warn};

use super::{interpret_body, PredictionClient, PREDICT_PATH};
use crate::error::{PredictError, PredictResult};
use crate::infrastructure::JsExecutor;
use crate::models::{FeatureRecord, Prediction};
use crate::utils::logging::truncate_text;

/// fetch 脚本的返回值
#[derive(Debug, Deserialize)]
struct FetchOutcome {
    /// 是否拿到了 HTTP 响应
    reached: bool,
    #[serde(default)]
    status: u16,
    /// 响应体，或 fetch 抛出的错误信息
    #[serde(default)]
    body: String,
}

/// 通过页面 fetch 发送请求的客户端
pub struct PagePredictionClient<'a> {
    executor: &'a JsExecutor,
}

impl<'a> PagePredictionClient<'a> {
    pub fn new(executor: &'a JsExecutor) -> Self {
        Self { executor }
    }

    /// 构建 fetch 脚本
    fn build_fetch_script(json_body: &str) -> String {
        format!(
            r#"
            (async () => {{
                try {{
                    const res = await fetch("{}", {{
                        method: "POST",
                        headers: {{
                            "Content-Type": "application/json",
                            "Accept": "application/json"
                        }},
                        body: JSON.stringify({})
                    }});
                    const text = await res.text();
                    return {{ reached: true, status: res.status, body: text }};
                }} catch (err) {{
                    return {{ reached: false, status: 0, body: String((err && err.message) || err) }};
                }}
            }})()
            "#,
            PREDICT_PATH, json_body
        )
    }
}

impl PredictionClient for PagePredictionClient<'_> {
    async fn post_feature_record(&self, record: &FeatureRecord) -> PredictResult<Prediction> {
        // 序列化失败时请求根本发不出去
        let json_body = serde_json::to_string(record).map_err(PredictError::transport)?;
        debug!("页面内提交: {}", json_body);

        let outcome: FetchOutcome = self
            .executor
            .eval_as(Self::build_fetch_script(&json_body))
            .await
            .map_err(|e| PredictError::transport(format!("{:#}", e)))?;

        if !outcome.reached {
            warn!("页面无法连接评分服务: {}", outcome.body);
            return Err(PredictError::transport(outcome.body));
        }

        debug!(
            "评分服务响应 (HTTP {}): {}",
            outcome.status,
            truncate_text(&outcome.body, 200)
        );
        interpret_body(outcome.status, &outcome.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_script_targets_relative_path() {
        let script = PagePredictionClient::build_fetch_script(r#"{"AGE":26.0}"#);
        assert!(script.contains(r#"fetch("/predict""#));
        assert!(script.contains(r#"JSON.stringify({"AGE":26.0})"#));
        assert!(script.contains("reached: false"));
    }

    #[test]
    fn fetch_outcome_defaults() {
        let outcome: FetchOutcome = serde_json::from_str(r#"{"reached": false}"#).unwrap();
        assert!(!outcome.reached);
        assert_eq!(outcome.status, 0);
        assert!(outcome.body.is_empty());
    }
}
