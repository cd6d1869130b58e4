//! 评分服务客户端
//!
//! 每次提交只发出一次请求：不重试、不设超时、不退避。

pub mod http_client;
pub mod page_client;

pub use http_client::HttpPredictionClient;
pub use page_client::PagePredictionClient;

use tracing::warn;

use crate::error::{PredictError, PredictResult};
use crate::models::{FeatureRecord, PredictResponse, Prediction};

/// 评分服务的固定相对路径
pub const PREDICT_PATH: &str = "/predict";

/// 把特征记录发送给评分服务
#[allow(async_fn_in_trait)]
pub trait PredictionClient {
    /// 发送一次请求并等待结果
    ///
    /// - 服务不可达：`TransportError`
    /// - 服务返回失败：`ServiceError`（带服务给出的原因或通用提示）
    async fn post_feature_record(&self, record: &FeatureRecord) -> PredictResult<Prediction>;
}

impl<T: PredictionClient + ?Sized> PredictionClient for &T {
    async fn post_feature_record(&self, record: &FeatureRecord) -> PredictResult<Prediction> {
        (**self).post_feature_record(record).await
    }
}

/// 解析服务响应体
///
/// 无法解析的响应体按服务失败处理，使用通用提示。
pub(crate) fn interpret_body(status: u16, body: &str) -> PredictResult<Prediction> {
    match serde_json::from_str::<PredictResponse>(body) {
        Ok(response) => response.into_prediction(),
        Err(e) => {
            warn!("评分服务响应无法解析 (HTTP {}): {}", status, e);
            Err(PredictError::service_failure(None))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GENERIC_SERVICE_ERROR;

    #[test]
    fn interprets_success_and_failure_bodies() {
        let prediction = interpret_body(200, r#"{"success": true, "prediction": 0.25}"#).unwrap();
        assert_eq!(prediction, Prediction::Score(0.25));

        let err = interpret_body(503, r#"{"success": false, "error": "Model unavailable"}"#)
            .unwrap_err();
        assert_eq!(err.to_string(), "Model unavailable");
    }

    #[test]
    fn unparsable_body_is_a_generic_service_error() {
        let err = interpret_body(502, "<html>Bad Gateway</html>").unwrap_err();
        assert_eq!(err, PredictError::service_failure(None));
        assert_eq!(err.to_string(), GENERIC_SERVICE_ERROR);
    }
}
