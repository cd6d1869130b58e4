use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt;

use crate::error::{PredictError, PredictResult};

/// 评分服务返回的预测结果
#[derive(Debug, Clone, PartialEq)]
pub enum Prediction {
    /// 数值型风险分数
    Score(f64),
    /// 其他结构化结果，原样展示
    Structured(JsonValue),
}

impl Prediction {
    /// 从响应中的 prediction 字段构建
    pub fn from_payload(payload: JsonValue) -> Self {
        match payload.as_f64() {
            Some(score) => Prediction::Score(score),
            None => Prediction::Structured(payload),
        }
    }

    /// 数值结果保留三位小数，其余结果输出为紧凑 JSON
    pub fn display_text(&self) -> String {
        match self {
            Prediction::Score(score) => format!("{:.3}", score),
            Prediction::Structured(value) => value.to_string(),
        }
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_text())
    }
}

/// `/predict` 的响应体
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PredictResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction: Option<JsonValue>,
    #[serde(default, alias = "message", skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PredictResponse {
    /// 取出预测结果；`success: false` 或缺少 prediction 时返回 ServiceError
    pub fn into_prediction(self) -> PredictResult<Prediction> {
        if !self.success {
            return Err(PredictError::service_failure(self.error));
        }
        match self.prediction {
            Some(payload) => Ok(Prediction::from_payload(payload)),
            None => Err(PredictError::service_failure(self.error)),
        }
    }
}
