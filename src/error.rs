use thiserror::Error;

use crate::models::FeatureField;

/// 服务未给出原因时展示的通用错误信息
pub const GENERIC_SERVICE_ERROR: &str = "Prediction failed. Please try again.";

/// 一次提交周期内可能出现的错误
///
/// 所有变体都在提交周期顶层被捕获，并以一条可读消息渲染到错误区域，
/// 不会向外传播，也不会影响下一次提交。
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictError {
    /// 表单中缺少必需的输入元素（集成/配置问题）
    #[error("Input field '{element_id}' ({}) is missing from the form", .field.label())]
    InputMissing {
        field: FeatureField,
        element_id: String,
    },

    /// 原始输入无法解析为有限数值（用户输入问题）
    #[error("Please enter a valid number for {} ('{element_id}'), got \"{raw}\"", .field.label())]
    InputInvalid {
        field: FeatureField,
        element_id: String,
        raw: String,
    },

    /// 采集后的二次校验失败
    #[error("Validation failed: {} must be a finite number", .field.key())]
    ValidationError { field: FeatureField },

    /// 无法连接到预测服务
    #[error("Unable to reach the prediction service ({detail}). Please check your connection and try again.")]
    TransportError { detail: String },

    /// 预测服务已响应，但报告失败
    #[error("{message}")]
    ServiceError { message: String },
}

impl PredictError {
    /// 根据服务返回的消息构造 ServiceError，消息缺失或为空时使用通用提示
    pub fn service_failure(message: Option<String>) -> Self {
        let message = message
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| GENERIC_SERVICE_ERROR.to_string());
        PredictError::ServiceError { message }
    }

    /// 创建传输层错误
    pub fn transport(source: impl std::fmt::Display) -> Self {
        PredictError::TransportError {
            detail: source.to_string(),
        }
    }

    /// 是否在发起网络请求之前就已失败
    pub fn is_before_network(&self) -> bool {
        matches!(
            self,
            PredictError::InputMissing { .. }
                | PredictError::InputInvalid { .. }
                | PredictError::ValidationError { .. }
        )
    }

    /// 出错的字段（仅输入类错误有）
    pub fn field(&self) -> Option<FeatureField> {
        match self {
            PredictError::InputMissing { field, .. }
            | PredictError::InputInvalid { field, .. }
            | PredictError::ValidationError { field } => Some(*field),
            _ => None,
        }
    }
}

/// 配置错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// 必填项为空
    #[error("{name} is not set")]
    Missing { name: &'static str },

    /// 地址不是 http(s) URL
    #[error("{name} must be an http(s) URL, got '{value}'")]
    InvalidUrl { name: &'static str, value: String },

    /// 数值超出允许范围
    #[error("{name} is out of range: {value}")]
    OutOfRange { name: &'static str, value: String },
}

/// 单次提交周期的结果类型
pub type PredictResult<T> = Result<T, PredictError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_error_displays_message_verbatim() {
        let err = PredictError::service_failure(Some("Model unavailable".to_string()));
        assert_eq!(err.to_string(), "Model unavailable");
    }

    #[test]
    fn service_error_falls_back_to_generic_message() {
        assert_eq!(
            PredictError::service_failure(None).to_string(),
            GENERIC_SERVICE_ERROR
        );
        assert_eq!(
            PredictError::service_failure(Some("   ".to_string())).to_string(),
            GENERIC_SERVICE_ERROR
        );
    }

    #[test]
    fn input_errors_name_the_field() {
        let err = PredictError::InputInvalid {
            field: FeatureField::UsgPct,
            element_id: "usg_pct".to_string(),
            raw: "abc".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("usg_pct"));
        assert!(text.contains("Usage %"));
        assert!(err.is_before_network());
        assert_eq!(err.field(), Some(FeatureField::UsgPct));
    }

    #[test]
    fn transport_error_is_actionable() {
        let err = PredictError::transport("connection refused");
        assert!(err.to_string().contains("check your connection"));
        assert!(!err.is_before_network());
        assert_eq!(err.field(), None);
    }
}
