/// 评分服务 HTTP 客户端
///
/// 直接向评分服务发送 `POST /predict`，用于不经过浏览器的档案模式
use reqwest::Client;
use tracing::{debug, warn};

use super::{interpret_body, PredictionClient, PREDICT_PATH};
use crate::config::Config;
use crate::error::{PredictError, PredictResult};
use crate::models::{FeatureRecord, Prediction};
use crate::utils::logging::truncate_text;

/// 评分服务 HTTP 客户端
pub struct HttpPredictionClient {
    client: Client,
    endpoint: String,
}

impl HttpPredictionClient {
    pub fn new(config: &Config) -> Self {
        Self::with_base_url(&config.service_base_url)
    }

    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: format!("{}{}", base_url.trim().trim_end_matches('/'), PREDICT_PATH),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl PredictionClient for HttpPredictionClient {
    async fn post_feature_record(&self, record: &FeatureRecord) -> PredictResult<Prediction> {
        debug!("POST {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .json(record)
            .send()
            .await
            .map_err(|e| {
                warn!("无法连接评分服务 {}: {}", self.endpoint, e);
                PredictError::transport(e)
            })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(PredictError::transport)?;
        debug!("评分服务响应 (HTTP {}): {}", status, truncate_text(&body, 200));

        interpret_body(status, &body)
    }
}
