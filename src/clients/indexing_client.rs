/// 索引服务 API 客户端
///
/// 封装 URL 通知提交（每次一个 URL）。访问令牌由配置提供，令牌交换不在这里做。
use std::time::Duration;

use futures::future::BoxFuture;
use reqwest::Client;
use serde_json::json;
use tracing::debug;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{QueueItem, ServiceAccountCredential, SubmitOutcome};
use crate::services::IndexSubmitter;

const CALL_NAME: &str = "indexing-submit";

/// 索引服务客户端
pub struct IndexingClient {
    http: Client,
    endpoint: String,
    access_token: Option<String>,
}

impl IndexingClient {
    /// 创建新的索引服务客户端
    pub fn new(config: &Config) -> AppResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| AppError::external_call_failed(CALL_NAME, e))?;

        Ok(Self {
            http,
            endpoint: config.indexing_endpoint.clone(),
            access_token: config
                .indexing_access_token
                .clone()
                .filter(|t| !t.trim().is_empty()),
        })
    }

    /// 提交单个 URL 通知
    ///
    /// # 返回
    /// 2xx 视为成功，其他状态码带上响应体作为失败原因
    pub async fn publish(
        &self,
        item: &QueueItem,
        credential: &ServiceAccountCredential,
    ) -> AppResult<SubmitOutcome> {
        debug!(
            "提交 {} ({}) 项目: {}",
            item.url(),
            item.request_kind().as_str(),
            credential.project_id
        );

        let body = json!({
            "url": item.url(),
            "type": item.request_kind().as_str(),
        });

        let mut request = self.http.post(&self.endpoint).json(&body);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::external_call_failed(CALL_NAME, e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(SubmitOutcome::success());
        }

        let text = response.text().await.unwrap_or_default();
        let detail = text.trim();
        let message = if detail.is_empty() {
            format!("HTTP {}", status.as_u16())
        } else {
            format!("HTTP {}: {}", status.as_u16(), detail)
        };
        Ok(SubmitOutcome::failure(message))
    }
}

impl IndexSubmitter for IndexingClient {
    fn submit_one<'a>(
        &'a self,
        item: &'a QueueItem,
        credential: &'a ServiceAccountCredential,
    ) -> BoxFuture<'a, AppResult<SubmitOutcome>> {
        Box::pin(self.publish(item, credential))
    }
}
