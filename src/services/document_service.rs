//! 文档服务 - 业务能力层
//!
//! 通过 PDF.co 把 PDF 转为纯文本：先提交转换请求拿到文本文件链接，再下载该文本

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{ApiError, AppError, AppResult};
use crate::services::TextExtractor;

const CONVERT_TO_TEXT_PATH: &str = "/pdf/convert/to/text";

/// 转换接口的返回结果
#[derive(Debug, Deserialize)]
struct ConvertResponse {
    #[serde(default)]
    error: bool,
    url: Option<String>,
    message: Option<String>,
}

/// 文档服务
pub struct DocumentService {
    client: Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl DocumentService {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            api_key: config.pdfco_api_key.clone(),
            base_url: config.pdfco_api_base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(config.upstream_timeout_secs),
        }
    }

    /// 提交转换请求，返回生成的文本文件链接
    async fn convert_to_text(&self, file_link: &str) -> AppResult<String> {
        let endpoint = format!("{}{}", self.base_url, CONVERT_TO_TEXT_PATH);
        debug!("提交文本转换请求: {}", endpoint);

        let request = self
            .client
            .post(&endpoint)
            .header("x-api-key", &self.api_key)
            .header("Accept", "application/json")
            .json(&json!({ "url": file_link }))
            .send();

        let response = self
            .bounded(&endpoint, request)
            .await?
            .map_err(|e| AppError::api_request_failed(&endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("文本转换请求失败: status={}, body={}", status, body);
            return Err(ApiError::BadResponse {
                endpoint,
                status: Some(status.as_u16()),
                message: Some(body),
            }
            .into());
        }

        let body = response
            .text()
            .await
            .map_err(|e| AppError::api_request_failed(&endpoint, e))?;
        let result: ConvertResponse = serde_json::from_str(&body)?;

        if result.error {
            return Err(ApiError::BadResponse {
                endpoint,
                status: Some(status.as_u16()),
                message: result.message,
            }
            .into());
        }

        result.url.filter(|url| !url.is_empty()).ok_or_else(|| {
            ApiError::MissingField {
                endpoint,
                field: "url".to_string(),
            }
            .into()
        })
    }

    /// 下载转换后的文本
    async fn download_text(&self, text_link: &str) -> AppResult<String> {
        let response = self
            .bounded(text_link, self.client.get(text_link).send())
            .await?
            .map_err(|e| AppError::api_request_failed(text_link, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::BadResponse {
                endpoint: text_link.to_string(),
                status: Some(status.as_u16()),
                message: None,
            }
            .into());
        }

        response
            .text()
            .await
            .map_err(|e| AppError::api_request_failed(text_link, e))
    }

    /// 给外部调用加上超时
    async fn bounded<F: Future>(&self, endpoint: &str, future: F) -> AppResult<F::Output> {
        tokio::time::timeout(self.timeout, future)
            .await
            .map_err(|_| {
                ApiError::Timeout {
                    endpoint: endpoint.to_string(),
                    seconds: self.timeout.as_secs(),
                }
                .into()
            })
    }
}

#[async_trait]
impl TextExtractor for DocumentService {
    async fn extract_text(&self, file_link: &str) -> AppResult<String> {
        let text_link = self.convert_to_text(file_link).await?;
        let text = self.download_text(&text_link).await?;
        info!("📄 文档文本提取完成，共 {} 字符", text.chars().count());
        Ok(text)
    }
}
