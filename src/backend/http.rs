//! HTTP 分析后端
//!
//! 把文档数据 POST 到 `{backend_base_url}/analyze`，解析返回的 JSON。
//! 只做"数据进、提取结果出"，不实现任何厂商协议。

use futures::future::{BoxFuture, FutureExt};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, warn};

use crate::backend::AnalysisBackend;
use crate::config::Config;
use crate::error::{AnalysisError, AnalysisResult};
use crate::models::{AnalysisDocument, AnalysisReport, Extractions};

/// HTTP 分析后端
pub struct HttpAnalysisBackend {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpAnalysisBackend {
    /// 创建新的 HTTP 后端，请求超时取自配置
    pub fn new(config: &Config) -> reqwest::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        let api_key = Some(config.backend_api_key.clone()).filter(|key| !key.is_empty());

        Ok(Self {
            client,
            endpoint: format!("{}/analyze", config.backend_base_url.trim_end_matches('/')),
            api_key,
        })
    }

    /// 分析接口地址
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn post_document(
        &self,
        payload: Vec<u8>,
        document: &AnalysisDocument,
    ) -> AnalysisResult<AnalysisReport> {
        debug!(
            "提交文档 {} 到 {} ({} 字节, {})",
            document.id,
            self.endpoint,
            payload.len(),
            document.content_type.mime()
        );

        let mut request = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, document.content_type.mime())
            .header("X-Document-Id", &document.id)
            .body(payload);

        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            warn!("分析请求发送失败: {}", e);
            AnalysisError::backend_failure(&self.endpoint, e)
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AnalysisError::backend_failure(&self.endpoint, e))?;

        debug!("后端响应 HTTP {}，{} 字节", status, body.len());

        interpret_response(&self.endpoint, status, &body, document)
    }
}

impl AnalysisBackend for HttpAnalysisBackend {
    fn analyze<'a>(
        &'a self,
        payload: Vec<u8>,
        document: &'a AnalysisDocument,
    ) -> BoxFuture<'a, AnalysisResult<AnalysisReport>> {
        self.post_document(payload, document).boxed()
    }
}

/// 成功响应
#[derive(Debug, Deserialize)]
struct AnalyzeReply {
    #[serde(default)]
    document: Option<ReplyDocument>,
    #[serde(default)]
    extractions: BTreeMap<String, ExtractionValue>,
}

#[derive(Debug, Deserialize)]
struct ReplyDocument {
    id: String,
}

/// 提取项既可以是字符串，也可以是带 `value` 字段的对象
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ExtractionValue {
    Plain(String),
    Detailed { value: String },
}

impl ExtractionValue {
    fn into_value(self) -> String {
        match self {
            ExtractionValue::Plain(value) | ExtractionValue::Detailed { value } => value,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorReply {
    message: Option<String>,
}

/// 把 HTTP 响应映射为分析结果
///
/// - 2xx: 解析提取结果，响应中没有文档 id 时沿用本地文档
/// - 4xx: `AnalysisRejected`，原因取响应中的 `message`
/// - 其他: `BackendFailure`
fn interpret_response(
    endpoint: &str,
    status: StatusCode,
    body: &str,
    local: &AnalysisDocument,
) -> AnalysisResult<AnalysisReport> {
    if status.is_success() {
        let reply: AnalyzeReply = serde_json::from_str(body).map_err(|e| {
            AnalysisError::backend_failure(endpoint, format!("无法解析响应: {}", e))
        })?;

        let document = match reply.document {
            Some(remote) => local.clone().with_id(remote.id),
            None => local.clone(),
        };
        let result: Extractions = reply
            .extractions
            .into_iter()
            .map(|(name, value)| (name, value.into_value()))
            .collect();

        return Ok(AnalysisReport::new(result, document));
    }

    if status.is_client_error() {
        let reason = serde_json::from_str::<ErrorReply>(body)
            .ok()
            .and_then(|reply| reply.message)
            .unwrap_or_else(|| format!("HTTP {}", status));
        return Err(AnalysisError::rejected(reason));
    }

    Err(AnalysisError::backend_failure(
        endpoint,
        format!("HTTP {}", status),
    ))
}
