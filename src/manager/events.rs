//! 分析事件
//!
//! 通过 `AnalysisManager::subscribe()` 订阅，丢弃接收端即取消订阅

use serde_json::{json, Map, Value as JsonValue};
use std::sync::Arc;

use crate::error::AnalysisError;
use crate::models::{AnalysisDocument, Extractions};

/// 收到分析结果
pub const DID_RECEIVE_RESULT: &str = "did-receive-result";
/// 收到分析错误
pub const DID_RECEIVE_ERROR: &str = "did-receive-error";

/// 事件负载键：提取结果
pub const RESULT_KEY: &str = "result";
/// 事件负载键：错误
pub const ERROR_KEY: &str = "error";
/// 事件负载键：文档
pub const DOCUMENT_KEY: &str = "document";

/// 分析事件
#[derive(Debug, Clone)]
pub enum AnalysisEvent {
    DidReceiveResult {
        result: Extractions,
        document: AnalysisDocument,
    },
    DidReceiveError {
        error: Arc<AnalysisError>,
        document: Option<AnalysisDocument>,
    },
}

impl AnalysisEvent {
    /// 事件名称
    pub fn name(&self) -> &'static str {
        match self {
            AnalysisEvent::DidReceiveResult { .. } => DID_RECEIVE_RESULT,
            AnalysisEvent::DidReceiveError { .. } => DID_RECEIVE_ERROR,
        }
    }

    pub fn document(&self) -> Option<&AnalysisDocument> {
        match self {
            AnalysisEvent::DidReceiveResult { document, .. } => Some(document),
            AnalysisEvent::DidReceiveError { document, .. } => document.as_ref(),
        }
    }

    /// 按约定的键生成事件负载
    ///
    /// 结果事件包含 `result` 和 `document`，错误事件包含 `error` 和 `document`
    pub fn user_info(&self) -> JsonValue {
        let mut info = Map::new();
        match self {
            AnalysisEvent::DidReceiveResult { result, document } => {
                info.insert(RESULT_KEY.to_string(), json!(result));
                info.insert(DOCUMENT_KEY.to_string(), json!(document));
            }
            AnalysisEvent::DidReceiveError { error, document } => {
                info.insert(ERROR_KEY.to_string(), json!(error.to_string()));
                info.insert(DOCUMENT_KEY.to_string(), json!(document));
            }
        }
        JsonValue::Object(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document() -> AnalysisDocument {
        AnalysisDocument::from_payload("doc-1", b"%PDF-1.7").unwrap()
    }

    #[test]
    fn test_result_event_payload_keys() {
        let mut result = Extractions::new();
        result.insert("amount".to_string(), "12.99".to_string());
        let event = AnalysisEvent::DidReceiveResult {
            result,
            document: document(),
        };

        let info = event.user_info();
        assert_eq!(event.name(), "did-receive-result");
        assert_eq!(info[RESULT_KEY]["amount"], "12.99");
        assert_eq!(info[DOCUMENT_KEY]["id"], "doc-1");
        assert!(info.get(ERROR_KEY).is_none());
    }

    #[test]
    fn test_error_event_payload_keys() {
        let event = AnalysisEvent::DidReceiveError {
            error: Arc::new(AnalysisError::invalid_payload("文档数据为空")),
            document: None,
        };

        let info = event.user_info();
        assert_eq!(event.name(), "did-receive-error");
        assert!(info[ERROR_KEY].as_str().unwrap().contains("文档数据为空"));
        assert!(info[DOCUMENT_KEY].is_null());
        assert!(event.document().is_none());
    }
}
