//! 分析结果模型

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::AnalysisError;
use crate::models::document::AnalysisDocument;

/// 提取结果：提取项名称 → 值
pub type Extractions = BTreeMap<String, String>;

/// 一次成功的分析
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisReport {
    pub result: Extractions,
    pub document: AnalysisDocument,
}

impl AnalysisReport {
    pub fn new(result: Extractions, document: AnalysisDocument) -> Self {
        Self { result, document }
    }
}

/// 一次失败的分析
///
/// 错误以 `Arc` 共享，同时交给状态、回调和事件
#[derive(Debug, Clone)]
pub struct AnalysisFailure {
    pub error: Arc<AnalysisError>,
    pub document: Option<AnalysisDocument>,
}

impl AnalysisFailure {
    pub fn new(error: AnalysisError, document: Option<AnalysisDocument>) -> Self {
        Self {
            error: Arc::new(error),
            document,
        }
    }
}
