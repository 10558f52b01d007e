use std::sync::Arc;

use crate::cancellation::CancellationToken;
use crate::error::AnalysisError;
use crate::models::{AnalysisDocument, Extractions};

/// 管理器共享状态
///
/// `error` 与 `result` 互斥：每次完成的分析只设置其中一个
#[derive(Debug, Default)]
pub(crate) struct ManagerState {
    pub error: Option<Arc<AnalysisError>>,
    pub result: Option<Extractions>,
    pub document: Option<AnalysisDocument>,
    pub current_token: Option<CancellationToken>,
}

/// 共享状态的只读快照
#[derive(Debug, Clone, Default)]
pub struct ManagerSnapshot {
    pub error: Option<Arc<AnalysisError>>,
    pub result: Option<Extractions>,
    pub document: Option<AnalysisDocument>,
    pub in_flight: bool,
}

impl From<&ManagerState> for ManagerSnapshot {
    fn from(state: &ManagerState) -> Self {
        Self {
            error: state.error.clone(),
            result: state.result.clone(),
            document: state.document.clone(),
            in_flight: state.current_token.is_some(),
        }
    }
}
