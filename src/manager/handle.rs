use futures::FutureExt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

use crate::cancellation::CancellationToken;
use crate::models::{AnalysisFailure, AnalysisReport};

/// 单次分析的最终结果
#[derive(Debug, Clone)]
pub enum AnalysisOutcome {
    /// 分析成功
    Completed(AnalysisReport),
    /// 分析失败
    Failed(AnalysisFailure),
    /// 已取消（或被新的请求取代），结果被丢弃
    Cancelled,
}

impl AnalysisOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, AnalysisOutcome::Completed(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, AnalysisOutcome::Failed(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, AnalysisOutcome::Cancelled)
    }
}

/// 分析句柄
///
/// 作为 Future 等待本次请求的 `AnalysisOutcome`。
/// 丢弃句柄不会取消分析；需要取消时调用 `cancel()`。
#[derive(Debug)]
pub struct AnalysisHandle {
    token: CancellationToken,
    receiver: oneshot::Receiver<AnalysisOutcome>,
}

impl AnalysisHandle {
    pub(crate) fn new(
        token: CancellationToken,
        receiver: oneshot::Receiver<AnalysisOutcome>,
    ) -> Self {
        Self { token, receiver }
    }

    /// 本次请求的取消令牌
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// 取消本次请求
    pub fn cancel(&self) {
        self.token.cancel();
    }
}

impl Future for AnalysisHandle {
    type Output = AnalysisOutcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        // 任务异常退出时发送端被丢弃，按取消处理
        self.receiver
            .poll_unpin(cx)
            .map(|received| received.unwrap_or(AnalysisOutcome::Cancelled))
    }
}
