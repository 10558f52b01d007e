//! 分析管理器 - 业务能力层
//!
//! ## 职责
//!
//! - 同一时刻至多一个分析在进行：新的请求会取消并取代正在进行的请求
//! - 持有最近一次完成的分析的 `error` / `result` / `document`
//! - 分析完成时先广播事件，再调用请求方的回调、唤醒其 `AnalysisHandle`
//!
//! ## 取消
//!
//! 取消是协作式的：后端请求不会被中断，只是晚到的响应会被丢弃。
//! 结束时在写锁内只读取一次令牌的取消标志，所以与并发的
//! `cancel_analysis()` 之间不存在竞态：要么取消先发生（结果被丢弃），
//! 要么结束先发生（令牌已不是当前令牌，取消无效果）。
//!
//! ## 生命周期
//!
//! ```text
//! idle → running → {completed-success | completed-error | cancelled-discarded} → idle
//! ```

pub mod events;
pub mod handle;
pub mod shared;
mod state;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::{broadcast, oneshot};
use tracing::{debug, info, warn};

use crate::backend::AnalysisBackend;
use crate::cancellation::CancellationToken;
use crate::config::Config;
use crate::error::AnalysisError;
use crate::models::{AnalysisDocument, AnalysisFailure, AnalysisReport, Extractions};

pub use events::AnalysisEvent;
pub use handle::{AnalysisHandle, AnalysisOutcome};
pub use shared::{init_shared, shared_manager};
pub use state::ManagerSnapshot;

use state::ManagerState;

/// 完成回调
pub type CompletionCallback = Box<dyn FnOnce(Result<AnalysisReport, AnalysisFailure>) + Send>;

/// 分析管理器
///
/// 克隆得到的是同一个管理器的句柄
#[derive(Clone)]
pub struct AnalysisManager {
    inner: Arc<Inner>,
}

struct Inner {
    backend: Arc<dyn AnalysisBackend>,
    state: RwLock<ManagerState>,
    events: broadcast::Sender<AnalysisEvent>,
    document_sequence: AtomicU64,
}

impl AnalysisManager {
    /// 创建新的分析管理器
    pub fn new(backend: Arc<dyn AnalysisBackend>, config: &Config) -> Self {
        let (events, _) = broadcast::channel(config.event_channel_capacity.max(1));

        Self {
            inner: Arc::new(Inner {
                backend,
                state: RwLock::new(ManagerState::default()),
                events,
                document_sequence: AtomicU64::new(0),
            }),
        }
    }

    /// 分析文档
    ///
    /// 立即返回，分析在 tokio 运行时中进行（必须在运行时内调用）。
    /// 结果通过返回的句柄和事件交付；数据无效同样通过这两个渠道报告。
    ///
    /// # 参数
    /// - `payload`: 文档原始数据
    /// - `token`: 请求方持有的取消令牌
    pub fn analyze(&self, payload: impl Into<Vec<u8>>, token: CancellationToken) -> AnalysisHandle {
        self.start(payload.into(), token, None)
    }

    /// 分析文档，完成时额外调用 `on_complete`
    ///
    /// 被取消的请求不会调用 `on_complete`。
    ///
    /// `on_complete` 在共享状态更新、事件发出之后调用。回调 panic 时，
    /// 状态和事件保持已完成的结果，但句柄会解析为 `Cancelled`。
    pub fn analyze_with_completion<F>(
        &self,
        payload: impl Into<Vec<u8>>,
        token: CancellationToken,
        on_complete: F,
    ) -> AnalysisHandle
    where
        F: FnOnce(Result<AnalysisReport, AnalysisFailure>) + Send + 'static,
    {
        self.start(payload.into(), token, Some(Box::new(on_complete)))
    }

    /// 取消正在进行的分析
    ///
    /// 没有正在进行的分析时返回 `false`。不修改结果状态，也不触发回调和事件。
    pub fn cancel_analysis(&self) -> bool {
        let state = self.inner.write_state();
        match &state.current_token {
            Some(token) => {
                info!("⏹ 取消正在进行的分析");
                token.cancel();
                true
            }
            None => {
                debug!("没有正在进行的分析，忽略取消");
                false
            }
        }
    }

    /// 订阅分析事件
    pub fn subscribe(&self) -> broadcast::Receiver<AnalysisEvent> {
        self.inner.events.subscribe()
    }

    /// 最近一次失败的错误
    pub fn error(&self) -> Option<Arc<AnalysisError>> {
        self.inner.read_state().error.clone()
    }

    /// 最近一次成功的提取结果
    pub fn result(&self) -> Option<Extractions> {
        self.inner.read_state().result.clone()
    }

    /// 最近一次分析的文档
    pub fn document(&self) -> Option<AnalysisDocument> {
        self.inner.read_state().document.clone()
    }

    /// 是否有正在进行的分析
    pub fn is_analyzing(&self) -> bool {
        self.inner.read_state().current_token.is_some()
    }

    pub fn snapshot(&self) -> ManagerSnapshot {
        ManagerSnapshot::from(&*self.inner.read_state())
    }

    /// 两个句柄是否指向同一个管理器
    pub fn ptr_eq(&self, other: &AnalysisManager) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn start(
        &self,
        payload: Vec<u8>,
        token: CancellationToken,
        on_complete: Option<CompletionCallback>,
    ) -> AnalysisHandle {
        let sequence = self.inner.document_sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let prepared = AnalysisDocument::from_payload(format!("local-{}", sequence), &payload);

        {
            let mut state = self.inner.write_state();
            if let Some(previous) = state.current_token.replace(token.clone()) {
                if previous.ptr_eq(&token) {
                    warn!("⚠️ 令牌已被正在进行的分析使用，先完成的请求生效");
                } else {
                    info!("⏹ 新的分析请求取代了正在进行的分析");
                    previous.cancel();
                }
            }
            if let Ok(document) = &prepared {
                state.document = Some(document.clone());
            }
        }

        match &prepared {
            Ok(document) => info!(
                "📄 开始分析文档 {} ({}, {} 字节)",
                document.id,
                document.content_type.mime(),
                document.size
            ),
            Err(e) => warn!("⚠️ 文档数据无效: {}", e),
        }

        let (sender, receiver) = oneshot::channel();
        let inner = Arc::clone(&self.inner);
        let task_token = token.clone();

        tokio::spawn(async move {
            let outcome = match prepared {
                Ok(document) => match inner.backend.analyze(payload, &document).await {
                    Ok(report) => Ok(report),
                    Err(error) => Err(AnalysisFailure::new(error, Some(document))),
                },
                Err(error) => Err(AnalysisFailure::new(error, None)),
            };

            let delivered = inner.finish(&task_token, outcome, on_complete);
            // 请求方可能已丢弃句柄
            let _ = sender.send(delivered);
        });

        AnalysisHandle::new(token, receiver)
    }
}

impl Inner {
    fn read_state(&self) -> RwLockReadGuard<'_, ManagerState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, ManagerState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// 结束一次分析
    ///
    /// 只有未取消且仍是当前令牌的请求可以修改共享状态。
    /// 事件在写锁内发送，事件顺序与状态写入顺序一致；回调在释放锁后调用。
    fn finish(
        &self,
        token: &CancellationToken,
        outcome: Result<AnalysisReport, AnalysisFailure>,
        on_complete: Option<CompletionCallback>,
    ) -> AnalysisOutcome {
        {
            let mut state = self.write_state();
            let is_current = state
                .current_token
                .as_ref()
                .is_some_and(|current| current.ptr_eq(token));
            let cancelled = token.is_cancelled();

            if is_current {
                state.current_token = None;
            }

            if cancelled || !is_current {
                warn!("⏹ 分析已取消，丢弃后端响应");
                return AnalysisOutcome::Cancelled;
            }

            match &outcome {
                Ok(report) => {
                    info!(
                        "✓ 文档 {} 分析完成，提取到 {} 项",
                        report.document.id,
                        report.result.len()
                    );
                    state.result = Some(report.result.clone());
                    state.error = None;
                    state.document = Some(report.document.clone());
                    self.emit(AnalysisEvent::DidReceiveResult {
                        result: report.result.clone(),
                        document: report.document.clone(),
                    });
                }
                Err(failure) => {
                    warn!("❌ 分析失败: {}", failure.error);
                    state.error = Some(Arc::clone(&failure.error));
                    state.result = None;
                    state.document = failure.document.clone();
                    self.emit(AnalysisEvent::DidReceiveError {
                        error: Arc::clone(&failure.error),
                        document: failure.document.clone(),
                    });
                }
            }
        }

        if let Some(callback) = on_complete {
            callback(outcome.clone());
        }

        match outcome {
            Ok(report) => AnalysisOutcome::Completed(report),
            Err(failure) => AnalysisOutcome::Failed(failure),
        }
    }

    fn emit(&self, event: AnalysisEvent) {
        let name = event.name();
        match self.events.send(event) {
            Ok(receivers) => debug!("事件 {} 已发送给 {} 个订阅者", name, receivers),
            Err(_) => debug!("事件 {} 没有订阅者", name),
        }
    }
}
