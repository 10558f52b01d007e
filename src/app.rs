//! 应用编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：初始化日志文件、创建 HTTP 后端和分析管理器，
//!    尚无共享管理器时登记为共享管理器
//! 2. **逐个分析**：按顺序把每个文件交给管理器，等待结果后再处理下一个
//! 3. **取消**：Ctrl-C 取消正在进行的分析并停止处理剩余文件
//! 4. **统计**：把每个结果写入输出日志，最后汇总
//!
//! 不做具体的分析判断，只做调度和统计

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, error, info, warn};

use crate::backend::HttpAnalysisBackend;
use crate::cancellation::CancellationToken;
use crate::config::Config;
use crate::manager::{self, AnalysisManager, AnalysisOutcome};
use crate::utils::logging;

/// 应用主结构
pub struct App {
    config: Config,
    manager: AnalysisManager,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        logging::init_log_file(&config.output_log_file)
            .with_context(|| format!("无法创建输出日志: {}", config.output_log_file))?;

        let backend = HttpAnalysisBackend::new(&config).context("无法创建 HTTP 客户端")?;
        let manager = AnalysisManager::new(Arc::new(backend), &config);

        let shared = manager::init_shared(|| manager.clone());
        if !shared.ptr_eq(&manager) {
            warn!("⚠️ 共享管理器已存在，本应用使用按当前配置新建的管理器");
        }

        Ok(Self { config, manager })
    }

    /// 使用已有的管理器创建应用
    pub fn with_manager(config: Config, manager: AnalysisManager) -> Self {
        Self { config, manager }
    }

    pub fn manager(&self) -> &AnalysisManager {
        &self.manager
    }

    /// 运行应用主逻辑
    pub async fn run(&self, paths: Vec<PathBuf>) -> Result<RunStats> {
        if paths.is_empty() {
            warn!("⚠️ 没有指定待分析的文件，程序结束");
            return Ok(RunStats::default());
        }

        logging::log_startup(&self.config.backend_base_url, paths.len());

        let stop = CancellationToken::new();
        let interrupt = self.spawn_interrupt_watcher(stop.clone());
        let listener = self.spawn_event_listener();

        let mut stats = RunStats::default();
        for path in &paths {
            if stop.is_cancelled() {
                stats.cancelled += 1;
                continue;
            }

            let outcome = match self.analyze_file(path).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!("❌ {}: {:#}", path.display(), e);
                    self.record(path, &format!("读取失败: {:#}", e));
                    stats.failed += 1;
                    continue;
                }
            };

            let line = match &outcome {
                AnalysisOutcome::Completed(report) => {
                    stats.success += 1;
                    format!("成功 文档 {} 提取结果 {:?}", report.document.id, report.result)
                }
                AnalysisOutcome::Failed(failure) => {
                    stats.failed += 1;
                    format!("失败 {}", failure.error)
                }
                AnalysisOutcome::Cancelled => {
                    stats.cancelled += 1;
                    "已取消".to_string()
                }
            };
            self.record(path, &line);
        }

        interrupt.abort();
        listener.abort();

        logging::print_final_stats(
            stats.success,
            stats.failed,
            stats.cancelled,
            &self.config.output_log_file,
        );

        Ok(stats)
    }

    /// 读取并分析单个文件
    async fn analyze_file(&self, path: &Path) -> Result<AnalysisOutcome> {
        let payload = tokio::fs::read(path)
            .await
            .with_context(|| format!("无法读取文件: {}", path.display()))?;

        info!("📁 {} ({} 字节)", path.display(), payload.len());

        let handle = self.manager.analyze(payload, CancellationToken::new());
        Ok(handle.await)
    }

    /// 写入输出日志，失败只记录警告
    fn record(&self, path: &Path, line: &str) {
        let line = format!("{} | {}", path.display(), logging::truncate_text(line, 200));
        if let Err(e) = logging::append_log_line(&self.config.output_log_file, &line) {
            warn!("写入输出日志失败: {}", e);
        }
    }

    /// Ctrl-C 时取消当前分析并停止后续文件
    fn spawn_interrupt_watcher(&self, stop: CancellationToken) -> tokio::task::JoinHandle<()> {
        let manager = self.manager.clone();
        tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                warn!("⏹ 收到中断信号，取消分析");
                stop.cancel();
                manager.cancel_analysis();
            }
        })
    }

    /// 在详细模式下输出事件负载
    fn spawn_event_listener(&self) -> tokio::task::JoinHandle<()> {
        let mut events = self.manager.subscribe();
        let verbose = self.config.verbose_logging;
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) if verbose => info!("📣 {} {}", event.name(), event.user_info()),
                    Ok(event) => debug!("📣 {}", event.name()),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("事件订阅落后，跳过 {} 个事件", skipped)
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }
}

/// 处理统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    pub success: usize,
    pub failed: usize,
    pub cancelled: usize,
}
