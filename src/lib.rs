//! # Document Analysis
//!
//! 单任务、可取消的文档分析请求管理器
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `backend/` - 远程分析服务的异步接口，`HttpAnalysisBackend` 为 HTTP 实现
//! - `cancellation` - 被动的取消令牌
//!
//! ### ② 业务能力层（Manager）
//! - `manager/` - 同一时刻至多一个分析，持有最近一次的结果/错误/文档
//! - 结果通过 `AnalysisHandle`、完成回调和广播事件交付
//!
//! ### ③ 编排层（Orchestration）
//! - `app` - 逐个分析命令行指定的文件，Ctrl-C 取消
//!
//! ## 模块结构

pub mod app;
pub mod backend;
pub mod cancellation;
pub mod config;
pub mod error;
pub mod manager;
pub mod models;
pub mod utils;

// 重新导出常用类型
pub use app::{App, RunStats};
pub use backend::{AnalysisBackend, HttpAnalysisBackend};
pub use cancellation::CancellationToken;
pub use config::Config;
pub use error::{AnalysisError, AnalysisResult};
pub use manager::{
    init_shared, shared_manager, AnalysisEvent, AnalysisHandle, AnalysisManager, AnalysisOutcome,
    ManagerSnapshot,
};
pub use models::{AnalysisDocument, AnalysisFailure, AnalysisReport, ContentType, Extractions};
