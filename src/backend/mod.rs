//! 分析后端 - 基础设施层
//!
//! 管理器只把后端当作一个不透明的异步函数：
//! 输入文档数据，返回提取结果和文档，或者错误。

pub mod http;

use futures::future::BoxFuture;

use crate::error::AnalysisResult;
use crate::models::{AnalysisDocument, AnalysisReport};

pub use http::HttpAnalysisBackend;

/// 分析后端
///
/// 职责：
/// - 把文档数据提交给远程分析服务
/// - 把服务的响应或传输失败映射为 `AnalysisReport` / `AnalysisError`
/// - 不关心取消、并发和状态，这些由管理器负责
pub trait AnalysisBackend: Send + Sync {
    /// 分析文档
    ///
    /// # 参数
    /// - `payload`: 文档原始数据
    /// - `document`: 管理器为这份数据生成的本地文档描述
    fn analyze<'a>(
        &'a self,
        payload: Vec<u8>,
        document: &'a AnalysisDocument,
    ) -> BoxFuture<'a, AnalysisResult<AnalysisReport>>;
}
