use thiserror::Error;

/// 分析错误类型
///
/// 所有错误都通过完成回调或 `DidReceiveError` 事件交付，
/// 不会从 `analyze` 同步返回。
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// 文档数据为空或格式无法识别（调用方错误）
    #[error("无效的文档数据: {reason}")]
    InvalidPayload { reason: String },

    /// 网络或传输层失败
    #[error("后端请求失败 ({endpoint}): {message}")]
    BackendFailure { endpoint: String, message: String },

    /// 后端理解了请求但无法完成分析
    #[error("后端拒绝分析: {reason}")]
    AnalysisRejected { reason: String },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 读取配置文件失败
    #[error("读取配置文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
}

// ========== 便捷构造函数 ==========

impl AnalysisError {
    /// 创建无效数据错误
    pub fn invalid_payload(reason: impl Into<String>) -> Self {
        AnalysisError::InvalidPayload {
            reason: reason.into(),
        }
    }

    /// 创建后端请求失败错误
    pub fn backend_failure(endpoint: impl Into<String>, message: impl ToString) -> Self {
        AnalysisError::BackendFailure {
            endpoint: endpoint.into(),
            message: message.to_string(),
        }
    }

    /// 创建分析被拒绝错误
    pub fn rejected(reason: impl Into<String>) -> Self {
        AnalysisError::AnalysisRejected {
            reason: reason.into(),
        }
    }

    /// 是否为调用方错误
    pub fn is_caller_error(&self) -> bool {
        matches!(self, AnalysisError::InvalidPayload { .. })
    }
}

// ========== Result 类型别名 ==========

/// 分析结果类型
pub type AnalysisResult<T> = Result<T, AnalysisError>;
