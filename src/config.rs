use serde::Deserialize;
use std::path::Path;

use crate::error::ConfigError;

/// 程序配置
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// 分析后端地址
    pub backend_base_url: String,
    /// 分析后端 API Key（为空时不发送认证头）
    pub backend_api_key: String,
    /// 单次后端请求超时（秒）
    pub request_timeout_secs: u64,
    /// 事件通道容量
    pub event_channel_capacity: usize,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_base_url: "http://localhost:8080".to_string(),
            backend_api_key: String::new(),
            request_timeout_secs: 60,
            event_channel_capacity: 16,
            verbose_logging: false,
            output_log_file: "analysis_output.txt".to_string(),
        }
    }
}

impl Config {
    /// 从环境变量加载配置，未设置或无法解析的变量使用默认值
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// 加载配置
    ///
    /// 先读取 `CONFIG_FILE` 指定的 TOML 文件（可选），再应用环境变量覆盖
    pub fn load() -> Result<Self, ConfigError> {
        let base = match std::env::var("CONFIG_FILE") {
            Ok(path) if !path.is_empty() => Self::from_toml_file(&path)?,
            _ => Self::default(),
        };
        Ok(base.with_env_overrides())
    }

    /// 从 TOML 文件加载配置，缺失的字段使用默认值
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.display().to_string(),
            source,
        })
    }

    /// 从 TOML 字符串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    fn with_env_overrides(self) -> Self {
        Self {
            backend_base_url: std::env::var("BACKEND_BASE_URL").unwrap_or(self.backend_base_url),
            backend_api_key: std::env::var("BACKEND_API_KEY").unwrap_or(self.backend_api_key),
            request_timeout_secs: parse_env("REQUEST_TIMEOUT_SECS")
                .unwrap_or(self.request_timeout_secs),
            event_channel_capacity: parse_env("EVENT_CHANNEL_CAPACITY")
                .unwrap_or(self.event_channel_capacity),
            verbose_logging: parse_env("VERBOSE_LOGGING").unwrap_or(self.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(self.output_log_file),
        }
    }

    /// 校验数值型环境变量，返回第一个解析失败的变量
    pub fn check_env() -> Result<(), ConfigError> {
        check_env_var::<u64>("REQUEST_TIMEOUT_SECS", "u64")?;
        check_env_var::<usize>("EVENT_CHANNEL_CAPACITY", "usize")?;
        check_env_var::<bool>("VERBOSE_LOGGING", "bool")?;
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(var_name: &str) -> Option<T> {
    std::env::var(var_name).ok().and_then(|v| v.parse().ok())
}

fn check_env_var<T: std::str::FromStr>(
    var_name: &str,
    expected_type: &str,
) -> Result<(), ConfigError> {
    match std::env::var(var_name) {
        Ok(value) if value.parse::<T>().is_err() => Err(ConfigError::EnvVarParseFailed {
            var_name: var_name.to_string(),
            value,
            expected_type: expected_type.to_string(),
        }),
        _ => Ok(()),
    }
}
