// crates/wm_config/src/error.rs

//! 配置层错误类型

use wm_foundation::WmError;

/// 配置错误
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO 错误
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    /// 解析错误
    #[error("解析错误: {0}")]
    Parse(String),

    /// 无效值
    #[error("无效值 '{key}': {value} - {reason}")]
    InvalidValue {
        /// 配置键
        key: String,
        /// 配置值
        value: String,
        /// 原因
        reason: String,
    },

    /// 表格形状不匹配
    #[error("表格 '{key}' 形状不匹配: 期望 {expected}, 实际 {actual}")]
    Shape {
        /// 配置键
        key: String,
        /// 期望长度
        expected: usize,
        /// 实际长度
        actual: usize,
    },

    /// 不支持的名称
    #[error("不支持的{what} '{name}', 可用: {supported}")]
    Unsupported {
        /// 名称所属类别
        what: &'static str,
        /// 输入名称
        name: String,
        /// 可用名称列表
        supported: &'static str,
    },
}

impl ConfigError {
    /// 构造无效值错误
    pub fn invalid(key: impl Into<String>, value: impl ToString, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// 构造形状错误
    pub fn shape(key: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::Shape {
            key: key.into(),
            expected,
            actual,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

impl From<ConfigError> for WmError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Io(e) => WmError::io_with_source("读取配置失败", e),
            ConfigError::Parse(msg) => WmError::serialization(msg),
            ConfigError::InvalidValue { key, value, reason } => WmError::InvalidConfig {
                key,
                value,
                reason,
            },
            other => WmError::config(other.to_string()),
        }
    }
}
