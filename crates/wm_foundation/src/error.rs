// crates/wm_foundation/src/error.rs

//! 错误处理模块，定义统一错误类型
//!
//! 提供 `WmError` 枚举和 `WmResult` 类型别名。造波板控制只有两类失败：
//! 配置错误和数值前提被破坏，两者都是致命的，由宿主终止模拟。
//! 冲程接近极限不是错误，由漂移保护状态机处理。
//!
//! # 示例
//!
//! ```
//! use wm_foundation::error::{WmError, WmResult};
//!
//! fn read_config() -> WmResult<()> {
//!     Err(WmError::config("不支持的造波板类型"))
//! }
//! ```

use thiserror::Error;

/// 统一结果类型
pub type WmResult<T> = Result<T, WmError>;

/// 造波板错误类型
#[derive(Error, Debug)]
pub enum WmError {
    // ========================================================================
    // 配置错误
    // ========================================================================
    /// 配置错误
    #[error("配置错误: {message}")]
    Config {
        /// 具体错误信息
        message: String,
    },

    /// 配置值无效
    #[error("配置值无效: {key}={value}, 原因: {reason}")]
    InvalidConfig {
        /// 配置键名
        key: String,
        /// 配置值
        value: String,
        /// 无效原因说明
        reason: String,
    },

    /// 数组大小不匹配
    #[error("数组大小不匹配: {name} 期望{expected}, 实际{actual}")]
    SizeMismatch {
        /// 数据名称
        name: &'static str,
        /// 期望大小
        expected: usize,
        /// 实际大小
        actual: usize,
    },

    // ========================================================================
    // 数值前提
    // ========================================================================
    /// 查询时间超出时间序列范围
    #[error("时间 {time} 超出时间序列范围 [{min}, {max}]")]
    TimeOutOfRange {
        /// 查询时间 [s]
        time: f64,
        /// 序列起点 [s]
        min: f64,
        /// 序列终点 [s]
        max: f64,
    },

    /// 零长度插值区间
    #[error("零长度插值区间: t0={t0}, t1={t1}")]
    DegenerateInterval {
        /// 区间起点
        t0: f64,
        /// 区间终点
        t1: f64,
    },

    /// 无效输入
    #[error("无效的输入数据: {message}")]
    InvalidInput {
        /// 说明无效原因
        message: String,
    },

    // ========================================================================
    // IO 相关错误
    // ========================================================================
    /// IO 错误
    #[error("IO错误: {message}")]
    Io {
        /// 描述性错误信息
        message: String,
        #[source]
        /// 可选的底层 IO 错误
        source: Option<std::io::Error>,
    },

    /// 序列化错误
    #[error("序列化错误: {message}")]
    Serialization {
        /// 序列化失败原因
        message: String,
    },

    /// 内部错误
    #[error("内部错误: {message}")]
    Internal {
        /// 内部错误描述
        message: String,
    },
}

// ========================================================================
// 便捷构造方法
// ========================================================================

impl WmError {
    /// 配置错误
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// 配置值无效
    pub fn invalid_config(
        key: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidConfig {
            key: key.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// 数组大小不匹配
    pub fn size_mismatch(name: &'static str, expected: usize, actual: usize) -> Self {
        Self::SizeMismatch {
            name,
            expected,
            actual,
        }
    }

    /// 时间超出范围
    pub fn time_out_of_range(time: f64, min: f64, max: f64) -> Self {
        Self::TimeOutOfRange { time, min, max }
    }

    /// 零长度区间
    pub fn degenerate_interval(t0: f64, t1: f64) -> Self {
        Self::DegenerateInterval { t0, t1 }
    }

    /// 无效输入
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// 从IO错误创建（带源）
    pub fn io_with_source(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(source),
        }
    }

    /// 序列化错误
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// 内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// 是否为配置类错误
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Self::Config { .. } | Self::InvalidConfig { .. } | Self::SizeMismatch { .. }
        )
    }

    /// 是否为数值前提错误
    pub fn is_numerical(&self) -> bool {
        matches!(
            self,
            Self::TimeOutOfRange { .. } | Self::DegenerateInterval { .. }
        )
    }
}

// ========================================================================
// 验证辅助方法
// ========================================================================

impl WmError {
    /// 检查数组大小是否匹配
    #[inline]
    pub fn check_size(name: &'static str, expected: usize, actual: usize) -> WmResult<()> {
        if expected != actual {
            Err(Self::size_mismatch(name, expected, actual))
        } else {
            Ok(())
        }
    }
}

/// 条件不满足时返回错误
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $err:expr) => {
        if !$cond {
            return Err($err.into());
        }
    };
}

/// 验证Option，None时返回错误
#[macro_export]
macro_rules! require {
    ($opt:expr, $err:expr) => {
        match $opt {
            Some(v) => v,
            None => return Err($err.into()),
        }
    };
}

// ========================================================================
// 标准库错误转换
// ========================================================================

impl From<std::io::Error> for WmError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
            source: Some(err),
        }
    }
}
