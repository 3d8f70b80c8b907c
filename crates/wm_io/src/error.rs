// crates/wm_io/src/error.rs
//! IO 错误类型定义
//!
//! 检查点与运动记录的读写错误，可转换为 WmError 以实现跨层错误传递。

use thiserror::Error;
use wm_foundation::WmError;

/// IO 模块结果类型别名
pub type IoResult<T> = Result<T, IoError>;

/// IO 错误枚举
#[derive(Error, Debug)]
pub enum IoError {
    /// 文件读写失败
    #[error("文件读写失败: {0}")]
    File(#[from] std::io::Error),

    /// 序列化或解析失败
    #[error("格式错误: {0}")]
    Format(String),

    /// 版本不兼容
    #[error("检查点版本不兼容: 文件版本 {file}, 当前版本 {current}")]
    Version {
        /// 文件中的版本
        file: u32,
        /// 当前支持的版本
        current: u32,
    },

    /// 检查点内容不一致
    #[error("检查点损坏: {checkpoint}, 原因: {reason}")]
    CheckpointCorruption {
        /// 检查点名称或路径
        checkpoint: String,
        /// 原因
        reason: String,
    },

    /// 基础层错误转换
    #[error("基础层错误: {0}")]
    Foundation(#[from] WmError),
}

impl From<serde_json::Error> for IoError {
    fn from(err: serde_json::Error) -> Self {
        IoError::Format(err.to_string())
    }
}

impl From<IoError> for WmError {
    fn from(err: IoError) -> Self {
        match err {
            IoError::File(e) => WmError::io_with_source("检查点读写失败", e),
            IoError::Format(msg) => WmError::serialization(msg),
            IoError::Version { file, current } => WmError::serialization(format!(
                "检查点版本不兼容 (文件 {file}, 当前 {current})"
            )),
            IoError::CheckpointCorruption { checkpoint, reason } => {
                WmError::internal(format!("检查点损坏 [{checkpoint}]: {reason}"))
            }
            IoError::Foundation(wm_err) => wm_err,
        }
    }
}
