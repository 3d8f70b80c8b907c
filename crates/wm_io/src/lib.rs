// crates/wm_io/src/lib.rs

//! Wavemaker IO 模块
//!
//! 提供造波板状态的持久化与运动记录输出。
//!
//! # 模块
//!
//! - [`checkpoint`]: 检查点保存/恢复（配置 + 各板状态）
//! - [`motion_log`]: 逐步运动记录（CSV）
//! - [`error`]: IO 错误类型

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod checkpoint;
pub mod error;
pub mod motion_log;

// 重导出常用类型
pub use checkpoint::{WavemakerCheckpoint, CHECKPOINT_VERSION};
pub use error::{IoError, IoResult};
pub use motion_log::MotionLog;
