// crates/wm_config/src/lib.rs

//! Wavemaker Config Layer (Layer 2)
//!
//! 配置层，描述一次运行中不变的造波板参数。配置由外部解析后整体注入，
//! 核心算法只读取完整填充的 [`WavemakerConfig`]。
//!
//! # 模块概览
//!
//! - [`kind`]: 造波板类型（Piston / Flap / Mixed）
//! - [`wavemaker`]: `WavemakerConfig` 及默认值、加载、校验
//! - [`error`]: 配置错误类型
//!
//! # 层级架构
//!
//! ```text
//! Layer 5: wm_cli        ─> 读写配置文件
//! Layer 4: wm_io         ─> 检查点中携带配置
//! Layer 3: wm_physics    ─> 只读使用 WavemakerConfig
//! Layer 2: wm_config     (本层)
//! Layer 1: wm_foundation
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod kind;
pub mod wavemaker;

/// 层级标识
pub const LAYER: u8 = 2;

pub use error::ConfigError;
pub use kind::WavemakerKind;
pub use wavemaker::{WavemakerConfig, MAX_STROKE_DISABLED};
