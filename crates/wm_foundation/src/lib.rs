// crates/wm_foundation/src/lib.rs

//! Wavemaker Foundation Layer
//!
//! 基础层，提供整个工作区共享的错误类型和校验工具。
//!
//! # 模块概览
//!
//! - [`error`]: 统一错误类型 `WmError` / `WmResult`
//! - [`tolerance`]: 数值比较容差
//!
//! # 示例
//!
//! ```
//! use wm_foundation::{ensure, WmError, WmResult};
//!
//! fn check_paddles(n: usize) -> WmResult<()> {
//!     ensure!(n >= 1, WmError::config("nPaddles 必须 >= 1"));
//!     Ok(())
//! }
//!
//! assert!(check_paddles(2).is_ok());
//! assert!(check_paddles(0).is_err());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod tolerance;

pub use error::{WmError, WmResult};

/// Prelude 模块，包含常用类型
pub mod prelude {
    pub use crate::error::{WmError, WmResult};
    pub use crate::tolerance::{approx_eq, GRAVITY};
    pub use crate::{ensure, require};
}
