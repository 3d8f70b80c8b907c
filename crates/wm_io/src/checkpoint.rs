// crates/wm_io/src/checkpoint.rs

//! 造波板检查点保存/恢复
//!
//! 检查点同时保存配置和每块板的全部状态，恢复后的边界与中断前逐位一致。
//! 格式为 JSON，浮点数按最短往返表示写出，读回后数值不变。
//!
//! 写入先落到临时文件，成功后重命名，中途失败不会破坏已有检查点。
//!
//! # 使用示例
//!
//! ```rust,ignore
//! use wm_io::checkpoint::WavemakerCheckpoint;
//!
//! let checkpoint = WavemakerCheckpoint::capture(&boundary);
//! checkpoint.save(Path::new("inlet.wmck.json"))?;
//!
//! let boundary = WavemakerCheckpoint::load(Path::new("inlet.wmck.json"))?.restore()?;
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use wm_config::WavemakerConfig;
use wm_foundation::WmResult;
use wm_physics::{PaddleState, WavemakerBoundary};

use crate::error::{IoError, IoResult};

/// 检查点格式版本
pub const CHECKPOINT_VERSION: u32 = 1;

/// 造波板检查点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WavemakerCheckpoint {
    /// 格式版本
    pub version: u32,
    /// 边界名称
    pub patch: String,
    /// 上次步进的时间 [s]
    #[serde(rename = "lastUpdate")]
    pub last_update: Option<f64>,
    /// 创建时间戳
    #[serde(rename = "createdAt", default)]
    pub created_at: u64,
    /// 运行配置
    pub config: WavemakerConfig,
    /// 各板状态
    pub paddles: Vec<PaddleState>,
}

impl WavemakerCheckpoint {
    /// 记录边界当前状态
    pub fn capture(boundary: &WavemakerBoundary) -> Self {
        Self {
            version: CHECKPOINT_VERSION,
            patch: boundary.name().to_string(),
            last_update: boundary.last_update(),
            created_at: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
            config: boundary.config().clone(),
            paddles: boundary.paddles().to_vec(),
        }
    }

    /// 重建边界
    pub fn restore(self) -> WmResult<WavemakerBoundary> {
        self.check(&self.patch)?;
        WavemakerBoundary::restore(self.patch, self.config, self.paddles, self.last_update)
    }

    /// 检查版本与状态数量
    fn check(&self, source: &str) -> IoResult<()> {
        if self.version > CHECKPOINT_VERSION {
            return Err(IoError::Version {
                file: self.version,
                current: CHECKPOINT_VERSION,
            });
        }
        if self.paddles.len() != self.config.n_paddles {
            return Err(IoError::CheckpointCorruption {
                checkpoint: source.to_string(),
                reason: format!(
                    "nPaddles = {}, 但保存了 {} 块板的状态",
                    self.config.n_paddles,
                    self.paddles.len()
                ),
            });
        }
        if let Some(i) = self.paddles.iter().position(|s| !s.is_consistent()) {
            return Err(IoError::CheckpointCorruption {
                checkpoint: source.to_string(),
                reason: format!("板 {} 的漂移保护状态不一致", i),
            });
        }
        Ok(())
    }

    /// 序列化为 JSON
    pub fn to_json_string(&self) -> IoResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// 从 JSON 解析
    pub fn from_json_str(content: &str) -> IoResult<Self> {
        let checkpoint: Self = serde_json::from_str(content)?;
        checkpoint.check("<memory>")?;
        Ok(checkpoint)
    }

    /// 保存到文件
    pub fn save(&self, path: &Path) -> IoResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        // 使用临时文件写入，成功后重命名（原子操作）
        let temp_path = path.with_extension("tmp");
        {
            let file = File::create(&temp_path)?;
            let mut writer = BufWriter::new(file);
            writer.write_all(self.to_json_string()?.as_bytes())?;
            writer.flush()?;
        }
        std::fs::rename(&temp_path, path)?;

        tracing::debug!("Saved checkpoint '{}' to {}", self.patch, path.display());
        Ok(())
    }

    /// 从文件加载
    pub fn load(path: &Path) -> IoResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let checkpoint: Self = serde_json::from_str(&content)?;
        checkpoint.check(&path.display().to_string())?;
        Ok(checkpoint)
    }
}
