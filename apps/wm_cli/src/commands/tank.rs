// apps/wm_cli/src/commands/tank.rs

//! 合成平底水槽
//!
//! 造波边界位于 x = 0 的竖直矩形面上，水体为静水，用于在没有外部流体
//! 求解器时驱动边界并检查运动表。

use anyhow::{ensure, Result};
use glam::DVec3;
use wm_physics::FaceSample;

/// 矩形造波边界与静水相场
#[derive(Debug, Clone, Copy)]
pub struct FlatTank {
    width: f64,
    height: f64,
    ny: usize,
    nz: usize,
    depth: f64,
}

impl FlatTank {
    /// 横向宽度 `width`、高度 `height`，划分为 `ny x nz` 个面，静水深 `depth`
    pub fn new(width: f64, height: f64, ny: usize, nz: usize, depth: f64) -> Result<Self> {
        ensure!(width > 0.0 && height > 0.0, "水槽尺寸必须为正: {} x {}", width, height);
        ensure!(ny > 0 && nz > 0, "网格划分必须 >= 1: {} x {}", ny, nz);
        ensure!(
            depth > 0.0 && depth <= height,
            "静水深 {} 必须位于 (0, {}]",
            depth,
            height
        );
        Ok(Self { width, height, ny, nz, depth })
    }

    /// 静水深 [m]
    pub fn depth(&self) -> f64 {
        self.depth
    }

    /// 边界网格点（静止位置）
    pub fn points(&self) -> Vec<DVec3> {
        let mut pts = Vec::with_capacity((self.ny + 1) * (self.nz + 1));
        for j in 0..=self.ny {
            let y = self.width * j as f64 / self.ny as f64;
            for k in 0..=self.nz {
                let z = self.height * k as f64 / self.nz as f64;
                pts.push(DVec3::new(0.0, y, z));
            }
        }
        pts
    }

    /// 边界面采样，部分浸没的面按浸没比例给出 alpha
    pub fn faces(&self) -> Vec<FaceSample> {
        let dy = self.width / self.ny as f64;
        let dz = self.height / self.nz as f64;
        let mut faces = Vec::with_capacity(self.ny * self.nz);
        for j in 0..self.ny {
            for k in 0..self.nz {
                let z0 = k as f64 * dz;
                let alpha = ((self.depth - z0) / dz).clamp(0.0, 1.0);
                faces.push(FaceSample::new(
                    dy * dz,
                    DVec3::new(0.0, (j as f64 + 0.5) * dy, z0 + 0.5 * dz),
                    alpha,
                ));
            }
        }
        faces
    }
}
