// crates/wm_physics/src/kinematics.rs

//! 运动学映射：每块板的标量 → 边界每个点的三维位移
//!
//! - 活塞：`cos_interp(total, y) * meanAngle`，与高度无关
//! - 摇板：绕铰链转动，铰链以上的点取
//!   `(hingeLocation + arm sinφ, 0, -arm (1 - cosφ))`，铰链及以下的点不动
//! - 混合：两者相加
//!
//! 摇板公式按宿主的点位移场约定原样保留，x 分量含 `hingeLocation` 常数项。

use glam::DVec3;

use wm_config::{WavemakerConfig, WavemakerKind};

use crate::interp::{cos_interp, paddle_centers, tilt_cos_interp};
use crate::water_level::PatchExtent;

// ============================================================
// 几何
// ============================================================

/// 板沿横向的布置
#[derive(Debug, Clone, PartialEq)]
pub struct PaddleLayout {
    y_min: f64,
    y_span: f64,
    z_max: f64,
    centers: Vec<f64>,
}

impl PaddleLayout {
    /// 在边界范围上均匀布置 `n_paddles` 块板
    pub fn new(extent: &PatchExtent, n_paddles: usize) -> Self {
        let y_span = extent.y_span();
        Self {
            y_min: extent.y_min,
            y_span,
            z_max: extent.z_max,
            centers: paddle_centers(extent.y_min, y_span, n_paddles),
        }
    }

    /// 板中心横向坐标
    pub fn centers(&self) -> &[f64] {
        &self.centers
    }

    /// 板数
    pub fn n_paddles(&self) -> usize {
        self.centers.len()
    }

    /// 横向起点
    pub fn y_min(&self) -> f64 {
        self.y_min
    }

    /// 横向跨度
    pub fn y_span(&self) -> f64 {
        self.y_span
    }

    /// 边界顶部高度
    pub fn z_max(&self) -> f64 {
        self.z_max
    }
}

/// 摇板铰链
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HingeGeometry {
    /// 铰链高度 [m]
    pub height: f64,
    /// 铰链水平位置 [m]
    pub location: f64,
}

impl HingeGeometry {
    /// 铰链到板顶的最大力臂
    #[inline]
    pub fn max_arm(&self, layout: &PaddleLayout) -> f64 {
        layout.z_max - self.height
    }
}

// ============================================================
// 单点变换
// ============================================================

/// 活塞位移
#[inline]
pub fn piston_vector(displacement: f64, mean_angle: DVec3) -> DVec3 {
    displacement * mean_angle
}

/// 摇板位移，`tilt_deg` 为该点处插值后的倾角
pub fn flap_vector(point: DVec3, tilt_deg: f64, hinge: &HingeGeometry) -> DVec3 {
    if point.z <= hinge.height {
        return DVec3::ZERO;
    }
    let dx = point.x - hinge.location;
    let dz = point.z - hinge.height;
    let arm = (dx * dx + dz * dz).sqrt();
    let (sin, cos) = tilt_deg.to_radians().sin_cos();
    DVec3::new(hinge.location + arm * sin, 0.0, -arm * (1.0 - cos))
}

// ============================================================
// 映射器
// ============================================================

/// 运动学映射器
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KinematicsMapper {
    kind: WavemakerKind,
    mean_angle: DVec3,
    hinge: Option<HingeGeometry>,
}

impl KinematicsMapper {
    /// 由已校验的配置创建
    pub fn from_config(config: &WavemakerConfig) -> Self {
        let hinge = config.kind.has_tilt().then_some(HingeGeometry {
            height: config.hinge_height,
            location: config.hinge_location,
        });
        Self {
            kind: config.kind,
            mean_angle: config.mean_angle,
            hinge,
        }
    }

    /// 造波板类型
    pub fn kind(&self) -> WavemakerKind {
        self.kind
    }

    /// 计算所有点的位移
    ///
    /// `displacements` 为每块板含全部修正的总位移，`tilts` 为每块板倾角 [deg]。
    /// 对应类型不使用的那一组可以为空。
    pub fn map(
        &self,
        layout: &PaddleLayout,
        displacements: &[f64],
        tilts: &[f64],
        points: &[DVec3],
    ) -> Vec<DVec3> {
        let centers = layout.centers();
        let translate = self.kind.has_displacement() && !displacements.is_empty();
        let rotate = self.hinge.filter(|_| !tilts.is_empty());

        points
            .iter()
            .map(|&p| {
                let mut v = DVec3::ZERO;
                if translate {
                    v += piston_vector(cos_interp(centers, displacements, p.y), self.mean_angle);
                }
                if let Some(hinge) = rotate {
                    let tilt = tilt_cos_interp(centers, tilts, hinge.max_arm(layout), p.y);
                    v += flap_vector(p, tilt, &hinge);
                }
                v
            })
            .collect()
    }
}
