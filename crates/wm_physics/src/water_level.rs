// crates/wm_physics/src/water_level.rs

//! 造波板前的水位估计
//!
//! 造波板边界面上的体积分数（相指示函数）按横向坐标分到 N 个等宽条带，
//! 每个条带内积分 `Σ alpha * area` 得到湿面积，除以条带宽度即为平均界面高度。
//! 这是有限体积相场的一阶近似，不做界面重构。
//!
//! 湿面积之和与边界范围都经过 [`PatchReduce`] 归约后再使用，保证并行时
//! 每个子域得到相同的水位。

use glam::DVec3;
use serde::{Deserialize, Serialize};

use wm_foundation::{WmError, WmResult};

use crate::interp::paddle_index;
use crate::reduce::PatchReduce;

/// 边界面采样
///
/// 每个时间步由宿主的场数据重新提供，只在本步内使用。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceSample {
    /// 面积 [m²]
    pub area: f64,
    /// 面心坐标
    pub centre: DVec3,
    /// 体积分数（1 为水，0 为气）
    pub alpha: f64,
}

impl FaceSample {
    /// 创建面采样
    pub fn new(area: f64, centre: DVec3, alpha: f64) -> Self {
        Self {
            area,
            centre,
            alpha,
        }
    }
}

/// 边界点集的全局范围
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatchExtent {
    /// 横向最小值
    pub y_min: f64,
    /// 横向最大值
    pub y_max: f64,
    /// 竖向最小值
    pub z_min: f64,
    /// 竖向最大值
    pub z_max: f64,
}

impl PatchExtent {
    /// 由边界点计算全局范围
    ///
    /// 本地点集可以为空（子域不含该边界），归约后仍须得到有限范围。
    pub fn from_points<R: PatchReduce>(points: &[DVec3], reduce: &R) -> WmResult<Self> {
        let mut y_min = f64::INFINITY;
        let mut y_max = f64::NEG_INFINITY;
        let mut z_min = f64::INFINITY;
        let mut z_max = f64::NEG_INFINITY;
        for p in points {
            if !p.is_finite() {
                return Err(WmError::invalid_input(format!("造波板边界点坐标非法: {:?}", p)));
            }
            y_min = y_min.min(p.y);
            y_max = y_max.max(p.y);
            z_min = z_min.min(p.z);
            z_max = z_max.max(p.z);
        }

        let extent = Self {
            y_min: reduce.min(y_min),
            y_max: reduce.max(y_max),
            z_min: reduce.min(z_min),
            z_max: reduce.max(z_max),
        };

        if !(extent.y_min.is_finite() && extent.y_max.is_finite())
            || !(extent.z_min.is_finite() && extent.z_max.is_finite())
        {
            return Err(WmError::invalid_input("造波板边界没有任何点"));
        }
        Ok(extent)
    }

    /// 横向跨度
    #[inline]
    pub fn y_span(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// 竖向跨度
    #[inline]
    pub fn z_span(&self) -> f64 {
        self.z_max - self.z_min
    }
}

/// 各条带的湿面积部分和
#[derive(Debug, Clone, PartialEq)]
pub struct BandSums {
    wet_area: Vec<f64>,
}

impl BandSums {
    /// 累加本地面
    pub fn accumulate(faces: &[FaceSample], extent: &PatchExtent, n_paddles: usize) -> Self {
        let mut wet_area = vec![0.0; n_paddles];
        let y_span = extent.y_span();
        for face in faces {
            let band = paddle_index(face.centre.y, extent.y_min, y_span, n_paddles);
            wet_area[band] += face.alpha * face.area;
        }
        Self { wet_area }
    }

    /// 合并另一组部分和
    pub fn merge(&mut self, other: &BandSums) {
        for (a, b) in self.wet_area.iter_mut().zip(&other.wet_area) {
            *a += b;
        }
    }

    /// 部分和
    pub fn wet_area(&self) -> &[f64] {
        &self.wet_area
    }

    /// 全局归约后换算为水位
    ///
    /// 水位 = 湿面积 / 条带宽度，不超过边界竖向跨度。
    pub fn into_levels<R: PatchReduce>(mut self, extent: &PatchExtent, reduce: &R) -> Vec<f64> {
        reduce.sum_in_place(&mut self.wet_area);

        let n = self.wet_area.len().max(1) as f64;
        let band_width = extent.y_span() / n;
        let cap = extent.z_span();
        self.wet_area
            .into_iter()
            .map(|area| {
                if band_width > 0.0 {
                    (area / band_width).min(cap)
                } else {
                    0.0
                }
            })
            .collect()
    }
}

/// 估计每块板前的水位 [m]，从边界底部起算
pub fn estimate_water_level<R: PatchReduce>(
    faces: &[FaceSample],
    extent: &PatchExtent,
    n_paddles: usize,
    reduce: &R,
) -> Vec<f64> {
    BandSums::accumulate(faces, extent, n_paddles).into_levels(extent, reduce)
}
