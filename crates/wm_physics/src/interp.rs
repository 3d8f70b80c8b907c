// crates/wm_physics/src/interp.rs

//! 时间与空间插值
//!
//! - [`lin_interp`] / [`TimeBracket`]: 控制时间序列的线性插值，不做任何外推
//! - [`cos_interp`]: 相邻板中心之间的升余弦混合（活塞位移）
//! - [`tilt_cos_interp`]: 按板端位移混合的倾角插值（摇板）
//!
//! 时间插值超出序列范围或遇到零长度区间时返回致命错误，
//! 由宿主终止模拟；空间插值在最外侧板中心以外保持端值。

use std::f64::consts::PI;

use wm_foundation::{WmError, WmResult};

// ============================================================
// 时间插值
// ============================================================

/// 两点线性插值
///
/// `v0 + (v1 - v0) * (t - t0) / (t1 - t0)`，要求 `t0 != t1`。
#[inline]
pub fn lin_interp(t0: f64, t1: f64, v0: f64, v1: f64, t: f64) -> WmResult<f64> {
    if t1 == t0 {
        return Err(WmError::degenerate_interval(t0, t1));
    }
    Ok(v0 + (v1 - v0) * (t - t0) / (t1 - t0))
}

/// 查询时间在控制时间序列中的位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeBracket {
    /// 首个样本已不早于查询时间，直接取样本 0
    Head,
    /// 位于样本 `lo` 与 `hi = lo + 1` 之间
    Between {
        /// 左端样本
        lo: usize,
        /// 右端样本
        hi: usize,
    },
}

impl TimeBracket {
    /// 定位查询时间
    ///
    /// 取最小的 `i` 使 `times[i] >= t`。`t` 不在 `[min, max]` 内时报错。
    pub fn locate(times: &[f64], t: f64) -> WmResult<Self> {
        if times.is_empty() {
            return Err(WmError::invalid_input("时间序列为空"));
        }

        let min = times.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = times.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        if !(t >= min && t <= max) {
            return Err(WmError::time_out_of_range(t, min, max));
        }

        match times.iter().position(|&ti| ti >= t) {
            Some(0) => Ok(Self::Head),
            Some(hi) => Ok(Self::Between { lo: hi - 1, hi }),
            None => Err(WmError::time_out_of_range(t, min, max)),
        }
    }

    /// 在一行样本上取值
    pub fn sample(&self, times: &[f64], values: &[f64], t: f64) -> WmResult<f64> {
        WmError::check_size("时间序列样本", times.len(), values.len())?;
        match *self {
            Self::Head => Ok(values[0]),
            Self::Between { lo, hi } => lin_interp(times[lo], times[hi], values[lo], values[hi], t),
        }
    }

    /// 对整张 `[paddle][sample]` 表取值并乘以系数
    pub fn sample_table(
        &self,
        times: &[f64],
        table: &[Vec<f64>],
        t: f64,
        scale: f64,
    ) -> WmResult<Vec<f64>> {
        table
            .iter()
            .map(|row| self.sample(times, row, t).map(|v| scale * v))
            .collect()
    }
}

// ============================================================
// 空间插值
// ============================================================

/// 均匀分布的板中心横向坐标
///
/// `y_i = y_min + (i + 0.5) * y_span / n`
pub fn paddle_centers(y_min: f64, y_span: f64, n: usize) -> Vec<f64> {
    let width = y_span / n as f64;
    (0..n).map(|i| y_min + (0.5 + i as f64) * width).collect()
}

/// 横向坐标所属的板编号，越界时夹到 `[0, n-1]`
pub fn paddle_index(y: f64, y_min: f64, y_span: f64, n: usize) -> usize {
    if n <= 1 || !(y_span > 0.0) {
        return 0;
    }
    let raw = ((y - y_min) / y_span * n as f64).floor();
    if raw <= 0.0 {
        0
    } else {
        (raw as usize).min(n - 1)
    }
}

/// 升余弦混合权重，`s = 0` 时为 1，`s = 1` 时为 0，两端斜率为零
#[inline]
fn cos_weight(s: f64) -> f64 {
    0.5 * (1.0 + (PI * s).cos())
}

/// 在相邻板中心之间做升余弦混合
///
/// `centers` 升序排列。`y` 在最外侧中心以外时保持端值，不外推。
pub fn cos_interp(centers: &[f64], values: &[f64], y: f64) -> f64 {
    debug_assert_eq!(centers.len(), values.len());
    debug_assert!(!centers.is_empty());

    let n = centers.len();
    if n == 1 || y <= centers[0] {
        return values[0];
    }
    if y >= centers[n - 1] {
        return values[n - 1];
    }

    // 找到 c_i <= y < c_{i+1}
    let i = centers
        .windows(2)
        .position(|w| y >= w[0] && y < w[1])
        .unwrap_or(n - 2);

    let s = (y - centers[i]) / (centers[i + 1] - centers[i]);
    let w = cos_weight(s);
    w * values[i] + (1.0 - w) * values[i + 1]
}

/// 摇板倾角的余弦插值 [deg]
///
/// 先把各板倾角换算成板端位移 `arm * sin(θ)`，按 [`cos_interp`] 混合，
/// 再用 `asin` 换回角度。`arm` 为铰链到板顶的最大力臂，比值夹在 `[-1, 1]`，
/// 因此插值结果不会对应超出几何可达范围的板端位移。
/// `arm <= 0` 时没有可转动部分，退化为直接混合角度。
pub fn tilt_cos_interp(centers: &[f64], tilts_deg: &[f64], arm: f64, y: f64) -> f64 {
    if !(arm > 0.0) {
        return cos_interp(centers, tilts_deg, y);
    }

    let tips: Vec<f64> = tilts_deg
        .iter()
        .map(|deg| arm * deg.to_radians().sin())
        .collect();
    let tip = cos_interp(centers, &tips, y);
    (tip / arm).clamp(-1.0, 1.0).asin().to_degrees()
}
