// crates/wm_physics/src/absorption.rs

//! 主动吸收控制器
//!
//! 比较板前实测水位与期望水位（静水深 + 目标波面），按浅水波速
//! `sqrt(g/h)` 把偏差换算成位移修正，逐步积分：
//!
//! ```text
//! cumAbs -= timeMult * dt * (measured - (h0 + eta)) * sqrt(g / h0)
//! ```
//!
//! 这是纯积分控制，偏差无限累积，没有饱和或抗积分饱和处理。
//! 长时间的系统偏差会让累计修正持续增长，这是已知局限，由漂移保护兜底。

use wm_config::WavemakerConfig;
use wm_foundation::tolerance::GRAVITY;
use wm_foundation::{WmError, WmResult};

use crate::state::PaddleState;

/// 主动吸收控制器
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AbsorptionController {
    initial_depth: f64,
    gain: f64,
}

impl AbsorptionController {
    /// 由静水深创建
    pub fn new(initial_depth: f64) -> WmResult<Self> {
        if !(initial_depth > 0.0) {
            return Err(WmError::invalid_config(
                "initialWaterDepth",
                initial_depth,
                "主动吸收要求静水深为正",
            ));
        }
        Ok(Self {
            initial_depth,
            gain: (GRAVITY / initial_depth).sqrt(),
        })
    }

    /// 按配置创建，未开启时返回 `None`
    pub fn from_config(config: &WavemakerConfig) -> WmResult<Option<Self>> {
        if config.absorption_enabled() {
            Self::new(config.initial_water_depth).map(Some)
        } else {
            Ok(None)
        }
    }

    /// 静水深 [m]
    pub fn initial_depth(&self) -> f64 {
        self.initial_depth
    }

    /// 增益 `sqrt(g / h0)` [1/s]
    pub fn gain(&self) -> f64 {
        self.gain
    }

    /// 期望水位 [m]
    #[inline]
    pub fn expected_level(&self, target_eta: f64) -> f64 {
        self.initial_depth + target_eta
    }

    /// 推进一步，返回本步修正增量 [m]
    pub fn update(
        &self,
        state: &mut PaddleState,
        measured_level: f64,
        target_eta: f64,
        time_mult: f64,
        dt: f64,
    ) -> f64 {
        let error = measured_level - self.expected_level(target_eta);
        let delta = -time_mult * dt * error * self.gain;
        state.cum_abs_correction += delta;
        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_positive_depth() {
        assert!(AbsorptionController::new(0.0).is_err());
        assert!(AbsorptionController::new(-1.0).is_err());
        assert!(AbsorptionController::new(0.5).is_ok());
    }

    #[test]
    fn test_no_correction_at_expected_level() {
        let ctrl = AbsorptionController::new(0.4).unwrap();
        let mut s = PaddleState::default();
        let d = ctrl.update(&mut s, 0.45, 0.05, 1.0, 0.01);
        assert!(d.abs() < 1e-15);
        assert!(s.cum_abs_correction.abs() < 1e-15);
    }

    #[test]
    fn test_high_water_pulls_paddle_back() {
        let h0 = 0.5;
        let ctrl = AbsorptionController::new(h0).unwrap();
        let mut s = PaddleState::default();
        let d = ctrl.update(&mut s, 0.52, 0.0, 1.0, 0.1);
        let expected = -0.1 * 0.02 * (9.81_f64 / h0).sqrt();
        assert!((d - expected).abs() < 1e-14);
        assert!(s.cum_abs_correction < 0.0);
    }

    #[test]
    fn test_integrates_without_windup_limit() {
        let ctrl = AbsorptionController::new(1.0).unwrap();
        let mut s = PaddleState::default();
        // 持续的系统偏差使累计修正线性增长，不饱和
        for _ in 0..10_000 {
            ctrl.update(&mut s, 0.9, 0.0, 1.0, 0.01);
        }
        let expected = 10_000.0 * 0.01 * 0.1 * 9.81_f64.sqrt();
        assert!((s.cum_abs_correction - expected).abs() < 1e-8);
    }

    #[test]
    fn test_time_mult_scales_gain() {
        let ctrl = AbsorptionController::new(1.0).unwrap();
        let mut a = PaddleState::default();
        let mut b = PaddleState::default();
        let da = ctrl.update(&mut a, 1.1, 0.0, 1.0, 0.01);
        let db = ctrl.update(&mut b, 1.1, 0.0, 0.25, 0.01);
        assert!((db - 0.25 * da).abs() < 1e-15);
    }
}
