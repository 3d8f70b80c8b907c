// crates/wm_physics/src/dps.rs

//! 漂移保护系统 (Drift Prevention System, DPS)
//!
//! 每块板一个两态状态机：
//!
//! ```text
//!            |候选位移| > 0.8 * maxStroke
//!   Idle ─────────────────────────────────> Correcting
//!    ^                                          │
//!    │   elapsed >= DPST: inst = 0,             │
//!    │   cum += sign * maxStroke                │
//!    └──────────────────────────────────────────┘
//! ```
//!
//! 回中阶段的瞬时修正按 [`dps_ramp`] 从 0 平滑增长到 `maxStroke`，
//! 两端斜率为零，不引入速度突变。结束时瞬时修正整体转入累计偏移，
//! 因此转换前后板的总位置连续。每块板同一时刻最多只有一个斜坡。

use std::f64::consts::PI;

use wm_config::WavemakerConfig;

use crate::state::PaddleState;

/// 触发阈值占最大冲程的比例
pub const TRIGGER_RATIO: f64 = 0.8;

/// 回中斜坡
///
/// `A * (s - sin(2πs) / (2π))`，`s = t / T`。
/// `t <= 0` 返回 0，`t >= T` 精确返回 `A`。
pub fn dps_ramp(amplitude: f64, elapsed: f64, duration: f64) -> f64 {
    if elapsed <= 0.0 {
        return 0.0;
    }
    if elapsed >= duration {
        return amplitude;
    }
    let s = elapsed / duration;
    amplitude * (s - (2.0 * PI * s).sin() / (2.0 * PI))
}

/// 单步状态机事件
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DpsEvent {
    /// 空闲，未触发
    Idle,
    /// 本步进入回中阶段
    Activated {
        /// 回中方向
        sign: f64,
    },
    /// 斜坡进行中
    Ramping {
        /// 已经过时间 [s]
        elapsed: f64,
    },
    /// 本步回中完成，偏移已转入累计量
    Completed {
        /// 回中方向
        sign: f64,
    },
}

/// 漂移保护控制器
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriftPrevention {
    max_stroke: f64,
    ramp_time: f64,
}

impl DriftPrevention {
    /// 创建控制器
    pub fn new(max_stroke: f64, ramp_time: f64) -> Self {
        Self {
            max_stroke,
            ramp_time,
        }
    }

    /// 按配置创建，关闭时返回 `None`（哨兵冲程或纯摇板）
    pub fn from_config(config: &WavemakerConfig) -> Option<Self> {
        config
            .dps_enabled()
            .then(|| Self::new(config.max_stroke, config.dps_ramp_time))
    }

    /// 最大冲程 [m]
    pub fn max_stroke(&self) -> f64 {
        self.max_stroke
    }

    /// 回中时长 [s]
    pub fn ramp_time(&self) -> f64 {
        self.ramp_time
    }

    /// 触发阈值 [m]
    #[inline]
    pub fn threshold(&self) -> f64 {
        TRIGGER_RATIO * self.max_stroke
    }

    /// 推进一步
    ///
    /// `scheduled` 为本步时间序列插值得到的位移。候选位移
    /// `scheduled + cumAbs + cumDPS` 越过阈值时在同一步进入回中。
    pub fn step(&self, state: &mut PaddleState, scheduled: f64, time: f64) -> DpsEvent {
        let mut activated = None;

        if !state.dps_active {
            let candidate = scheduled + state.cum_abs_correction + state.cum_dps_correction;
            let sign = if candidate > self.threshold() {
                Some(-1.0)
            } else if candidate < -self.threshold() {
                Some(1.0)
            } else {
                None
            };

            if let Some(sign) = sign {
                state.dps_active = true;
                state.dps_sign = sign;
                state.dps_t_ini = time;
                activated = Some(sign);
            }
        }

        if !state.dps_active {
            return DpsEvent::Idle;
        }

        let elapsed = time - state.dps_t_ini;
        if elapsed < self.ramp_time {
            state.inst_dps_correction =
                state.dps_sign * dps_ramp(self.max_stroke, elapsed, self.ramp_time);
            match activated {
                Some(sign) => DpsEvent::Activated { sign },
                None => DpsEvent::Ramping { elapsed },
            }
        } else {
            state.inst_dps_correction = 0.0;
            state.cum_dps_correction += state.dps_sign * self.max_stroke;
            state.dps_active = false;
            DpsEvent::Completed {
                sign: state.dps_sign,
            }
        }
    }
}
