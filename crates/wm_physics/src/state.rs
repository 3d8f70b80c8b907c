// crates/wm_physics/src/state.rs

//! 每块板的持久状态
//!
//! 状态跨时间步保存，并随检查点写出、原样恢复。累计修正量在整个模拟
//! 生命周期内只增不清，重启丢失会造成板位置突跳。

use serde::{Deserialize, Serialize};

/// 漂移保护阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DpsPhase {
    /// 监测中，未在回中
    Idle,
    /// 回中斜坡进行中
    Correcting,
}

/// 单块板的状态
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaddleState {
    /// 漂移保护是否处于回中阶段
    #[serde(rename = "DPS")]
    pub dps_active: bool,
    /// 回中方向（±1）
    #[serde(rename = "DPSsign")]
    pub dps_sign: f64,
    /// 回中开始时间 [s]
    #[serde(rename = "DPStIni")]
    pub dps_t_ini: f64,
    /// 当前斜坡修正 [m]
    #[serde(rename = "instDPSCorrection")]
    pub inst_dps_correction: f64,
    /// 累计回中偏移 [m]
    #[serde(rename = "cumDPSCorrection")]
    pub cum_dps_correction: f64,
    /// 累计主动吸收修正 [m]
    #[serde(rename = "cumAbsCorrection")]
    pub cum_abs_correction: f64,
    /// 上一步倾角 [deg]
    #[serde(rename = "tiltOld")]
    pub tilt_old: f64,
}

impl Default for PaddleState {
    fn default() -> Self {
        Self {
            dps_active: false,
            dps_sign: 1.0,
            dps_t_ini: -1.0,
            inst_dps_correction: 0.0,
            cum_dps_correction: 0.0,
            cum_abs_correction: 0.0,
            tilt_old: 0.0,
        }
    }
}

impl PaddleState {
    /// 按板数创建初始状态
    pub fn fleet(n_paddles: usize) -> Vec<Self> {
        vec![Self::default(); n_paddles]
    }

    /// 当前漂移保护阶段
    #[inline]
    pub fn phase(&self) -> DpsPhase {
        if self.dps_active {
            DpsPhase::Correcting
        } else {
            DpsPhase::Idle
        }
    }

    /// 叠加在预定位移上的全部修正
    #[inline]
    pub fn total_correction(&self) -> f64 {
        self.cum_abs_correction + self.inst_dps_correction + self.cum_dps_correction
    }

    /// 检查状态不变量：空闲时斜坡修正必须为零
    pub fn is_consistent(&self) -> bool {
        let sign_ok = self.dps_sign == 1.0 || self.dps_sign == -1.0;
        let idle_ok = self.dps_active || self.inst_dps_correction == 0.0;
        sign_ok && idle_ok
    }
}
