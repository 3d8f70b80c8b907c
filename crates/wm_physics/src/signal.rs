// crates/wm_physics/src/signal.rs

//! 规则波造波信号生成
//!
//! 由目标波高、周期和水深按线性造波理论（Biesel 传递函数）求出板冲程，
//! 再在 N 块板上生成完整的运动表，输出可直接使用的 [`WavemakerConfig`]。
//! 斜向波通过相位 `k y sinθ` 沿横向错开各板实现。

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use tracing::debug;

use wm_config::{WavemakerConfig, WavemakerKind};
use wm_foundation::tolerance::GRAVITY;
use wm_foundation::{ensure, WmError, WmResult};

/// 色散关系迭代收敛容差 [m]
pub const DISPERSION_TOLERANCE: f64 = 0.001;

/// 色散关系最大迭代次数
pub const DISPERSION_MAX_ITER: usize = 100;

// ============================================================
// 线性理论
// ============================================================

/// 由线性色散关系求波长 [m]
///
/// 从深水波长 `L0 = gT²/2π` 出发做不动点迭代 `L = L0 tanh(2πh/L)`，
/// 相邻两次差值小于 1 mm 或满 100 次即停止。
pub fn wavelength(period: f64, depth: f64) -> f64 {
    let l0 = GRAVITY * period * period / (2.0 * PI);
    let mut l = l0;
    for _ in 0..DISPERSION_MAX_ITER {
        let next = l0 * (2.0 * PI / l * depth).tanh();
        let converged = (next - l).abs() < DISPERSION_TOLERANCE;
        l = next;
        if converged {
            break;
        }
    }
    l
}

/// 底铰摇板的波高冲程比 H/S
pub fn flap_transfer(kh: f64) -> f64 {
    4.0 * kh.sinh() / kh * (kh * kh.sinh() - kh.cosh() + 1.0) / ((2.0 * kh).sinh() + 2.0 * kh)
}

/// 活塞的波高冲程比 H/S
pub fn piston_transfer(kh: f64) -> f64 {
    2.0 * ((2.0 * kh).cosh() - 1.0) / ((2.0 * kh).sinh() + 2.0 * kh)
}

// ============================================================
// 输入
// ============================================================

/// 规则波参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegularWave {
    /// 波高 [m]
    #[serde(rename = "waveHeight")]
    pub height: f64,
    /// 周期 [s]
    #[serde(rename = "wavePeriod")]
    pub period: f64,
    /// 水深 [m]
    #[serde(rename = "waterDepth")]
    pub depth: f64,
    /// 初相位 [rad]
    #[serde(rename = "wavePhase", default)]
    pub phase: f64,
    /// 传播方向 [deg]
    #[serde(rename = "waveDir", default)]
    pub direction: f64,
}

impl RegularWave {
    /// 波长 [m]
    pub fn wavelength(&self) -> f64 {
        wavelength(self.period, self.depth)
    }

    /// 波数 [1/m]
    pub fn wave_number(&self) -> f64 {
        2.0 * PI / self.wavelength()
    }

    /// 角频率 [rad/s]
    pub fn angular_frequency(&self) -> f64 {
        2.0 * PI / self.period
    }
}

/// 输出时间窗
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// 起始时间 [s]
    pub t0: f64,
    /// 结束时间 [s]
    #[serde(rename = "tEnd")]
    pub t_end: f64,
    /// 采样间隔 [s]
    pub dt: f64,
}

impl TimeWindow {
    /// 等间距采样点，首尾精确落在 `t0` 和 `tEnd`
    pub fn times(&self) -> Vec<f64> {
        let n = ((self.t_end - self.t0) / self.dt).round() as usize + 1;
        if n == 1 {
            return vec![self.t0];
        }
        let step = (self.t_end - self.t0) / (n - 1) as f64;
        let mut times: Vec<f64> = (0..n).map(|i| self.t0 + i as f64 * step).collect();
        times[n - 1] = self.t_end;
        times
    }

    pub(crate) fn check(&self) -> WmResult<()> {
        ensure!(
            self.dt > 0.0 && self.t_end >= self.t0,
            WmError::invalid_config("window", format!("{:?}", self), "要求 dt > 0 且 tEnd >= t0")
        );
        Ok(())
    }
}

/// 运动表生成参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalSpec {
    /// 造波板类型，支持 Piston 和 Flap
    #[serde(rename = "wavemakerType", default)]
    pub kind: WavemakerKind,
    /// 目标波浪
    pub wave: RegularWave,
    /// 板数
    #[serde(rename = "nPaddles", default = "default_n_paddles")]
    pub n_paddles: usize,
    /// 造波板横向范围 `[yMin, yMax]` [m]
    #[serde(rename = "bLims")]
    pub lateral: [f64; 2],
    /// 时间窗
    pub window: TimeWindow,
    /// 启动平滑时长 [s]
    #[serde(rename = "tSmooth", default = "default_t_smooth")]
    pub t_smooth: f64,
    /// 是否同时输出目标波面并开启主动吸收（仅活塞）
    #[serde(rename = "genAbs", default)]
    pub gen_abs: bool,
    /// 摇板铰链水平位置 [m]，铰链在底部
    #[serde(rename = "hingeLocation", default)]
    pub hinge_location: f64,
}

fn default_n_paddles() -> usize { 1 }
fn default_t_smooth() -> f64 { 1.5 }

impl SignalSpec {
    /// 活塞式规则波
    pub fn piston(wave: RegularWave, n_paddles: usize, lateral: [f64; 2], window: TimeWindow) -> Self {
        Self {
            kind: WavemakerKind::Piston,
            wave,
            n_paddles,
            lateral,
            window,
            t_smooth: default_t_smooth(),
            gen_abs: false,
            hinge_location: 0.0,
        }
    }

    /// 摇板式规则波
    pub fn flap(wave: RegularWave, n_paddles: usize, lateral: [f64; 2], window: TimeWindow) -> Self {
        Self {
            kind: WavemakerKind::Flap,
            ..Self::piston(wave, n_paddles, lateral, window)
        }
    }

    /// 开启主动吸收并输出目标波面
    pub fn with_absorption(mut self) -> Self {
        self.gen_abs = true;
        self
    }

    fn validate(&self) -> WmResult<()> {
        ensure!(
            self.kind != WavemakerKind::Mixed,
            WmError::invalid_config("wavemakerType", self.kind, "信号生成只支持 Piston 和 Flap")
        );
        ensure!(
            self.wave.height > 0.0,
            WmError::invalid_config("waveHeight", self.wave.height, "必须为正")
        );
        ensure!(
            self.wave.period > 0.0,
            WmError::invalid_config("wavePeriod", self.wave.period, "必须为正")
        );
        ensure!(
            self.wave.depth > 0.0,
            WmError::invalid_config("waterDepth", self.wave.depth, "必须为正")
        );
        ensure!(
            self.n_paddles >= 1,
            WmError::invalid_config("nPaddles", self.n_paddles, "必须 >= 1")
        );
        ensure!(
            self.lateral[1] > self.lateral[0],
            WmError::invalid_config("bLims", format!("{:?}", self.lateral), "上限必须大于下限")
        );
        self.window.check()?;
        ensure!(
            !(self.gen_abs && self.kind == WavemakerKind::Flap),
            WmError::invalid_config("genAbs", self.gen_abs, "摇板不支持主动吸收")
        );
        Ok(())
    }

    /// 板冲程 S [m]
    pub fn stroke(&self) -> f64 {
        let kh = self.wave.wave_number() * self.wave.depth;
        let ratio = match self.kind {
            WavemakerKind::Flap => flap_transfer(kh),
            _ => piston_transfer(kh),
        };
        self.wave.height / ratio
    }

    /// 板中心横向坐标
    pub fn paddle_centers(&self) -> Vec<f64> {
        let [lo, hi] = self.lateral;
        crate::interp::paddle_centers(lo, hi - lo, self.n_paddles)
    }

    /// 生成运动表配置
    pub fn generate(&self) -> WmResult<WavemakerConfig> {
        self.validate()?;

        let wave = &self.wave;
        let k = wave.wave_number();
        let omega = wave.angular_frequency();
        let stroke = self.stroke();
        let oblique = wave.direction.to_radians().sin();
        debug!(
            wavelength = 2.0 * PI / k,
            kh = k * wave.depth,
            stroke,
            "规则波造波参数"
        );

        let times = self.window.times();
        let centers = self.paddle_centers();

        // 板运动超前波面 90°
        let paddle_signal = |y: f64| -> Vec<f64> {
            times
                .iter()
                .map(|&t| 0.5 * stroke * (-omega * t + 0.5 * PI + wave.phase + k * y * oblique).cos())
                .collect()
        };
        let eta_signal = |y: f64| -> Vec<f64> {
            times
                .iter()
                .map(|&t| 0.5 * wave.height * (-omega * t + wave.phase + k * y * oblique).cos())
                .collect()
        };

        let mut config = match self.kind {
            WavemakerKind::Flap => {
                let tilt: Vec<Vec<f64>> = centers
                    .iter()
                    .map(|&y| {
                        paddle_signal(y)
                            .into_iter()
                            .map(|x| (x / wave.depth).atan().to_degrees())
                            .collect::<Vec<f64>>()
                    })
                    .collect();
                WavemakerConfig::flap(times.clone(), tilt, 0.0, self.hinge_location)
            }
            _ => {
                let position: Vec<Vec<f64>> = centers.iter().map(|&y| paddle_signal(y)).collect();
                WavemakerConfig::piston(times.clone(), position)
            }
        };

        if self.gen_abs {
            let eta: Vec<Vec<f64>> = centers.iter().map(|&y| eta_signal(y)).collect();
            config = config.with_absorption(eta, wave.depth);
        }

        let config = config.with_smoothing(self.t_smooth);
        config.validate()?;
        Ok(config)
    }
}
