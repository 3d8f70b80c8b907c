// crates/wm_physics/src/wave_theory.rs

//! 孤立波波面理论
//!
//! 两种闭式解，用于生成目标波面或给出测点处的理论水位：
//!
//! - Boussinesq: 一阶解，`η = H sech²(√(3H/4h³) X)`
//! - Grimshaw: 三阶解，波速和波形都含 `ε = H/h` 的高阶修正
//!
//! 相位坐标 `X = -C t + t_s - X0 + x cosθ + y sinθ`。Boussinesq 的
//! `t_s = 3.5 h / √(H/h)` 让波峰在 `t = 0` 时位于造波板后方足够远处，
//! Grimshaw 取 `t_s = 0`，相位完全由 `X0` 控制。
//!
//! [`SolitarySignal`] 用同一波面按 Goring 方法积分板速度
//! `dX/dt = C η / (h + η)`，生成活塞运动表和对应的目标波面。

use std::fmt;
use std::str::FromStr;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use wm_config::{ConfigError, WavemakerConfig};
use wm_foundation::tolerance::GRAVITY;
use wm_foundation::{ensure, WmError, WmResult};

use crate::signal::TimeWindow;

/// 孤立波理论
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WaveTheory {
    /// 一阶 Boussinesq 解
    Boussinesq,
    /// 三阶 Grimshaw 解
    Grimshaw,
}

impl WaveTheory {
    /// 可用名称
    pub const SUPPORTED: &'static str = "Boussinesq, Grimshaw";

    /// 名称
    pub fn name(&self) -> &'static str {
        match self {
            Self::Boussinesq => "Boussinesq",
            Self::Grimshaw => "Grimshaw",
        }
    }

    /// 波速 [m/s]
    pub fn celerity(&self, wave_height: f64, depth: f64) -> f64 {
        match self {
            Self::Boussinesq => (GRAVITY * (wave_height + depth)).sqrt(),
            Self::Grimshaw => {
                let eps = wave_height / depth;
                (GRAVITY * depth).sqrt()
                    * (1.0 + eps - eps.powi(2) / 20.0 - 3.0 * eps.powi(3) / 70.0).sqrt()
            }
        }
    }

    /// 波面高程 [m]
    ///
    /// `angle` 为传播方向与 x 轴夹角 [rad]，`x0` 为相位平移 [m]。
    #[allow(clippy::too_many_arguments)]
    pub fn eta(
        &self,
        wave_height: f64,
        depth: f64,
        x: f64,
        y: f64,
        angle: f64,
        t: f64,
        x0: f64,
    ) -> f64 {
        let c = self.celerity(wave_height, depth);
        let (sin, cos) = angle.sin_cos();
        let along = x * cos + y * sin;

        match self {
            Self::Boussinesq => {
                let ts = 3.5 * depth / (wave_height / depth).sqrt();
                let aux = (3.0 * wave_height / (4.0 * depth.powi(3))).sqrt();
                let xa = -c * t + ts - x0 + along;
                wave_height / (aux * xa).cosh().powi(2)
            }
            Self::Grimshaw => {
                let eps = wave_height / depth;
                let alpha = (0.75 * eps).sqrt()
                    * (1.0 - 5.0 / 8.0 * eps + 71.0 / 128.0 * eps.powi(2));
                let xa = -c * t - x0 + along;
                let arg = alpha * xa / depth;
                let s = 1.0 / arg.cosh();
                let q = arg.tanh();
                let s2 = s * s;
                let q2 = q * q;
                depth
                    * (eps * s2 - 0.75 * eps.powi(2) * s2 * q2
                        + eps.powi(3) * (0.625 * s2 * q2 - 101.0 / 80.0 * s2 * s2 * q2))
            }
        }
    }
}

impl fmt::Display for WaveTheory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for WaveTheory {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Boussinesq" => Ok(Self::Boussinesq),
            "Grimshaw" => Ok(Self::Grimshaw),
            other => Err(ConfigError::Unsupported {
                what: "波浪理论",
                name: other.to_string(),
                supported: Self::SUPPORTED,
            }),
        }
    }
}

/// 孤立波参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolitaryWave {
    /// 理论
    #[serde(rename = "waveTheory")]
    pub theory: WaveTheory,
    /// 波高 [m]
    #[serde(rename = "waveHeight")]
    pub wave_height: f64,
    /// 水深 [m]
    #[serde(rename = "waterDepth")]
    pub depth: f64,
    /// 传播方向 [rad]
    #[serde(rename = "waveAngle", default)]
    pub angle: f64,
    /// 相位平移 [m]
    #[serde(rename = "X0", default)]
    pub x0: f64,
}

impl SolitaryWave {
    /// 单点波面
    pub fn eta_at(&self, x: f64, y: f64, t: f64) -> f64 {
        self.theory
            .eta(self.wave_height, self.depth, x, y, self.angle, t, self.x0)
    }

    /// 各测点的理论水位 `h + η`
    pub fn calculated_level(&self, gauges: &[DVec3], t: f64) -> Vec<f64> {
        gauges
            .iter()
            .map(|g| self.depth + self.eta_at(g.x, g.y, t))
            .collect()
    }
}

// ============================================================
// 孤立波造波信号
// ============================================================

/// 孤立波活塞运动表生成参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolitarySignal {
    /// 目标孤立波
    pub wave: SolitaryWave,
    /// 板数
    #[serde(rename = "nPaddles", default = "default_n_paddles")]
    pub n_paddles: usize,
    /// 造波板横向范围 `[yMin, yMax]` [m]
    #[serde(rename = "bLims")]
    pub lateral: [f64; 2],
    /// 时间窗
    pub window: TimeWindow,
    /// 是否同时输出目标波面并开启主动吸收
    #[serde(rename = "genAbs", default)]
    pub gen_abs: bool,
}

fn default_n_paddles() -> usize { 1 }

impl SolitarySignal {
    /// 单孤立波，关闭主动吸收
    pub fn new(wave: SolitaryWave, n_paddles: usize, lateral: [f64; 2], window: TimeWindow) -> Self {
        Self {
            wave,
            n_paddles,
            lateral,
            window,
            gen_abs: false,
        }
    }

    /// 开启主动吸收并输出目标波面
    pub fn with_absorption(mut self) -> Self {
        self.gen_abs = true;
        self
    }

    fn validate(&self) -> WmResult<()> {
        let wave = &self.wave;
        ensure!(
            wave.depth > 0.0,
            WmError::invalid_config("waterDepth", wave.depth, "必须为正")
        );
        ensure!(
            wave.wave_height > 0.0 && wave.wave_height < wave.depth,
            WmError::invalid_config("waveHeight", wave.wave_height, "要求 0 < H < h")
        );
        ensure!(
            self.n_paddles >= 1,
            WmError::invalid_config("nPaddles", self.n_paddles, "必须 >= 1")
        );
        ensure!(
            self.lateral[1] > self.lateral[0],
            WmError::invalid_config("bLims", format!("{:?}", self.lateral), "上限必须大于下限")
        );
        self.window.check()
    }

    /// 板前波面与板速度 `C η / (h + η)`
    fn paddle_velocity(&self, x: f64, y: f64, t: f64) -> (f64, f64) {
        let wave = &self.wave;
        let c = wave.theory.celerity(wave.wave_height, wave.depth);
        let eta = wave.eta_at(x, y, t);
        (eta, c * eta / (wave.depth + eta))
    }

    /// 单块板的位移与板前波面序列（Heun 积分）
    fn trajectory(&self, y: f64, times: &[f64]) -> (Vec<f64>, Vec<f64>) {
        let mut position = Vec::with_capacity(times.len());
        let mut eta = Vec::with_capacity(times.len());
        let mut x = 0.0;
        for (i, &t) in times.iter().enumerate() {
            let (e, u) = self.paddle_velocity(x, y, t);
            position.push(x);
            eta.push(e);
            if let Some(&next) = times.get(i + 1) {
                let dt = next - t;
                let (_, u_pred) = self.paddle_velocity(x + dt * u, y, next);
                x += 0.5 * dt * (u + u_pred);
            }
        }
        (position, eta)
    }

    /// 生成活塞运动表配置
    pub fn generate(&self) -> WmResult<WavemakerConfig> {
        self.validate()?;

        let times = self.window.times();
        let [lo, hi] = self.lateral;
        let (position, eta): (Vec<Vec<f64>>, Vec<Vec<f64>>) =
            crate::interp::paddle_centers(lo, hi - lo, self.n_paddles)
                .into_iter()
                .map(|y| self.trajectory(y, &times))
                .unzip();

        tracing::debug!(
            theory = %self.wave.theory,
            stroke = position.iter().filter_map(|p| p.last()).fold(0.0_f64, |m, &v| m.max(v)),
            "孤立波造波参数"
        );

        let mut config = WavemakerConfig::piston(times, position);
        if self.gen_abs {
            config = config.with_absorption(eta, self.wave.depth);
        }
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!("Grimshaw".parse::<WaveTheory>().unwrap(), WaveTheory::Grimshaw);
        let err = "Stokes".parse::<WaveTheory>().unwrap_err();
        assert!(matches!(err, ConfigError::Unsupported { .. }));
        assert!(err.to_string().contains("Boussinesq, Grimshaw"));
    }

    #[test]
    fn test_boussinesq_peak_equals_height() {
        let (h_w, d) = (0.1, 0.5);
        let theory = WaveTheory::Boussinesq;
        let c = theory.celerity(h_w, d);
        let ts = 3.5 * d / (h_w / d).sqrt();
        let t = 2.0;
        // 波峰位置: X = 0
        let x_peak = c * t - ts;
        let peak = theory.eta(h_w, d, x_peak, 0.0, 0.0, t, 0.0);
        assert!((peak - h_w).abs() < 1e-12);
        assert!(theory.eta(h_w, d, x_peak + 0.3, 0.0, 0.0, t, 0.0) < peak);
    }

    #[test]
    fn test_grimshaw_peak_equals_height() {
        let (h_w, d) = (0.2, 1.0);
        let peak = WaveTheory::Grimshaw.eta(h_w, d, 0.0, 0.0, 0.0, 0.0, 0.0);
        assert!((peak - h_w).abs() < 1e-12);
    }

    #[test]
    fn test_profiles_symmetric_and_decaying() {
        for theory in [WaveTheory::Boussinesq, WaveTheory::Grimshaw] {
            let (h_w, d) = (0.05, 0.4);
            let c = theory.celerity(h_w, d);
            let shift = match theory {
                WaveTheory::Boussinesq => 3.5 * d / (h_w / d).sqrt(),
                WaveTheory::Grimshaw => 0.0,
            };
            let t = 1.0;
            let x_peak = c * t - shift;
            let left = theory.eta(h_w, d, x_peak - 0.7, 0.0, 0.0, t, 0.0);
            let right = theory.eta(h_w, d, x_peak + 0.7, 0.0, 0.0, t, 0.0);
            assert!((left - right).abs() < 1e-12, "{theory}");
            let far = theory.eta(h_w, d, x_peak + 50.0, 0.0, 0.0, t, 0.0);
            assert!(far.abs() < 1e-8, "{theory}: {far}");
        }
    }

    #[test]
    fn test_oblique_wave_uses_projected_coordinate() {
        let theory = WaveTheory::Grimshaw;
        let angle = 30f64.to_radians();
        let a = theory.eta(0.1, 1.0, 1.0, 0.0, angle, 0.0, 0.0);
        // 沿波峰线平移后波面不变
        let crest = DVec3::new(-angle.sin(), angle.cos(), 0.0) * 2.0;
        let b = theory.eta(0.1, 1.0, 1.0 + crest.x, crest.y, angle, 0.0, 0.0);
        assert!((a - b).abs() < 1e-12);
    }

    fn solitary(theory: WaveTheory) -> SolitaryWave {
        SolitaryWave {
            theory,
            wave_height: 0.05,
            depth: 0.4,
            angle: 0.0,
            x0: 0.0,
        }
    }

    fn long_window() -> TimeWindow {
        TimeWindow {
            t0: 0.0,
            t_end: 8.0,
            dt: 0.01,
        }
    }

    #[test]
    fn test_solitary_stroke_matches_goring() {
        let wave = solitary(WaveTheory::Boussinesq);
        let cfg = SolitarySignal::new(wave, 1, [0.0, 1.0], long_window())
            .generate()
            .unwrap();
        let x = &cfg.paddle_position[0];
        assert_eq!(x[0], 0.0);
        // 板只向前推进
        assert!(x.windows(2).all(|w| w[1] >= w[0]));

        // 总冲程 S = 2H / (k h)
        let k = (3.0 * wave.wave_height / (4.0 * wave.depth.powi(3))).sqrt();
        let stroke = 2.0 * wave.wave_height / (k * wave.depth);
        let last = *x.last().unwrap();
        assert!((last - stroke).abs() / stroke < 0.01, "S = {last}, expected {stroke}");
        assert!(!cfg.absorption_enabled());
    }

    #[test]
    fn test_solitary_eta_table_peaks_at_wave_height() {
        let cfg = SolitarySignal::new(solitary(WaveTheory::Boussinesq), 3, [0.0, 1.5], long_window())
            .with_absorption()
            .generate()
            .unwrap();
        assert!(cfg.absorption_enabled());
        assert_eq!(cfg.initial_water_depth, 0.4);
        assert_eq!(cfg.paddle_eta.len(), 3);
        let peak = cfg.paddle_eta[0].iter().cloned().fold(f64::MIN, f64::max);
        assert!((peak - 0.05).abs() < 1e-3, "peak = {peak}");
        // 正向入射：各板同相
        assert_eq!(cfg.paddle_position[0], cfg.paddle_position[2]);
    }

    #[test]
    fn test_solitary_rejects_breaking_height() {
        let wave = SolitaryWave {
            wave_height: 0.5,
            ..solitary(WaveTheory::Grimshaw)
        };
        assert!(SolitarySignal::new(wave, 1, [0.0, 1.0], long_window()).generate().is_err());
        let wave = solitary(WaveTheory::Grimshaw);
        assert!(SolitarySignal::new(wave, 0, [0.0, 1.0], long_window()).generate().is_err());
    }

    #[test]
    fn test_calculated_level_adds_depth() {
        let wave = SolitaryWave {
            theory: WaveTheory::Grimshaw,
            wave_height: 0.1,
            depth: 0.5,
            angle: 0.0,
            x0: 0.0,
        };
        let levels = wave.calculated_level(&[DVec3::ZERO, DVec3::new(100.0, 0.0, 0.0)], 0.0);
        assert!((levels[0] - 0.6).abs() < 1e-12);
        assert!((levels[1] - 0.5).abs() < 1e-12);
    }
}
