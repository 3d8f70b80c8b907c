// crates/wm_physics/src/boundary.rs

//! 造波板边界：每个时间步的运动计算入口
//!
//! 单步流程：
//!
//! 1. 时间保护：同一时刻重复调用直接返回缓存，时间倒退报错
//! 2. 启动平滑与调节系数 `timeMult`
//! 3. 时间序列插值（位移、倾角、目标波面）
//! 4. 主动吸收：估计板前水位并积分修正
//! 5. 漂移保护状态机
//! 6. 运动学映射，得到边界点位移场
//!
//! 边界持有每块板的状态，状态只在步进时修改。

use glam::DVec3;

use wm_config::WavemakerConfig;
use wm_foundation::{ensure, require, WmError, WmResult};

use crate::absorption::AbsorptionController;
use crate::dps::{DpsEvent, DriftPrevention};
use crate::interp::TimeBracket;
use crate::kinematics::{KinematicsMapper, PaddleLayout};
use crate::reduce::PatchReduce;
use crate::state::PaddleState;
use crate::water_level::{estimate_water_level, FaceSample, PatchExtent};

// ============================================================
// 输入输出
// ============================================================

/// 单步输入
#[derive(Debug, Clone, Copy)]
pub struct StepInput<'a> {
    /// 当前时间 [s]
    pub time: f64,
    /// 时间步长 [s]
    pub dt: f64,
    /// 边界面采样（主动吸收使用）
    pub faces: &'a [FaceSample],
}

impl<'a> StepInput<'a> {
    /// 创建单步输入
    pub fn new(time: f64, dt: f64, faces: &'a [FaceSample]) -> Self {
        Self { time, dt, faces }
    }
}

/// 边界点位移场
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryMotion {
    /// 对应时间 [s]
    pub time: f64,
    /// 每个边界点的位移，与输入点一一对应
    pub displacements: Vec<DVec3>,
}

impl BoundaryMotion {
    /// 换算为绝对位置 `rest + displacement`
    pub fn positions(&self, rest: &[DVec3]) -> WmResult<Vec<DVec3>> {
        WmError::check_size("边界点", self.displacements.len(), rest.len())?;
        Ok(rest
            .iter()
            .zip(&self.displacements)
            .map(|(p, d)| *p + *d)
            .collect())
    }
}

/// 单步诊断信息
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StepReport {
    /// 时间 [s]
    pub time: f64,
    /// 平滑与调节系数
    pub time_mult: f64,
    /// 插值得到的预定位移 [m]
    pub scheduled: Vec<f64>,
    /// 含全部修正的总位移 [m]
    pub displacements: Vec<f64>,
    /// 倾角 [deg]
    pub tilts: Vec<f64>,
    /// 实测水位 [m]，未开启主动吸收时为空
    pub water_levels: Vec<f64>,
    /// 各板漂移保护事件，未开启时为空
    pub dps_events: Vec<DpsEvent>,
}

// ============================================================
// 边界
// ============================================================

/// 分段造波板边界
#[derive(Debug, Clone)]
pub struct WavemakerBoundary {
    name: String,
    config: WavemakerConfig,
    paddles: Vec<PaddleState>,
    dps: Option<DriftPrevention>,
    absorption: Option<AbsorptionController>,
    mapper: KinematicsMapper,
    last_update: Option<f64>,
    motion: Option<BoundaryMotion>,
    report: Option<StepReport>,
}

impl WavemakerBoundary {
    /// 创建边界，配置在此一次性校验
    pub fn new(name: impl Into<String>, config: WavemakerConfig) -> WmResult<Self> {
        let paddles = PaddleState::fleet(config.n_paddles);
        Self::restore(name, config, paddles, None)
    }

    /// 由检查点恢复
    pub fn restore(
        name: impl Into<String>,
        config: WavemakerConfig,
        paddles: Vec<PaddleState>,
        last_update: Option<f64>,
    ) -> WmResult<Self> {
        config.validate()?;
        WmError::check_size("paddle state", config.n_paddles, paddles.len())?;

        if config.tuning_factor == 0.0 {
            tracing::warn!("tuningFactor = 0，造波板将保持静止");
        }

        let dps = DriftPrevention::from_config(&config);
        let absorption = AbsorptionController::from_config(&config)?;
        let mapper = KinematicsMapper::from_config(&config);
        let name = name.into();

        tracing::info!(
            "Wavemaker boundary '{}': {} x {}, absorption={}, dps={}",
            name,
            config.n_paddles,
            config.kind,
            absorption.is_some(),
            dps.is_some()
        );

        Ok(Self {
            name,
            config,
            paddles,
            dps,
            absorption,
            mapper,
            last_update,
            motion: None,
            report: None,
        })
    }

    /// 边界名称
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 配置
    pub fn config(&self) -> &WavemakerConfig {
        &self.config
    }

    /// 各板状态
    pub fn paddles(&self) -> &[PaddleState] {
        &self.paddles
    }

    /// 上次步进的时间
    pub fn last_update(&self) -> Option<f64> {
        self.last_update
    }

    /// 上次计算的位移场
    pub fn motion(&self) -> Option<&BoundaryMotion> {
        self.motion.as_ref()
    }

    /// 上次步进的诊断信息
    pub fn report(&self) -> Option<&StepReport> {
        self.report.as_ref()
    }

    /// 启动平滑与调节系数
    ///
    /// `tuningFactor * t / tSmooth`（`0 < tSmooth` 且 `t < tSmooth`），否则 `tuningFactor`。
    pub fn time_multiplier(&self, time: f64) -> f64 {
        let tf = self.config.tuning_factor;
        if self.config.smoothing_enabled() && time < self.config.t_smooth {
            tf * time / self.config.t_smooth
        } else {
            tf
        }
    }

    /// 推进到 `input.time` 并返回边界点位移场
    ///
    /// `points` 为本地边界点的静止坐标。同一时刻重复调用不修改任何状态。
    pub fn update<R: PatchReduce>(
        &mut self,
        input: &StepInput<'_>,
        points: &[DVec3],
        reduce: &R,
    ) -> WmResult<&BoundaryMotion> {
        let time = input.time;
        ensure!(
            time.is_finite() && input.dt.is_finite(),
            WmError::invalid_input(format!("非法时间 t={}, dt={}", time, input.dt))
        );

        if let Some(last) = self.last_update {
            if time < last {
                return Err(WmError::invalid_input(format!(
                    "边界 '{}' 时间倒退: {} < {}",
                    self.name, time, last
                )));
            }
            if time == last {
                return self.replay(time, points, reduce);
            }
        }

        // 先求范围，保证出错时各板状态未被修改
        let extent = PatchExtent::from_points(points, reduce)?;
        let report = self.advance(input, &extent, reduce)?;
        let motion = self.map_motion(time, &report, &extent, points);

        self.log_step(&report);
        self.last_update = Some(time);
        self.report = Some(report);
        Ok(&*self.motion.insert(motion))
    }

    /// 同一时刻的重复调用：不动控制器，只在点集变化时重新映射
    fn replay<R: PatchReduce>(
        &mut self,
        time: f64,
        points: &[DVec3],
        reduce: &R,
    ) -> WmResult<&BoundaryMotion> {
        let cached = matches!(
            &self.motion,
            Some(m) if m.time == time && m.displacements.len() == points.len()
        );
        if !cached {
            let extent = PatchExtent::from_points(points, reduce)?;
            let report = match self.report.clone() {
                Some(report) => report,
                None => self.static_report(time)?,
            };
            self.motion = Some(self.map_motion(time, &report, &extent, points));
        }
        tracing::debug!("'{}' 重复调用 t={}，复用上次结果", self.name, time);
        let motion = require!(self.motion.as_ref(), WmError::internal("位移场缓存缺失"));
        Ok(motion)
    }

    /// 恢复后首次重复调用时没有诊断信息，按当前状态重建
    fn static_report(&self, time: f64) -> WmResult<StepReport> {
        let scheduled = self.sample(
            &self.config.paddle_position,
            time,
            self.config.kind.has_displacement(),
        )?;
        Ok(StepReport {
            time,
            time_mult: self.time_multiplier(time),
            displacements: scheduled
                .iter()
                .zip(&self.paddles)
                .map(|(d, s)| d + s.total_correction())
                .collect(),
            scheduled,
            tilts: self.paddles.iter().map(|s| s.tilt_old).collect(),
            ..StepReport::default()
        })
    }

    fn sample(&self, table: &[Vec<f64>], time: f64, enabled: bool) -> WmResult<Vec<f64>> {
        if !enabled {
            return Ok(vec![0.0; self.config.n_paddles]);
        }
        let bracket = TimeBracket::locate(&self.config.time_series, time)?;
        bracket.sample_table(&self.config.time_series, table, time, self.time_multiplier(time))
    }

    /// 推进控制器，修改各板状态
    fn advance<R: PatchReduce>(
        &mut self,
        input: &StepInput<'_>,
        extent: &PatchExtent,
        reduce: &R,
    ) -> WmResult<StepReport> {
        let time = input.time;
        let kind = self.config.kind;
        let time_mult = self.time_multiplier(time);

        // 插值
        let bracket = TimeBracket::locate(&self.config.time_series, time)?;
        let series = &self.config.time_series;
        let scheduled = if kind.has_displacement() {
            bracket.sample_table(series, &self.config.paddle_position, time, time_mult)?
        } else {
            vec![0.0; self.config.n_paddles]
        };
        let tilts = if kind.has_tilt() {
            bracket.sample_table(series, &self.config.paddle_tilt, time, time_mult)?
        } else {
            Vec::new()
        };

        // 主动吸收
        let mut water_levels = Vec::new();
        if let Some(ctrl) = self.absorption {
            let eta = bracket.sample_table(series, &self.config.paddle_eta, time, time_mult)?;
            water_levels = estimate_water_level(input.faces, extent, self.config.n_paddles, reduce);
            for (i, state) in self.paddles.iter_mut().enumerate() {
                let delta = ctrl.update(state, water_levels[i], eta[i], time_mult, input.dt);
                tracing::debug!(
                    "'{}' paddle {}: level={:.6}, target={:.6}, abs correction {:+.3e}",
                    self.name,
                    i,
                    water_levels[i],
                    ctrl.expected_level(eta[i]),
                    delta
                );
            }
        }

        // 漂移保护
        let mut dps_events = Vec::new();
        if let Some(dps) = self.dps {
            for (i, state) in self.paddles.iter_mut().enumerate() {
                let event = dps.step(state, scheduled[i], time);
                match event {
                    DpsEvent::Activated { sign } => tracing::debug!(
                        "'{}' paddle {}: DPS 启动, sign={}, t={}",
                        self.name,
                        i,
                        sign,
                        time
                    ),
                    DpsEvent::Completed { sign } => tracing::debug!(
                        "'{}' paddle {}: DPS 完成, 累计偏移 {:+.6} (sign={})",
                        self.name,
                        i,
                        state.cum_dps_correction,
                        sign
                    ),
                    DpsEvent::Idle | DpsEvent::Ramping { .. } => {}
                }
                dps_events.push(event);
            }
        }

        if kind.has_tilt() {
            for (state, tilt) in self.paddles.iter_mut().zip(&tilts) {
                state.tilt_old = *tilt;
            }
        }

        let displacements = scheduled
            .iter()
            .zip(&self.paddles)
            .map(|(d, s)| d + s.total_correction())
            .collect();

        Ok(StepReport {
            time,
            time_mult,
            scheduled,
            displacements,
            tilts,
            water_levels,
            dps_events,
        })
    }

    fn map_motion(
        &self,
        time: f64,
        report: &StepReport,
        extent: &PatchExtent,
        points: &[DVec3],
    ) -> BoundaryMotion {
        let layout = PaddleLayout::new(extent, self.config.n_paddles);
        let translations: &[f64] = if self.config.kind.has_displacement() {
            &report.displacements
        } else {
            &[]
        };
        let displacements = self.mapper.map(&layout, translations, &report.tilts, points);
        BoundaryMotion {
            time,
            displacements,
        }
    }

    fn log_step(&self, report: &StepReport) {
        if self.config.kind.has_displacement() {
            tracing::info!(
                "Displacement Paddles_{} => {:?}",
                self.name,
                report.displacements
            );
        }
        if self.config.kind.has_tilt() {
            tracing::info!("Tilting Paddles_{} => {:?}", self.name, report.tilts);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reduce::SerialReduce;

    fn wall(width: f64, height: f64, ny: usize, nz: usize) -> Vec<DVec3> {
        let mut pts = Vec::new();
        for j in 0..=ny {
            for k in 0..=nz {
                pts.push(DVec3::new(
                    0.0,
                    width * j as f64 / ny as f64,
                    height * k as f64 / nz as f64,
                ));
            }
        }
        pts
    }

    fn piston() -> WavemakerConfig {
        WavemakerConfig::piston(vec![0.0, 1.0, 2.0], vec![vec![0.0, 1.0, 2.0]])
    }

    #[test]
    fn test_new_validates_config() {
        let mut cfg = piston();
        cfg.n_paddles = 2;
        assert!(WavemakerBoundary::new("inlet", cfg).is_err());
    }

    #[test]
    fn test_restore_checks_state_length() {
        let res = WavemakerBoundary::restore("inlet", piston(), PaddleState::fleet(3), None);
        assert!(matches!(res, Err(WmError::SizeMismatch { .. })));
    }

    #[test]
    fn test_time_multiplier() {
        let b = WavemakerBoundary::new("inlet", piston().with_smoothing(2.0).with_tuning_factor(0.5))
            .unwrap();
        assert!((b.time_multiplier(1.0) - 0.25).abs() < 1e-15);
        assert_eq!(b.time_multiplier(2.0), 0.5);
        assert_eq!(b.time_multiplier(5.0), 0.5);

        let b = WavemakerBoundary::new("inlet", piston()).unwrap();
        assert_eq!(b.time_multiplier(0.1), 1.0);
    }

    #[test]
    fn test_single_piston_displacement() {
        let mut b = WavemakerBoundary::new("inlet", piston()).unwrap();
        let pts = wall(1.0, 0.5, 4, 4);
        let motion = b.update(&StepInput::new(0.5, 0.1, &[]), &pts, &SerialReduce).unwrap();
        for d in &motion.displacements {
            assert!((d.x - 0.5).abs() < 1e-12);
            assert_eq!(d.y, 0.0);
            assert_eq!(d.z, 0.0);
        }
    }

    #[test]
    fn test_time_outside_series_is_error() {
        let mut b = WavemakerBoundary::new("inlet", piston()).unwrap();
        let pts = wall(1.0, 0.5, 2, 2);
        let err = b.update(&StepInput::new(2.5, 0.1, &[]), &pts, &SerialReduce).unwrap_err();
        assert!(matches!(err, WmError::TimeOutOfRange { .. }));
        assert!(b.last_update().is_none());
    }

    #[test]
    fn test_time_going_backwards_is_error() {
        let mut b = WavemakerBoundary::new("inlet", piston()).unwrap();
        let pts = wall(1.0, 0.5, 2, 2);
        b.update(&StepInput::new(1.0, 0.1, &[]), &pts, &SerialReduce).unwrap();
        assert!(b.update(&StepInput::new(0.5, 0.1, &[]), &pts, &SerialReduce).is_err());
    }

    #[test]
    fn test_flap_records_tilt_old() {
        let cfg = WavemakerConfig::flap(vec![0.0, 1.0], vec![vec![0.0, 8.0]], 0.0, 0.0);
        let mut b = WavemakerBoundary::new("flap", cfg).unwrap();
        let pts = wall(1.0, 0.5, 2, 4);
        b.update(&StepInput::new(0.5, 0.1, &[]), &pts, &SerialReduce).unwrap();
        assert!((b.paddles()[0].tilt_old - 4.0).abs() < 1e-12);
        let report = b.report().unwrap();
        assert!(report.dps_events.is_empty());
        assert!(report.water_levels.is_empty());
    }

    #[test]
    fn test_positions_add_rest_coordinates() {
        let mut b = WavemakerBoundary::new("inlet", piston()).unwrap();
        let pts = wall(1.0, 0.5, 1, 1);
        let motion = b.update(&StepInput::new(1.5, 0.1, &[]), &pts, &SerialReduce).unwrap().clone();
        let pos = motion.positions(&pts).unwrap();
        for (p, r) in pos.iter().zip(&pts) {
            assert!((p.x - r.x - 1.5).abs() < 1e-12);
        }
        assert!(motion.positions(&pts[..1]).is_err());
    }
}
