// crates/wm_physics/src/lib.rs

//! 造波板运动控制核心
//!
//! 每个时间步计算分段造波板边界的点位移场，包括：
//! - 插值 (interp) - 时间线性插值、板间余弦混合
//! - 水位估计 (water_level) - 由相场估计各板前的界面高度
//! - 主动吸收 (absorption) - 按 `sqrt(g/h)` 积分的位移修正
//! - 漂移保护 (dps) - 每块板的回中状态机
//! - 运动学映射 (kinematics) - 板标量到三维点位移
//! - 边界 (boundary) - 按顺序调度以上各步
//!
//! 另外提供孤立波理论 (wave_theory) 与规则波运动表生成 (signal)。
//!
//! # 并行
//!
//! 区域分解时每个子域各自调用 [`WavemakerBoundary::update`]，全局量通过
//! [`PatchReduce`] 归约，所有子域得到相同的修正量。

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod absorption;
pub mod boundary;
pub mod dps;
pub mod interp;
pub mod kinematics;
pub mod reduce;
pub mod signal;
pub mod state;
pub mod water_level;
pub mod wave_theory;

// 重导出常用类型
pub use absorption::AbsorptionController;
pub use boundary::{BoundaryMotion, StepInput, StepReport, WavemakerBoundary};
pub use dps::{dps_ramp, DpsEvent, DriftPrevention};
pub use kinematics::{HingeGeometry, KinematicsMapper, PaddleLayout};
pub use reduce::{PatchReduce, SerialReduce};
pub use signal::{RegularWave, SignalSpec, TimeWindow};
pub use state::{DpsPhase, PaddleState};
pub use water_level::{estimate_water_level, FaceSample, PatchExtent};
pub use wave_theory::{SolitarySignal, SolitaryWave, WaveTheory};
