// apps/wm_cli/src/commands/run.rs

//! 运行命令
//!
//! 在合成平底水槽中逐步驱动造波边界，可选写出运动记录和检查点，
//! 也可以从检查点继续运行。

use anyhow::{bail, Context, Result};
use clap::Args;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};
use wm_config::WavemakerConfig;
use wm_io::{MotionLog, WavemakerCheckpoint};
use wm_physics::{SerialReduce, StepInput, WavemakerBoundary};

use super::tank::FlatTank;

/// 运行参数
#[derive(Args)]
pub struct RunArgs {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 从检查点继续（忽略 --config）
    #[arg(long)]
    pub resume: Option<PathBuf>,

    /// 边界名称
    #[arg(short, long, default_value = "wavemaker")]
    pub patch: String,

    /// 时间步长 [s]
    #[arg(long, default_value = "0.05")]
    pub dt: f64,

    /// 结束时间 [s]，默认取运动表末端
    #[arg(short = 't', long)]
    pub end_time: Option<f64>,

    /// 造波边界宽度 [m]
    #[arg(long, default_value = "1.0")]
    pub width: f64,

    /// 造波边界高度 [m]
    #[arg(long, default_value = "1.0")]
    pub height: f64,

    /// 横向面数
    #[arg(long, default_value = "20")]
    pub ny: usize,

    /// 竖向面数
    #[arg(long, default_value = "20")]
    pub nz: usize,

    /// 静水深 [m]，默认取 initialWaterDepth
    #[arg(long)]
    pub depth: Option<f64>,

    /// 运动记录 CSV 路径
    #[arg(long)]
    pub motion_log: Option<PathBuf>,

    /// 结束时写出的检查点路径
    #[arg(long)]
    pub checkpoint: Option<PathBuf>,
}

/// 执行运行命令
pub fn execute(args: RunArgs) -> Result<()> {
    info!("=== 造波边界运行 ===");

    if !(args.dt > 0.0 && args.dt.is_finite()) {
        bail!("时间步长必须为正: {}", args.dt);
    }

    let mut boundary = load_boundary(&args)?;
    let config = boundary.config().clone();
    let (t_min, t_max) = config.time_range();

    let depth = args.depth.unwrap_or_else(|| default_depth(&config, args.height));
    let tank = FlatTank::new(args.width, args.height, args.ny, args.nz, depth)?;
    let points = tank.points();
    let faces = tank.faces();
    info!(
        "水槽: {} x {} m, {} 点, {} 面, 静水深 = {} m",
        args.width,
        args.height,
        points.len(),
        faces.len(),
        tank.depth()
    );

    let start = match boundary.last_update() {
        Some(t) => t + args.dt,
        None => t_min,
    };
    let mut end = args.end_time.unwrap_or(t_max);
    if end > t_max {
        warn!("结束时间 {} 超出运动表范围，截断到 {}", end, t_max);
        end = t_max;
    }
    let n_steps = step_count(start, end, args.dt);
    if n_steps == 0 {
        warn!("时间窗 [{}, {}] 内没有可推进的步", start, end);
    }

    let mut log = match &args.motion_log {
        Some(path) => Some(
            MotionLog::create(path, &config)
                .with_context(|| format!("无法创建运动记录: {}", path.display()))?,
        ),
        None => None,
    };

    info!("开始运行: t = {} .. {} s, dt = {} s, {} 步", start, end, args.dt, n_steps);
    let clock = Instant::now();
    let mut peak: f64 = 0.0;

    for i in 0..n_steps {
        let t = step_time(start, end, args.dt, i);
        let step_peak = boundary
            .update(&StepInput::new(t, args.dt, &faces), &points, &SerialReduce)
            .with_context(|| format!("t = {} s 推进失败", t))?
            .displacements
            .iter()
            .map(|d| d.length())
            .fold(0.0_f64, f64::max);
        peak = peak.max(step_peak);

        if let Some(log) = log.as_mut() {
            let report = boundary.report().context("推进后缺少步报告")?;
            log.record(report)?;
        }
    }

    if let Some(log) = log {
        let rows = log.rows();
        log.finish()?;
        info!("运动记录: {} 行", rows);
    }

    if let Some(path) = &args.checkpoint {
        WavemakerCheckpoint::capture(&boundary)
            .save(path)
            .with_context(|| format!("无法写出检查点: {}", path.display()))?;
        info!("检查点已保存: {}", path.display());
    }

    info!("=== 运行完成 ===");
    info!("总步数: {}", n_steps);
    info!("计算时间: {:.3} s", clock.elapsed().as_secs_f64());
    info!("最大点位移: {:.6} m", peak);
    for (i, s) in boundary.paddles().iter().enumerate() {
        info!(
            "板 {}: 吸收修正 = {:.6} m, 漂移修正 = {:.6} m",
            i,
            s.cum_abs_correction,
            s.inst_dps_correction + s.cum_dps_correction
        );
    }

    Ok(())
}

fn load_boundary(args: &RunArgs) -> Result<WavemakerBoundary> {
    if let Some(path) = &args.resume {
        let checkpoint = WavemakerCheckpoint::load(path)
            .with_context(|| format!("无法读取检查点: {}", path.display()))?;
        info!(
            "从检查点继续: {}, 上次时间 = {:?}",
            checkpoint.patch, checkpoint.last_update
        );
        return checkpoint.restore().context("检查点恢复失败");
    }

    let Some(path) = &args.config else {
        bail!("需要 --config 或 --resume");
    };
    let config = WavemakerConfig::from_file(path)
        .with_context(|| format!("无法加载配置: {}", path.display()))?;
    WavemakerBoundary::new(args.patch.clone(), config).context("构建造波边界失败")
}

fn default_depth(config: &WavemakerConfig, height: f64) -> f64 {
    if config.initial_water_depth > 0.0 {
        config.initial_water_depth
    } else {
        0.5 * height
    }
}

/// 第 `i` 步的时间，舍入后不越过 `end`
fn step_time(start: f64, end: f64, dt: f64, i: usize) -> f64 {
    (start + i as f64 * dt).min(end)
}

/// `[start, end]` 内步长 `dt` 的步数，末端容许舍入误差
fn step_count(start: f64, end: f64, dt: f64) -> usize {
    if end < start {
        return 0;
    }
    ((end - start) / dt + 1e-9).floor() as usize + 1
}
