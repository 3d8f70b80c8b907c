// apps/wm_cli/src/commands/info.rs

//! 信息显示命令
//!
//! 显示版本信息、配置摘要或检查点中的板状态。

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tracing::info;
use wm_config::{WavemakerConfig, MAX_STROKE_DISABLED};
use wm_io::{WavemakerCheckpoint, CHECKPOINT_VERSION};
use wm_physics::WaveTheory;

/// 信息显示参数
#[derive(Args)]
pub struct InfoArgs {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 检查点文件路径
    #[arg(long)]
    pub checkpoint: Option<PathBuf>,

    /// 显示默认配置
    #[arg(long)]
    pub defaults: bool,
}

/// 执行信息命令
pub fn execute(args: InfoArgs) -> Result<()> {
    info!("=== 造波板信息 ===");

    if let Some(path) = &args.config {
        let config = WavemakerConfig::from_file(path)
            .with_context(|| format!("无法加载配置: {}", path.display()))?;
        println!("=== 配置: {} ===", path.display());
        print_config(&config);
    }

    if let Some(path) = &args.checkpoint {
        let checkpoint = WavemakerCheckpoint::load(path)
            .with_context(|| format!("无法读取检查点: {}", path.display()))?;
        println!("=== 检查点: {} ===", path.display());
        print_checkpoint(&checkpoint);
    }

    if args.defaults {
        print_defaults()?;
    }

    if args.config.is_none() && args.checkpoint.is_none() && !args.defaults {
        print_system_info();
    }

    Ok(())
}

fn print_system_info() {
    println!("=== 系统信息 ===");
    println!("wm_cli 版本: {}", env!("CARGO_PKG_VERSION"));
    println!("检查点格式版本: {}", CHECKPOINT_VERSION);
    println!("目标平台: {}", std::env::consts::ARCH);
    println!("操作系统: {}", std::env::consts::OS);
    println!("\n造波板类型: Piston, Flap, Mixed");
    println!("孤立波理论: {}", WaveTheory::SUPPORTED);
}

fn print_defaults() -> Result<()> {
    println!("=== 默认配置 ===");
    let json = WavemakerConfig::default().to_json_pretty()?;
    println!("{}", json);
    Ok(())
}

fn print_config(config: &WavemakerConfig) {
    let (t_min, t_max) = config.time_range();
    println!("类型: {}", config.kind);
    println!("板数: {}", config.n_paddles);
    println!(
        "运动表: {} 个采样点, t = [{}, {}] s",
        config.time_series.len(),
        t_min,
        t_max
    );
    if config.kind.has_displacement() {
        println!("平均运动方向: {:?}", config.mean_angle);
    }
    if config.kind.has_tilt() {
        println!(
            "铰链: 高度 = {} m, 位置 = {} m",
            config.hinge_height, config.hinge_location
        );
    }

    println!("\n功能:");
    if config.absorption_enabled() {
        println!("  主动吸收: 开启, 初始水深 = {} m", config.initial_water_depth);
    } else {
        println!("  主动吸收: 关闭");
    }
    if config.dps_enabled() {
        println!(
            "  漂移保护: 开启, 最大冲程 = {} m, 回中时长 = {} s",
            config.max_stroke, config.dps_ramp_time
        );
    } else if config.max_stroke == MAX_STROKE_DISABLED {
        println!("  漂移保护: 关闭");
    } else {
        println!("  漂移保护: 不适用于 {}", config.kind);
    }
    if config.smoothing_enabled() {
        println!(
            "  启动平滑: {} s, 调节系数 = {}",
            config.t_smooth, config.tuning_factor
        );
    } else {
        println!("  启动平滑: 关闭");
    }
}

fn print_checkpoint(checkpoint: &WavemakerCheckpoint) {
    println!("边界: {}", checkpoint.patch);
    println!("格式版本: {}", checkpoint.version);
    match checkpoint.last_update {
        Some(t) => println!("上次时间: {} s", t),
        None => println!("上次时间: 未推进"),
    }
    print_config(&checkpoint.config);

    println!("\n板状态:");
    for (i, s) in checkpoint.paddles.iter().enumerate() {
        println!(
            "  板 {}: {:?}, 吸收修正 = {:.6} m, 漂移修正 = {:.6} m, 上次倾角 = {:.4}°",
            i,
            s.phase(),
            s.cum_abs_correction,
            s.inst_dps_correction + s.cum_dps_correction,
            s.tilt_old
        );
    }
}
