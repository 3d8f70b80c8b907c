// apps/wm_cli/src/commands/generate.rs

//! 运动表生成命令
//!
//! 读取规则波或孤立波参数（JSON），写出可直接加载的造波板配置。

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tracing::info;
use wm_config::WavemakerConfig;
use wm_physics::{SignalSpec, SolitarySignal};

/// 生成参数
#[derive(Args)]
pub struct GenerateArgs {
    /// 波浪参数文件路径
    #[arg(short, long)]
    pub spec: PathBuf,

    /// 输出配置文件路径
    #[arg(short, long, default_value = "wavemaker.json")]
    pub output: PathBuf,

    /// 按孤立波参数解析（活塞，Goring 方法）
    #[arg(long)]
    pub solitary: bool,
}

/// 执行生成命令
pub fn execute(args: GenerateArgs) -> Result<()> {
    info!("=== 运动表生成 ===");

    let content = std::fs::read_to_string(&args.spec)
        .with_context(|| format!("无法读取参数文件: {}", args.spec.display()))?;
    let config = if args.solitary {
        generate_solitary(&content)?
    } else {
        generate_regular(&content)?
    };

    config
        .save(&args.output)
        .with_context(|| format!("无法写出配置: {}", args.output.display()))?;
    info!(
        "已写出 {} 个采样点到 {}",
        config.time_series.len(),
        args.output.display()
    );

    Ok(())
}

fn generate_regular(content: &str) -> Result<WavemakerConfig> {
    let spec: SignalSpec = serde_json::from_str(content).context("参数文件解析失败")?;

    let wave = &spec.wave;
    info!(
        "{} 造波板, {} 块板, H = {} m, T = {} s, h = {} m, 方向 = {}°",
        spec.kind, spec.n_paddles, wave.height, wave.period, wave.depth, wave.direction
    );

    let config = spec.generate().context("运动表生成失败")?;
    info!(
        "波长 L = {:.4} m, kh = {:.4}, 冲程 S = {:.4} m",
        wave.wavelength(),
        wave.wave_number() * wave.depth,
        spec.stroke()
    );
    Ok(config)
}

fn generate_solitary(content: &str) -> Result<WavemakerConfig> {
    let spec: SolitarySignal = serde_json::from_str(content).context("参数文件解析失败")?;

    let wave = &spec.wave;
    info!(
        "{} 孤立波, {} 块板, H = {} m, h = {} m",
        wave.theory, spec.n_paddles, wave.wave_height, wave.depth
    );

    let config = spec.generate().context("孤立波运动表生成失败")?;
    let stroke = config
        .paddle_position
        .iter()
        .filter_map(|row| row.last())
        .fold(0.0_f64, |m, &v| m.max(v));
    info!("冲程 S = {:.4} m", stroke);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_solitary_from_json() {
        let json = r#"{
            "wave": { "waveTheory": "Grimshaw", "waveHeight": 0.04, "waterDepth": 0.4, "X0": -3.0 },
            "nPaddles": 2,
            "bLims": [0.0, 1.0],
            "window": { "t0": 0.0, "tEnd": 6.0, "dt": 0.02 },
            "genAbs": true
        }"#;
        let config = generate_solitary(json).unwrap();
        assert_eq!(config.n_paddles, 2);
        assert!(config.absorption_enabled());
        assert!(config.paddle_position[0].last().unwrap() > &0.0);
    }

    #[test]
    fn test_generate_regular_rejects_solitary_json() {
        let json = r#"{ "wave": { "waveTheory": "Grimshaw", "waveHeight": 0.04, "waterDepth": 0.4 } }"#;
        assert!(generate_regular(json).is_err());
    }
}
