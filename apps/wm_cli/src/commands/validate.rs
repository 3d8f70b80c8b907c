// apps/wm_cli/src/commands/validate.rs

//! 配置验证命令
//!
//! 加载配置并构建造波边界，报告错误以及合法但可疑的设置。

use anyhow::{bail, Result};
use clap::Args;
use std::path::PathBuf;
use tracing::{error, info, warn};
use wm_config::WavemakerConfig;
use wm_physics::WavemakerBoundary;

/// 验证参数
#[derive(Args)]
pub struct ValidateArgs {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: PathBuf,

    /// 严格模式（警告也视为错误）
    #[arg(long)]
    pub strict: bool,
}

/// 验证结果
#[derive(Default)]
struct ValidationResult {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    fn is_ok_strict(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

/// 执行验证命令
pub fn execute(args: ValidateArgs) -> Result<()> {
    info!("=== 造波板配置验证 ===");
    println!("\n检查配置文件: {}", args.config.display());

    let mut result = ValidationResult::default();
    match WavemakerConfig::from_file(&args.config) {
        Ok(config) => {
            match WavemakerBoundary::new("validate", config.clone()) {
                Ok(_) => println!("  ✓ 配置有效"),
                Err(e) => result.add_error(e.to_string()),
            }
            check_warnings(&config, &mut result);
        }
        Err(e) => result.add_error(e.to_string()),
    }

    print_validation_result(&result, args.strict)
}

/// 合法但可能不是本意的设置
fn check_warnings(config: &WavemakerConfig, result: &mut ValidationResult) {
    let (t_min, t_max) = config.time_range();

    if config.tuning_factor == 0.0 {
        result.add_warning("tuningFactor = 0，启动平滑期内造波板保持静止");
    }
    if config.smoothing_enabled() && config.t_smooth > t_max - t_min {
        result.add_warning(format!(
            "tSmooth = {} 超过运动表时长 {}",
            config.t_smooth,
            t_max - t_min
        ));
    }
    if config.absorption_enabled() && !config.dps_enabled() {
        result.add_warning("开启主动吸收但未开启漂移保护，累计修正可能无界增长");
    }
    if config.dps_enabled() {
        let peak = config
            .paddle_position
            .iter()
            .flatten()
            .fold(0.0_f64, |m, x| m.max(x.abs()));
        if peak > config.max_stroke {
            result.add_warning(format!(
                "预定位移峰值 {} 超过最大冲程 {}，漂移保护会频繁触发",
                peak, config.max_stroke
            ));
        }
    }
}

fn print_validation_result(result: &ValidationResult, strict: bool) -> Result<()> {
    println!("\n=== 验证结果 ===");

    if !result.errors.is_empty() {
        println!("\n错误 ({}):", result.errors.len());
        for err in &result.errors {
            error!("  ✗ {}", err);
            println!("  ✗ {}", err);
        }
    }

    if !result.warnings.is_empty() {
        println!("\n警告 ({}):", result.warnings.len());
        for warning in &result.warnings {
            warn!("  ⚠ {}", warning);
            println!("  ⚠ {}", warning);
        }
    }

    let success = if strict {
        result.is_ok_strict()
    } else {
        result.is_ok()
    };

    if success {
        println!("\n✓ 验证通过");
        Ok(())
    } else {
        println!("\n✗ 验证失败");
        bail!(
            "验证失败：发现 {} 个错误，{} 个警告",
            result.errors.len(),
            result.warnings.len()
        )
    }
}
