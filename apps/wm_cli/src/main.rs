// apps/wm_cli/src/main.rs

//! 造波板运动控制命令行界面
//!
//! # 架构层级
//!
//! 本模块属于 **Layer 5: Application**：
//! - 只依赖各层公开 API，不持有任何求解状态
//! - 错误统一转为 `anyhow::Error` 并附加上下文

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// 分段造波板边界运动控制工具
#[derive(Parser)]
#[command(name = "wm_cli")]
#[command(author = "MariHydro Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Segmented wavemaker boundary motion controller", long_about = None)]
struct Cli {
    /// 日志级别 (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 在合成水槽中驱动造波边界
    Run(commands::run::RunArgs),
    /// 由规则波参数生成运动表
    Generate(commands::generate::GenerateArgs),
    /// 显示配置或检查点信息
    Info(commands::info::InfoArgs),
    /// 验证配置
    Validate(commands::validate::ValidateArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Run(args) => commands::run::execute(args),
        Commands::Generate(args) => commands::generate::execute(args),
        Commands::Info(args) => commands::info::execute(args),
        Commands::Validate(args) => commands::validate::execute(args),
    }
}
