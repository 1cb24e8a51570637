use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use configurator_smoke::config::{ConfigLoader, FailureScope, HarnessConfig};
use configurator_smoke::demo::DemoConfigurator;
use configurator_smoke::services::{ConfiguratorApp, ServiceKind};
use configurator_smoke::{TestSummary, test_all_services};

pub type Result<T> = std::result::Result<T, anyhow::Error>;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// 日志输出是否带颜色
    pub fn log_ansi(&self) -> bool {
        let no_color = matches!(&self.command, Commands::Run(args) if args.no_color);
        configurator_smoke::logger::ansi_allowed(no_color)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// 对内置演示应用运行全部服务测试
    Run(RunArgs),
    /// 列出每个服务的被测方法
    Methods,
}

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// 配置文件路径（默认自动查找 configurator-smoke.toml）
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// 成功的结果也输出返回数据
    #[arg(short, long)]
    pub verbose: bool,

    /// 关闭彩色输出
    #[arg(long)]
    pub no_color: bool,

    /// 失败归属到具体方法，并继续执行该服务的后续调用
    #[arg(long)]
    pub per_method: bool,

    /// 让指定服务的所有方法失败（可重复）
    #[arg(long = "fail", value_enum)]
    pub faults: Vec<ServiceKind>,
}

impl RunArgs {
    /// 命令行参数覆盖配置文件
    fn apply(&self, mut config: HarnessConfig) -> HarnessConfig {
        if self.verbose {
            config.verbose = true;
        }
        if self.no_color {
            config.color = false;
        }
        if self.per_method {
            config.failure_scope = FailureScope::Method;
        }
        config
    }
}

/// 执行 run 子命令，返回本次测试摘要
pub fn run(args: RunArgs) -> Result<Option<TestSummary>> {
    let config = args.apply(ConfigLoader::load(args.config.as_deref())?);
    tracing::debug!(?config, faults = ?args.faults, "Resolved configuration");

    let app = args
        .faults
        .iter()
        .fold(DemoConfigurator::new(), |app, kind| app.with_fault(*kind));

    Ok(test_all_services(
        Some(&app as &dyn ConfiguratorApp),
        config,
    ))
}

pub fn list_methods() {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Service", "Methods"]);

    for kind in ServiceKind::ALL {
        table.add_row(vec![kind.name().to_string(), kind.methods().join(", ")]);
    }

    println!("{}", table);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_flags() {
        let cli = Cli::try_parse_from([
            "configurator-smoke",
            "run",
            "--verbose",
            "--per-method",
            "--fail",
            "walls",
            "--fail",
            "scene",
        ])
        .unwrap();

        let Commands::Run(args) = cli.command else {
            panic!("Expected run command");
        };
        assert!(args.verbose);
        assert!(args.per_method);
        assert_eq!(args.faults, vec![ServiceKind::Walls, ServiceKind::Scene]);
    }

    #[test]
    fn test_no_color_also_disables_log_colors() {
        let cli = Cli::try_parse_from(["configurator-smoke", "run", "--no-color"]).unwrap();
        assert!(!cli.log_ansi());
    }

    #[test]
    fn test_unknown_service_rejected() {
        let result = Cli::try_parse_from(["configurator-smoke", "run", "--fail", "roof"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_flags_override_config() {
        let args = RunArgs {
            no_color: true,
            per_method: true,
            ..RunArgs::default()
        };
        let config = args.apply(HarnessConfig::default());
        assert!(!config.color);
        assert!(!config.verbose);
        assert_eq!(config.failure_scope, FailureScope::Method);
    }
}
