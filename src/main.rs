mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // 初始化日志系统
    configurator_smoke::logger::init_logger(cli.log_ansi());
    match cli.command {
        Commands::Run(args) => {
            let summary = cli::run(args)?;
            if !summary.is_some_and(|s| s.all_passed()) {
                std::process::exit(1);
            }
        }
        Commands::Methods => cli::list_methods(),
    }
    Ok(())
}
