mod config;
mod patches;

use clap::Parser;
use nginx_map_patcher::PatchOptions;
use std::path::PathBuf;
use tracing::info;
use crate::config::Config;
use crate::patches::apply_patch;

#[derive(Parser)]
#[command(about = "Replace broken nginx map blocks with the WebSocket upgrade map")]
struct Cli {
    /// nginx 配置文件路径
    path: Option<PathBuf>,
    /// 配置文件地址 (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Print the patched config instead of writing it
    #[arg(long)]
    dry_run: bool,
    /// Fail on a map block that is never closed
    #[arg(long)]
    strict: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let target = config.resolve_target(cli.path);
    let options = PatchOptions {
        strict: cli.strict || config.strict,
    };
    info!("Patching {}", target.display());

    let report = apply_patch(&target, &options, cli.dry_run)?;

    if cli.dry_run {
        print!("{}", report.text);
    } else {
        println!("{} patched successfully", target.display());
    }
    Ok(())
}
