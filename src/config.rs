use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_TARGET: &str = "/etc/nginx/nginx.conf";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub target: Option<PathBuf>,
    #[serde(default)]
    pub strict: bool,
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("invalid config {}", path.display()))
    }

    /// 命令行参数优先于配置文件
    pub fn resolve_target(&self, cli_path: Option<PathBuf>) -> PathBuf {
        cli_path
            .or_else(|| self.target.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TARGET))
    }
}
