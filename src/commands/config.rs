//! config 命令处理器

use super::{CommandContext, CommandHandler};
use crate::domain::error::Result;
use crate::infrastructure::{ShellEnvConfig, paths};
use async_trait::async_trait;
use std::path::PathBuf;

/// config init 命令
pub struct ConfigInitCommand {
    path: PathBuf,
    force: bool,
}

impl ConfigInitCommand {
    pub fn new(path: PathBuf, force: bool) -> Self {
        Self { path, force }
    }
}

#[async_trait]
impl CommandHandler for ConfigInitCommand {
    async fn execute(&self, _ctx: &CommandContext) -> Result<()> {
        if self.path.exists() && !self.force {
            println!("○ 配置文件已存在: {}", self.path.display());
            println!("  使用 --force 覆盖");
            return Ok(());
        }

        paths::ensure_parent(&self.path).await?;
        let content = format!(
            "# shellenv 配置\n# 源文件会在同一个子 shell 中依次 source\n\n{}",
            ShellEnvConfig::default().to_toml()?
        );
        tokio::fs::write(&self.path, content).await?;
        println!("✓ 配置文件: {}", self.path.display());
        Ok(())
    }
}

/// config info 命令
pub struct ConfigInfoCommand {
    config: ShellEnvConfig,
    path: PathBuf,
}

impl ConfigInfoCommand {
    pub fn new(config: ShellEnvConfig, path: PathBuf) -> Self {
        Self { config, path }
    }
}

#[async_trait]
impl CommandHandler for ConfigInfoCommand {
    async fn execute(&self, _ctx: &CommandContext) -> Result<()> {
        println!("# {}", self.path.display());
        print!("{}", self.config.to_toml()?);
        Ok(())
    }
}
