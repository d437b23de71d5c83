//! status 命令处理器

use super::{CommandContext, CommandHandler, format_mtime};
use crate::application::ShellEnvService;
use crate::domain::error::Result;
use crate::infrastructure::ShellEnvConfig;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

/// status 命令
pub struct StatusCommand {
    service: Arc<ShellEnvService>,
    config: ShellEnvConfig,
    config_path: PathBuf,
}

impl StatusCommand {
    pub fn new(service: Arc<ShellEnvService>, config: ShellEnvConfig, config_path: PathBuf) -> Self {
        Self {
            service,
            config,
            config_path,
        }
    }
}

#[async_trait]
impl CommandHandler for StatusCommand {
    async fn execute(&self, ctx: &CommandContext) -> Result<()> {
        let config_state = if self.config_path.exists() {
            "存在"
        } else {
            "不存在，使用默认值"
        };
        println!("配置文件: {} ({})", self.config_path.display(), config_state);
        println!(
            "子 shell: {} {} [{}]",
            self.config.shell,
            self.config.shell_args.join(" "),
            self.config.dialect
        );

        // 源文件及其修改时间
        println!("\n源文件:");
        for path in &self.service.settings().source_files {
            let mtime = std::fs::metadata(path).and_then(|m| m.modified()).ok();
            println!("  {} [{}]", path.display(), format_mtime(mtime));
        }

        // 缓存状态
        let cache = self.service.cache();
        let cache_mtime = std::fs::metadata(cache.location())
            .and_then(|m| m.modified())
            .ok();
        let fresh = self.service.is_cache_fresh().await;
        println!("\n缓存: {} [{}]", cache.location().display(), format_mtime(cache_mtime));
        println!("  状态: {}", if fresh { "✓ 新鲜" } else { "✗ 过期或缺失" });

        if ctx.verbose {
            let names: Vec<&str> = self.service.settings().allow_list.iter().collect();
            println!("\n允许列表: {}", names.join(", "));
            println!("超时: {} 秒", self.config.timeout_secs);
        }

        Ok(())
    }
}
