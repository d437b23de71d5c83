//! cache 命令处理器

use super::{CommandContext, CommandHandler, format_mtime};
use crate::application::ShellEnvService;
use crate::domain::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// cache status 命令
pub struct CacheStatusCommand {
    service: Arc<ShellEnvService>,
}

impl CacheStatusCommand {
    pub fn new(service: Arc<ShellEnvService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl CommandHandler for CacheStatusCommand {
    async fn execute(&self, ctx: &CommandContext) -> Result<()> {
        let cache = self.service.cache();
        let mtime = std::fs::metadata(cache.location())
            .and_then(|m| m.modified())
            .ok();

        println!("📋 缓存统计信息\n");
        println!("位置: {}", cache.location().display());
        println!("修改时间: {}", format_mtime(mtime));

        if mtime.is_none() {
            println!("状态: ✗ 未缓存");
            return Ok(());
        }

        match cache.load().await {
            Ok(changeset) => {
                let removed = changeset.iter().filter(|(_, v)| v.is_removed()).count();
                println!("变量: {} 个设置, {} 个删除", changeset.len() - removed, removed);
                if self.service.is_cache_fresh().await {
                    println!("状态: ✓ 新鲜");
                } else {
                    println!("状态: ✗ 已过期（源文件更新过）");
                }
                if ctx.verbose {
                    for (name, value) in &changeset {
                        println!("  {} = {}", name, value);
                    }
                }
            }
            Err(e) => println!("状态: ✗ 不可用 ({})", e),
        }

        Ok(())
    }
}

/// cache clear 命令
pub struct CacheClearCommand {
    service: Arc<ShellEnvService>,
}

impl CacheClearCommand {
    pub fn new(service: Arc<ShellEnvService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl CommandHandler for CacheClearCommand {
    async fn execute(&self, ctx: &CommandContext) -> Result<()> {
        let removed = self.service.cache().clear().await?;
        if ctx.verbose {
            if removed {
                println!("✓ 缓存已清除");
            } else {
                println!("○ 没有缓存");
            }
        }
        Ok(())
    }
}
