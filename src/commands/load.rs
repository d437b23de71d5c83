//! load 命令处理器

use super::{CommandContext, CommandHandler, merge_and_print};
use crate::application::{ChangesetOrigin, EnvMerger, ShellEnvService};
use crate::domain::error::Result;
use crate::domain::models::OutputFormat;
use async_trait::async_trait;
use std::sync::Arc;

/// load 命令：缓存新鲜则读取，否则重建，然后合并
pub struct LoadCommand {
    service: Arc<ShellEnvService>,
    merger: EnvMerger,
    rebuild: bool,
    format: OutputFormat,
}

impl LoadCommand {
    pub fn new(
        service: Arc<ShellEnvService>,
        merger: EnvMerger,
        rebuild: bool,
        format: OutputFormat,
    ) -> Self {
        Self {
            service,
            merger,
            rebuild,
            format,
        }
    }
}

#[async_trait]
impl CommandHandler for LoadCommand {
    async fn execute(&self, ctx: &CommandContext) -> Result<()> {
        let (changeset, origin) = if self.rebuild {
            (self.service.rebuild().await?, ChangesetOrigin::Rebuilt)
        } else {
            self.service.load_or_rebuild().await?
        };

        if ctx.verbose {
            match origin {
                ChangesetOrigin::Cache => eprintln!("✓ 使用缓存"),
                ChangesetOrigin::Rebuilt => eprintln!("✓ 已重新 source 并更新缓存"),
            }
        }

        merge_and_print(&self.merger, changeset, self.format, false, ctx)
    }
}
