//! snapshot 命令处理器

use super::{CommandContext, CommandHandler, merge_and_print};
use crate::application::{EnvMerger, ShellEnvService};
use crate::domain::error::Result;
use crate::domain::models::OutputFormat;
use async_trait::async_trait;
use std::sync::Arc;

/// snapshot 命令：只导入允许列表中的变量
pub struct SnapshotCommand {
    service: Arc<ShellEnvService>,
    merger: EnvMerger,
    format: OutputFormat,
}

impl SnapshotCommand {
    pub fn new(service: Arc<ShellEnvService>, merger: EnvMerger, format: OutputFormat) -> Self {
        Self {
            service,
            merger,
            format,
        }
    }
}

#[async_trait]
impl CommandHandler for SnapshotCommand {
    async fn execute(&self, ctx: &CommandContext) -> Result<()> {
        if ctx.verbose {
            let names: Vec<&str> = self.service.settings().allow_list.iter().collect();
            eprintln!("允许列表: {}", names.join(", "));
        }

        let changeset = self.service.snapshot().await?;
        merge_and_print(&self.merger, changeset, self.format, false, ctx)
    }
}
