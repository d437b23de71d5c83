//! source 命令处理器

use super::{CommandContext, CommandHandler, merge_and_print};
use crate::application::{EnvMerger, ShellEnvService};
use crate::domain::error::Result;
use crate::domain::models::OutputFormat;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

/// source 命令：source 单个文件并合并
pub struct SourceCommand {
    service: Arc<ShellEnvService>,
    merger: EnvMerger,
    file: PathBuf,
    save: bool,
    dry_run: bool,
    format: OutputFormat,
}

impl SourceCommand {
    pub fn new(
        service: Arc<ShellEnvService>,
        merger: EnvMerger,
        file: PathBuf,
        save: bool,
        dry_run: bool,
        format: OutputFormat,
    ) -> Self {
        Self {
            service,
            merger,
            file,
            save,
            dry_run,
            format,
        }
    }
}

#[async_trait]
impl CommandHandler for SourceCommand {
    async fn execute(&self, ctx: &CommandContext) -> Result<()> {
        let changeset = self.service.source_file(&self.file).await?;

        if self.save && !self.dry_run {
            self.service.save_into_cache(&changeset).await?;
            if ctx.verbose {
                eprintln!(
                    "✓ 已写入缓存: {}",
                    self.service.cache().location().display()
                );
            }
        }

        merge_and_print(&self.merger, changeset, self.format, self.dry_run, ctx)
    }
}
