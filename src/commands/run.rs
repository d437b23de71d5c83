//! run 命令处理器

use super::{CommandContext, CommandHandler};
use crate::application::{EnvMerger, ShellEnvService};
use crate::domain::error::{DomainError, Result};
use crate::infrastructure::ProcessEnvironment;
use async_trait::async_trait;
use std::sync::Arc;

/// run 命令：加载并合并 shell 环境后执行命令，退出码透传
pub struct RunCommand {
    service: Arc<ShellEnvService>,
    merger: EnvMerger,
    command: Vec<String>,
}

impl RunCommand {
    pub fn new(service: Arc<ShellEnvService>, merger: EnvMerger, command: Vec<String>) -> Self {
        Self {
            service,
            merger,
            command,
        }
    }
}

#[async_trait]
impl CommandHandler for RunCommand {
    async fn execute(&self, ctx: &CommandContext) -> Result<()> {
        let Some((program, args)) = self.command.split_first() else {
            return Err(DomainError::InvalidArgument(
                "未指定要执行的命令".to_string(),
            ));
        };

        // 1. 取得变更集并合并进当前进程
        let (changeset, _) = self.service.load_or_rebuild().await?;
        let mut env = ProcessEnvironment::new();
        let changeset = self.merger.apply(&mut env, changeset);
        if ctx.verbose {
            eprintln!("✓ 已合并 {} 个变量", changeset.len());
        }

        // 2. 按派生的搜索路径解析程序
        let cwd = std::env::current_dir()?;
        let resolved = which::which_in(program, env.search_path_os(), &cwd)
            .map_err(|e| DomainError::CommandNotFound(format!("{}: {}", program, e)))?;

        // 3. 执行并传递退出码，子进程继承合并后的环境
        let status = tokio::process::Command::new(&resolved)
            .args(args)
            .status()
            .await
            .map_err(|e| DomainError::CommandExecutionFailed(e.to_string()))?;

        let code = status.code().unwrap_or(1);
        std::process::exit(code);
    }
}
