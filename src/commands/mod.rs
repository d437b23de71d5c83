//! 命令处理器
//!
//! 每个命令一个模块，实现 CommandHandler trait

use crate::application::EnvMerger;
use crate::domain::error::Result;
use crate::domain::models::{Changeset, OutputFormat};
use crate::domain::repositories::Environment;
use crate::infrastructure::{InMemoryEnvironment, ProcessEnvironment};
use async_trait::async_trait;
use std::time::SystemTime;

pub mod cache;
pub mod config;
pub mod load;
pub mod run;
pub mod snapshot;
pub mod source;
pub mod status;

/// 命令上下文
#[derive(Debug)]
pub struct CommandContext {
    pub verbose: bool,
}

/// 命令处理器 trait
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// 执行命令
    async fn execute(&self, ctx: &CommandContext) -> Result<()>;
}

/// 命令输出
pub trait CommandOutput {
    /// 打印结果
    fn print(&self);
}

impl CommandOutput for String {
    fn print(&self) {
        if !self.is_empty() {
            println!("{}", self);
        }
    }
}

/// 按输出格式渲染变更集
pub fn render(changeset: &Changeset, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Env => Ok(changeset.to_shell_exports()),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(changeset)?),
    }
}

/// 合并（或在内存副本上演练）后打印变更集
pub(crate) fn merge_and_print(
    merger: &EnvMerger,
    changeset: Changeset,
    format: OutputFormat,
    dry_run: bool,
    ctx: &CommandContext,
) -> Result<()> {
    let changeset = if dry_run {
        let mut env = InMemoryEnvironment::snapshot();
        let changeset = merger.apply(&mut env, changeset);
        if ctx.verbose {
            eprintln!("演练后的搜索路径:");
            for dir in env.search_path() {
                eprintln!("  {}", dir.display());
            }
        }
        changeset
    } else {
        merger.apply(&mut ProcessEnvironment::new(), changeset)
    };

    if ctx.verbose {
        eprintln!("✓ {} 个变量变更", changeset.len());
    }
    render(&changeset, format)?.print();
    Ok(())
}

/// 以本地时间显示修改时间
pub(crate) fn format_mtime(time: Option<SystemTime>) -> String {
    match time {
        Some(t) => chrono::DateTime::<chrono::Local>::from(t)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        None => "不存在".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_formats() {
        let mut cs = Changeset::new();
        cs.set("A", "1");
        cs.remove("B");

        assert_eq!(render(&cs, OutputFormat::Env).unwrap(), "export A='1'\nunset B");

        let json: serde_json::Value =
            serde_json::from_str(&render(&cs, OutputFormat::Json).unwrap()).unwrap();
        assert_eq!(json["A"], "1");
        assert!(json["B"].is_null());
    }

    #[test]
    fn test_format_mtime_missing() {
        assert_eq!(format_mtime(None), "不存在");
        assert_eq!(format_mtime(Some(SystemTime::now())).len(), 19);
    }
}
