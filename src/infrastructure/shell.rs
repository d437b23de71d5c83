//! 子 shell 执行器实现

use crate::domain::error::{DomainError, Result};
use crate::domain::repositories::ShellRunner;
use crate::format::{ShellDialect, literal};
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

/// 环境转储之前输出的分隔行，没有它说明脚本在转储前就退出了
pub const DUMP_SENTINEL: &str = "__SHELLENV_DUMP__";

/// 仅转储当前环境
#[must_use]
pub fn dump_script(dialect: ShellDialect) -> String {
    format!("printf '%s\\n' {DUMP_SENTINEL}\n{}", dialect.dump_command())
}

/// 先执行有副作用的命令，再在同一个 shell 里转储环境
///
/// 命令的标准输入输出全部重定向到 `/dev/null`：标准输出不能混进 export 列表，
/// 后台任务也不能持有管道，否则 shell 退出后读取端等不到 EOF。
#[must_use]
pub fn effect_then_dump(effect: &str, dialect: ShellDialect) -> String {
    format!(
        "{{ {effect}\n}} </dev/null >/dev/null 2>&1\n{}",
        dump_script(dialect)
    )
}

/// `. 'PATH'`
#[must_use]
pub fn source_command(path: &Path) -> String {
    format!(". {}", literal::encode(&path.to_string_lossy()))
}

/// 通过 `tokio::process` 启动子 shell
pub struct ProcessShellRunner {
    shell: String,
    args: Vec<String>,
    timeout: Duration,
}

impl ProcessShellRunner {
    /// `args` 放在脚本之前，例如 `["-c"]`
    pub fn new(shell: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            shell: shell.into(),
            args,
            timeout,
        }
    }
}

#[async_trait]
impl ShellRunner for ProcessShellRunner {
    async fn run(&self, script: &str) -> Result<String> {
        let mut cmd = tokio::process::Command::new(&self.shell);
        cmd.args(&self.args)
            .arg(script)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!(shell = %self.shell, timeout = ?self.timeout, "spawning subordinate shell");

        let output = match timeout(self.timeout, cmd.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(DomainError::ShellExecution {
                    shell: self.shell.clone(),
                    reason: e.to_string(),
                });
            }
            Err(_) => {
                warn!(shell = %self.shell, "subordinate shell timed out, killed");
                return Err(DomainError::ShellTimeout(self.timeout.as_secs()));
            }
        };

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            warn!(status = %output.status, stderr = %stderr.trim(), "subordinate shell exited unsuccessfully");
        } else if !stderr.trim().is_empty() {
            debug!(stderr = %stderr.trim(), "subordinate shell wrote to stderr");
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
