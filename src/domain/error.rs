//! 领域层错误类型

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DomainError>;

/// 领域层错误类型
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum DomainError {
    #[error("无法启动子 shell {shell}: {reason}")]
    #[diagnostic(
        code(shellenv::shell_execution),
        help("检查配置中的 shell 是否存在并可执行")
    )]
    ShellExecution { shell: String, reason: String },

    #[error("子 shell 在 {0} 秒后超时")]
    #[diagnostic(
        code(shellenv::shell_timeout),
        help("被 source 的脚本可能在等待输入，或调大配置中的 timeout_secs")
    )]
    ShellTimeout(u64),

    #[error("IO 错误: {0}")]
    #[diagnostic(code(shellenv::io))]
    Io(String),

    #[error("缓存文件不存在: {0}")]
    #[diagnostic(
        code(shellenv::cache_not_found),
        help("运行 'shellenv load --rebuild' 重新生成缓存")
    )]
    CacheNotFound(PathBuf),

    #[error("缓存文件已损坏 {path}: {reason}")]
    #[diagnostic(
        code(shellenv::cache_corrupt),
        help("运行 'shellenv cache clear' 后重试")
    )]
    CacheCorrupt { path: PathBuf, reason: String },

    #[error("序列化错误: {0}")]
    #[diagnostic(code(shellenv::serialization))]
    Serialization(String),

    #[error("配置错误: {0}")]
    #[diagnostic(code(shellenv::config), help("使用 'shellenv config info' 查看当前配置"))]
    Config(String),

    #[error("无效参数: {0}")]
    #[diagnostic(code(shellenv::invalid_argument))]
    InvalidArgument(String),

    #[error("命令未找到: {0}")]
    #[diagnostic(code(shellenv::command_not_found), help("确保命令在合并后的 PATH 中"))]
    CommandNotFound(String),

    #[error("命令执行失败: {0}")]
    #[diagnostic(code(shellenv::command_execution))]
    CommandExecutionFailed(String),
}

impl From<std::io::Error> for DomainError {
    fn from(err: std::io::Error) -> Self {
        DomainError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::Serialization(err.to_string())
    }
}

