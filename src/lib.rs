//! shellenv - 从 shell 初始化脚本中提取环境变量
//!
//! 分层结构遵循 Clean Architecture 原则

// 领域层
pub mod domain;

// 文本格式（export 列表与值字面量）
pub mod format;

// 应用层
pub mod application;

// 基础设施层
pub mod infrastructure;

// 命令层
pub mod commands;

// CLI 定义
pub mod cli;

// 应用程序容器
pub mod app;

#[cfg(test)]
pub(crate) mod test_utils;

// 重新导出常用类型
pub use application::{EnvMerger, ShellEnvService};
pub use domain::{Changeset, DomainError, OutputFormat, Result, VarValue};
pub use format::{ExportParser, ShellDialect};
