//! Infrastructure Layer - 技术实现
//!
//! 包含：
//! - shell: 子 shell 执行器
//! - environment: 进程环境与内存环境
//! - cache: 变更集文件缓存
//! - config: 配置文件
//! - paths: 路径工具

pub mod cache;
pub mod config;
pub mod environment;
pub mod paths;
pub mod shell;

pub use cache::FileChangesetCache;
pub use config::ShellEnvConfig;
pub use environment::{InMemoryEnvironment, ProcessEnvironment};
pub use shell::ProcessShellRunner;
