//! 应用服务

pub mod merger;
pub mod shell_env_service;

pub use merger::EnvMerger;
pub use shell_env_service::{ChangesetOrigin, ShellEnvService, SourcingSettings};
