//! Domain Layer - 核心业务逻辑
//!
//! 包含：
//! - models: 领域实体
//! - diff: 变更集计算
//! - repositories: 外部协作方接口（输出端口）
//! - error: 领域错误类型

pub mod diff;
pub mod error;
pub mod models;
pub mod repositories;

pub use error::{DomainError, Result};
pub use models::{AllowList, Changeset, ExportEntry, ExportListing, OutputFormat, VarValue};
pub use repositories::{ChangesetCache, Environment, ShellRunner};
