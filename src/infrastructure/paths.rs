//! 路径管理工具

use crate::domain::error::{DomainError, Result};
use std::path::{Path, PathBuf};

/// 获取配置目录 ~/.shellenv
pub fn get_config_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|h| h.join(".shellenv"))
        .ok_or_else(|| DomainError::Config("无法确定主目录".to_string()))
}

/// 默认配置文件 ~/.shellenv/config.toml
pub fn default_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.toml"))
}

/// 展开开头的 `~/`；其余路径原样返回
pub fn expand_tilde(path: &str) -> PathBuf {
    if path == "~" {
        return dirs::home_dir().unwrap_or_else(|| PathBuf::from(path));
    }
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

/// 确保文件的父目录存在
pub async fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }
    Ok(())
}
