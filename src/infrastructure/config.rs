//! 配置文件 ~/.shellenv/config.toml
//!
//! 文件不存在时使用默认值；字段缺省时也回落到默认值。

use crate::domain::error::{DomainError, Result};
use crate::domain::models::AllowList;
use crate::format::ShellDialect;
use crate::infrastructure::paths;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 用户配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellEnvConfig {
    /// 子 shell 程序
    pub shell: String,
    /// 放在脚本之前的参数
    pub shell_args: Vec<String>,
    /// export 列表的方言
    pub dialect: ShellDialect,
    /// 依次 source 的文件
    pub source_files: Vec<String>,
    /// 快照模式允许上报的变量
    pub allow_list: Vec<String>,
    /// 缓存文件位置
    pub cache_file: String,
    /// 单次子 shell 调用的超时
    pub timeout_secs: u64,
    /// 搜索路径变量
    pub path_variable: String,
}

impl Default for ShellEnvConfig {
    fn default() -> Self {
        Self {
            shell: "bash".to_string(),
            shell_args: vec!["-c".to_string()],
            dialect: ShellDialect::Bash,
            source_files: vec!["~/.profile".to_string()],
            allow_list: vec!["PATH".to_string(), "MANPATH".to_string()],
            cache_file: "~/.shellenv/cache.json".to_string(),
            timeout_secs: 10,
            path_variable: "PATH".to_string(),
        }
    }
}

impl ShellEnvConfig {
    /// 从指定文件加载；未指定时读取默认位置
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => paths::default_config_path()?,
        };

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        Self::from_toml(&content)
            .map_err(|e| DomainError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| DomainError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| DomainError::Serialization(e.to_string()))
    }

    fn validate(&self) -> Result<()> {
        if self.shell.trim().is_empty() {
            return Err(DomainError::Config("shell 不能为空".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(DomainError::Config("timeout_secs 必须大于 0".to_string()));
        }
        if self.path_variable.is_empty() || self.path_variable.contains('=') {
            return Err(DomainError::Config(format!(
                "无效的 path_variable: {:?}",
                self.path_variable
            )));
        }
        Ok(())
    }

    /// 展开 `~/` 后的源文件列表
    pub fn source_paths(&self) -> Vec<PathBuf> {
        self.source_files
            .iter()
            .map(|p| paths::expand_tilde(p))
            .collect()
    }

    pub fn cache_path(&self) -> PathBuf {
        paths::expand_tilde(&self.cache_file)
    }

    pub fn allow_list(&self) -> AllowList {
        self.allow_list.iter().cloned().collect()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
