//! 变更集缓存实现
//!
//! 缓存是一个 JSON 文件：变量名 → 字符串值，`null` 表示删除。
//! 新鲜度只看修改时间：缓存存在，且没有任何源文件比缓存文件更新。

use crate::domain::error::{DomainError, Result};
use crate::domain::models::Changeset;
use crate::domain::repositories::ChangesetCache;
use crate::infrastructure::paths;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::debug;

/// 文件缓存
pub struct FileChangesetCache {
    path: PathBuf,
}

impl FileChangesetCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// 缓存文件的修改时间，文件不存在时为 `None`
    pub async fn modified(&self) -> Option<SystemTime> {
        modified(&self.path).await
    }
}

async fn modified(path: &Path) -> Option<SystemTime> {
    tokio::fs::metadata(path).await.ok()?.modified().ok()
}

#[async_trait]
impl ChangesetCache for FileChangesetCache {
    fn location(&self) -> &Path {
        &self.path
    }

    async fn save(&self, changeset: &Changeset) -> Result<()> {
        paths::ensure_parent(&self.path).await?;
        let content = serde_json::to_string_pretty(changeset)?;

        // 先写临时文件再替换
        let temp_path = self.path.with_extension("tmp");
        tokio::fs::write(&temp_path, content).await?;
        tokio::fs::rename(&temp_path, &self.path).await?;

        debug!(path = %self.path.display(), entries = changeset.len(), "cache saved");
        Ok(())
    }

    async fn load(&self) -> Result<Changeset> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(DomainError::CacheNotFound(self.path.clone()));
            }
            Err(e) => return Err(e.into()),
        };

        let changeset: Changeset =
            serde_json::from_str(&content).map_err(|e| DomainError::CacheCorrupt {
                path: self.path.clone(),
                reason: e.to_string(),
            })?;

        // 能解析但写不进环境的条目同样视为损坏
        if let Some(name) = changeset.first_invalid() {
            return Err(DomainError::CacheCorrupt {
                path: self.path.clone(),
                reason: format!("变量 {name:?} 无法写入进程环境"),
            });
        }
        Ok(changeset)
    }

    async fn is_fresh(&self, source_files: &[PathBuf]) -> bool {
        let Some(cache_time) = self.modified().await else {
            debug!(path = %self.path.display(), "cache missing");
            return false;
        };

        for source in source_files {
            // 不存在的源文件不会让缓存过期
            if let Some(source_time) = modified(source).await
                && source_time > cache_time
            {
                debug!(source = %source.display(), "source file newer than cache");
                return false;
            }
        }
        true
    }

    async fn clear(&self) -> Result<bool> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
