//! shell 环境应用服务
//!
//! 编排“source → diff → (缓存)”与“缓存新鲜则读取，否则重建”两条流程。
//! 这里只产出变更集，写入环境由调用方交给 [`EnvMerger`](super::EnvMerger)。

use crate::domain::diff;
use crate::domain::error::{DomainError, Result};
use crate::domain::models::{AllowList, Changeset, ExportListing};
use crate::domain::repositories::{ChangesetCache, ShellRunner};
use crate::format::ExportParser;
use crate::infrastructure::shell::{self, DUMP_SENTINEL};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 变更集的来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangesetOrigin {
    Cache,
    Rebuilt,
}

/// 编排所需的静态设置
#[derive(Debug, Clone, Default)]
pub struct SourcingSettings {
    pub source_files: Vec<PathBuf>,
    pub allow_list: AllowList,
}

/// shell 环境服务
pub struct ShellEnvService {
    runner: Arc<dyn ShellRunner>,
    cache: Arc<dyn ChangesetCache>,
    parser: ExportParser,
    settings: SourcingSettings,
}

impl ShellEnvService {
    pub fn new(
        runner: Arc<dyn ShellRunner>,
        cache: Arc<dyn ChangesetCache>,
        parser: ExportParser,
        settings: SourcingSettings,
    ) -> Self {
        Self {
            runner,
            cache,
            parser,
            settings,
        }
    }

    pub fn settings(&self) -> &SourcingSettings {
        &self.settings
    }

    pub fn cache(&self) -> &Arc<dyn ChangesetCache> {
        &self.cache
    }

    /// 在子 shell 中执行（可选的）副作用命令后转储环境
    async fn capture(&self, effect: Option<&str>) -> Result<ExportListing> {
        let dialect = self.parser.dialect();
        let script = match effect {
            Some(effect) => shell::effect_then_dump(effect, dialect),
            None => shell::dump_script(dialect),
        };

        let output = self.runner.run(&script).await?;
        let Some((_, dump)) = output.split_once(DUMP_SENTINEL) else {
            return Err(DomainError::ShellExecution {
                shell: dialect.to_string(),
                reason: "脚本在转储环境之前退出".to_string(),
            });
        };

        let listing = self.parser.parse(dump);
        debug!(variables = listing.len(), "captured export listing");
        Ok(listing)
    }

    /// 对一条副作用命令做完整 diff
    async fn diff_effect(&self, effect: &str) -> Result<Changeset> {
        let before = self.capture(None).await?;
        let after = self.capture(Some(effect)).await?;
        Ok(diff::full_diff(&before, &after))
    }

    /// source 单个文件，返回它带来的变更
    pub async fn source_file(&self, path: &Path) -> Result<Changeset> {
        if !path.exists() {
            return Err(DomainError::InvalidArgument(format!(
                "文件不存在: {}",
                path.display()
            )));
        }
        let changeset = self.diff_effect(&shell::source_command(path)).await?;
        info!(file = %path.display(), changes = changeset.len(), "sourced file");
        Ok(changeset)
    }

    /// 把单个文件的变更叠加进现有缓存（缓存缺失或损坏时从空开始）
    pub async fn save_into_cache(&self, changeset: &Changeset) -> Result<()> {
        let mut cached = match self.cache.load().await {
            Ok(cached) => cached,
            Err(DomainError::CacheNotFound(_)) => Changeset::new(),
            Err(e @ DomainError::CacheCorrupt { .. }) => {
                warn!(error = %e, "discarding unusable cache");
                Changeset::new()
            }
            Err(e) => return Err(e),
        };
        cached.merge(changeset.clone());
        self.cache.save(&cached).await
    }

    /// 在同一个 shell 中依次 source 所有配置文件，并写入缓存
    pub async fn rebuild(&self) -> Result<Changeset> {
        let commands: Vec<String> = self
            .existing_sources()
            .iter()
            .map(|p| shell::source_command(p))
            .collect();

        let changeset = if commands.is_empty() {
            Changeset::new()
        } else {
            self.diff_effect(&commands.join("\n")).await?
        };

        self.cache.save(&changeset).await?;
        info!(changes = changeset.len(), "rebuilt changeset");
        Ok(changeset)
    }

    /// 缓存新鲜时直接读取，否则重建
    pub async fn load_or_rebuild(&self) -> Result<(Changeset, ChangesetOrigin)> {
        if self.cache.is_fresh(&self.settings.source_files).await {
            match self.cache.load().await {
                Ok(changeset) => {
                    debug!(path = %self.cache.location().display(), "using cached changeset");
                    return Ok((changeset, ChangesetOrigin::Cache));
                }
                Err(e) => warn!(error = %e, "cache unusable, rebuilding"),
            }
        }
        Ok((self.rebuild().await?, ChangesetOrigin::Rebuilt))
    }

    /// 过滤快照：source 全部配置文件后只取允许列表中的变量
    pub async fn snapshot(&self) -> Result<Changeset> {
        let commands: Vec<String> = self
            .existing_sources()
            .iter()
            .map(|p| shell::source_command(p))
            .collect();

        let listing = if commands.is_empty() {
            self.capture(None).await?
        } else {
            self.capture(Some(&commands.join("\n"))).await?
        };
        Ok(diff::filtered_snapshot(&listing, &self.settings.allow_list))
    }

    pub async fn is_cache_fresh(&self) -> bool {
        self.cache.is_fresh(&self.settings.source_files).await
    }

    fn existing_sources(&self) -> Vec<&PathBuf> {
        self.settings
            .source_files
            .iter()
            .filter(|p| {
                let exists = p.exists();
                if !exists {
                    warn!(file = %p.display(), "source file missing, skipped");
                }
                exists
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::VarValue;
    use crate::format::ShellDialect;
    use crate::infrastructure::cache::FileChangesetCache;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// 记录脚本、按顺序返回预设输出的执行器
    struct ScriptedRunner {
        outputs: Mutex<Vec<String>>,
        scripts: Mutex<Vec<String>>,
    }

    impl ScriptedRunner {
        fn new(mut outputs: Vec<String>) -> Arc<Self> {
            outputs.reverse();
            Arc::new(Self {
                outputs: Mutex::new(outputs),
                scripts: Mutex::new(Vec::new()),
            })
        }

        fn scripts(&self) -> Vec<String> {
            self.scripts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ShellRunner for ScriptedRunner {
        async fn run(&self, script: &str) -> Result<String> {
            self.scripts.lock().unwrap().push(script.to_string());
            Ok(self.outputs.lock().unwrap().pop().unwrap_or_default())
        }
    }

    fn dump(body: &str) -> String {
        format!("{DUMP_SENTINEL}\n{body}")
    }

    fn service(
        runner: Arc<ScriptedRunner>,
        dir: &TempDir,
        source_files: Vec<PathBuf>,
    ) -> ShellEnvService {
        ShellEnvService::new(
            runner,
            Arc::new(FileChangesetCache::new(dir.path().join("cache.json"))),
            ExportParser::new(ShellDialect::Bash),
            SourcingSettings {
                source_files,
                allow_list: ["PATH", "MANPATH"].into_iter().collect(),
            },
        )
    }

    fn profile(dir: &TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, "export A=1\n").unwrap();
        path
    }

    #[tokio::test]
    async fn test_source_file_diffs_before_and_after() {
        let dir = TempDir::new().unwrap();
        let file = profile(&dir, ".profile");
        let before = dump("declare -x A=\"1\"\ndeclare -x B=\"2\"\n");
        let after = dump("declare -x A=\"1\"\ndeclare -x B=\"3\"\ndeclare -x C=\"4\"\n");
        let runner = ScriptedRunner::new(vec![before, after]);

        let cs = service(runner.clone(), &dir, vec![])
            .source_file(&file)
            .await
            .unwrap();

        assert_eq!(cs.len(), 2);
        assert_eq!(cs.get("B"), Some(&VarValue::Set("3".to_string())));

        let scripts = runner.scripts();
        assert_eq!(scripts.len(), 2);
        assert!(!scripts[0].contains(". '"));
        assert!(scripts[1].contains(&shell::source_command(&file)));
    }

    #[tokio::test]
    async fn test_missing_sentinel_is_execution_error() {
        let dir = TempDir::new().unwrap();
        let file = profile(&dir, ".profile");
        let runner = ScriptedRunner::new(vec![dump("declare -x A=\"1\"\n"), String::new()]);

        let err = service(runner, &dir, vec![])
            .source_file(&file)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ShellExecution { .. }));
    }

    #[tokio::test]
    async fn test_rebuild_sources_all_files_in_one_shell_and_caches() {
        let dir = TempDir::new().unwrap();
        let first = profile(&dir, "a.sh");
        let second = profile(&dir, "b.sh");
        let missing = dir.path().join("missing.sh");
        let runner = ScriptedRunner::new(vec![dump(""), dump("declare -x NEW=\"x\"\n")]);

        let svc = service(runner.clone(), &dir, vec![first.clone(), missing, second.clone()]);
        let cs = svc.rebuild().await.unwrap();

        assert_eq!(cs.get("NEW"), Some(&VarValue::Set("x".to_string())));
        let effect = &runner.scripts()[1];
        assert!(effect.contains(&shell::source_command(&first)));
        assert!(effect.contains(&shell::source_command(&second)));
        assert!(!effect.contains("missing.sh"));

        assert_eq!(svc.cache().load().await.unwrap(), cs);
    }

    #[tokio::test]
    async fn test_load_or_rebuild_prefers_fresh_cache() {
        let dir = TempDir::new().unwrap();
        let runner = ScriptedRunner::new(vec![]);
        let svc = service(runner.clone(), &dir, vec![]);

        let mut cached = Changeset::new();
        cached.set("FROM_CACHE", "yes");
        svc.cache().save(&cached).await.unwrap();

        let (cs, origin) = svc.load_or_rebuild().await.unwrap();
        assert_eq!(origin, ChangesetOrigin::Cache);
        assert_eq!(cs, cached);
        assert!(runner.scripts().is_empty());
    }

    #[tokio::test]
    async fn test_load_or_rebuild_falls_back_on_corrupt_cache() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("cache.json"), "garbage").unwrap();
        let file = profile(&dir, ".profile");
        let runner = ScriptedRunner::new(vec![dump(""), dump("declare -x A=\"1\"\n")]);

        let svc = service(runner, &dir, vec![file]);
        let (cs, origin) = svc.load_or_rebuild().await.unwrap();

        assert_eq!(origin, ChangesetOrigin::Rebuilt);
        assert_eq!(cs.get("A"), Some(&VarValue::Set("1".to_string())));
    }

    #[tokio::test]
    async fn test_snapshot_filters_allow_list() {
        let dir = TempDir::new().unwrap();
        let file = profile(&dir, ".profile");
        let runner = ScriptedRunner::new(vec![dump(
            "declare -x HOME=\"/home/dev\"\ndeclare -x PATH=\"/usr/bin\"\ndeclare -x MANPATH\n",
        )]);

        let cs = service(runner.clone(), &dir, vec![file])
            .snapshot()
            .await
            .unwrap();

        assert_eq!(cs.len(), 1);
        assert_eq!(cs.get("PATH"), Some(&VarValue::Set("/usr/bin".to_string())));
        assert_eq!(runner.scripts().len(), 1);
    }

    #[tokio::test]
    async fn test_save_into_cache_accumulates() {
        let dir = TempDir::new().unwrap();
        let svc = service(ScriptedRunner::new(vec![]), &dir, vec![]);

        let mut first = Changeset::new();
        first.set("A", "1");
        svc.save_into_cache(&first).await.unwrap();

        let mut second = Changeset::new();
        second.set("B", "2");
        svc.save_into_cache(&second).await.unwrap();

        let cached = svc.cache().load().await.unwrap();
        assert_eq!(cached.len(), 2);
    }

    #[tokio::test]
    async fn test_save_into_cache_replaces_corrupt_cache() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("cache.json"), "garbage").unwrap();
        let svc = service(ScriptedRunner::new(vec![]), &dir, vec![]);

        let mut cs = Changeset::new();
        cs.set("A", "1");
        svc.save_into_cache(&cs).await.unwrap();

        assert_eq!(svc.cache().load().await.unwrap(), cs);
    }

    #[tokio::test]
    async fn test_save_into_cache_propagates_read_errors() {
        let dir = TempDir::new().unwrap();
        // 缓存路径是目录：读取失败但不是“不存在”
        std::fs::create_dir(dir.path().join("cache.json")).unwrap();
        let svc = service(ScriptedRunner::new(vec![]), &dir, vec![]);

        let mut cs = Changeset::new();
        cs.set("A", "1");
        let err = svc.save_into_cache(&cs).await.unwrap_err();

        assert!(matches!(err, DomainError::Io(_)));
        assert!(dir.path().join("cache.json").is_dir());
    }
}
