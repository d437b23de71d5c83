//! 环境合并器
//!
//! 把变更集应用到环境上下文。搜索路径变量有额外规则：
//! 设置时同步更新结构化搜索路径，以及 shell 模拟子系统的 PATH 副本（若启用）。

use crate::domain::models::{Changeset, VarValue};
use crate::domain::repositories::Environment;
use std::path::PathBuf;
use tracing::debug;

/// 环境合并器
#[derive(Debug, Clone)]
pub struct EnvMerger {
    path_variable: String,
}

impl Default for EnvMerger {
    fn default() -> Self {
        Self::new("PATH")
    }
}

impl EnvMerger {
    pub fn new(path_variable: impl Into<String>) -> Self {
        Self {
            path_variable: path_variable.into(),
        }
    }

    /// 应用变更集并原样返回，便于继续写入缓存
    pub fn apply<E: Environment + ?Sized>(&self, env: &mut E, changeset: Changeset) -> Changeset {
        for (name, value) in &changeset {
            match value {
                VarValue::Removed => {
                    debug!(variable = %name, "unset");
                    env.remove(name);
                }
                VarValue::Set(value) => {
                    debug!(variable = %name, "set");
                    env.set(name, value);
                    if *name == self.path_variable {
                        Self::sync_search_path(env, value);
                    }
                }
            }
        }
        changeset
    }

    fn sync_search_path<E: Environment + ?Sized>(env: &mut E, value: &str) {
        let dirs: Vec<PathBuf> = std::env::split_paths(value).collect();
        debug!(entries = dirs.len(), "search path updated");
        env.set_search_path(dirs);

        if let Some(emulated) = env.emulated_shell_path() {
            value.clone_into(emulated);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::environment::InMemoryEnvironment;

    fn changeset(entries: &[(&str, Option<&str>)]) -> Changeset {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), VarValue::from(v.map(str::to_string))))
            .collect()
    }

    #[test]
    fn test_set_and_remove() {
        let mut env = InMemoryEnvironment::new()
            .with_var("KEEP", "k")
            .with_var("DROP", "d");

        let cs = changeset(&[("DROP", None), ("NEW", Some("n"))]);
        let returned = EnvMerger::default().apply(&mut env, cs.clone());

        assert_eq!(returned, cs);
        assert_eq!(env.get("KEEP").as_deref(), Some("k"));
        assert_eq!(env.get("NEW").as_deref(), Some("n"));
        assert!(env.get("DROP").is_none());
    }

    #[test]
    fn test_empty_string_is_set() {
        let mut env = InMemoryEnvironment::new().with_var("A", "1");
        EnvMerger::default().apply(&mut env, changeset(&[("A", Some(""))]));
        assert_eq!(env.get("A").as_deref(), Some(""));
    }

    #[test]
    fn test_idempotent() {
        let cs = changeset(&[("A", Some("1")), ("B", None), ("PATH", Some("/x"))]);
        let base = InMemoryEnvironment::new().with_var("B", "2");

        let mut once = base.clone();
        EnvMerger::default().apply(&mut once, cs.clone());

        let mut twice = base;
        let merger = EnvMerger::default();
        let cs = merger.apply(&mut twice, cs);
        merger.apply(&mut twice, cs);

        assert_eq!(once, twice);
    }

    #[cfg(unix)]
    mod search_path_tests {
        use super::*;

        #[test]
        fn test_path_updates_search_path() {
            let mut env = InMemoryEnvironment::new();
            EnvMerger::default().apply(&mut env, changeset(&[("PATH", Some("/usr/bin:/bin"))]));

            assert_eq!(
                env.search_path(),
                [PathBuf::from("/usr/bin"), PathBuf::from("/bin")]
            );
            assert_eq!(env.get("PATH").as_deref(), Some("/usr/bin:/bin"));
        }

        #[test]
        fn test_path_updates_shell_emulation_copy() {
            let mut env = InMemoryEnvironment::new().with_shell_emulation("/old");
            EnvMerger::default().apply(&mut env, changeset(&[("PATH", Some("/a:/b"))]));

            assert_eq!(env.emulated_shell_path().map(|p| p.as_str()), Some("/a:/b"));
        }

        #[test]
        fn test_removing_path_keeps_search_path() {
            let mut env = InMemoryEnvironment::new();
            let merger = EnvMerger::default();
            merger.apply(&mut env, changeset(&[("PATH", Some("/a"))]));
            merger.apply(&mut env, changeset(&[("PATH", None)]));

            assert!(env.get("PATH").is_none());
            assert_eq!(env.search_path(), [PathBuf::from("/a")]);
        }

        #[test]
        fn test_custom_path_variable() {
            let mut env = InMemoryEnvironment::new();
            EnvMerger::new("EXEC_PATH").apply(
                &mut env,
                changeset(&[("PATH", Some("/ignored")), ("EXEC_PATH", Some("/x:/y"))]),
            );

            assert_eq!(env.search_path(), [PathBuf::from("/x"), PathBuf::from("/y")]);
        }
    }
}
