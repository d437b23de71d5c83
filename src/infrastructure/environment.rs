//! 环境上下文实现
//!
//! - `ProcessEnvironment`: 当前进程的真实环境
//! - `InMemoryEnvironment`: 内存中的副本，用于演练与测试

use crate::domain::repositories::Environment;
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::PathBuf;

/// 当前进程环境
///
/// 搜索路径在构造时从 `PATH` 派生，之后只由合并器更新。
pub struct ProcessEnvironment {
    search_path: Vec<PathBuf>,
    emulated_path: Option<String>,
}

impl ProcessEnvironment {
    pub fn new() -> Self {
        Self {
            search_path: current_search_path(),
            emulated_path: None,
        }
    }

    /// 启用 shell 模拟子系统，用当前 `PATH` 初始化其私有副本
    pub fn with_shell_emulation(mut self) -> Self {
        self.emulated_path = Some(std::env::var("PATH").unwrap_or_default());
        self
    }

    /// 供 `which` 使用的搜索路径
    pub fn search_path_os(&self) -> Option<OsString> {
        std::env::join_paths(&self.search_path).ok()
    }
}

impl Default for ProcessEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment for ProcessEnvironment {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn set(&mut self, name: &str, value: &str) {
        // SAFETY: 合并只在主线程上进行，此时没有其他线程读写环境
        unsafe {
            std::env::set_var(name, value);
        }
    }

    fn remove(&mut self, name: &str) {
        // SAFETY: 同上
        unsafe {
            std::env::remove_var(name);
        }
    }

    fn search_path(&self) -> &[PathBuf] {
        &self.search_path
    }

    fn set_search_path(&mut self, dirs: Vec<PathBuf>) {
        self.search_path = dirs;
    }

    fn emulated_shell_path(&mut self) -> Option<&mut String> {
        self.emulated_path.as_mut()
    }
}

fn current_search_path() -> Vec<PathBuf> {
    std::env::var_os("PATH")
        .map(|path| std::env::split_paths(&path).collect())
        .unwrap_or_default()
}

/// 内存环境
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InMemoryEnvironment {
    vars: BTreeMap<String, String>,
    search_path: Vec<PathBuf>,
    emulated_path: Option<String>,
}

impl InMemoryEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    /// 复制当前进程的环境与搜索路径；名称或值不是 UTF-8 的变量被跳过
    pub fn snapshot() -> Self {
        let vars = std::env::vars_os()
            .filter_map(|(name, value)| {
                Some((name.into_string().ok()?, value.into_string().ok()?))
            })
            .collect();
        Self {
            vars,
            search_path: current_search_path(),
            emulated_path: None,
        }
    }

    pub fn with_var(mut self, name: &str, value: &str) -> Self {
        self.vars.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_shell_emulation(mut self, path: &str) -> Self {
        self.emulated_path = Some(path.to_string());
        self
    }

    pub fn vars(&self) -> &BTreeMap<String, String> {
        &self.vars
    }
}

impl Environment for InMemoryEnvironment {
    fn get(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }

    fn set(&mut self, name: &str, value: &str) {
        self.vars.insert(name.to_string(), value.to_string());
    }

    fn remove(&mut self, name: &str) {
        self.vars.remove(name);
    }

    fn search_path(&self) -> &[PathBuf] {
        &self.search_path
    }

    fn set_search_path(&mut self, dirs: Vec<PathBuf>) {
        self.search_path = dirs;
    }

    fn emulated_shell_path(&mut self) -> Option<&mut String> {
        self.emulated_path.as_mut()
    }
}
