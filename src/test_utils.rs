//! 测试工具模块
//!
//! 合并器会直接写进程环境，测试需要在结束时恢复原状

use std::collections::HashMap;
use std::env;
use std::ffi::{OsStr, OsString};

/// 环境变量守卫 - 释放时恢复创建时的进程环境
///
/// 按 `OsString` 记录，非 UTF-8 的变量同样能恢复。
pub struct EnvGuard {
    original_vars: HashMap<OsString, OsString>,
}

impl Default for EnvGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvGuard {
    /// 记录当前环境变量
    pub fn new() -> Self {
        let original_vars: HashMap<OsString, OsString> = env::vars_os().collect();
        Self { original_vars }
    }

    /// 设置变量（名称与值可以不是 UTF-8）
    pub fn set_var_os(&self, key: impl AsRef<OsStr>, value: impl AsRef<OsStr>) {
        // SAFETY: 使用守卫的测试都标注了 #[serial]，不会与其他线程并发读写环境
        unsafe {
            env::set_var(key, value);
        }
    }

    fn remove_var_os(&self, key: impl AsRef<OsStr>) {
        // SAFETY: 同上
        unsafe {
            env::remove_var(key);
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        // 先移除新增的变量，再恢复被改动或删除的变量
        let current: Vec<OsString> = env::vars_os().map(|(k, _)| k).collect();
        for key in current {
            if !self.original_vars.contains_key(&key) {
                self.remove_var_os(&key);
            }
        }

        for (key, value) in &self.original_vars {
            if env::var_os(key).as_ref() != Some(value) {
                self.set_var_os(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_env_guard_removes_added_vars() {
        {
            let guard = EnvGuard::new();
            guard.set_var_os("SHELLENV_GUARD_ADDED", "x");
            assert_eq!(env::var("SHELLENV_GUARD_ADDED").unwrap(), "x");
        }
        assert!(env::var_os("SHELLENV_GUARD_ADDED").is_none());
    }

    #[test]
    #[serial]
    fn test_env_guard_restores_removed_vars() {
        let outer = EnvGuard::new();
        outer.set_var_os("SHELLENV_GUARD_KEPT", "original");
        {
            let guard = EnvGuard::new();
            guard.remove_var_os("SHELLENV_GUARD_KEPT");
            assert!(env::var_os("SHELLENV_GUARD_KEPT").is_none());
        }
        assert_eq!(env::var("SHELLENV_GUARD_KEPT").unwrap(), "original");
        drop(outer);
        assert!(env::var_os("SHELLENV_GUARD_KEPT").is_none());
    }
}
