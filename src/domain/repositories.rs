//! 端口定义：子 shell、进程环境、变更集缓存

use crate::domain::error::Result;
use crate::domain::models::Changeset;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// 子 shell 执行器
///
/// 每次调用都在全新的 shell 中执行脚本并返回其标准输出。
/// 脚本本身的非零退出码不算失败，只有无法启动或无法取得输出才算。
#[async_trait]
pub trait ShellRunner: Send + Sync {
    async fn run(&self, script: &str) -> Result<String>;
}

/// 可写的环境上下文
///
/// 合并器是唯一的写入方；测试可以注入内存实现。
pub trait Environment {
    fn get(&self, name: &str) -> Option<String>;

    fn set(&mut self, name: &str, value: &str);

    fn remove(&mut self, name: &str);

    /// 结构化的可执行文件搜索路径
    fn search_path(&self) -> &[PathBuf];

    fn set_search_path(&mut self, dirs: Vec<PathBuf>);

    /// shell 模拟子系统私有的 PATH 副本，子系统未启用时为 `None`
    fn emulated_shell_path(&mut self) -> Option<&mut String> {
        None
    }
}

/// 变更集缓存
#[async_trait]
pub trait ChangesetCache: Send + Sync {
    /// 缓存文件位置
    fn location(&self) -> &Path;

    async fn save(&self, changeset: &Changeset) -> Result<()>;

    async fn load(&self) -> Result<Changeset>;

    /// 缓存存在且没有任何源文件比它新
    async fn is_fresh(&self, source_files: &[PathBuf]) -> bool;

    /// 删除缓存文件，返回是否确实删除了
    async fn clear(&self) -> Result<bool>;
}
