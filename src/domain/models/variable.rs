//! 环境变量实体模型

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// 变量的取值：存在的字符串值，或表示“应当 unset”的删除标记
///
/// 空字符串是合法的存在值，与 `Removed` 严格区分。
/// 序列化为 `Option<String>`：`null` 即删除标记。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum VarValue {
    Set(String),
    Removed,
}

impl VarValue {
    /// 取出存在的值
    #[must_use]
    pub fn as_set(&self) -> Option<&str> {
        match self {
            VarValue::Set(value) => Some(value),
            VarValue::Removed => None,
        }
    }

    #[must_use]
    pub fn is_removed(&self) -> bool {
        matches!(self, VarValue::Removed)
    }

    /// 值能否写入进程环境（不含 NUL）
    #[must_use]
    pub fn is_settable(&self) -> bool {
        self.as_set().is_none_or(|value| !value.contains('\0'))
    }
}

/// 变量名能否用于进程环境：非空，且不含 `=` 与 NUL
#[must_use]
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(['=', '\0'])
}

impl From<Option<String>> for VarValue {
    fn from(value: Option<String>) -> Self {
        value.map_or(VarValue::Removed, VarValue::Set)
    }
}

impl From<VarValue> for Option<String> {
    fn from(value: VarValue) -> Self {
        match value {
            VarValue::Set(value) => Some(value),
            VarValue::Removed => None,
        }
    }
}

impl fmt::Display for VarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VarValue::Set(value) => write!(f, "{value}"),
            VarValue::Removed => write!(f, "<removed>"),
        }
    }
}

/// export 列表中的一行：变量名与原始值字面量（未导出值时为 `None`）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportEntry {
    pub name: String,
    pub literal: Option<String>,
}

impl ExportEntry {
    #[must_use]
    pub fn new(name: impl Into<String>, literal: Option<&str>) -> Self {
        Self {
            name: name.into(),
            literal: literal.map(str::to_string),
        }
    }
}

/// 一次 shell 调用得到的 export 列表，保持输出中的出现顺序
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportListing {
    entries: Vec<ExportEntry>,
}

impl ExportListing {
    #[must_use]
    pub fn new(entries: Vec<ExportEntry>) -> Self {
        Self { entries }
    }

    #[must_use]
    pub fn entries(&self) -> &[ExportEntry] {
        &self.entries
    }

    /// 按名称查找，同名时后出现的定义生效
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ExportEntry> {
        self.entries.iter().rev().find(|e| e.name == name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<ExportEntry> for ExportListing {
    fn from_iter<T: IntoIterator<Item = ExportEntry>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// 行级 diff 中的行标记
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineMarker {
    /// `+`：after 中新增或改变的行
    Added,
    /// `-`：before 中存在、after 中消失的行
    Removed,
}

/// 带 `+`/`-` 标记的 export 行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkedEntry {
    pub marker: LineMarker,
    pub entry: ExportEntry,
}

/// 快照模式下允许上报的变量名集合
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowList(BTreeSet<String>);

impl AllowList {
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for AllowList {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// 输出格式类型
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum OutputFormat {
    /// 可 eval 的 `export`/`unset` 行
    #[default]
    Env,
    Json,
}

impl From<&str> for OutputFormat {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" | "j" => OutputFormat::Json,
            _ => OutputFormat::Env,
        }
    }
}
