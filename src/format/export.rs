//! `export -p` 列表解析器
//!
//! 只识别一种固定语法，每行独立匹配：
//! - bash: `declare -x NAME` / `declare -x NAME=LITERAL`
//! - posix (dash/ash): `export NAME` / `export NAME=LITERAL`
//!
//! 其余行一律忽略。多行值不在语法之内：续行被丢弃，
//! 截断的首行会在解码时失败。

use crate::domain::models::{ExportEntry, ExportListing, LineMarker, MarkedEntry};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

static BASH_LINE: LazyLock<Regex> = LazyLock::new(|| line_pattern("declare -x "));
static POSIX_LINE: LazyLock<Regex> = LazyLock::new(|| line_pattern("export "));

fn line_pattern(prefix: &str) -> Regex {
    Regex::new(&format!(r"^{}([^=\s]+)(?:=(.*))?$", regex::escape(prefix)))
        .expect("export line pattern is a valid regex")
}

/// 子 shell 的方言，决定 export 列表的行语法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShellDialect {
    #[default]
    Bash,
    Posix,
}

impl ShellDialect {
    /// 列出全部已导出变量的命令
    #[must_use]
    pub fn dump_command(self) -> &'static str {
        "export -p"
    }

    /// 从字符串解析
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "bash" => Some(ShellDialect::Bash),
            "posix" | "sh" | "dash" => Some(ShellDialect::Posix),
            _ => None,
        }
    }

    fn pattern(self) -> &'static Regex {
        match self {
            ShellDialect::Bash => &BASH_LINE,
            ShellDialect::Posix => &POSIX_LINE,
        }
    }
}

impl fmt::Display for ShellDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShellDialect::Bash => write!(f, "bash"),
            ShellDialect::Posix => write!(f, "posix"),
        }
    }
}

/// export 列表解析器
#[derive(Debug, Clone, Copy, Default)]
pub struct ExportParser {
    dialect: ShellDialect,
}

impl ExportParser {
    #[must_use]
    pub fn new(dialect: ShellDialect) -> Self {
        Self { dialect }
    }

    #[must_use]
    pub fn dialect(&self) -> ShellDialect {
        self.dialect
    }

    /// 解析单行，不匹配时返回 `None`
    #[must_use]
    pub fn parse_line(&self, line: &str) -> Option<ExportEntry> {
        let caps = self.dialect.pattern().captures(line)?;
        let name = caps.get(1)?.as_str();
        let literal = caps.get(2).map(|m| m.as_str());
        Some(ExportEntry::new(name, literal))
    }

    /// 解析完整的 export 列表
    #[must_use]
    pub fn parse(&self, text: &str) -> ExportListing {
        text.lines().filter_map(|line| self.parse_line(line)).collect()
    }

    /// 解析带 `+`/`-` 前缀的行级 diff 文本
    ///
    /// `+++`/`---` 文件头与无标记的上下文行被忽略。
    #[must_use]
    pub fn parse_marked(&self, text: &str) -> Vec<MarkedEntry> {
        text.lines()
            .filter(|line| !line.starts_with("+++") && !line.starts_with("---"))
            .filter_map(|line| {
                let (marker, rest) = if let Some(rest) = line.strip_prefix('+') {
                    (LineMarker::Added, rest)
                } else if let Some(rest) = line.strip_prefix('-') {
                    (LineMarker::Removed, rest)
                } else {
                    return None;
                };
                self.parse_line(rest)
                    .map(|entry| MarkedEntry { marker, entry })
            })
            .collect()
    }
}
