//! 变更集计算
//!
//! - 完整 diff：按变量名对齐 before/after 两份列表，得到 `+`/`-` 行，再折叠为变更集
//! - 过滤快照：单份列表 + 允许列表，只报告设置，从不报告删除
//!
//! 无法解码的条目记录警告后跳过，不影响其余变量。

use crate::domain::models::{
    AllowList, Changeset, ExportEntry, ExportListing, LineMarker, MarkedEntry, VarValue,
    is_valid_name,
};
use crate::format::literal;
use std::collections::{HashMap, HashSet};
use tracing::warn;

/// 以变量名为粒度的行级 diff
///
/// 值改变的变量产生一对 `-旧`/`+新` 行；未改变的变量不出现。
#[must_use]
pub fn line_diff(before: &ExportListing, after: &ExportListing) -> Vec<MarkedEntry> {
    let before_map = index(before);
    let after_map = index(after);
    let mut marked = Vec::new();
    let mut seen = HashSet::new();

    // 先按 before 顺序输出删除/改变
    for entry in before.entries() {
        if !seen.insert(entry.name.as_str()) {
            continue;
        }
        let old = before_map[entry.name.as_str()];
        match after_map.get(entry.name.as_str()) {
            Some(new) if new.literal == old.literal => {}
            Some(new) => {
                marked.push(mark(LineMarker::Removed, old));
                marked.push(mark(LineMarker::Added, new));
            }
            None => marked.push(mark(LineMarker::Removed, old)),
        }
    }

    // 再按 after 顺序输出新增
    for entry in after.entries() {
        if seen.insert(entry.name.as_str()) {
            marked.push(mark(LineMarker::Added, after_map[entry.name.as_str()]));
        }
    }

    marked
}

/// 把 `+`/`-` 行折叠为变更集
///
/// 同一变量同时有 `+` 与 `-` 行时只保留 `+` 的新值；
/// 某个 `+` 行无法解码时该变量整体跳过。
#[must_use]
pub fn fold_marked(marked: &[MarkedEntry]) -> Changeset {
    let added: HashSet<&str> = marked
        .iter()
        .filter(|m| m.marker == LineMarker::Added)
        .map(|m| m.entry.name.as_str())
        .collect();

    let mut changeset = Changeset::new();
    for m in marked {
        match m.marker {
            LineMarker::Added => {
                if let Some(value) = decode_or_warn(&m.entry) {
                    changeset.insert(m.entry.name.clone(), value);
                }
            }
            LineMarker::Removed
                if !added.contains(m.entry.name.as_str()) && name_or_warn(&m.entry.name) =>
            {
                changeset.remove(m.entry.name.clone());
            }
            LineMarker::Removed => {}
        }
    }
    changeset
}

/// 完整 diff 模式
#[must_use]
pub fn full_diff(before: &ExportListing, after: &ExportListing) -> Changeset {
    fold_marked(&line_diff(before, after))
}

/// 过滤快照模式：只报告允许列表内、且有值的变量
#[must_use]
pub fn filtered_snapshot(listing: &ExportListing, allow: &AllowList) -> Changeset {
    let mut changeset = Changeset::new();
    for (name, entry) in index(listing) {
        if !allow.contains(name) {
            continue;
        }
        // 已导出但没有值的变量不算设置，快照也不产生删除
        if let Some(VarValue::Set(value)) = decode_or_warn(entry) {
            changeset.set(name, value);
        }
    }
    changeset
}

fn index(listing: &ExportListing) -> HashMap<&str, &ExportEntry> {
    listing
        .entries()
        .iter()
        .map(|e| (e.name.as_str(), e))
        .collect()
}

fn mark(marker: LineMarker, entry: &ExportEntry) -> MarkedEntry {
    MarkedEntry {
        marker,
        entry: entry.clone(),
    }
}

fn name_or_warn(name: &str) -> bool {
    let valid = is_valid_name(name);
    if !valid {
        warn!(variable = ?name, "skipping variable with invalid name");
    }
    valid
}

fn decode_or_warn(entry: &ExportEntry) -> Option<VarValue> {
    if !name_or_warn(&entry.name) {
        return None;
    }
    match literal::decode_value(entry.literal.as_deref()) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(variable = %entry.name, error = %e, "skipping undecodable variable");
            None
        }
    }
}
