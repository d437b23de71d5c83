//! 变更集：变量名到新值（或删除标记）的映射

use super::variable::{VarValue, is_valid_name};
use crate::format::literal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::btree_map;

/// 变更集
///
/// 底层为 `BTreeMap`，同一变量名至多出现一次；序列化即缓存文件的 JSON 形状。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Changeset(BTreeMap<String, VarValue>);

impl Changeset {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置变量，返回被覆盖的旧条目
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<VarValue> {
        self.0.insert(name.into(), VarValue::Set(value.into()))
    }

    /// 标记变量为删除
    pub fn remove(&mut self, name: impl Into<String>) -> Option<VarValue> {
        self.0.insert(name.into(), VarValue::Removed)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: VarValue) -> Option<VarValue> {
        self.0.insert(name.into(), value)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&VarValue> {
        self.0.get(name)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, VarValue> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 叠加另一个变更集，`other` 中的条目覆盖同名条目
    pub fn merge(&mut self, other: Changeset) {
        self.0.extend(other.0);
    }

    /// 第一个无法写入进程环境的变量名（名称或值不合法）
    #[must_use]
    pub fn first_invalid(&self) -> Option<&str> {
        self.0
            .iter()
            .find(|(name, value)| !is_valid_name(name) || !value.is_settable())
            .map(|(name, _)| name.as_str())
    }

    /// 渲染为可被 shell eval 的 `export NAME='value'` / `unset NAME` 行
    #[must_use]
    pub fn to_shell_exports(&self) -> String {
        self.0
            .iter()
            .map(|(name, value)| match value {
                VarValue::Set(v) => format!("export {}={}", name, literal::encode(v)),
                VarValue::Removed => format!("unset {name}"),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl<'a> IntoIterator for &'a Changeset {
    type Item = (&'a String, &'a VarValue);
    type IntoIter = btree_map::Iter<'a, String, VarValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for Changeset {
    type Item = (String, VarValue);
    type IntoIter = btree_map::IntoIter<String, VarValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<(String, VarValue)> for Changeset {
    fn from_iter<T: IntoIterator<Item = (String, VarValue)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_entry_per_name() {
        let mut cs = Changeset::new();
        cs.set("A", "1");
        let previous = cs.remove("A");

        assert_eq!(previous, Some(VarValue::Set("1".to_string())));
        assert_eq!(cs.len(), 1);
        assert_eq!(cs.get("A"), Some(&VarValue::Removed));
    }

    #[test]
    fn test_json_shape() {
        let mut cs = Changeset::new();
        cs.set("EMPTY", "");
        cs.remove("GONE");
        cs.set("PATH", "/usr/bin:/bin");

        let json = serde_json::to_string(&cs).unwrap();
        assert_eq!(
            json,
            r#"{"EMPTY":"","GONE":null,"PATH":"/usr/bin:/bin"}"#
        );

        let back: Changeset = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cs);
        assert_eq!(back.get("EMPTY"), Some(&VarValue::Set(String::new())));
    }

    #[test]
    fn test_first_invalid() {
        let mut cs = Changeset::new();
        cs.set("A", "1");
        cs.remove("B");
        assert_eq!(cs.first_invalid(), None);

        cs.set("C", "x\0y");
        assert_eq!(cs.first_invalid(), Some("C"));

        let mut cs = Changeset::new();
        cs.remove("A=B");
        assert_eq!(cs.first_invalid(), Some("A=B"));
    }

    #[test]
    fn test_shell_exports_rendering() {
        let mut cs = Changeset::new();
        cs.set("GREETING", "it's here");
        cs.remove("OLD");

        assert_eq!(
            cs.to_shell_exports(),
            "export GREETING='it'\\''s here'\nunset OLD"
        );
    }

    #[test]
    fn test_merge_overrides() {
        let mut base = Changeset::new();
        base.set("A", "1");
        base.set("B", "2");

        let mut newer = Changeset::new();
        newer.remove("B");
        newer.set("C", "3");

        base.merge(newer);
        assert_eq!(base.get("A"), Some(&VarValue::Set("1".to_string())));
        assert_eq!(base.get("B"), Some(&VarValue::Removed));
        assert_eq!(base.get("C"), Some(&VarValue::Set("3".to_string())));
    }
}
