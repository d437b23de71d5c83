//! shell 文本格式
//!
//! - export: `export -p` 列表的行语法
//! - literal: 值字面量的解码与编码

pub mod export;
pub mod literal;

pub use export::{ExportParser, ShellDialect};
pub use literal::{DecodeError, decode, decode_value, encode};
