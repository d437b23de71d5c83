//! shell 值字面量的解码与编码
//!
//! 支持的写法（可相邻拼接）：
//! - 单引号 `'...'`：内容原样保留
//! - 双引号 `"..."`：仅 `\\ \" \$ \`` 与行续接是转义
//! - ANSI-C `$'...'`：`\n \t \e \xHH \NNN` 等
//! - 裸词：反斜杠转义下一个字符
//!
//! 不做变量展开，`$` 只是普通字符。

use crate::domain::models::VarValue;
use thiserror::Error;

/// 单个字面量解码失败
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("引号 {0} 未闭合")]
    UnterminatedQuote(char),

    #[error("第 {0} 个字符处出现未加引号的空白")]
    UnquotedWhitespace(usize),

    #[error("字面量以孤立的反斜杠结尾")]
    TrailingBackslash,

    #[error("解码结果不是合法的 UTF-8")]
    InvalidUtf8,

    #[error("解码结果包含 NUL 字节，无法写入环境")]
    NulByte,
}

/// 解码 export 行中的值部分；缺失的字面量表示变量没有值
///
/// # Errors
///
/// 字面量格式错误时返回 [`DecodeError`]，调用方应跳过该变量。
pub fn decode_value(literal: Option<&str>) -> Result<VarValue, DecodeError> {
    match literal {
        None => Ok(VarValue::Removed),
        Some(text) => decode(text).map(VarValue::Set),
    }
}

/// 把 shell 引用过的字面量还原为逻辑字符串
///
/// # Errors
///
/// 引号未闭合、出现未引用的空白或结果不是 UTF-8 时失败。
pub fn decode(literal: &str) -> Result<String, DecodeError> {
    let mut out: Vec<u8> = Vec::with_capacity(literal.len());
    let mut chars = literal.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        match c {
            '\'' => loop {
                match chars.next() {
                    Some((_, '\'')) => break,
                    Some((_, ch)) => push_char(&mut out, ch),
                    None => return Err(DecodeError::UnterminatedQuote('\'')),
                }
            },
            '"' => loop {
                match chars.next() {
                    Some((_, '"')) => break,
                    Some((_, '\\')) => match chars.next() {
                        Some((_, esc @ ('\\' | '"' | '$' | '`'))) => push_char(&mut out, esc),
                        Some((_, '\n')) => {}
                        Some((_, other)) => {
                            out.push(b'\\');
                            push_char(&mut out, other);
                        }
                        None => return Err(DecodeError::UnterminatedQuote('"')),
                    },
                    Some((_, ch)) => push_char(&mut out, ch),
                    None => return Err(DecodeError::UnterminatedQuote('"')),
                }
            },
            '$' if matches!(chars.peek(), Some((_, '\''))) => {
                chars.next();
                decode_ansi_c(&mut chars, &mut out)?;
            }
            '\\' => match chars.next() {
                Some((_, ch)) => push_char(&mut out, ch),
                None => return Err(DecodeError::TrailingBackslash),
            },
            ws if ws.is_whitespace() => return Err(DecodeError::UnquotedWhitespace(pos)),
            other => push_char(&mut out, other),
        }
    }

    if out.contains(&0) {
        return Err(DecodeError::NulByte);
    }
    String::from_utf8(out).map_err(|_| DecodeError::InvalidUtf8)
}

/// 编码为单引号字面量，`decode(&encode(v)) == v`
#[must_use]
pub fn encode(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

fn push_char(out: &mut Vec<u8>, c: char) {
    let mut buf = [0u8; 4];
    out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
}

fn decode_ansi_c<I>(chars: &mut std::iter::Peekable<I>, out: &mut Vec<u8>) -> Result<(), DecodeError>
where
    I: Iterator<Item = (usize, char)>,
{
    loop {
        let Some((_, c)) = chars.next() else {
            return Err(DecodeError::UnterminatedQuote('\''));
        };
        match c {
            '\'' => return Ok(()),
            '\\' => {
                let Some((_, esc)) = chars.next() else {
                    return Err(DecodeError::UnterminatedQuote('\''));
                };
                match esc {
                    'a' => out.push(0x07),
                    'b' => out.push(0x08),
                    'e' | 'E' => out.push(0x1b),
                    'f' => out.push(0x0c),
                    'n' => out.push(b'\n'),
                    'r' => out.push(b'\r'),
                    't' => out.push(b'\t'),
                    'v' => out.push(0x0b),
                    '\\' | '\'' | '"' | '?' => push_char(out, esc),
                    'x' => {
                        let byte = take_digits(chars, 16, 2);
                        match byte {
                            Some(b) => out.push(b),
                            None => out.extend_from_slice(b"\\x"),
                        }
                    }
                    '0'..='7' => {
                        let mut value = esc.to_digit(8).unwrap_or(0);
                        for _ in 0..2 {
                            match chars.peek().and_then(|(_, d)| d.to_digit(8)) {
                                Some(d) => {
                                    value = value * 8 + d;
                                    chars.next();
                                }
                                None => break,
                            }
                        }
                        // bash 同样截断到一个字节
                        out.push((value & 0xff) as u8);
                    }
                    other => {
                        out.push(b'\\');
                        push_char(out, other);
                    }
                }
            }
            other => push_char(out, other),
        }
    }
}

fn take_digits<I>(chars: &mut std::iter::Peekable<I>, radix: u32, max: usize) -> Option<u8>
where
    I: Iterator<Item = (usize, char)>,
{
    let mut value: u32 = 0;
    let mut taken = 0;
    while taken < max {
        match chars.peek().and_then(|(_, d)| d.to_digit(radix)) {
            Some(d) => {
                value = value * radix + d;
                chars.next();
                taken += 1;
            }
            None => break,
        }
    }
    (taken > 0).then_some((value & 0xff) as u8)
}
