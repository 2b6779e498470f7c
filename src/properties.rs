//! Properties file format
//!
//! Reads and writes the line-oriented `key=value` format used by JVM build
//! tools, so reserved ports can be consumed by tooling that already reads
//! `.properties` files:
//! - `#` and `!` start comment lines
//! - keys end at the first unescaped `=`, `:` or whitespace
//! - a trailing backslash continues the logical line
//! - `\t`, `\n`, `\r`, `\f` and `\uXXXX` escapes are understood
//!
//! Output is sorted by key. Consumers must not rely on any ordering.
use crate::reserve::Reservation;
use std::collections::BTreeMap;
use std::io::{self, Write};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: BTreeMap<String, String>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse properties text. Malformed escapes are kept literally.
    pub fn parse(content: &str) -> Self {
        let mut properties = Properties::new();

        for line in logical_lines(content) {
            let trimmed = line.trim_start();
            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
                continue;
            }

            let (key, value) = split_key_value(trimmed);
            properties.insert(unescape(key), unescape(value));
        }

        properties
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Merge reserved ports in, overwriting existing keys of the same name
    pub fn merge(&mut self, reservation: &Reservation) {
        for (key, value) in reservation.to_properties() {
            self.entries.insert(key, value);
        }
    }

    /// Write in properties format with an optional comment and a timestamp header
    pub fn write_to<W: Write>(&self, mut writer: W, comment: Option<&str>) -> io::Result<()> {
        if let Some(comment) = comment {
            for line in comment.lines() {
                writeln!(writer, "#{}", line)?;
            }
        }
        writeln!(
            writer,
            "#{}",
            chrono::Local::now().format("%a %b %d %H:%M:%S %Z %Y")
        )?;

        self.write_entries(writer)
    }

    /// Write only the `key=value` lines
    pub fn write_entries<W: Write>(&self, mut writer: W) -> io::Result<()> {
        for (key, value) in &self.entries {
            writeln!(writer, "{}={}", escape(key, true), escape(value, false))?;
        }

        writer.flush()
    }
}

impl From<&Reservation> for Properties {
    fn from(reservation: &Reservation) -> Self {
        let mut properties = Properties::new();
        properties.merge(reservation);
        properties
    }
}

/// Join physical lines ending in an odd number of backslashes
fn logical_lines(content: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current: Option<String> = None;

    for raw in physical_lines(content) {
        let piece = match current {
            Some(_) => raw.trim_start(),
            None => raw,
        };

        let trailing = piece.chars().rev().take_while(|&c| c == '\\').count();
        let continues = trailing % 2 == 1 && !is_comment(piece, current.is_some());
        let piece = if continues {
            &piece[..piece.len() - 1]
        } else {
            piece
        };

        let mut line = current.take().unwrap_or_default();
        line.push_str(piece);

        if continues {
            current = Some(line);
        } else {
            lines.push(line);
        }
    }

    if let Some(line) = current {
        lines.push(line);
    }

    lines
}

/// Split on `\r\n`, lone `\r` or `\n`
fn physical_lines(content: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let bytes = content.as_bytes();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&content[start..i]);
                start = i + 1;
            }
            b'\r' => {
                lines.push(&content[start..i]);
                if bytes.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }

    if start < bytes.len() {
        lines.push(&content[start..]);
    }

    lines
}

fn is_comment(piece: &str, in_continuation: bool) -> bool {
    if in_continuation {
        return false;
    }
    let trimmed = piece.trim_start();
    trimmed.starts_with('#') || trimmed.starts_with('!')
}

/// Split at the first unescaped separator
fn split_key_value(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = line.len();

    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' | ' ' | '\t' | '\x0c' => {
                key_end = i;
                break;
            }
            _ => {}
        }
    }

    let key = &line[..key_end];
    let rest = line[key_end..].trim_start_matches([' ', '\t', '\x0c']);
    let rest = rest
        .strip_prefix('=')
        .or_else(|| rest.strip_prefix(':'))
        .unwrap_or(rest);
    let value = rest.trim_start_matches([' ', '\t', '\x0c']);

    (key, value)
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    let mut pending_high: Option<u16> = None;

    while let Some(c) = chars.next() {
        if c != '\\' {
            flush_surrogate(&mut out, &mut pending_high);
            out.push(c);
            continue;
        }

        match chars.next() {
            Some('u') => {
                let hex: String = chars.clone().take(4).collect();
                let valid = hex.len() == 4 && hex.chars().all(|c| c.is_ascii_hexdigit());
                match u16::from_str_radix(&hex, 16) {
                    Ok(unit) if valid => {
                        for _ in 0..4 {
                            chars.next();
                        }
                        push_utf16_unit(&mut out, &mut pending_high, unit);
                    }
                    _ => {
                        flush_surrogate(&mut out, &mut pending_high);
                        out.push('u');
                    }
                }
            }
            Some(other) => {
                flush_surrogate(&mut out, &mut pending_high);
                out.push(match other {
                    't' => '\t',
                    'n' => '\n',
                    'r' => '\r',
                    'f' => '\x0c',
                    c => c,
                });
            }
            None => flush_surrogate(&mut out, &mut pending_high),
        }
    }
    flush_surrogate(&mut out, &mut pending_high);

    out
}

fn push_utf16_unit(out: &mut String, pending_high: &mut Option<u16>, unit: u16) {
    if let Some(high) = pending_high.take() {
        let decoded: String = char::decode_utf16([high, unit])
            .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect();
        out.push_str(&decoded);
    } else if (0xD800..0xDC00).contains(&unit) {
        *pending_high = Some(unit);
    } else {
        out.push(char::from_u32(unit as u32).unwrap_or(char::REPLACEMENT_CHARACTER));
    }
}

fn flush_surrogate(out: &mut String, pending_high: &mut Option<u16>) {
    if pending_high.take().is_some() {
        out.push(char::REPLACEMENT_CHARACTER);
    }
}

/// Escape a key or value. Keys escape every space, values only a leading one.
fn escape(text: &str, is_key: bool) -> String {
    let mut out = String::with_capacity(text.len());

    for (i, c) in text.chars().enumerate() {
        match c {
            '\\' => out.push_str("\\\\"),
            ' ' if i == 0 || is_key => out.push_str("\\ "),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\x0c' => out.push_str("\\f"),
            '=' | ':' | '#' | '!' => {
                out.push('\\');
                out.push(c);
            }
            c if (c as u32) < 0x20 || (c as u32) > 0x7e => {
                let mut buf = [0u16; 2];
                for unit in c.encode_utf16(&mut buf) {
                    out.push_str(&format!("\\u{:04X}", unit));
                }
            }
            c => out.push(c),
        }
    }

    out
}
