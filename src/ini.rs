//! INI-style text codec.
//!
//! One `key=value` per line, `;` comment lines, `[section]` headers that
//! prepend a dotted prefix to the keys that follow, and backslash escaping
//! so keys and values can carry `=`, newlines and whitespace. The codec
//! works against any [`ConfigStore`], so a bare layer, a whole stack or a
//! prefix view all serialize the same way.

use std::io::{BufRead, Write};

use crate::error::ConfigError;
use crate::store::{normalize_prefix, ConfigStore, KeyList};

/// Finds the byte position of the first `=` not preceded by a backslash.
///
/// Starts at position 1: a separator at position 0 would leave an empty
/// key, which is never valid.
fn find_unescaped_eq(line: &str) -> Option<usize> {
    let bytes = line.as_bytes();
    (1..bytes.len()).find(|&i| bytes[i] == b'=' && bytes[i - 1] != b'\\')
}

/// Reverses [`escape`], one pass left to right.
///
/// Unrecognized escape sequences (and a trailing lone backslash) pass
/// through unchanged.
fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(':') => out.push(':'),
            Some(';') => out.push(';'),
            Some('=') => out.push('='),
            Some('r') => out.push('\r'),
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('f') => out.push('\x0c'),
            Some('0') => out.push('\0'),
            Some(' ') => out.push(' '),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Escapes backslashes and newlines, plus `=` for the key side of a line.
fn escape(s: &str, escape_eq: bool) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '=' if escape_eq => out.push_str("\\="),
            _ => out.push(c),
        }
    }
    out
}

fn trim_field(s: &str) -> &str {
    s.trim_matches([' ', '\t', '\x0c'])
}

fn trim_field_start(s: &str) -> &str {
    s.trim_start_matches([' ', '\t', '\x0c'])
}

/// Loads INI content from `reader` into `target`, which must be writable.
///
/// Parsing is best-effort: blank lines, `;` comments and lines without an
/// unescaped `=` are skipped without error. Within one load, a key that
/// appears twice keeps its last value. An I/O failure aborts the load and is
/// returned; lines already applied to `target` stay applied.
pub fn load_ini<R: BufRead>(target: &dyn ConfigStore, mut reader: R) -> Result<(), ConfigError> {
    if !target.is_writable() {
        return Err(ConfigError::ReadOnlyTarget);
    }

    let mut section = String::new();
    let mut buf = String::new();
    loop {
        buf.clear();
        if reader.read_line(&mut buf)? == 0 {
            return Ok(());
        }

        let line = buf.strip_suffix('\n').unwrap_or(&buf);
        let line = line.strip_suffix('\r').unwrap_or(line); // windows line endings

        if line.is_empty() || line.starts_with(';') {
            continue;
        }

        // section header switches the key prefix; [] resets to root
        if line.starts_with('[') && line.ends_with(']') {
            section = normalize_prefix(&line[1..line.len() - 1]);
            continue;
        }

        let Some(pos) = find_unescaped_eq(line) else {
            // malformed line, skip it
            continue;
        };

        let key = trim_field(&line[..pos]);
        let value = trim_field_start(&line[pos + 1..]);

        let key = format!("{section}{}", unescape(key));
        target.set_string(&key, &unescape(value))?;
    }
}

fn save_ini_impl<W: Write>(
    source: &dyn ConfigStore,
    writer: &mut W,
    header: bool,
) -> Result<(), ConfigError> {
    if header {
        writer.write_all(b";\n; This INI file was autogenerated\n;\n\n")?;
    }

    let mut keys = KeyList::new();
    source.list_keys("", &mut keys, false);

    for key in keys.iter() {
        // the key may have been removed since enumeration; skip it then
        if let Some(value) = source.get_string(key) {
            writer.write_all(escape(key, true).as_bytes())?;
            writer.write_all(b"=")?;
            writer.write_all(escape(&value, false).as_bytes())?;
            writer.write_all(b"\n")?;
        }
    }
    Ok(())
}

/// Serializes `source` to `writer` in INI format, preceded by a short
/// autogenerated-file comment header.
///
/// Line order follows key enumeration order and is unspecified; sort the
/// output externally if determinism is needed.
pub fn save_ini<W: Write>(source: &dyn ConfigStore, writer: &mut W) -> Result<(), ConfigError> {
    save_ini_impl(source, writer, true)
}

/// Serializes `source` to `writer` in INI format without the comment header.
pub fn save_ini_plain<W: Write>(source: &dyn ConfigStore, writer: &mut W) -> Result<(), ConfigError> {
    save_ini_impl(source, writer, false)
}
