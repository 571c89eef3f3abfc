//! Canonical JSON encoding.
//!
//! Produces a byte-stable serialization of a JSON value, independent of
//! object key ordering and source whitespace. Two logically equal documents
//! always encode to the same bytes, which makes the encoding safe to hash
//! and sign.
//!
//! Rules:
//! - Object members sorted by key, keys compared as UTF-16 code units.
//! - No insignificant whitespace.
//! - Minimal string escapes (`\"`, `\\`, `\b`, `\f`, `\n`, `\r`, `\t`, and
//!   `\u00xx` for remaining control characters).
//! - Floats with an integral value in the safe-integer range print without a
//!   decimal point, so `1` and `1.0` encode identically; other finite floats
//!   use shortest round-trip formatting.
//! - Non-finite numbers are rejected.

use std::cmp::Ordering;

use serde_json::{Number, Value};

use crate::error::{CoreError, Result};

/// Largest float magnitude that prints exactly as an integer (2^53 - 1).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Encode a JSON value into its canonical string form.
pub fn canonical_json_string(value: &Value) -> Result<String> {
    let mut out = String::with_capacity(128);
    write_value(value, &mut out)?;
    Ok(out)
}

/// Encode a JSON value into canonical bytes.
pub fn canonical_json_bytes(value: &Value) -> Result<Vec<u8>> {
    Ok(canonical_json_string(value)?.into_bytes())
}

fn write_value(value: &Value, out: &mut String) -> Result<()> {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(true) => out.push_str("true"),
        Value::Bool(false) => out.push_str("false"),
        Value::Number(n) => write_number(n, out)?,
        Value::String(s) => write_string(s, out),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(item, out)?;
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| utf16_order(a.0, b.0));
            out.push('{');
            for (i, (key, item)) in entries.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_string(key, out);
                out.push(':');
                write_value(item, out)?;
            }
            out.push('}');
        }
    }
    Ok(())
}

/// Key ordering over UTF-16 code units, not Unicode scalar values.
///
/// The two orders disagree for keys mixing supplementary-plane characters
/// (surrogate pairs sort below U+E000..U+FFFF code units).
fn utf16_order(a: &str, b: &str) -> Ordering {
    a.encode_utf16().cmp(b.encode_utf16())
}

fn write_number(n: &Number, out: &mut String) -> Result<()> {
    if let Some(i) = n.as_i64() {
        out.push_str(&i.to_string());
    } else if let Some(u) = n.as_u64() {
        out.push_str(&u.to_string());
    } else if let Some(f) = n.as_f64() {
        if !f.is_finite() {
            return Err(CoreError::NonFiniteNumber);
        }
        if f == f.trunc() && f.abs() <= MAX_SAFE_INTEGER {
            out.push_str(&(f as i64).to_string());
        } else {
            out.push_str(&f.to_string());
        }
    } else {
        // serde_json numbers are always i64, u64, or f64
        return Err(CoreError::NonFiniteNumber);
    }
    Ok(())
}

fn write_string(s: &str, out: &mut String) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
}
