//! Scalar typing and quoting rules.
//!
//! Plain scalars are typed with the YAML 1.2 core schema. The same rules
//! decide, on output, whether a string can be written plain or must be quoted
//! so that it reads back as the same string.

use crate::document::ScalarValue;

/// Resolve the type of a plain (unquoted) scalar.
pub fn resolve_plain(text: &str) -> ScalarValue {
    match text {
        "" | "~" | "null" | "Null" | "NULL" => return ScalarValue::Null,
        "true" | "True" | "TRUE" => return ScalarValue::Bool(true),
        "false" | "False" | "FALSE" => return ScalarValue::Bool(false),
        _ => {}
    }

    if let Some(i) = parse_int(text) {
        return ScalarValue::Int(i);
    }

    if let Some(f) = parse_float(text) {
        return ScalarValue::Float(f);
    }

    ScalarValue::String(text.to_string())
}

fn parse_int(text: &str) -> Option<i64> {
    if let Some(hex) = text.strip_prefix("0x") {
        return i64::from_str_radix(hex, 16).ok();
    }
    if let Some(oct) = text.strip_prefix("0o") {
        return i64::from_str_radix(oct, 8).ok();
    }
    let digits = text.strip_prefix(['-', '+']).unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse::<i64>().ok()
}

fn parse_float(text: &str) -> Option<f64> {
    match text {
        ".inf" | ".Inf" | ".INF" | "+.inf" | "+.Inf" | "+.INF" => return Some(f64::INFINITY),
        "-.inf" | "-.Inf" | "-.INF" => return Some(f64::NEG_INFINITY),
        ".nan" | ".NaN" | ".NAN" => return Some(f64::NAN),
        _ => {}
    }

    // [-+]? ( \. [0-9]+ | [0-9]+ ( \. [0-9]* )? ) ( [eE] [-+]? [0-9]+ )?
    let body = text.strip_prefix(['-', '+']).unwrap_or(text);
    let (mantissa, exponent) = match body.find(['e', 'E']) {
        Some(pos) => (&body[..pos], Some(&body[pos + 1..])),
        None => (body, None),
    };
    let (whole, fraction) = match mantissa.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (mantissa, None),
    };
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(whole) || !fraction.is_none_or(all_digits) {
        return None;
    }
    if whole.is_empty() && fraction.is_none_or(str::is_empty) {
        return None;
    }
    if let Some(exponent) = exponent {
        let exp_digits = exponent.strip_prefix(['-', '+']).unwrap_or(exponent);
        if exp_digits.is_empty() || !all_digits(exp_digits) {
            return None;
        }
    }
    text.parse::<f64>().ok()
}

/// Canonical text for a float that has no recorded representation.
///
/// Finite values always carry a fraction or exponent (`4.0`, `1e20`), so they
/// read back as floats rather than integers.
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        ".nan".to_string()
    } else if value.is_infinite() {
        let text = if value > 0.0 { ".inf" } else { "-.inf" };
        text.to_string()
    } else {
        format!("{:?}", value)
    }
}

/// Words some YAML 1.1 readers still treat as booleans.
const LEGACY_BOOLEANS: &[&str] = &[
    "y", "Y", "yes", "Yes", "YES", "n", "N", "no", "No", "NO", "on", "On", "ON", "off", "Off",
    "OFF",
];

/// Whether a string must be quoted to read back as the same string.
pub fn needs_quotes(text: &str, in_flow: bool) -> bool {
    if !matches!(resolve_plain(text), ScalarValue::String(_)) {
        return true;
    }
    LEGACY_BOOLEANS.contains(&text) || breaks_plain_syntax(text, in_flow)
}

/// Whether a mapping key must be quoted.
///
/// Keys are always read back as strings, so only syntax matters here. Keys of
/// flow mappings also have to stay clear of flow indicators.
pub fn key_needs_quotes(key: &str, in_flow: bool) -> bool {
    key.is_empty() || breaks_plain_syntax(key, in_flow)
}

pub(crate) fn breaks_plain_syntax(text: &str, in_flow: bool) -> bool {
    let Some(first) = text.chars().next() else {
        return true;
    };
    if text.starts_with(char::is_whitespace) || text.ends_with(char::is_whitespace) {
        return true;
    }
    if "#,[]{}&*!|>'\"%@`".contains(first) {
        return true;
    }
    if first == '?' || first == ':' {
        return true;
    }
    if first == '-' && text.chars().nth(1).is_none_or(char::is_whitespace) {
        return true;
    }
    if text.starts_with("---") || text.starts_with("...") {
        return true;
    }
    if text.contains(": ") || text.contains(" #") || text.ends_with(':') {
        return true;
    }
    if in_flow && text.contains([',', ':', '[', ']', '{', '}']) {
        return true;
    }
    // A quote after a blank or flow indicator reads as an opening quote.
    let opens_quote = text
        .chars()
        .zip(text.chars().skip(1))
        .any(|(before, c)| (c == '\'' || c == '"') && (before == ' ' || ",[{".contains(before)));
    if opens_quote {
        return true;
    }
    text.chars().any(|c| c.is_control())
}

/// Whether a string can only be written double-quoted (or as a block scalar).
pub fn needs_escapes(text: &str) -> bool {
    text.chars().any(|c| c.is_control())
}

pub fn single_quoted(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

pub fn double_quoted(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\0' => out.push_str("\\0"),
            c if c.is_control() => {
                let code = c as u32;
                if code <= 0xff {
                    out.push_str(&format!("\\x{:02x}", code));
                } else {
                    out.push_str(&format!("\\u{:04x}", code));
                }
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_core_schema() {
        assert_eq!(resolve_plain("~"), ScalarValue::Null);
        assert_eq!(resolve_plain(""), ScalarValue::Null);
        assert_eq!(resolve_plain("True"), ScalarValue::Bool(true));
        assert_eq!(resolve_plain("false"), ScalarValue::Bool(false));
        assert_eq!(resolve_plain("42"), ScalarValue::Int(42));
        assert_eq!(resolve_plain("-7"), ScalarValue::Int(-7));
        assert_eq!(resolve_plain("0x1f"), ScalarValue::Int(31));
        assert_eq!(resolve_plain("0o17"), ScalarValue::Int(15));
        assert_eq!(resolve_plain("2.5"), ScalarValue::Float(2.5));
        assert_eq!(resolve_plain("1e3"), ScalarValue::Float(1000.0));
        assert_eq!(resolve_plain(".5"), ScalarValue::Float(0.5));
        assert_eq!(resolve_plain("-.inf"), ScalarValue::Float(f64::NEG_INFINITY));
    }

    #[test]
    fn test_yaml_11_words_stay_strings() {
        assert_eq!(resolve_plain("yes"), ScalarValue::String("yes".into()));
        assert_eq!(resolve_plain("inf"), ScalarValue::String("inf".into()));
        assert_eq!(resolve_plain("nan"), ScalarValue::String("nan".into()));
        assert_eq!(resolve_plain("1.2.3"), ScalarValue::String("1.2.3".into()));
        assert_eq!(resolve_plain("."), ScalarValue::String(".".into()));
    }

    #[test]
    fn test_format_float_keeps_fraction() {
        assert_eq!(format_float(4.0), "4.0");
        assert_eq!(format_float(2.718281828), "2.718281828");
        assert_eq!(format_float(f64::INFINITY), ".inf");
        assert_eq!(format_float(f64::NAN), ".nan");
        assert!(matches!(resolve_plain(&format_float(1e20)), ScalarValue::Float(_)));
    }

    #[test]
    fn test_needs_quotes() {
        assert!(!needs_quotes("this is a string.", false));
        assert!(!needs_quotes("three and four", true));
        assert!(needs_quotes("YamlParams, kind: SELF_GENERATED", false));
        assert!(needs_quotes("a, b", true));
        assert!(!needs_quotes("a, b", false));
        assert!(needs_quotes("42", false));
        assert!(needs_quotes("true", false));
        assert!(needs_quotes("yes", false));
        assert!(needs_quotes("", false));
        assert!(needs_quotes("- item", false));
        assert!(needs_quotes("#hash", false));
        assert!(needs_quotes(" padded", false));
        assert!(!needs_quotes("-5x", false));
        assert!(!needs_quotes("http://example.com", false));
        assert!(needs_quotes("http://example.com", true));
        assert!(needs_quotes(":x", false));
        assert!(!needs_quotes("it's", false));
        assert!(needs_quotes("a 'b", false));
        assert!(needs_quotes("a,\"b", false));
    }

    #[test]
    fn test_key_needs_quotes() {
        assert!(!key_needs_quotes("1", false));
        assert!(!key_needs_quotes("myint", true));
        assert!(key_needs_quotes("a: b", false));
        assert!(key_needs_quotes("", false));
        assert!(!key_needs_quotes("a,b", false));
        assert!(key_needs_quotes("a,b", true));
        assert!(key_needs_quotes("x{y}", true));
        assert!(key_needs_quotes("a:b", true));
    }

    #[test]
    fn test_quoting() {
        assert_eq!(single_quoted("it's"), "'it''s'");
        assert_eq!(double_quoted("a\"b\\c\nd"), "\"a\\\"b\\\\c\\nd\"");
        assert_eq!(double_quoted("\u{7}"), "\"\\x07\"");
    }
}
