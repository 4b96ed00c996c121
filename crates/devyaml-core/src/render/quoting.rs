//! Quoting policy for string scalars.
//!
//! [`needs_quotes`] is a pure function of the string's content: no state,
//! no configuration. The same input always yields the same decision, which
//! is what keeps rendering reproducible.

use std::borrow::Cow;

/// Characters that carry meaning somewhere in YAML and force quoting
/// wherever they appear.
pub const SPECIAL_CHARS: &[char] = &[
    ':', '{', '}', '[', ']', ',', '&', '*', '#', '?', '|', '<', '>', '!', '%', '@', '`',
];

/// Characters that only matter in first position.
const SPECIAL_LEADING: &[char] = &['-', '"', '\''];

/// Literals a YAML 1.1 loader reads as booleans.
const BOOL_LITERALS: &[&str] = &["true", "false", "yes", "no", "on", "off"];

/// Whether `s` must be double-quoted to read back as the same string.
pub fn needs_quotes(s: &str) -> bool {
    s.trim().is_empty()
        || s.trim() != s
        || s.contains(SPECIAL_CHARS)
        || s.starts_with(SPECIAL_LEADING)
        || s.chars().any(char::is_control)
        || is_number(s)
        || is_bool_literal(s)
        || is_null_literal(s)
}

/// Whether a YAML loader would read `s` as a number: decimal integers and
/// floats, `0x`/`0o` integers, and the `.inf`/`.nan` spellings.
pub fn is_number(s: &str) -> bool {
    s.parse::<i64>().is_ok()
        || s.parse::<f64>().is_ok()
        || is_radix_int(s, "0x", 16)
        || is_radix_int(s, "0o", 8)
        || is_special_float(s)
}

fn is_radix_int(s: &str, prefix: &str, radix: u32) -> bool {
    s.strip_prefix(prefix)
        .is_some_and(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_digit(radix)))
}

fn is_special_float(s: &str) -> bool {
    let unsigned = s.strip_prefix(['+', '-']).unwrap_or(s);
    matches!(unsigned, ".inf" | ".Inf" | ".INF") || matches!(s, ".nan" | ".NaN" | ".NAN")
}

pub fn is_bool_literal(s: &str) -> bool {
    BOOL_LITERALS.iter().any(|b| b.eq_ignore_ascii_case(s))
}

pub fn is_null_literal(s: &str) -> bool {
    s == "~" || s.eq_ignore_ascii_case("null")
}

/// Wrap `s` in double quotes, escaping `"`, `\` and control characters.
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", u32::from(c))),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// `<tag> <value>` for a tagged string. The tag replaces the quoting
/// decision, but a value that would break the line is still quoted.
pub fn format_tagged(tag: &str, s: &str) -> String {
    if s.chars().any(char::is_control) {
        format!("{tag} {}", quote(s))
    } else {
        format!("{tag} {s}")
    }
}

/// The rendered form of a string: plain when safe, quoted otherwise.
pub fn format_str(s: &str) -> Cow<'_, str> {
    if needs_quotes(s) {
        Cow::Owned(quote(s))
    } else {
        Cow::Borrowed(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_identifiers_stay_plain() {
        for s in ["MyWifi", "d1_mini", "living-room", "GPIO5", "v1.2.3", "dht", "D1", "secret"] {
            assert!(!needs_quotes(s), "{s} should be plain");
            // self-consistency: the rendered token maps back to "plain"
            assert!(!needs_quotes(&format_str(s)));
        }
    }

    #[test]
    fn numbers_are_quoted() {
        for s in ["123", "0", "-5", "3.14", "1e5", "+7"] {
            assert!(needs_quotes(s), "{s} should be quoted");
        }
        assert_eq!(format_str("123"), "\"123\"");
    }

    #[test]
    fn yaml_number_spellings_are_quoted() {
        for s in [".inf", "-.inf", "+.INF", ".Inf", ".nan", ".NaN", ".NAN", "0x1F", "0o17"] {
            assert!(needs_quotes(s), "{s} should be quoted");
        }
        assert_eq!(format_str(".inf"), "\".inf\"");
        for s in ["0x", "0xZZ", "0o9", ".info", "nan_sensor"] {
            assert!(!is_number(s), "{s} is not a number");
        }
    }

    #[test]
    fn tagged_values_quote_only_to_stay_on_one_line() {
        assert_eq!(format_tagged("!lambda", "return x;"), "!lambda return x;");
        assert_eq!(
            format_tagged("!lambda", "first\nsecond: x"),
            "!lambda \"first\\nsecond: x\""
        );
    }

    #[test]
    fn booleans_are_quoted_case_insensitively() {
        for s in ["true", "False", "YES", "no", "On", "off"] {
            assert!(needs_quotes(s), "{s} should be quoted");
        }
    }

    #[test]
    fn null_is_quoted_case_insensitively() {
        for s in ["null", "NULL", "Null", "~"] {
            assert!(needs_quotes(s), "{s} should be quoted");
        }
        assert!(!needs_quotes("nullable"));
    }

    #[test]
    fn empty_and_blank_are_quoted() {
        assert_eq!(format_str(""), "\"\"");
        assert_eq!(format_str("   "), "\"   \"");
    }

    #[test]
    fn every_special_character_forces_quotes() {
        for c in SPECIAL_CHARS {
            let s = format!("a{c}b");
            assert!(needs_quotes(&s), "{s} should be quoted");
        }
        assert_eq!(format_str("hello: world"), "\"hello: world\"");
    }

    #[test]
    fn dash_only_matters_up_front() {
        assert!(needs_quotes("- item"));
        assert!(needs_quotes("-flag"));
        assert!(!needs_quotes("a-b"));
    }

    #[test]
    fn surrounding_whitespace_is_preserved_by_quoting() {
        assert!(needs_quotes(" padded"));
        assert!(needs_quotes("padded "));
    }

    #[test]
    fn quote_escapes_quotes_and_backslashes() {
        assert_eq!(quote(r#"say "hi" \o/"#), r#""say \"hi\" \\o/""#);
    }

    #[test]
    fn quote_escapes_control_characters() {
        assert!(needs_quotes("two\nlines"));
        assert_eq!(quote("two\nlines\t!"), "\"two\\nlines\\t!\"");
        assert_eq!(quote("\u{7}"), "\"\\u0007\"");
    }

    #[test]
    fn policy_is_pure() {
        let s = "sensor #1";
        assert_eq!(needs_quotes(s), needs_quotes(s));
        assert_eq!(format_str(s), format_str(s));
    }
}
