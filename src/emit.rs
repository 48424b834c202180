//! Text helpers shared by the YAML and TOML emitters.

use crate::Number;

/// Appends `s` as a double-quoted string with escapes valid in both YAML
/// and TOML basic strings.
pub(crate) fn write_quoted(out: &mut String, s: &str) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            c if needs_escape(c) => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}

/// Characters that must never appear raw in output. YAML readers treat
/// U+2028 and U+2029 as line breaks and reject the two non-characters.
pub(crate) fn needs_escape(c: char) -> bool {
    c.is_control() || matches!(c, '\u{2028}' | '\u{2029}' | '\u{FFFE}' | '\u{FFFF}')
}

/// Float spellings for NaN, positive and negative infinity.
pub(crate) struct FloatSpecials {
    pub nan: &'static str,
    pub inf: &'static str,
    pub neg_inf: &'static str,
}

pub(crate) const YAML_FLOATS: FloatSpecials = FloatSpecials {
    nan: ".nan",
    inf: ".inf",
    neg_inf: "-.inf",
};

pub(crate) const TOML_FLOATS: FloatSpecials = FloatSpecials {
    nan: "nan",
    inf: "inf",
    neg_inf: "-inf",
};

/// Appends a number so that it parses back with the same type.
pub(crate) fn write_number(out: &mut String, n: &Number, specials: &FloatSpecials) {
    match n {
        Number::Integer(i) => out.push_str(&i.to_string()),
        Number::Unsigned(u) => out.push_str(&u.to_string()),
        Number::Float(f) if f.is_nan() => out.push_str(specials.nan),
        Number::Float(f) if f.is_infinite() => {
            out.push_str(if *f > 0.0 { specials.inf } else { specials.neg_inf });
        }
        Number::Float(f) => {
            let text = f.to_string();
            out.push_str(&text);
            // Whole floats must keep a fractional part to stay floats
            if !text.contains(['.', 'e', 'E']) {
                out.push_str(".0");
            }
        }
    }
}

/// Appends a trailing `  # text` comment.
pub(crate) fn push_comment(out: &mut String, text: Option<&str>) {
    if let Some(text) = text {
        out.push_str("  # ");
        out.push_str(text);
    }
}

pub(crate) fn push_indent(out: &mut String, indent: usize) {
    out.extend(std::iter::repeat(' ').take(indent));
}
