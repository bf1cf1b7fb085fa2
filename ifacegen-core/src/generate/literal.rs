//! Constant values as source literals.

use crate::model::LiteralValue;

/// Source form of `value`, or `None` for kinds without a literal syntax.
///
/// Metadata reports both `null` and `default(SomeStruct)` as a null
/// constant; the `default` literal is valid for either.
pub fn format_literal(value: &LiteralValue) -> Option<String> {
    let text = match value {
        LiteralValue::Null => "default".to_string(),
        LiteralValue::Bool(b) => b.to_string(),
        LiteralValue::Char(c) => format!("'{}'", escape_char(*c, '\'')),
        LiteralValue::String(s) => {
            let escaped: String = s.chars().map(|c| escape_char(c, '"')).collect();
            format!("\"{}\"", escaped)
        }
        LiteralValue::SByte(v) => v.to_string(),
        LiteralValue::Byte(v) => v.to_string(),
        LiteralValue::Int16(v) => v.to_string(),
        LiteralValue::UInt16(v) => v.to_string(),
        LiteralValue::Int32(v) => v.to_string(),
        LiteralValue::UInt32(v) => format!("{}U", v),
        LiteralValue::Int64(v) => format!("{}L", v),
        LiteralValue::UInt64(v) => format!("{}UL", v),
        LiteralValue::Single(v) => real(
            v.is_nan(),
            v.is_infinite().then_some(*v > 0.0),
            v.to_string(),
            "float",
            "F",
        ),
        LiteralValue::Double(v) => real(
            v.is_nan(),
            v.is_infinite().then_some(*v > 0.0),
            v.to_string(),
            "double",
            "D",
        ),
        LiteralValue::Other { .. } => return None,
    };
    Some(text)
}

/// `infinite` is `Some(positive)` for infinities.
fn real(nan: bool, infinite: Option<bool>, digits: String, keyword: &str, suffix: &str) -> String {
    match (nan, infinite) {
        (true, _) => format!("{}.NaN", keyword),
        (_, Some(true)) => format!("{}.PositiveInfinity", keyword),
        (_, Some(false)) => format!("{}.NegativeInfinity", keyword),
        _ => format!("{}{}", digits, suffix),
    }
}

fn escape_char(c: char, quote: char) -> String {
    match c {
        '\\' => "\\\\".to_string(),
        '\0' => "\\0".to_string(),
        '\n' => "\\n".to_string(),
        '\r' => "\\r".to_string(),
        '\t' => "\\t".to_string(),
        c if c == quote => format!("\\{}", c),
        c if c.is_control() => format!("\\u{:04X}", c as u32),
        c => c.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(v: LiteralValue) -> String {
        format_literal(&v).unwrap()
    }

    #[test]
    fn test_integer_suffixes() {
        assert_eq!(fmt(LiteralValue::Int32(-5)), "-5");
        assert_eq!(fmt(LiteralValue::Byte(255)), "255");
        assert_eq!(fmt(LiteralValue::UInt32(7)), "7U");
        assert_eq!(fmt(LiteralValue::Int64(7)), "7L");
        assert_eq!(fmt(LiteralValue::UInt64(7)), "7UL");
    }

    #[test]
    fn test_reals() {
        assert_eq!(fmt(LiteralValue::Double(1.5)), "1.5D");
        assert_eq!(fmt(LiteralValue::Single(2.0)), "2F");
        assert_eq!(fmt(LiteralValue::Double(f64::NAN)), "double.NaN");
        assert_eq!(
            fmt(LiteralValue::Single(f32::NEG_INFINITY)),
            "float.NegativeInfinity"
        );
    }

    #[test]
    fn test_text_escaping() {
        assert_eq!(fmt(LiteralValue::Char('\'')), "'\\''");
        assert_eq!(fmt(LiteralValue::Char('"')), "'\"'");
        assert_eq!(
            fmt(LiteralValue::String("a \"b\"\n\\".into())),
            "\"a \\\"b\\\"\\n\\\\\""
        );
        assert_eq!(fmt(LiteralValue::String("\u{1}".into())), "\"\\u0001\"");
    }

    #[test]
    fn test_null_renders_as_default_literal() {
        assert_eq!(fmt(LiteralValue::Null), "default");
        assert_eq!(fmt(LiteralValue::Bool(false)), "false");
    }

    #[test]
    fn test_unsupported_kind_has_no_literal() {
        let v = LiteralValue::Other {
            type_name: "decimal".into(),
            raw: "1.5".into(),
        };
        assert_eq!(format_literal(&v), None);
    }
}
