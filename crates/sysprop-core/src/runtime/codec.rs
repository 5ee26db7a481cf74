//! String encoding of typed property values
//!
//! Parsing is total: anything that does not match the declared type yields
//! `None`, never an error. Formatting assumes the value already matches its
//! descriptor; a mismatch is a programming error and panics.

use super::Value;
use crate::types::{ScalarKind, TypeDescriptor};

/// Parse a raw store string according to `desc`.
///
/// Lists are split on `,` and fail as a whole if any element fails.
pub fn parse(desc: &TypeDescriptor, raw: &str) -> Option<Value> {
    if desc.is_list {
        raw.split(',')
            .map(|element| parse_scalar(desc, element))
            .collect::<Option<Vec<_>>>()
            .map(Value::List)
    } else {
        parse_scalar(desc, raw)
    }
}

fn parse_scalar(desc: &TypeDescriptor, raw: &str) -> Option<Value> {
    match desc.scalar {
        ScalarKind::Boolean => parse_bool(raw).map(Value::Bool),
        ScalarKind::Int32 => parse_integer(raw)
            .and_then(|v| i32::try_from(v).ok())
            .map(Value::Int),
        ScalarKind::Int64 => parse_integer(raw).map(Value::Long),
        ScalarKind::Double => parse_double(raw).map(Value::Double),
        ScalarKind::String => Some(Value::String(raw.to_string())),
        ScalarKind::Enum => desc.ordinal(raw).map(Value::Enum),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    if ["1", "true"].iter().any(|t| raw.eq_ignore_ascii_case(t)) {
        Some(true)
    } else if ["0", "false"].iter().any(|t| raw.eq_ignore_ascii_case(t)) {
        Some(false)
    } else {
        None
    }
}

/// Decimal with optional sign, or unsigned hex with a `0x` prefix
fn parse_integer(raw: &str) -> Option<i64> {
    let (digits, radix) = match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => (hex, 16),
        None => (raw, 10),
    };
    if radix == 16 && digits.starts_with(['+', '-']) {
        return None;
    }
    i64::from_str_radix(digits, radix).ok()
}

/// Whole-token float parse; results outside the representable range fail
fn parse_double(raw: &str) -> Option<f64> {
    let value: f64 = raw.parse().ok()?;
    let mantissa = raw.split(['e', 'E']).next().unwrap_or(raw);
    let has_digits = raw.bytes().any(|b| b.is_ascii_digit());

    if value.is_infinite() && has_digits {
        return None; // overflow
    }
    if value == 0.0 && mantissa.bytes().any(|b| (b'1'..=b'9').contains(&b)) {
        return None; // underflow
    }
    Some(value)
}

/// Format a value according to `desc`.
///
/// # Panics
/// If the value's variant does not match the descriptor, or an enum
/// ordinal is outside the symbol table.
pub fn format(desc: &TypeDescriptor, value: &Value) -> String {
    match value {
        Value::List(elements) if desc.is_list => elements
            .iter()
            .map(|element| format_scalar(desc, element))
            .collect::<Vec<_>>()
            .join(","),
        _ if desc.is_list => panic!("expected a list value, found {:?}", value),
        scalar => format_scalar(desc, scalar),
    }
}

fn format_scalar(desc: &TypeDescriptor, value: &Value) -> String {
    match (desc.scalar, value) {
        (ScalarKind::Boolean, Value::Bool(b)) => b.to_string(),
        (ScalarKind::Int32, Value::Int(i)) => i.to_string(),
        (ScalarKind::Int64, Value::Long(l)) => l.to_string(),
        (ScalarKind::Double, Value::Double(d)) => format_double(*d),
        (ScalarKind::String, Value::String(s)) => s.clone(),
        (ScalarKind::Enum, Value::Enum(ordinal)) => match desc.symbol(*ordinal) {
            Some(symbol) => symbol.to_string(),
            None => panic!(
                "Invalid enum ordinal {} for symbols {:?}",
                ordinal, desc.symbols
            ),
        },
        (kind, other) => panic!("value {:?} does not match {:?}", other, kind),
    }
}

/// Shortest text that parses back to exactly `value`
fn format_double(value: f64) -> String {
    let plain = value.to_string();
    let scientific = format!("{:e}", value);
    if scientific.len() < plain.len() {
        scientific
    } else {
        plain
    }
}

/// `1`/`0` encoding for `integer_as_bool` properties.
///
/// # Panics
/// If the value is neither a boolean nor a list of booleans.
pub fn format_integer_as_bool(value: &Value) -> String {
    let digit = |v: &Value| match v {
        Value::Bool(true) => "1",
        Value::Bool(false) => "0",
        other => panic!("integer_as_bool needs a boolean, found {:?}", other),
    };
    match value {
        Value::List(elements) => elements.iter().map(digit).collect::<Vec<_>>().join(","),
        scalar => digit(scalar).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn desc(scalar: ScalarKind, is_list: bool) -> TypeDescriptor {
        TypeDescriptor {
            scalar,
            is_list,
            symbols: Vec::new(),
        }
    }

    fn enum_desc(is_list: bool) -> TypeDescriptor {
        TypeDescriptor {
            scalar: ScalarKind::Enum,
            is_list,
            symbols: vec!["enu".into(), "mva".into(), "lue".into()],
        }
    }

    // ── Boolean ────────────────────────────────────────

    #[test]
    fn test_parse_bool_tokens() {
        let d = desc(ScalarKind::Boolean, false);
        for raw in ["1", "true", "TRUE", "True"] {
            assert_eq!(parse(&d, raw), Some(Value::Bool(true)), "{}", raw);
        }
        for raw in ["0", "false", "FaLsE"] {
            assert_eq!(parse(&d, raw), Some(Value::Bool(false)), "{}", raw);
        }
        for raw in ["", "yes", "2", " true", "t"] {
            assert_eq!(parse(&d, raw), None, "{}", raw);
        }
    }

    #[test]
    fn test_bool_canonicalizes() {
        let d = desc(ScalarKind::Boolean, false);
        let v = parse(&d, "TRUE").unwrap();
        assert_eq!(format(&d, &v), "true");
        let v = parse(&d, "0").unwrap();
        assert_eq!(format(&d, &v), "false");
    }

    // ── Integers ───────────────────────────────────────

    #[test]
    fn test_parse_int32() {
        let d = desc(ScalarKind::Int32, false);
        assert_eq!(parse(&d, "42"), Some(Value::Int(42)));
        assert_eq!(parse(&d, "-7"), Some(Value::Int(-7)));
        assert_eq!(parse(&d, "+7"), Some(Value::Int(7)));
        assert_eq!(parse(&d, "0x1F"), Some(Value::Int(31)));
        assert_eq!(parse(&d, "2147483647"), Some(Value::Int(i32::MAX)));
        assert_eq!(parse(&d, "2147483648"), None);
        assert_eq!(parse(&d, "12abc"), None);
        assert_eq!(parse(&d, " 1"), None);
        assert_eq!(parse(&d, "1.0"), None);
        assert_eq!(parse(&d, ""), None);
        assert_eq!(parse(&d, "0x"), None);
        assert_eq!(parse(&d, "0x-1"), None);
    }

    #[test]
    fn test_parse_int64() {
        let d = desc(ScalarKind::Int64, false);
        assert_eq!(parse(&d, "-9223372036854775808"), Some(Value::Long(i64::MIN)));
        assert_eq!(parse(&d, "9223372036854775808"), None);
        assert_eq!(parse(&d, "0X7fffffffffffffff"), Some(Value::Long(i64::MAX)));
    }

    // ── Doubles ────────────────────────────────────────

    #[test]
    fn test_parse_double_strict() {
        let d = desc(ScalarKind::Double, false);
        assert_eq!(parse(&d, "3.5"), Some(Value::Double(3.5)));
        assert_eq!(parse(&d, "-1e3"), Some(Value::Double(-1000.0)));
        assert_eq!(parse(&d, "0"), Some(Value::Double(0.0)));
        assert_eq!(parse(&d, "3.5x"), None);
        assert_eq!(parse(&d, ""), None);
        assert_eq!(parse(&d, "."), None);
    }

    #[test]
    fn test_parse_double_range_errors() {
        let d = desc(ScalarKind::Double, false);
        assert_eq!(parse(&d, "1e400"), None);
        assert_eq!(parse(&d, "-1e400"), None);
        assert_eq!(parse(&d, "1e-400"), None);
        assert_eq!(parse(&d, "0e-400"), Some(Value::Double(0.0)));
        assert_eq!(parse(&d, "inf"), Some(Value::Double(f64::INFINITY)));
    }

    #[test]
    fn test_parse_double_keeps_subnormals() {
        let d = desc(ScalarKind::Double, false);
        let smallest = f64::from_bits(1);
        assert_eq!(parse(&d, "4.9e-324"), Some(Value::Double(smallest)));
        let text = format(&d, &Value::Double(smallest));
        assert_eq!(parse(&d, &text), Some(Value::Double(smallest)));
    }

    #[test]
    fn test_format_double_is_compact() {
        let d = desc(ScalarKind::Double, false);
        assert_eq!(format(&d, &Value::Double(0.1)), "0.1");
        assert_eq!(format(&d, &Value::Double(1.0)), "1");
        assert_eq!(format(&d, &Value::Double(1e300)), "1e300");
        assert_eq!(format(&d, &Value::Double(-2.5e-10)), "-2.5e-10");
    }

    // ── Strings & enums ────────────────────────────────

    #[test]
    fn test_string_is_identity() {
        let d = desc(ScalarKind::String, false);
        assert_eq!(parse(&d, ""), Some(Value::String(String::new())));
        assert_eq!(parse(&d, "a,b c"), Some(Value::String("a,b c".into())));
        assert_eq!(format(&d, &Value::String("x y".into())), "x y");
    }

    #[test]
    fn test_enum_exact_match() {
        let d = enum_desc(false);
        assert_eq!(parse(&d, "mva"), Some(Value::Enum(1)));
        assert_eq!(parse(&d, "MVA"), None);
        assert_eq!(parse(&d, ""), None);
        assert_eq!(format(&d, &Value::Enum(2)), "lue");
    }

    #[test]
    #[should_panic(expected = "Invalid enum ordinal 3")]
    fn test_enum_ordinal_out_of_range_panics() {
        format(&enum_desc(false), &Value::Enum(3));
    }

    #[test]
    #[should_panic(expected = "does not match")]
    fn test_mismatched_variant_panics() {
        format(&desc(ScalarKind::Int32, false), &Value::Long(1));
    }

    // ── Lists ──────────────────────────────────────────

    #[test]
    fn test_enum_list_round_trip() {
        let d = enum_desc(true);
        let v = parse(&d, "enu,lue").unwrap();
        assert_eq!(v, Value::List(vec![Value::Enum(0), Value::Enum(2)]));
        assert_eq!(format(&d, &v), "enu,lue");
    }

    #[test]
    fn test_list_fails_as_a_whole() {
        let d = desc(ScalarKind::Int32, true);
        assert_eq!(
            parse(&d, "1,2,3"),
            Some(Value::List(vec![Value::Int(1), Value::Int(2), Value::Int(3)]))
        );
        assert_eq!(parse(&d, "1,x,3"), None);
        assert_eq!(parse(&d, "1,,3"), None);
        assert_eq!(parse(&d, ""), None);
    }

    #[test]
    fn test_string_list_keeps_empty_elements() {
        let d = desc(ScalarKind::String, true);
        assert_eq!(
            parse(&d, "a,,b"),
            Some(Value::List(vec![
                Value::String("a".into()),
                Value::String(String::new()),
                Value::String("b".into()),
            ]))
        );
    }

    #[test]
    fn test_format_empty_list() {
        assert_eq!(format(&desc(ScalarKind::Int64, true), &Value::List(vec![])), "");
    }

    #[test]
    fn test_format_integer_as_bool() {
        assert_eq!(format_integer_as_bool(&Value::Bool(true)), "1");
        assert_eq!(
            format_integer_as_bool(&Value::List(vec![Value::Bool(false), Value::Bool(true)])),
            "0,1"
        );
    }

    // ── Round-trip properties ──────────────────────────

    proptest! {
        #[test]
        fn prop_double_round_trips_exactly(
            v in prop::num::f64::NORMAL | prop::num::f64::SUBNORMAL | prop::num::f64::ZERO
        ) {
            let d = desc(ScalarKind::Double, false);
            let text = format(&d, &Value::Double(v));
            match parse(&d, &text) {
                Some(Value::Double(back)) => prop_assert_eq!(back.to_bits(), v.to_bits()),
                other => prop_assert!(false, "{} parsed to {:?}", text, other),
            }
        }

        #[test]
        fn prop_int64_round_trips(v in any::<i64>()) {
            let d = desc(ScalarKind::Int64, false);
            let text = format(&d, &Value::Long(v));
            prop_assert_eq!(parse(&d, &text), Some(Value::Long(v)));
        }

        #[test]
        fn prop_int32_list_canonical(values in prop::collection::vec(any::<i32>(), 1..8)) {
            let d = desc(ScalarKind::Int32, true);
            let raw = values.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(",");
            let parsed = parse(&d, &raw).unwrap();
            prop_assert_eq!(format(&d, &parsed), raw);
        }

        #[test]
        fn prop_enum_list_canonical(ordinals in prop::collection::vec(0usize..3, 1..6)) {
            let d = enum_desc(true);
            let raw = ordinals
                .iter()
                .map(|&o| d.symbols[o].clone())
                .collect::<Vec<_>>()
                .join(",");
            let parsed = parse(&d, &raw).unwrap();
            prop_assert_eq!(format(&d, &parsed), raw);
        }

        #[test]
        fn prop_string_without_commas_round_trips(s in "[^,]*") {
            let d = desc(ScalarKind::String, true);
            let parsed = parse(&d, &s).unwrap();
            prop_assert_eq!(format(&d, &parsed), s);
        }
    }
}
