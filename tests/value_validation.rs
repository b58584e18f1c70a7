//! Per-scalar value validation:
//! - integrality of native numbers
//! - range windows for both numeric representations
//! - host-type rejection texts
//! - enum member lookup and open-enum numeric values

use protowire::{enumeration, message, protocol, EncodeError, Error, Protocol, Table, Value};

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn single_field(kind: &str) -> Protocol {
    let msg = message("test", &[("val", kind, 1)]).expect("message");
    protocol(vec![msg.into()]).expect("protocol")
}

fn fail_single(kind: &str, value: Value) -> EncodeError {
    let result = single_field(kind).encode("test", &Table::new().set("val", value));
    match result {
        Err(Error::Encode(e)) => e,
        Err(other) => panic!("expected encode error, got {}", other),
        Ok(bytes) => panic!("expected encode error, got {} bytes", bytes.len()),
    }
}

fn ok_single(kind: &str, value: Value) {
    single_field(kind)
        .encode("test", &Table::new().set("val", value))
        .expect("value should encode");
}

// ---------------------------------------------------------------------------
// Integrality
// ---------------------------------------------------------------------------

#[test]
fn test_fractional_number_rejected() {
    let err = fail_single("int32", Value::Number(1.5));
    assert_eq!(
        err.to_string(),
        "Input number value 1.500000 for \"val\" is not integer"
    );
}

#[test]
fn test_fractional_number_rejected_for_every_integer_kind() {
    for kind in [
        "int32", "int64", "uint32", "uint64", "sint32", "sint64", "fixed32", "fixed64",
        "sfixed32", "sfixed64",
    ] {
        let err = fail_single(kind, Value::Number(0.25));
        assert!(
            matches!(err, EncodeError::NotInteger { .. }),
            "{}: got {}",
            kind,
            err
        );
    }
}

#[test]
fn test_float_kinds_take_fractional_numbers() {
    ok_single("float", Value::Number(1.5));
    ok_single("double", Value::Number(1.5));
}

// ---------------------------------------------------------------------------
// Range windows, native representation
// ---------------------------------------------------------------------------

#[test]
fn test_int32_overflow() {
    let err = fail_single("int32", Value::Number(2147483648.0));
    assert_eq!(
        err.to_string(),
        "Input data for \"val\" field is 2147483648 and do not fit in \"int32\""
    );
}

#[test]
fn test_int32_underflow() {
    let err = fail_single("int32", Value::Number(-2147483649.0));
    assert!(matches!(err, EncodeError::OutOfRange { .. }));
}

#[test]
fn test_int32_bounds_accepted() {
    ok_single("int32", Value::Number(2147483647.0));
    ok_single("int32", Value::Number(-2147483648.0));
}

#[test]
fn test_uint32_negative_rejected() {
    let err = fail_single("uint32", Value::Number(-1.0));
    assert_eq!(
        err.to_string(),
        "Input data for \"val\" field is -1 and do not fit in \"uint32\""
    );
}

#[test]
fn test_uint64_overflow_reports_historical_spelling() {
    let err = fail_single("uint64", Value::Number(-1.0));
    assert_eq!(
        err.to_string(),
        "Input data for \"val\" field is -1 and do not fit in uint_64"
    );
}

// ---------------------------------------------------------------------------
// Range windows, wide representation
// ---------------------------------------------------------------------------

#[test]
fn test_int32_wide_overflow() {
    let err = fail_single("int32", Value::Int(2147483648));
    assert!(matches!(err, EncodeError::OutOfRange { .. }));
    let err = fail_single("int32", Value::Uint(2147483648));
    assert!(matches!(err, EncodeError::OutOfRange { .. }));
}

#[test]
fn test_uint64_wide_signed_negative_rejected() {
    let err = fail_single("uint64", Value::Int(-1));
    assert_eq!(
        err.to_string(),
        "Input data for \"val\" field is -1 and do not fit in uint_64"
    );
}

#[test]
fn test_uint64_wide_unsigned_has_no_upper_failure() {
    ok_single("uint64", Value::Uint(u64::MAX));
}

#[test]
fn test_int64_wide_bounds_accepted() {
    ok_single("int64", Value::Int(i64::MIN));
    ok_single("int64", Value::Int(i64::MAX));
    ok_single("sint64", Value::Int(i64::MIN));
}

#[test]
fn test_uint32_wide_unsigned_skips_lower_bound() {
    ok_single("uint32", Value::Uint(0));
    let err = fail_single("uint32", Value::Uint(4294967296));
    assert!(matches!(err, EncodeError::OutOfRange { .. }));
}

#[test]
fn test_sfixed64_window_is_narrowed() {
    // Both extremes of the i64 line sit outside the accepted window.
    assert!(matches!(
        fail_single("sfixed64", Value::Int(i64::MIN)),
        EncodeError::OutOfRange { .. }
    ));
    assert!(matches!(
        fail_single("sfixed64", Value::Int(i64::MAX)),
        EncodeError::OutOfRange { .. }
    ));
    ok_single("sfixed64", Value::Int(i64::MIN + 1));
    ok_single("sfixed64", Value::Int(i64::MAX - 1));
}

// ---------------------------------------------------------------------------
// Floating kinds
// ---------------------------------------------------------------------------

#[test]
fn test_float_overflow_renders_inf() {
    let err = fail_single("float", Value::Number(1e39));
    assert_eq!(
        err.to_string(),
        "Input data for \"val\" field is 'inf' and do not fit in \"float\""
    );
}

#[test]
fn test_double_infinity_rejected() {
    let err = fail_single("double", Value::Number(f64::INFINITY));
    assert_eq!(
        err.to_string(),
        "Input data for \"val\" field is 'inf' and do not fit in \"double\""
    );
}

#[test]
fn test_float_rejects_foreign_types() {
    let err = fail_single("float", Value::Str("fuz".to_owned()));
    assert_eq!(
        err.to_string(),
        "Field \"val\" of float type gets string type value. Unsupported or colliding types"
    );
    let err = fail_single("float", Value::Int(1));
    assert_eq!(
        err.to_string(),
        "Field \"val\" of float type gets int64 type value. Unsupported or colliding types"
    );
}

// ---------------------------------------------------------------------------
// Host-type rejections
// ---------------------------------------------------------------------------

#[test]
fn test_bool_rejects_numbers() {
    let err = fail_single("bool", Value::Number(1.0));
    assert_eq!(
        err.to_string(),
        "Field \"val\" of bool type gets number type value. Unsupported or colliding types"
    );
}

#[test]
fn test_string_rejects_numbers_and_bytes() {
    assert!(matches!(
        fail_single("string", Value::Number(1.0)),
        EncodeError::WrongType { .. }
    ));
    assert!(matches!(
        fail_single("string", Value::Bytes(vec![1, 2])),
        EncodeError::WrongType { .. }
    ));
}

#[test]
fn test_bytes_takes_text_and_bytes() {
    ok_single("bytes", Value::Str("fuz".to_owned()));
    ok_single("bytes", Value::Bytes(vec![0xde, 0xad]));
}

#[test]
fn test_integer_kinds_reject_tables() {
    let err = fail_single("int32", Value::Table(Table::new()));
    assert_eq!(
        err.to_string(),
        "Field \"val\" of int32 type gets table type value. Unsupported or colliding types"
    );
}

#[test]
fn test_nested_message_field_rejects_scalars() {
    let outer = message("outer", &[("inner", "node", 1)]).expect("outer");
    let inner = message("node", &[("id", "int32", 1)]).expect("inner");
    let proto = protocol(vec![outer.into(), inner.into()]).expect("protocol");
    let result = proto.encode("outer", &Table::new().set("inner", Value::Number(1.0)));
    match result {
        Err(Error::Encode(EncodeError::WrongType { type_name, got, .. })) => {
            assert_eq!(type_name, "node");
            assert_eq!(got, "number");
        }
        other => panic!("expected type error, got {:?}", other.map(|b| b.len())),
    }
}

// ---------------------------------------------------------------------------
// Enum values
// ---------------------------------------------------------------------------

fn enum_schema() -> Protocol {
    let vals = enumeration("vals", &[("False", 0), ("True", 1)]).expect("enum");
    let msg = message("test", &[("val", "vals", 1)]).expect("message");
    protocol(vec![msg.into(), vals.into()]).expect("protocol")
}

#[test]
fn test_enum_symbolic_member() {
    let hex = enum_schema()
        .encode_hex("test", &Table::new().set("val", "True"))
        .expect("encode");
    assert_eq!(hex, "0801");
}

#[test]
fn test_enum_unknown_member_rejected() {
    let err = enum_schema()
        .encode("test", &Table::new().set("val", "Maybe"))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "encode error: 'Maybe' is not defined in 'vals' enum"
    );
}

#[test]
fn test_enum_unknown_numeric_value_preserved() {
    // Open-enum semantics: 5 has no member but still encodes.
    let hex = enum_schema()
        .encode_hex("test", &Table::new().set("val", Value::Number(5.0)))
        .expect("encode");
    assert_eq!(hex, "0805");
}

#[test]
fn test_enum_numeric_value_checked_as_int32() {
    let err = enum_schema()
        .encode("test", &Table::new().set("val", Value::Number(2147483648.0)))
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Encode(EncodeError::OutOfRange { .. })
    ));
}

#[test]
fn test_enum_rejects_foreign_types() {
    let err = enum_schema()
        .encode("test", &Table::new().set("val", Value::Bool(true)))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "encode error: Field \"val\" of vals type gets boolean type value. Unsupported or colliding types"
    );
}
