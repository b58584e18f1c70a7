//! Scalar type registry.
//!
//! One variant per proto3 scalar kind, with match-based dispatch for the
//! three things the encoder needs per kind: whether repeated values pack,
//! how to validate a host value against the kind's range, and how to emit
//! the wire bytes.
//!
//! Validation branches on the host representation:
//! - native numbers must be integral (`ceil(v) == v`) for integer kinds
//!   and are range-checked in `f64` space;
//! - wide signed integers are checked against both bounds;
//! - wide unsigned integers skip the lower bound (the representation
//!   cannot be negative).
//!
//! Range quirks kept for parity with the reference behavior: `uint64`
//! overflow reports the kind as `uint_64`, and `sfixed64` accepts only
//! `[-(2^63-1), 2^63-2]`.

use crate::error::EncodeError;
use crate::value::Value;
use crate::wire::{self, WireType};

/// Soft cap on length-delimited payloads (strings, bytes, nested
/// messages, packed frames).
pub(crate) const LEN_LIMIT: u64 = 1 << 32;

/// A proto3 scalar kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Int32,
    Int64,
    Uint32,
    Uint64,
    Sint32,
    Sint64,
    Bool,
    Fixed32,
    Fixed64,
    Sfixed32,
    Sfixed64,
    Float,
    Double,
    Str,
    Bytes,
}

impl ScalarKind {
    /// Resolves a type-spec name to a scalar kind, if it names one.
    pub fn from_name(name: &str) -> Option<ScalarKind> {
        match name {
            "int32" => Some(ScalarKind::Int32),
            "int64" => Some(ScalarKind::Int64),
            "uint32" => Some(ScalarKind::Uint32),
            "uint64" => Some(ScalarKind::Uint64),
            "sint32" => Some(ScalarKind::Sint32),
            "sint64" => Some(ScalarKind::Sint64),
            "bool" => Some(ScalarKind::Bool),
            "fixed32" => Some(ScalarKind::Fixed32),
            "fixed64" => Some(ScalarKind::Fixed64),
            "sfixed32" => Some(ScalarKind::Sfixed32),
            "sfixed64" => Some(ScalarKind::Sfixed64),
            "float" => Some(ScalarKind::Float),
            "double" => Some(ScalarKind::Double),
            "string" => Some(ScalarKind::Str),
            "bytes" => Some(ScalarKind::Bytes),
            _ => None,
        }
    }

    pub fn proto_name(self) -> &'static str {
        match self {
            ScalarKind::Int32 => "int32",
            ScalarKind::Int64 => "int64",
            ScalarKind::Uint32 => "uint32",
            ScalarKind::Uint64 => "uint64",
            ScalarKind::Sint32 => "sint32",
            ScalarKind::Sint64 => "sint64",
            ScalarKind::Bool => "bool",
            ScalarKind::Fixed32 => "fixed32",
            ScalarKind::Fixed64 => "fixed64",
            ScalarKind::Sfixed32 => "sfixed32",
            ScalarKind::Sfixed64 => "sfixed64",
            ScalarKind::Float => "float",
            ScalarKind::Double => "double",
            ScalarKind::Str => "string",
            ScalarKind::Bytes => "bytes",
        }
    }

    /// Whether repeated values of this kind share a single LEN frame.
    /// Everything packs except `string` and `bytes`.
    pub fn packed(self) -> bool {
        !matches!(self, ScalarKind::Str | ScalarKind::Bytes)
    }

    pub fn wire_type(self) -> WireType {
        match self {
            ScalarKind::Int32
            | ScalarKind::Int64
            | ScalarKind::Uint32
            | ScalarKind::Uint64
            | ScalarKind::Sint32
            | ScalarKind::Sint64
            | ScalarKind::Bool => WireType::Varint,
            ScalarKind::Fixed32 | ScalarKind::Sfixed32 | ScalarKind::Float => WireType::I32,
            ScalarKind::Fixed64 | ScalarKind::Sfixed64 | ScalarKind::Double => WireType::I64,
            ScalarKind::Str | ScalarKind::Bytes => WireType::Len,
        }
    }

    /// The `[min, max]` window on the integer line for integer kinds.
    fn int_window(self) -> Option<(i64, u64)> {
        match self {
            ScalarKind::Int32 | ScalarKind::Sint32 | ScalarKind::Sfixed32 => {
                Some((i32::MIN as i64, i32::MAX as u64))
            }
            ScalarKind::Int64 | ScalarKind::Sint64 => Some((i64::MIN, i64::MAX as u64)),
            ScalarKind::Uint32 | ScalarKind::Fixed32 => Some((0, u32::MAX as u64)),
            ScalarKind::Uint64 | ScalarKind::Fixed64 => Some((0, u64::MAX)),
            // Narrower than the full i64 window; kept for parity.
            ScalarKind::Sfixed64 => Some((i64::MIN + 1, (i64::MAX - 1) as u64)),
            _ => None,
        }
    }

    /// Kind label used in range-error texts. `uint64` keeps its
    /// historical unquoted `uint_64` spelling.
    fn range_label(self) -> String {
        match self {
            ScalarKind::Uint64 => "uint_64".to_owned(),
            other => format!("\"{}\"", other.proto_name()),
        }
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    /// Checks that `value` is an acceptable host representation for this
    /// kind and lies within the kind's range.
    pub fn validate(self, field: &str, value: &Value) -> Result<(), EncodeError> {
        match self {
            ScalarKind::Bool => match value {
                Value::Bool(_) => Ok(()),
                other => Err(self.wrong_type(field, other)),
            },
            ScalarKind::Float => match value {
                Value::Number(v) => {
                    if v.abs() > f32::MAX as f64 {
                        return Err(self.out_of_range(field, format!("'{}'", *v as f32)));
                    }
                    Ok(())
                }
                other => Err(self.wrong_type(field, other)),
            },
            ScalarKind::Double => match value {
                Value::Number(v) => {
                    if v.is_infinite() {
                        return Err(self.out_of_range(field, format!("'{}'", v)));
                    }
                    Ok(())
                }
                other => Err(self.wrong_type(field, other)),
            },
            ScalarKind::Str => match value {
                Value::Str(s) => self.check_len(s.len()),
                other => Err(self.wrong_type(field, other)),
            },
            // Byte fields also take text values; the payload is the raw
            // UTF-8 either way.
            ScalarKind::Bytes => match value {
                Value::Str(s) => self.check_len(s.len()),
                Value::Bytes(b) => self.check_len(b.len()),
                other => Err(self.wrong_type(field, other)),
            },
            _ => self.validate_integer(field, value),
        }
    }

    fn validate_integer(self, field: &str, value: &Value) -> Result<(), EncodeError> {
        let (min, max) = self
            .int_window()
            .expect("validate_integer called on a non-integer kind");
        match value {
            Value::Number(v) => {
                if v.ceil() != *v {
                    return Err(EncodeError::NotInteger {
                        field: field.to_owned(),
                        value: *v,
                    });
                }
                if *v < min as f64 || *v > max as f64 {
                    return Err(self.out_of_range(field, value.to_string()));
                }
                Ok(())
            }
            Value::Int(i) => {
                if *i < min || (*i >= 0 && *i as u64 > max) {
                    return Err(self.out_of_range(field, value.to_string()));
                }
                Ok(())
            }
            // The representation cannot be negative, so only the upper
            // bound is checked.
            Value::Uint(u) => {
                if *u > max {
                    return Err(self.out_of_range(field, value.to_string()));
                }
                Ok(())
            }
            other => Err(self.wrong_type(field, other)),
        }
    }

    fn check_len(self, len: usize) -> Result<(), EncodeError> {
        if len as u64 > LEN_LIMIT {
            return Err(EncodeError::TooLong);
        }
        Ok(())
    }

    fn wrong_type(self, field: &str, value: &Value) -> EncodeError {
        EncodeError::WrongType {
            field: field.to_owned(),
            type_name: self.proto_name().to_owned(),
            got: value.type_name(),
        }
    }

    fn out_of_range(self, field: &str, value: String) -> EncodeError {
        EncodeError::OutOfRange {
            field: field.to_owned(),
            value,
            kind: self.range_label(),
        }
    }

    // -----------------------------------------------------------------------
    // Encoding
    // -----------------------------------------------------------------------

    /// Appends the value-only wire bytes for a validated value.
    ///
    /// For `string`/`bytes` this includes the varint length prefix but no
    /// tag. Packed repeated emission concatenates these forms directly.
    pub fn put_value(self, out: &mut Vec<u8>, value: &Value) {
        match self {
            ScalarKind::Int32 | ScalarKind::Int64 | ScalarKind::Uint32 | ScalarKind::Uint64 => {
                wire::put_varint(out, as_u64_twos(value));
            }
            ScalarKind::Sint32 | ScalarKind::Sint64 => {
                wire::put_varint(out, wire::zigzag64(as_i64(value)));
            }
            ScalarKind::Bool => {
                let b = match value {
                    Value::Bool(b) => *b,
                    _ => unreachable!("validated before encoding"),
                };
                wire::put_varint(out, b as u64);
            }
            ScalarKind::Fixed32 | ScalarKind::Sfixed32 => {
                wire::put_fixed32(out, as_u64_twos(value) as u32);
            }
            ScalarKind::Fixed64 | ScalarKind::Sfixed64 => {
                wire::put_fixed64(out, as_u64_twos(value));
            }
            ScalarKind::Float => {
                let v = match value {
                    Value::Number(v) => *v,
                    _ => unreachable!("validated before encoding"),
                };
                wire::put_fixed32(out, (v as f32).to_bits());
            }
            ScalarKind::Double => {
                let v = match value {
                    Value::Number(v) => *v,
                    _ => unreachable!("validated before encoding"),
                };
                wire::put_fixed64(out, v.to_bits());
            }
            ScalarKind::Str | ScalarKind::Bytes => {
                let payload: &[u8] = match value {
                    Value::Str(s) => s.as_bytes(),
                    Value::Bytes(b) => b.as_slice(),
                    _ => unreachable!("validated before encoding"),
                };
                wire::put_varint(out, payload.len() as u64);
                out.extend_from_slice(payload);
            }
        }
    }

    /// Appends the tagged wire bytes for a validated value.
    pub fn put_field(self, out: &mut Vec<u8>, field_id: u32, value: &Value) {
        wire::put_tag(out, field_id, self.wire_type());
        self.put_value(out, value);
    }
}

impl std::fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.proto_name())
    }
}

/// Reinterprets a validated integer value as its two's-complement 64-bit
/// form. Negative inputs sign-extend to the full ten-byte varint.
fn as_u64_twos(value: &Value) -> u64 {
    match value {
        Value::Number(v) if *v < 0.0 => (*v as i64) as u64,
        Value::Number(v) => *v as u64,
        Value::Int(i) => *i as u64,
        Value::Uint(u) => *u,
        _ => unreachable!("validated before encoding"),
    }
}

fn as_i64(value: &Value) -> i64 {
    match value {
        Value::Number(v) => *v as i64,
        Value::Int(i) => *i,
        Value::Uint(u) => *u as i64,
        _ => unreachable!("validated before encoding"),
    }
}
