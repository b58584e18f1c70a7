//! Recursive message encoder.
//!
//! Depth-first traversal of the input data tree, keyed by field-type
//! lookup in the schema. Each field dispatches to the scalar path, the
//! enum path, the nested-message path (recursive), or the repeated path
//! (packed or unpacked). Stateless apart from the recursion stack; the
//! first error aborts the whole encode.

use crate::error::EncodeError;
use crate::scalar::{ScalarKind, LEN_LIMIT};
use crate::schema::enumeration::EnumDef;
use crate::schema::message::{FieldDef, MessageDef};
use crate::schema::protocol::{Definition, Protocol};
use crate::value::{Key, Table, Value};
use crate::wire;

/// Pre-encoded chunks under this key are copied to the output verbatim,
/// so fields a newer schema introduced survive a re-encode.
const UNKNOWN_FIELDS_KEY: &str = "_unknown_fields";

/// Encodes `data` as the top-level message `name`.
pub(crate) fn encode_top(
    proto: &Protocol,
    name: &str,
    data: &Table,
) -> Result<Vec<u8>, EncodeError> {
    match proto.get(name) {
        None => Err(EncodeError::UnknownMessage {
            name: name.to_owned(),
        }),
        Some(Definition::Enum(_)) => Err(EncodeError::TopLevelEnum {
            name: name.to_owned(),
        }),
        Some(Definition::Message(msg)) => encode_message(proto, msg, data),
    }
}

/// Emits the body of one message: the concatenation of per-field
/// fragments in the order the input table iterates.
fn encode_message(
    proto: &Protocol,
    msg: &MessageDef,
    data: &Table,
) -> Result<Vec<u8>, EncodeError> {
    let mut out = Vec::new();

    for (key, value) in data.entries() {
        match key {
            Key::Str(k) if k == UNKNOWN_FIELDS_KEY => put_unknown_fields(&mut out, value)?,
            Key::Str(k) => {
                let field = msg
                    .field_by_name(k)
                    .ok_or_else(|| EncodeError::WrongFieldName { name: k.clone() })?;
                encode_field(proto, field, value, &mut out, false)?;
            }
            Key::Number(n) => {
                return Err(EncodeError::WrongFieldName {
                    name: n.to_string(),
                })
            }
        }
    }

    Ok(out)
}

/// Concatenates a table of pre-encoded byte chunks into the output
/// without interpretation.
fn put_unknown_fields(out: &mut Vec<u8>, value: &Value) -> Result<(), EncodeError> {
    let table = match value {
        Value::Table(t) => t,
        other => {
            return Err(EncodeError::BadUnknownFields {
                got: other.type_name(),
            })
        }
    };
    for (_, chunk) in table.entries() {
        match chunk {
            Value::Bytes(b) => out.extend_from_slice(b),
            Value::Str(s) => out.extend_from_slice(s.as_bytes()),
            other => {
                return Err(EncodeError::BadUnknownFields {
                    got: other.type_name(),
                })
            }
        }
    }
    Ok(())
}

/// Per-field dispatch.
///
/// `in_repeated` is true while expanding the elements of a repeated
/// field, so a repeated field's elements take the singular paths below.
fn encode_field(
    proto: &Protocol,
    field: &FieldDef,
    value: &Value,
    out: &mut Vec<u8>,
    in_repeated: bool,
) -> Result<(), EncodeError> {
    if field.repeated && !in_repeated {
        return encode_repeated(proto, field, value, out);
    }

    if let Some(kind) = ScalarKind::from_name(&field.type_name) {
        kind.validate(&field.name, value)?;
        kind.put_field(out, field.id, value);
        return Ok(());
    }

    match proto.get(&field.type_name) {
        Some(Definition::Enum(enm)) => encode_enum_value(field, enm, value, out),
        Some(Definition::Message(inner)) => {
            let table = match value {
                Value::Table(t) => t,
                other => {
                    return Err(EncodeError::WrongType {
                        field: field.name.clone(),
                        type_name: field.type_name.clone(),
                        got: other.type_name(),
                    })
                }
            };
            let body = encode_message(proto, inner, table)?;
            if body.len() as u64 > LEN_LIMIT {
                return Err(EncodeError::TooLong);
            }
            wire::put_len_field(out, field.id, &body);
            Ok(())
        }
        // protocol() resolved every field type at schema-build time.
        None => unreachable!("unresolved field type survived schema build"),
    }
}

// ---------------------------------------------------------------------------
// Enum path
// ---------------------------------------------------------------------------

/// Open-enum semantics: numeric values are range-checked as `int32` and
/// preserved even when no member maps to them; symbolic names must be
/// declared members.
fn encode_enum_value(
    field: &FieldDef,
    enm: &EnumDef,
    value: &Value,
    out: &mut Vec<u8>,
) -> Result<(), EncodeError> {
    match value {
        Value::Number(_) | Value::Int(_) | Value::Uint(_) => {
            ScalarKind::Int32.validate(&field.name, value)?;
            ScalarKind::Int32.put_field(out, field.id, value);
            Ok(())
        }
        Value::Str(member) => match enm.id_of(member) {
            Some(id) => {
                // Negative ids sign-extend to the ten-byte varint form.
                wire::put_varint_field(out, field.id, id as i64 as u64);
                Ok(())
            }
            None => Err(EncodeError::EnumMemberNotDefined {
                member: member.clone(),
                enumeration: enm.name.clone(),
            }),
        },
        other => Err(EncodeError::WrongType {
            field: field.name.clone(),
            type_name: enm.name.clone(),
            got: other.type_name(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Repeated path
// ---------------------------------------------------------------------------

/// Encodes a repeated field.
///
/// The input must form a dense 1-based array: every key numeric and
/// integral, minimum index 1, maximum index equal to the element count.
/// Packed-eligible element kinds share a single LEN frame of value-only
/// encodings; everything else repeats the tag per element.
fn encode_repeated(
    proto: &Protocol,
    field: &FieldDef,
    value: &Value,
    out: &mut Vec<u8>,
) -> Result<(), EncodeError> {
    let table = match value {
        Value::Table(t) => t,
        _ => return Err(EncodeError::RepeatedNeedsTable),
    };

    let elements = check_array_shape(field, table)?;
    if elements.is_empty() {
        return Ok(());
    }

    match ScalarKind::from_name(&field.type_name) {
        Some(kind) if kind.packed() => {
            let mut payload = Vec::new();
            for &element in &elements {
                kind.validate(&field.name, element)?;
                kind.put_value(&mut payload, element);
            }
            if payload.len() as u64 > LEN_LIMIT {
                return Err(EncodeError::TooLong);
            }
            wire::put_len_field(out, field.id, &payload);
        }
        // string/bytes elements, enums, and nested messages all repeat
        // the tag per element.
        _ => {
            for &element in &elements {
                encode_field(proto, field, element, out, true)?;
            }
        }
    }

    Ok(())
}

/// Validates the dense 1-based array shape and returns the element
/// values in index order. The first offending key is reported.
fn check_array_shape<'a>(
    field: &FieldDef,
    table: &'a Table,
) -> Result<Vec<&'a Value>, EncodeError> {
    let mut indexed: Vec<(f64, &Value)> = Vec::with_capacity(table.len());
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;

    for (key, value) in table.entries() {
        let idx = match key {
            Key::Number(n) => *n,
            Key::Str(s) => {
                return Err(EncodeError::NonNumericKey {
                    field: field.name.clone(),
                    key: s.clone(),
                })
            }
        };
        if idx.ceil() != idx {
            return Err(EncodeError::NonIntegerKey {
                field: field.name.clone(),
                key: idx,
            });
        }
        min = min.min(idx);
        max = max.max(idx);
        indexed.push((idx, value));
    }

    if indexed.is_empty() {
        return Ok(Vec::new());
    }
    if min != 1.0 {
        return Err(EncodeError::MinIndexNotOne {
            field: field.name.clone(),
        });
    }
    if max != indexed.len() as f64 {
        return Err(EncodeError::InconsistentKeys {
            field: field.name.clone(),
        });
    }

    // Min and max alone cannot see a hole paired with a duplicate
    // (e.g. keys 1, 3, 3), so verify the sorted keys are exactly 1..n.
    indexed.sort_by(|a, b| a.0.total_cmp(&b.0));
    for (i, (idx, _)) in indexed.iter().enumerate() {
        if *idx != (i + 1) as f64 {
            return Err(EncodeError::InconsistentKeys {
                field: field.name.clone(),
            });
        }
    }

    Ok(indexed.into_iter().map(|(_, v)| v).collect())
}
