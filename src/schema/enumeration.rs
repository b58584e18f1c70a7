//! Enum definitions.
//!
//! Named `enumeration` because `enum` is a Rust keyword; the constructed
//! record is the schema-model enum of the wire format.

use std::collections::HashMap;

use crate::error::SchemaError;

/// An enum definition: a bidirectional member-name / integer-id mapping.
///
/// Invariants (enforced by [`enumeration`]):
/// - member names and integer ids are unique;
/// - every id fits `int32`;
/// - a 0-valued member exists (the proto3 default).
#[derive(Debug, Clone)]
pub struct EnumDef {
    pub name: String,
    id_by_value: HashMap<String, i32>,
    value_by_id: HashMap<i32, String>,
}

impl EnumDef {
    /// Looks up the integer id of a symbolic member name.
    pub fn id_of(&self, member: &str) -> Option<i32> {
        self.id_by_value.get(member).copied()
    }

    /// Looks up the symbolic member name of an integer id.
    pub fn name_of(&self, id: i32) -> Option<&str> {
        self.value_by_id.get(&id).map(String::as_str)
    }
}

/// Constructs an enum definition from `(member_name, id)` entries.
pub fn enumeration(name: &str, members: &[(&str, i64)]) -> Result<EnumDef, SchemaError> {
    let mut def = EnumDef {
        name: name.to_owned(),
        id_by_value: HashMap::new(),
        value_by_id: HashMap::new(),
    };

    for &(member, id) in members {
        if id < i32::MIN as i64 || id > i32::MAX as i64 {
            return Err(SchemaError::EnumIdOutOfRange {
                enumeration: name.to_owned(),
                member: member.to_owned(),
                id,
            });
        }
        let id = id as i32;
        if def.id_by_value.contains_key(member) {
            return Err(SchemaError::DuplicateEnumMember {
                enumeration: name.to_owned(),
                member: member.to_owned(),
            });
        }
        if def.value_by_id.contains_key(&id) {
            return Err(SchemaError::DuplicateEnumId {
                enumeration: name.to_owned(),
                id: id as i64,
            });
        }
        def.id_by_value.insert(member.to_owned(), id);
        def.value_by_id.insert(id, member.to_owned());
    }

    if !def.value_by_id.contains_key(&0) {
        return Err(SchemaError::EnumMissingZero {
            enumeration: name.to_owned(),
        });
    }

    Ok(def)
}
