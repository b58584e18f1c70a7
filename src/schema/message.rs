//! Message definitions.

use std::collections::HashMap;

use crate::error::SchemaError;

/// Field ids live in `[1, 2^29 - 1]` minus the reserved range.
const FIELD_ID_MAX: u32 = (1 << 29) - 1;
const RESERVED_LO: u32 = 19000;
const RESERVED_HI: u32 = 19999;

/// A single field of a message.
#[derive(Debug, Clone)]
pub struct FieldDef {
    pub name: String,
    /// A scalar kind name, an enum name, or a message name. Resolution
    /// happens at protocol-build time, so forward names are legal here.
    pub type_name: String,
    pub id: u32,
    pub repeated: bool,
}

/// A message definition.
///
/// Invariants (enforced by [`message`]):
/// - field names are unique within the message;
/// - field ids are unique within the message;
/// - field ids fall in the legal, non-reserved range.
#[derive(Debug, Clone)]
pub struct MessageDef {
    pub name: String,
    fields: Vec<FieldDef>,
    index_by_name: HashMap<String, usize>,
    index_by_id: HashMap<u32, usize>,
}

impl MessageDef {
    pub fn field_by_name(&self, name: &str) -> Option<&FieldDef> {
        self.index_by_name.get(name).map(|&i| &self.fields[i])
    }

    pub fn field_by_id(&self, id: u32) -> Option<&FieldDef> {
        self.index_by_id.get(&id).map(|&i| &self.fields[i])
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }
}

/// Constructs a message definition.
///
/// Each entry of `fields` is `(field_name, type_spec, field_id)`, where
/// the type spec optionally carries a leading `repeated ` token (single
/// space) before the type name.
pub fn message(name: &str, fields: &[(&str, &str, u32)]) -> Result<MessageDef, SchemaError> {
    let mut def = MessageDef {
        name: name.to_owned(),
        fields: Vec::with_capacity(fields.len()),
        index_by_name: HashMap::new(),
        index_by_id: HashMap::new(),
    };

    for &(field_name, type_spec, id) in fields {
        let (repeated, type_name) = match type_spec.strip_prefix("repeated ") {
            Some(rest) => (true, rest),
            None => (false, type_spec),
        };

        if id < 1 || id > FIELD_ID_MAX {
            return Err(SchemaError::FieldIdOutOfRange {
                message: name.to_owned(),
                field: field_name.to_owned(),
                id,
            });
        }
        if (RESERVED_LO..=RESERVED_HI).contains(&id) {
            return Err(SchemaError::FieldIdReserved {
                message: name.to_owned(),
                field: field_name.to_owned(),
                id,
            });
        }
        if def.index_by_name.contains_key(field_name) {
            return Err(SchemaError::DuplicateFieldName {
                message: name.to_owned(),
                field: field_name.to_owned(),
            });
        }
        if def.index_by_id.contains_key(&id) {
            return Err(SchemaError::DuplicateFieldId {
                message: name.to_owned(),
                id,
            });
        }

        let idx = def.fields.len();
        def.index_by_name.insert(field_name.to_owned(), idx);
        def.index_by_id.insert(id, idx);
        def.fields.push(FieldDef {
            name: field_name.to_owned(),
            type_name: type_name.to_owned(),
            id,
            repeated,
        });
    }

    Ok(def)
}
