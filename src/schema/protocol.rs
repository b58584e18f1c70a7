//! Protocol aggregation and cross-reference resolution.
//!
//! `protocol()` runs a two-phase build:
//! 1. a single registration pass over the definition list, rejecting
//!    duplicate names and direct self-recursion, classifying every field
//!    type as scalar / already-seen / forward, and collecting forwards in
//!    encounter order;
//! 2. a resolution pass checking that every forward name was eventually
//!    defined, reporting the first that was not.
//!
//! Definition order in the input list is irrelevant apart from which
//! unresolved name gets reported first.

use std::collections::HashMap;

use crate::encode;
use crate::error::{Error, SchemaError};
use crate::scalar::ScalarKind;
use crate::schema::enumeration::EnumDef;
use crate::schema::message::MessageDef;
use crate::value::Table;

/// A schema definition: either a message or an enum.
#[derive(Debug, Clone)]
pub enum Definition {
    Message(MessageDef),
    Enum(EnumDef),
}

impl Definition {
    pub fn name(&self) -> &str {
        match self {
            Definition::Message(m) => &m.name,
            Definition::Enum(e) => &e.name,
        }
    }
}

impl From<MessageDef> for Definition {
    fn from(def: MessageDef) -> Self {
        Definition::Message(def)
    }
}

impl From<EnumDef> for Definition {
    fn from(def: EnumDef) -> Self {
        Definition::Enum(def)
    }
}

/// A validated, immutable schema.
///
/// Built once by [`protocol`], then shared freely: encoding borrows the
/// schema and never mutates it.
#[derive(Debug)]
pub struct Protocol {
    defs: HashMap<String, Definition>,
}

impl Protocol {
    pub fn get(&self, name: &str) -> Option<&Definition> {
        self.defs.get(name)
    }

    /// Encodes `data` as the named top-level message.
    ///
    /// The output is the bare concatenation of field encodings: no outer
    /// tag, no outer length prefix.
    pub fn encode(&self, message_name: &str, data: &Table) -> Result<Vec<u8>, Error> {
        Ok(encode::encode_top(self, message_name, data)?)
    }

    /// Like [`Protocol::encode`], rendered as a lowercase hex string.
    pub fn encode_hex(&self, message_name: &str, data: &Table) -> Result<String, Error> {
        let bytes = self.encode(message_name, data)?;
        Ok(bytes.iter().map(|b| format!("{:02x}", b)).collect())
    }
}

/// Builds a validated [`Protocol`] from a definition list.
pub fn protocol(defs: Vec<Definition>) -> Result<Protocol, SchemaError> {
    let mut map: HashMap<String, Definition> = HashMap::new();
    let mut pending: Vec<String> = Vec::new();

    for def in defs {
        let name = def.name().to_owned();
        if map.contains_key(&name) {
            return Err(SchemaError::DuplicateDefinition { name });
        }

        if let Definition::Message(msg) = &def {
            for field in msg.fields() {
                if ScalarKind::from_name(&field.type_name).is_some() {
                    continue;
                }
                if field.type_name == msg.name {
                    return Err(SchemaError::SelfRecursion {
                        message: msg.name.clone(),
                        field: field.name.clone(),
                    });
                }
                if !map.contains_key(&field.type_name) {
                    pending.push(field.type_name.clone());
                }
            }
        }

        map.insert(name, def);
    }

    for type_name in &pending {
        if !map.contains_key(type_name) {
            return Err(SchemaError::UnresolvedType {
                name: type_name.clone(),
            });
        }
    }

    Ok(Protocol { defs: map })
}
