use thiserror::Error;

/// Top-level error type for the encoder pipeline.
#[derive(Debug, Error)]
pub enum Error {
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),
}

// ---------------------------------------------------------------------------
// Schema construction errors
// ---------------------------------------------------------------------------

/// Errors raised while building message, enum, or protocol definitions.
///
/// The rendered texts are part of the library contract: callers match on
/// them, so they must stay stable.
#[derive(Debug, Error, PartialEq)]
pub enum SchemaError {
    #[error("Double definition of name \"{name}\"")]
    DuplicateDefinition { name: String },

    #[error("Double definition of field \"{field}\" in \"{message}\" message")]
    DuplicateFieldName { message: String, field: String },

    #[error("Double definition of field id {id} in \"{message}\" message")]
    DuplicateFieldId { message: String, id: u32 },

    #[error("Field \"{field}\" of \"{message}\" message has id {id} outside the allowed range")]
    FieldIdOutOfRange {
        message: String,
        field: String,
        id: u32,
    },

    #[error("Field \"{field}\" of \"{message}\" message has id {id} in the reserved range [19000, 19999]")]
    FieldIdReserved {
        message: String,
        field: String,
        id: u32,
    },

    #[error("Double definition of \"{member}\" in \"{enumeration}\" enum")]
    DuplicateEnumMember {
        enumeration: String,
        member: String,
    },

    #[error("Double definition of id {id} in \"{enumeration}\" enum")]
    DuplicateEnumId { enumeration: String, id: i64 },

    #[error("Id {id} of \"{member}\" in \"{enumeration}\" enum definition do not fit in \"int32\"")]
    EnumIdOutOfRange {
        enumeration: String,
        member: String,
        id: i64,
    },

    #[error("\"{enumeration}\" enum definition does not contain a field with id = 0")]
    EnumMissingZero { enumeration: String },

    #[error("Field \"{field}\" of \"{message}\" message refers to its own message type")]
    SelfRecursion { message: String, field: String },

    #[error("Type \"{name}\" is not defined")]
    UnresolvedType { name: String },
}

// ---------------------------------------------------------------------------
// Encoding errors
// ---------------------------------------------------------------------------

/// Errors raised while encoding a data tree against a built schema.
///
/// Every error is synchronous and aborts the whole encode; no partial
/// output is ever returned.
#[derive(Debug, Error, PartialEq)]
pub enum EncodeError {
    #[error("There is no message or enum named \"{name}\"")]
    UnknownMessage { name: String },

    #[error("Attempt to encode enum \"{name}\" as a top level message")]
    TopLevelEnum { name: String },

    #[error("Wrong field name \"{name}\"")]
    WrongFieldName { name: String },

    #[error("Field \"{field}\" of {type_name} type gets {got} type value. Unsupported or colliding types")]
    WrongType {
        field: String,
        type_name: String,
        got: &'static str,
    },

    #[error("Input number value {value:.6} for \"{field}\" is not integer")]
    NotInteger { field: String, value: f64 },

    /// `kind` arrives pre-rendered: quoted for every scalar except the
    /// historical `uint_64` spelling, which is emitted bare.
    #[error("Input data for \"{field}\" field is {value} and do not fit in {kind}")]
    OutOfRange {
        field: String,
        value: String,
        kind: String,
    },

    #[error("For repeated fields table data are needed")]
    RepeatedNeedsTable,

    #[error("Table for repeated \"{field}\" field contains non-numeric key \"{key}\"")]
    NonNumericKey { field: String, key: String },

    #[error("Table for repeated \"{field}\" field contains non-integer key {key}")]
    NonIntegerKey { field: String, key: f64 },

    #[error("Minimal index of repeated \"{field}\" field table is not 1")]
    MinIndexNotOne { field: String },

    #[error("Indexes of repeated \"{field}\" field table are not consistent")]
    InconsistentKeys { field: String },

    #[error("Too long string to be encoded")]
    TooLong,

    #[error("'{member}' is not defined in '{enumeration}' enum")]
    EnumMemberNotDefined {
        member: String,
        enumeration: String,
    },

    #[error("Field \"_unknown_fields\" gets {got} type value. Table of pre-encoded strings is needed")]
    BadUnknownFields { got: &'static str },
}
