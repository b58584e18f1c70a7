//! protowire: a schema-driven proto3 wire-format encoder.
//!
//! Pipeline:
//!
//! ```text
//! message() / enumeration() → [Definition] → protocol() → Protocol
//!   → Protocol::encode(name, data) → wire-format bytes
//! ```
//!
//! Definitions are built by value, aggregated and cross-checked by
//! `protocol()` (forward references allowed, direct recursion rejected),
//! and the resulting `Protocol` handle is immutable: concurrent encodes
//! against it are safe. Input data arrives as a [`Table`] of [`Value`]s;
//! the encoder validates every scalar against its kind's range before a
//! single byte is emitted, and the first error aborts the encode.
//!
//! ```
//! use protowire::{message, protocol, Table, Value};
//!
//! let test = message("test", &[("val", "int32", 1)]).unwrap();
//! let proto = protocol(vec![test.into()]).unwrap();
//! let bytes = proto
//!     .encode("test", &Table::new().set("val", Value::Number(1540.0)))
//!     .unwrap();
//! assert_eq!(bytes, [0x08, 0x84, 0x0c]);
//! ```

mod encode;

pub mod error;
pub mod scalar;
pub mod schema;
pub mod value;
pub mod wire;

pub use error::{EncodeError, Error, SchemaError};
pub use scalar::ScalarKind;
pub use schema::{enumeration, message, protocol, Definition, EnumDef, FieldDef, MessageDef, Protocol};
pub use value::{Key, Table, Value};
