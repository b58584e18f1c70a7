//! Schema model: definition constructors and the validated protocol handle.

pub mod enumeration;
pub mod message;
pub mod protocol;

pub use enumeration::{enumeration, EnumDef};
pub use message::{message, FieldDef, MessageDef};
pub use protocol::{protocol, Definition, Protocol};
