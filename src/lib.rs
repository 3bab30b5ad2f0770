//! argbind - Declarative binding of command-line arguments to typed
//! configuration fields.
//!
//! This library maps argument tokens onto the fields of a caller-owned
//! configuration struct. The caller registers each bindable field in a
//! [`Registry`] (key, slot type, description, visibility, accessor
//! pair); a [`Parser`] then walks the token sequence, coercing and
//! applying `--key value` pairs and `+key`/`-key` boolean tags, and
//! help text describing the registry can be rendered for the user.

pub mod coerce;
pub mod help;
pub mod parser;
pub mod registry;

pub use coerce::{coerce, CoerceError, SlotType, Value};
pub use help::{render_help, HelpEntry, HelpSource};
pub use parser::{FailurePolicy, ParseError, ParseOptions, ParseSummary, Parser};
pub use registry::{Binding, Registry};
