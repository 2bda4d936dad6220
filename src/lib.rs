//! # eventgen — HCI event accessor generator
//!
//! Reads an event table (name, type id, field type codes and field names per event) and
//! emits a C header of `static inline` accessors that decode each field from a raw event
//! packet at the right byte offset.
//!
//! ## Pipeline
//!
//! - **Table**: [`parser::parse`] reads `@format` / `@param` doc blocks from an annotated
//!   header into [`PacketDescription`]s.
//! - **Classification**: [`classify::EventClassifier`] decides per packet whether its group
//!   is recognized, feature-guarded, or a meta group.
//! - **Layout**: [`layout::FieldWalker`] computes each field's offset, constant or symbolic
//!   (depending on an earlier length field).
//! - **Emission**: [`emit::emit_accessor`] renders one accessor per field using the
//!   [`catalog`] entry for its type code.
//! - **Document**: [`generate`] wraps everything in the configured boilerplate.
//!
//! ## Field type codes
//!
//! - `1` `2` `3` `4`: little-endian unsigned integers of that many bytes
//! - `H`: connection handle, `B`: device address (byte-reversed on read)
//! - `J` / `L`: 1- / 2-byte length prefix for a following `V`
//! - `V`: data positioned by the last length prefix
//! - `R`: raw bytes to end of packet, `T`: string to end of packet
//! - `Q`, `X`, `Y`, `Z`: copied/deserialized into caller storage
//! - `D`, `E`, `N`, `P`, `A`, `U`: known widths, emitted as documentation stubs
//! - `S`: variable width, emitted as a stub; offsets after it are unknown
//!
//! ## Example
//!
//! ```
//! use eventgen::{generate, GeneratorConfig, PacketDescription};
//!
//! let events = vec![PacketDescription::new(0xd8, "GAP_EVENT_SECURITY_LEVEL", "H1", ["handle", "security_level"])];
//! let out = generate(&events, &GeneratorConfig::default());
//! assert!(out.text.contains("gap_event_security_level_get_security_level"));
//! assert!(out.text.contains("return event[4];"));
//! ```

pub mod ast;
pub mod catalog;
pub mod classify;
pub mod config;
pub mod diagnostic;
pub mod document;
pub mod emit;
pub mod layout;
pub mod parser;

pub use ast::{EventTable, PacketDescription};
pub use config::{Boilerplate, GeneratorConfig, GroupConfig, ToolPaths};
pub use diagnostic::{Diagnostic, DiagnosticKind, Severity};
pub use document::{generate, Generated};
pub use layout::{layout, AccessorSpec, FieldWalker, OffsetExpr, PacketLayout, WalkState};
pub use parser::{parse, parse_file, TableError};
