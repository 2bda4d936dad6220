//! Non-fatal findings raised while generating accessors.
//!
//! Nothing here stops a run: an unrecognized group skips one packet, a missing length
//! reference truncates one packet, an arity mismatch is reported and processing continues.

use std::fmt;

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Packet or fields were dropped from the output.
    Warning,
    /// Output is complete; the table entry looks suspicious.
    Note,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// Packet group is not one of the recognized groups; the packet is skipped.
    UnrecognizedGroup { group: String },
    /// Format string and field name list differ in length; the shorter one is used.
    FormatArityMismatch { format: String, field_names: Vec<String> },
    /// Length-referenced field without a preceding length prefix; the remainder is dropped.
    MissingLengthReference { field: String },
    /// Length-referenced field whose successor offset nests too many length reads; the
    /// remainder is dropped.
    LengthNestingTooDeep { field: String },
}

/// A single diagnostic for one packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub packet: String,
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    pub fn new(packet: &str, kind: DiagnosticKind) -> Self {
        Diagnostic { packet: packet.to_string(), kind }
    }

    pub fn severity(&self) -> Severity {
        match self.kind {
            DiagnosticKind::UnrecognizedGroup { .. }
            | DiagnosticKind::MissingLengthReference { .. }
            | DiagnosticKind::LengthNestingTooDeep { .. } => Severity::Warning,
            DiagnosticKind::FormatArityMismatch { .. } => Severity::Note,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DiagnosticKind::UnrecognizedGroup { group } => {
                write!(f, "{}: group {} not supported, skipped", self.packet, group)
            }
            DiagnosticKind::FormatArityMismatch { format, field_names } => write!(
                f,
                "{}: format {} does not match params [{}]",
                self.packet.to_uppercase(),
                format,
                field_names.join(", ")
            ),
            DiagnosticKind::MissingLengthReference { field } => write!(
                f,
                "{}: variable length field {} without preceding length field",
                self.packet.to_uppercase(),
                field
            ),
            DiagnosticKind::LengthNestingTooDeep { field } => write!(
                f,
                "{}: too many nested length fields after {}, remaining fields skipped",
                self.packet.to_uppercase(),
                field
            ),
        }
    }
}
