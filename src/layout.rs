//! Offset computation for one packet's fields.
//!
//! Every packet starts with two header bytes (event type and parameter length), so the
//! first field sits at offset 2. Fixed-width fields advance the offset by their width.
//! A length-referenced field (`V`) moves the offset by a run-time amount: the value stored
//! in the most recent length-prefix field (`J`, `L`). From then on offsets are
//! [`OffsetExpr::Symbolic`] and later fixed widths accumulate in its literal increment.
//!
//! ## States
//!
//! | State | Entered on | Effect |
//! |-------|------------|--------|
//! | [`WalkState::Normal`] | start | fields produce [`AccessorSpec`]s |
//! | [`WalkState::Done`] | `R` / `T` field | field gets its accessor, rest of packet ignored |
//! | [`WalkState::OffsetUnknown`] | `V` without a length prefix | field and rest dropped, one diagnostic |
//! | [`WalkState::OffsetUnknown`] | `V` nesting past [`MAX_LENGTH_NESTING`] | field kept, rest dropped, one diagnostic |
//!
//! `Done` and `OffsetUnknown` are absorbing. State lives in one [`FieldWalker`] and is
//! dropped with it; nothing is shared between packets.

use crate::ast::PacketDescription;
use crate::catalog::{self, FieldKind, TypeEntry};
use crate::diagnostic::{Diagnostic, DiagnosticKind};

/// Offset of the first parameter byte (after event type and length).
pub const HEADER_LEN: usize = 2;

/// Deepest chain of length-referenced fields an offset may depend on. Each level doubles
/// the rendered expression, since both the base and the length position carry the chain.
pub const MAX_LENGTH_NESTING: usize = 8;

/// Field name that is served by the synthesized meta-event accessor instead.
pub const SUBEVENT_CODE: &str = "subevent_code";

/// Byte offset of a field inside the packet buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OffsetExpr {
    Constant(usize),
    /// `base + <value of length field> + increment`.
    Symbolic {
        base: Box<OffsetExpr>,
        length: LengthRef,
        increment: usize,
    },
}

/// Position and width of the length-prefix field a symbolic offset depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LengthRef {
    pub offset: Box<OffsetExpr>,
    /// Width in bytes of the length value (1 for `J`, 2 for `L`).
    pub width: usize,
}

impl OffsetExpr {
    pub fn as_constant(&self) -> Option<usize> {
        match self {
            OffsetExpr::Constant(n) => Some(*n),
            OffsetExpr::Symbolic { .. } => None,
        }
    }

    pub fn is_symbolic(&self) -> bool {
        matches!(self, OffsetExpr::Symbolic { .. })
    }

    /// Number of nested length reads needed to evaluate this offset.
    pub fn depth(&self) -> usize {
        match self {
            OffsetExpr::Constant(_) => 0,
            OffsetExpr::Symbolic { base, length, .. } => 1 + base.depth().max(length.offset.depth()),
        }
    }

    /// Move past `n` fixed bytes. Symbolic offsets keep their base and grow the increment.
    pub fn advance(&mut self, n: usize) {
        match self {
            OffsetExpr::Constant(c) => *c += n,
            OffsetExpr::Symbolic { increment, .. } => *increment += n,
        }
    }

    /// Offset just past a field whose length is held in `length`.
    pub fn after_length(self, length: LengthRef) -> OffsetExpr {
        OffsetExpr::Symbolic {
            base: Box::new(self),
            length,
            increment: 0,
        }
    }
}

/// One accessor to emit: field identity plus where to read it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessorSpec {
    /// Accessor prefix, see [`PacketDescription::base_name`].
    pub packet_name: String,
    pub field_name: String,
    pub field_type: char,
    pub offset: OffsetExpr,
    /// False when the type has no decode template or the offset could not be determined.
    pub is_supported: bool,
}

impl AccessorSpec {
    pub fn fn_name(&self) -> String {
        format!("{}_get_{}", self.packet_name, self.field_name)
    }

    pub fn entry(&self) -> Option<&'static TypeEntry> {
        catalog::lookup(self.field_type)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkState {
    Normal,
    Done,
    OffsetUnknown,
}

/// Walks one packet's fields and yields an [`AccessorSpec`] per emitted field.
///
/// Diagnostics raised along the way stay on the walker; read them with
/// [`FieldWalker::diagnostics`] once iteration has finished.
pub struct FieldWalker<'a> {
    packet: &'a PacketDescription,
    packet_name: String,
    pos: usize,
    offset: OffsetExpr,
    length_ref: Option<LengthRef>,
    /// Cleared after a field of unknown width; later offsets cannot be trusted.
    offset_known: bool,
    state: WalkState,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> FieldWalker<'a> {
    pub fn new(packet: &'a PacketDescription) -> Self {
        let mut diagnostics = Vec::new();
        if !packet.arity_matches() {
            diagnostics.push(Diagnostic::new(
                &packet.name,
                DiagnosticKind::FormatArityMismatch {
                    format: packet.format_str(),
                    field_names: packet.field_names.clone(),
                },
            ));
        }
        FieldWalker {
            packet,
            packet_name: packet.base_name(),
            pos: 0,
            offset: OffsetExpr::Constant(HEADER_LEN),
            length_ref: None,
            offset_known: true,
            state: WalkState::Normal,
            diagnostics,
        }
    }

    pub fn state(&self) -> WalkState {
        self.state
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    fn step(&mut self, code: char, name: &str) -> Option<AccessorSpec> {
        let entry = catalog::lookup(code);
        let kind = entry.map_or(FieldKind::Fixed, |e| e.kind);

        if kind == FieldKind::LengthReferenced && self.length_ref.is_none() {
            self.state = WalkState::OffsetUnknown;
            self.diagnostics.push(Diagnostic::new(
                &self.packet.name,
                DiagnosticKind::MissingLengthReference { field: name.to_string() },
            ));
            return None;
        }

        let offset = self.offset.clone();
        let spec = AccessorSpec {
            packet_name: self.packet_name.clone(),
            field_name: name.to_string(),
            field_type: code,
            offset: offset.clone(),
            is_supported: self.offset_known && entry.is_some_and(TypeEntry::is_supported),
        };

        let width = entry.and_then(TypeEntry::fixed_size);
        match kind {
            FieldKind::RestOfPacket | FieldKind::String => self.state = WalkState::Done,
            FieldKind::LengthReferenced => {
                if let Some(length) = self.length_ref.clone() {
                    let next = offset.after_length(length);
                    if next.depth() > MAX_LENGTH_NESTING {
                        self.state = WalkState::OffsetUnknown;
                        self.diagnostics.push(Diagnostic::new(
                            &self.packet.name,
                            DiagnosticKind::LengthNestingTooDeep { field: name.to_string() },
                        ));
                    } else {
                        self.offset = next;
                    }
                }
            }
            FieldKind::LengthPrefix => {
                self.length_ref = Some(LengthRef {
                    offset: Box::new(offset),
                    width: width.unwrap_or(1),
                });
                self.offset.advance(width.unwrap_or(1));
            }
            FieldKind::Fixed => match width {
                Some(n) => self.offset.advance(n),
                None => self.offset_known = false,
            },
        }
        Some(spec)
    }
}

impl Iterator for FieldWalker<'_> {
    type Item = AccessorSpec;

    fn next(&mut self) -> Option<AccessorSpec> {
        while self.state == WalkState::Normal {
            let packet = self.packet;
            let (code, name) = match (packet.format.get(self.pos), packet.field_names.get(self.pos)) {
                (Some(&code), Some(name)) => (code, name.as_str()),
                _ => return None,
            };
            self.pos += 1;
            if name.eq_ignore_ascii_case(SUBEVENT_CODE) {
                self.offset.advance(1);
                continue;
            }
            return self.step(code, name);
        }
        None
    }
}

/// All accessors and diagnostics of one packet, collected.
#[derive(Debug, Clone)]
pub struct PacketLayout {
    pub accessors: Vec<AccessorSpec>,
    pub diagnostics: Vec<Diagnostic>,
    pub state: WalkState,
}

pub fn layout(packet: &PacketDescription) -> PacketLayout {
    let mut walker = FieldWalker::new(packet);
    let accessors: Vec<_> = walker.by_ref().collect();
    let state = walker.state();
    PacketLayout {
        accessors,
        diagnostics: walker.into_diagnostics(),
        state,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offsets(p: &PacketDescription) -> Vec<Option<usize>> {
        layout(p).accessors.iter().map(|a| a.offset.as_constant()).collect()
    }

    #[test]
    fn fixed_fields_accumulate_from_header() {
        let p = PacketDescription::new(3, "HCI_EVENT_CONNECTION_COMPLETE", "1HB11", [
            "status",
            "connection_handle",
            "bd_addr",
            "link_type",
            "encryption_enabled",
        ]);
        assert_eq!(offsets(&p), vec![Some(2), Some(3), Some(5), Some(11), Some(12)]);
    }

    #[test]
    fn subevent_code_skips_one_byte() {
        let p = PacketDescription::new(0x3e, "HCI_SUBEVENT_LE_CONNECTION_COMPLETE", "11H", [
            "subevent_code",
            "status",
            "connection_handle",
        ]);
        let l = layout(&p);
        let names: Vec<_> = l.accessors.iter().map(|a| a.field_name.as_str()).collect();
        assert_eq!(names, vec!["status", "connection_handle"]);
        assert_eq!(offsets(&p), vec![Some(3), Some(4)]);
    }

    #[test]
    fn subevent_code_is_case_insensitive() {
        let p = PacketDescription::new(1, "LE_X", "11", ["Subevent_Code", "status"]);
        assert_eq!(offsets(&p), vec![Some(3)]);
    }

    #[test]
    fn length_referenced_field_makes_offsets_symbolic() {
        let p = PacketDescription::new(1, "GATT_EVENT_NOTIFICATION", "HJV2", ["handle", "value_length", "value", "tail"]);
        let l = layout(&p);
        assert_eq!(l.state, WalkState::Normal);
        assert_eq!(l.accessors.len(), 4);
        assert_eq!(l.accessors[2].offset, OffsetExpr::Constant(5));
        assert_eq!(
            l.accessors[3].offset,
            OffsetExpr::Symbolic {
                base: Box::new(OffsetExpr::Constant(5)),
                length: LengthRef { offset: Box::new(OffsetExpr::Constant(4)), width: 1 },
                increment: 0,
            }
        );
    }

    #[test]
    fn fixed_after_symbolic_grows_increment() {
        let p = PacketDescription::new(1, "GATT_EVENT_X", "JV21", ["len", "data", "a", "b"]);
        let l = layout(&p);
        match &l.accessors[3].offset {
            OffsetExpr::Symbolic { increment, .. } => assert_eq!(*increment, 2),
            other => panic!("expected symbolic offset, got {:?}", other),
        }
    }

    #[test]
    fn latest_length_prefix_wins() {
        let p = PacketDescription::new(1, "HCI_EVENT_X", "J1JV1", ["l1", "x", "l2", "data", "after"]);
        let l = layout(&p);
        match &l.accessors[4].offset {
            OffsetExpr::Symbolic { length, .. } => assert_eq!(*length.offset, OffsetExpr::Constant(4)),
            other => panic!("expected symbolic offset, got {:?}", other),
        }
    }

    #[test]
    fn nested_length_fields_stop_at_limit() {
        let pairs = MAX_LENGTH_NESTING + 4;
        let format = "JV".repeat(pairs);
        let names: Vec<String> = (0..pairs).flat_map(|i| [format!("len_{i}"), format!("data_{i}")]).collect();
        let p = PacketDescription::new(1, "GATT_EVENT_NESTED", &format, names);
        let l = layout(&p);
        assert_eq!(l.state, WalkState::OffsetUnknown);
        assert_eq!(l.accessors.len(), 2 * (MAX_LENGTH_NESTING + 1));
        assert!(l.accessors.iter().all(|a| a.offset.depth() <= MAX_LENGTH_NESTING));
        let last = l.accessors.last().map(|a| a.field_name.as_str());
        assert_eq!(last, Some(format!("data_{}", MAX_LENGTH_NESTING).as_str()));
        assert_eq!(
            l.diagnostics,
            vec![Diagnostic::new(
                "GATT_EVENT_NESTED",
                DiagnosticKind::LengthNestingTooDeep { field: format!("data_{}", MAX_LENGTH_NESTING) }
            )]
        );
    }

    #[test]
    fn nesting_at_limit_is_accepted() {
        let format = "JV".repeat(MAX_LENGTH_NESTING);
        let names: Vec<String> = (0..format.len()).map(|i| format!("f{i}")).collect();
        let p = PacketDescription::new(1, "GATT_EVENT_NESTED", &format, names);
        let l = layout(&p);
        assert_eq!(l.state, WalkState::Normal);
        assert_eq!(l.accessors.len(), 2 * MAX_LENGTH_NESTING);
        assert!(l.diagnostics.is_empty());
    }

    #[test]
    fn rest_of_packet_terminates() {
        let p = PacketDescription::new(1, "HCI_EVENT_X", "H2R1", ["handle", "len", "data", "extra"]);
        let l = layout(&p);
        let names: Vec<_> = l.accessors.iter().map(|a| a.field_name.as_str()).collect();
        assert_eq!(names, vec!["handle", "len", "data"]);
        assert_eq!(l.state, WalkState::Done);
        assert!(l.diagnostics.is_empty());
    }

    #[test]
    fn string_terminates() {
        let p = PacketDescription::new(1, "HCI_EVENT_X", "1T1", ["status", "name", "never"]);
        let l = layout(&p);
        assert_eq!(l.accessors.len(), 2);
        assert_eq!(l.state, WalkState::Done);
    }

    #[test]
    fn length_referenced_without_prefix_is_offset_unknown() {
        let p = PacketDescription::new(1, "HCI_EVENT_X", "V12", ["data", "a", "b"]);
        let l = layout(&p);
        assert!(l.accessors.is_empty());
        assert_eq!(l.state, WalkState::OffsetUnknown);
        assert_eq!(l.diagnostics.len(), 1);
        assert!(matches!(l.diagnostics[0].kind, DiagnosticKind::MissingLengthReference { .. }));
    }

    #[test]
    fn arity_mismatch_is_reported_once() {
        let p = PacketDescription::new(1, "HCI_EVENT_X", "121", ["a", "b"]);
        let l = layout(&p);
        assert_eq!(l.accessors.len(), 2);
        assert_eq!(l.diagnostics.len(), 1);
        assert!(matches!(l.diagnostics[0].kind, DiagnosticKind::FormatArityMismatch { .. }));
    }

    #[test]
    fn unknown_type_width_downgrades_rest() {
        let p = PacketDescription::new(1, "HCI_EVENT_X", "1K1", ["a", "weird", "b"]);
        let l = layout(&p);
        let supported: Vec<_> = l.accessors.iter().map(|a| a.is_supported).collect();
        assert_eq!(supported, vec![true, false, false]);
    }

    #[test]
    fn stub_types_keep_width() {
        let p = PacketDescription::new(1, "HCI_EVENT_X", "P1", ["key", "after"]);
        let l = layout(&p);
        assert!(!l.accessors[0].is_supported);
        assert!(l.accessors[1].is_supported);
        assert_eq!(l.accessors[1].offset, OffsetExpr::Constant(18));
    }
}
