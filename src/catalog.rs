//! Type catalog: field type code -> decoded C type, byte width and decode template.
//!
//! The table is a `static` and never mutated. Codes that are present but carry no
//! [`ReadTemplate`] are known to the layout (their width still counts) but produce
//! documentation-only stubs.

/// Byte width of a field type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSize {
    Fixed(usize),
    /// Extent depends on packet contents (length reference or end of packet).
    Variable,
}

/// Role a type plays in offset computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Fixed,
    /// Value is the run-time length of a later `LengthReferenced` field.
    LengthPrefix,
    /// Positioned after a run-time length; advances the offset by the last length prefix.
    LengthReferenced,
    /// Raw bytes up to the end of the packet; nothing can follow.
    RestOfPacket,
    /// Free-form string up to the end of the packet; nothing can follow.
    String,
}

/// How the emitted accessor reads the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadTemplate {
    Byte,
    LittleEndian16,
    LittleEndian24,
    LittleEndian32,
    /// Zero-copy pointer into the packet.
    Pointer,
    /// Zero-copy pointer reinterpreted as `const char *`.
    CString,
    /// Byte-reversed 6-byte address copied into the caller's buffer.
    ReverseAddress,
    /// Byte-reversed block of `n` bytes copied into the caller's buffer.
    ReverseBytes(usize),
    /// Named deserialization routine writing into the caller's struct.
    Deserialize(&'static str),
}

impl ReadTemplate {
    /// Out-parameter shape: the accessor transforms while copying and returns nothing.
    pub fn is_out_param(self) -> bool {
        matches!(
            self,
            ReadTemplate::ReverseAddress | ReadTemplate::ReverseBytes(_) | ReadTemplate::Deserialize(_)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeEntry {
    pub code: char,
    pub decoded_type: &'static str,
    pub size: FieldSize,
    pub kind: FieldKind,
    pub read: Option<ReadTemplate>,
}

impl TypeEntry {
    const fn new(
        code: char,
        decoded_type: &'static str,
        size: FieldSize,
        kind: FieldKind,
        read: Option<ReadTemplate>,
    ) -> Self {
        TypeEntry { code, decoded_type, size, kind, read }
    }

    const fn fixed(code: char, decoded_type: &'static str, width: usize, read: Option<ReadTemplate>) -> Self {
        Self::new(code, decoded_type, FieldSize::Fixed(width), FieldKind::Fixed, read)
    }

    pub fn is_supported(&self) -> bool {
        self.read.is_some()
    }

    pub fn fixed_size(&self) -> Option<usize> {
        match self.size {
            FieldSize::Fixed(n) => Some(n),
            FieldSize::Variable => None,
        }
    }
}

use FieldKind as K;
use FieldSize::Variable;
use ReadTemplate as R;

static CATALOG: &[TypeEntry] = &[
    TypeEntry::fixed('1', "uint8_t", 1, Some(R::Byte)),
    TypeEntry::fixed('2', "uint16_t", 2, Some(R::LittleEndian16)),
    TypeEntry::fixed('3', "uint32_t", 3, Some(R::LittleEndian24)),
    TypeEntry::fixed('4', "uint32_t", 4, Some(R::LittleEndian32)),
    TypeEntry::fixed('H', "hci_con_handle_t", 2, Some(R::LittleEndian16)),
    TypeEntry::fixed('B', "bd_addr_t", 6, Some(R::ReverseAddress)),
    TypeEntry::fixed('D', "const uint8_t *", 8, None),
    TypeEntry::fixed('E', "const uint8_t *", 240, None),
    TypeEntry::fixed('N', "String", 248, None),
    TypeEntry::fixed('P', "const uint8_t *", 16, None),
    TypeEntry::fixed('A', "const uint8_t *", 31, None),
    TypeEntry::fixed('U', "BT_UUID", 16, None),
    TypeEntry::fixed('Q', "uint8_t *", 32, Some(R::ReverseBytes(32))),
    TypeEntry::fixed('X', "gatt_client_service_t *", 20, Some(R::Deserialize("gatt_client_deserialize_service"))),
    TypeEntry::fixed('Y', "gatt_client_characteristic_t *", 24, Some(R::Deserialize("gatt_client_deserialize_characteristic"))),
    TypeEntry::fixed(
        'Z',
        "gatt_client_characteristic_descriptor_t *",
        18,
        Some(R::Deserialize("gatt_client_deserialize_characteristic_descriptor")),
    ),
    TypeEntry::new('J', "int", FieldSize::Fixed(1), K::LengthPrefix, Some(R::Byte)),
    TypeEntry::new('L', "int", FieldSize::Fixed(2), K::LengthPrefix, Some(R::LittleEndian16)),
    TypeEntry::new('V', "const uint8_t *", Variable, K::LengthReferenced, Some(R::Pointer)),
    TypeEntry::new('R', "const uint8_t *", Variable, K::RestOfPacket, Some(R::Pointer)),
    TypeEntry::new('T', "const char *", Variable, K::String, Some(R::CString)),
    TypeEntry::new('S', "const uint8_t *", Variable, K::Fixed, None),
];

/// Look up a type code. `None` means the code is unknown to the generator.
pub fn lookup(code: char) -> Option<&'static TypeEntry> {
    CATALOG.iter().find(|e| e.code == code)
}

/// All catalog entries in declaration order.
pub fn entries() -> &'static [TypeEntry] {
    CATALOG
}
