//! Accessor emitter: turns an [`AccessorSpec`] into one C accessor definition.
//!
//! Two shapes are emitted for supported fields:
//!
//! - **value-return** for scalars and zero-copy pointers into the packet:
//!   `static inline uint16_t x_get_y(const uint8_t * event){ return ...; }`
//! - **out-parameter** for fields that are transformed while copying (reversed address,
//!   reversed block, struct deserialization): the caller passes the destination.
//!
//! Unsupported fields (no catalog entry, no decode template, or unknown offset) become a
//! commented-out declaration so the accessor name stays discoverable in the header.

use crate::catalog::ReadTemplate;
use crate::layout::{AccessorSpec, LengthRef, OffsetExpr, HEADER_LEN};

/// Storage type used in stubs for codes missing from the catalog.
const UNKNOWN_RESULT_TYPE: &str = "const uint8_t *";

/// Render an offset as a C expression over `event`.
pub fn render_offset(offset: &OffsetExpr) -> String {
    match offset {
        OffsetExpr::Constant(n) => n.to_string(),
        OffsetExpr::Symbolic { base, length, increment } => {
            let mut s = format!("{} + {}", render_offset(base), render_length(length));
            if *increment > 0 {
                s.push_str(&format!(" + {}", increment));
            }
            s
        }
    }
}

fn render_length(length: &LengthRef) -> String {
    let at = render_offset(&length.offset);
    match length.width {
        2 => format!("little_endian_read_16(event, {})", at),
        _ => format!("event[{}]", at),
    }
}

/// Body statement reading a field with `read` at `offset` into `result_name`.
pub fn read_statement(read: ReadTemplate, offset: &str, result_name: &str) -> String {
    match read {
        ReadTemplate::Byte => format!("return event[{}];", offset),
        ReadTemplate::LittleEndian16 => format!("return little_endian_read_16(event, {});", offset),
        ReadTemplate::LittleEndian24 => format!("return little_endian_read_24(event, {});", offset),
        ReadTemplate::LittleEndian32 => format!("return little_endian_read_32(event, {});", offset),
        ReadTemplate::Pointer => format!("return &event[{}];", offset),
        ReadTemplate::CString => format!("return (const char *) &event[{}];", offset),
        ReadTemplate::ReverseAddress => format!("reverse_bd_addr(&event[{}], {});", offset, result_name),
        ReadTemplate::ReverseBytes(n) => format!("reverse_bytes(&event[{}], {}, {});", offset, result_name, n),
        ReadTemplate::Deserialize(routine) => format!("{}(event, {}, {});", routine, offset, result_name),
    }
}

/// Emit one accessor definition (or stub) for `spec`.
pub fn emit_accessor(spec: &AccessorSpec) -> String {
    let entry = spec.entry();
    let description = format!(
        "Get field {} from event {}",
        spec.field_name,
        spec.packet_name.to_uppercase()
    );
    let fn_name = spec.fn_name();
    let result_name = &spec.field_name;
    let result_type = entry.map_or(UNKNOWN_RESULT_TYPE, |e| e.decoded_type);
    let code = spec.field_type;

    let read = match entry.and_then(|e| e.read) {
        Some(read) if spec.is_supported => read,
        _ => {
            return format!(
                "/**\n \
                 * @brief {description}\n \
                 * @param event packet\n \
                 * @return {result_name}\n \
                 * @note: btstack_type {code}\n \
                 */\n\
                 //  static inline {result_type} {fn_name}(const uint8_t * event){{\n\
                 //      not implemented yet\n\
                 //  }}\n"
            );
        }
    };

    let body = read_statement(read, &render_offset(&spec.offset), result_name);
    if read.is_out_param() {
        format!(
            "/**\n \
             * @brief {description}\n \
             * @param event packet\n \
             * @param Pointer to storage for {result_name}\n \
             * @note: btstack_type {code}\n \
             */\n\
             static inline void {fn_name}(const uint8_t * event, {result_type} {result_name}){{\n    \
             {body}    \n\
             }}\n"
        )
    } else {
        format!(
            "/**\n \
             * @brief {description}\n \
             * @param event packet\n \
             * @return {result_name}\n \
             * @note: btstack_type {code}\n \
             */\n\
             static inline {result_type} {fn_name}(const uint8_t * event){{\n    \
             {body}\n\
             }}\n"
        )
    }
}

/// Byte index the synthesized meta-event accessor reads the subevent code from.
pub const SUBEVENT_CODE_OFFSET: usize = HEADER_LEN;

/// Name of the subevent code accessor for a meta group.
pub fn meta_accessor_name(group: &str) -> String {
    format!("hci_event_{}_meta_get_subevent_code", group.to_lowercase())
}

/// Subevent code accessor for a meta group; independent of any packet's field list.
pub fn emit_meta_accessor(group: &str) -> String {
    let fn_name = meta_accessor_name(group);
    let group = group.to_lowercase();
    format!(
        "/***\n \
         * @brief Get subevent code for {group} event\n \
         * @param event packet\n \
         * @return subevent_code\n \
         */\n\
         static inline uint8_t {fn_name}(const uint8_t * event){{\n    \
         return event[{SUBEVENT_CODE_OFFSET}];\n\
         }}\n"
    )
}
