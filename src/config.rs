//! Generator configuration: recognized groups, guard feature and header boilerplate.
//!
//! All of it is plain immutable data handed to [`generate`](crate::document::generate).
//! [`GeneratorConfig::default`] describes the BTstack event header.

use std::path::{Path, PathBuf};

/// Which event groups are emitted, guarded or treated as meta events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupConfig {
    /// Groups whose packets carry a subevent code in byte 2; one accessor each, in this order.
    pub meta_groups: Vec<String>,
    /// Recognized groups that are not meta groups.
    pub plain_groups: Vec<String>,
    /// Groups whose accessors are wrapped in `#ifdef <guard_feature>`.
    pub guarded_groups: Vec<String>,
    pub guard_feature: String,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for GroupConfig {
    fn default() -> Self {
        GroupConfig {
            meta_groups: strings(&["ANCS", "AVDTP", "A2DP", "AVRCP", "GOEP", "HFP", "HSP", "PBAP", "LE"]),
            plain_groups: strings(&[
                "BTSTACK", "GAP", "HCI", "SDP", "SM", "L2CAP", "RFCOMM", "GATT", "BNEP", "ATT",
            ]),
            guarded_groups: strings(&["GATT", "ANCS", "SM"]),
            guard_feature: "ENABLE_BLE".to_string(),
        }
    }
}

/// Text wrapped around the generated accessors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boilerplate {
    /// License / copyright comment block.
    pub header: String,
    /// Include guard, includes, API start marker and the type getter.
    pub preamble: String,
    /// API end marker and closing of the include guard.
    pub footer: String,
}

const DEFAULT_HEADER: &str = "/*
 * Event field accessors.
 *
 * Generated from the annotated event table in btstack_defines.h.
 */
";

const DEFAULT_PREAMBLE: &str = r#"

/*
 *  btstack_event.h
 *
 *  @brief BTstack event getter/setter
 *  @note  Don't edit - generated by eventgen
 *
 */

#ifndef __BTSTACK_EVENT_H
#define __BTSTACK_EVENT_H

#if defined __cplusplus
extern "C" {
#endif

#include "btstack_util.h"
#include <stdint.h>

#ifdef ENABLE_BLE
#include "ble/gatt_client.h"
#endif

/* API_START */

/**
 * @brief Get event type
 * @param event
 * @return type of event
 */
static inline uint8_t hci_event_packet_get_type(const uint8_t * event){
    return event[0];
}

"#;

const DEFAULT_FOOTER: &str = r#"

/* API_END */

#if defined __cplusplus
}
#endif

#endif // __BTSTACK_EVENT_H
"#;

impl Default for Boilerplate {
    fn default() -> Self {
        Boilerplate {
            header: DEFAULT_HEADER.to_string(),
            preamble: DEFAULT_PREAMBLE.to_string(),
            footer: DEFAULT_FOOTER.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub groups: GroupConfig,
    pub boilerplate: Boilerplate,
}

/// Input and output locations, derived from where the tool lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    pub defines: PathBuf,
    pub output: PathBuf,
}

impl ToolPaths {
    /// `tool_path` is the tool itself (e.g. `argv[0]`); the project root is its directory's parent.
    pub fn from_tool_location(tool_path: &Path) -> Self {
        let tool_dir = tool_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        Self::from_root(&tool_dir.join(".."))
    }

    pub fn from_root(root: &Path) -> Self {
        let src = root.join("src");
        ToolPaths {
            defines: src.join("btstack_defines.h"),
            output: src.join("btstack_event.h"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_relative_to_tool_dir() {
        let paths = ToolPaths::from_tool_location(Path::new("/opt/stack/tool/eventgen"));
        assert_eq!(paths.output, PathBuf::from("/opt/stack/tool/../src/btstack_event.h"));
        assert_eq!(paths.defines, PathBuf::from("/opt/stack/tool/../src/btstack_defines.h"));
    }

    #[test]
    fn bare_tool_name_uses_current_dir() {
        let paths = ToolPaths::from_tool_location(Path::new("eventgen"));
        assert_eq!(paths.defines, PathBuf::from("./../src/btstack_defines.h"));
    }

    #[test]
    fn default_guard_groups_are_recognized() {
        let g = GroupConfig::default();
        for group in &g.guarded_groups {
            assert!(g.meta_groups.contains(group) || g.plain_groups.contains(group), "{group}");
        }
    }
}
