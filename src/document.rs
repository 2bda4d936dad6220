//! Assemble the generated header: boilerplate, meta accessors, then one block per packet.

use crate::ast::PacketDescription;
use crate::classify::EventClassifier;
use crate::config::GeneratorConfig;
use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::emit::{emit_accessor, emit_meta_accessor};
use crate::layout::FieldWalker;

/// Generated header text plus every diagnostic raised, in input order.
#[derive(Debug, Clone)]
pub struct Generated {
    pub text: String,
    pub diagnostics: Vec<Diagnostic>,
    /// Number of accessors written (stubs included, meta accessors excluded).
    pub accessor_count: usize,
}

/// Generate the accessor header for `events`.
///
/// Output depends only on `events` and `config`; identical input yields identical text.
pub fn generate(events: &[PacketDescription], config: &GeneratorConfig) -> Generated {
    let classifier = EventClassifier::new(&config.groups);
    let boilerplate = &config.boilerplate;
    let mut text = String::new();
    let mut diagnostics = Vec::new();
    let mut accessor_count = 0;

    text.push_str(&boilerplate.header);
    text.push_str(&boilerplate.preamble);

    for group in classifier.meta_groups() {
        text.push_str(&emit_meta_accessor(group));
    }

    for packet in events {
        let class = match classifier.classify(packet) {
            Some(c) => c,
            None => {
                diagnostics.push(Diagnostic::new(
                    &packet.name,
                    DiagnosticKind::UnrecognizedGroup { group: packet.group.clone() },
                ));
                continue;
            }
        };

        if class.guarded {
            text.push_str(&format!("#ifdef {}\n", classifier.guard_feature()));
        }
        let mut walker = FieldWalker::new(packet);
        for spec in walker.by_ref() {
            text.push_str(&emit_accessor(&spec));
            accessor_count += 1;
        }
        diagnostics.extend(walker.into_diagnostics());
        if class.guarded {
            text.push_str("#endif\n");
        }
        text.push('\n');
    }

    text.push_str(&boilerplate.footer);

    Generated {
        text,
        diagnostics,
        accessor_count,
    }
}
