//! Event classification: is a packet's group recognized, feature-guarded, a meta group?

use crate::ast::PacketDescription;
use crate::config::GroupConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// Accessors compile only when the guard feature is defined.
    pub guarded: bool,
}

pub struct EventClassifier<'a> {
    groups: &'a GroupConfig,
}

impl<'a> EventClassifier<'a> {
    pub fn new(groups: &'a GroupConfig) -> Self {
        EventClassifier { groups }
    }

    pub fn is_recognized(&self, group: &str) -> bool {
        self.is_meta(group) || self.groups.plain_groups.iter().any(|g| g == group)
    }

    pub fn is_meta(&self, group: &str) -> bool {
        self.groups.meta_groups.iter().any(|g| g == group)
    }

    pub fn is_guarded(&self, group: &str) -> bool {
        self.groups.guarded_groups.iter().any(|g| g == group)
    }

    /// `None` when the packet's group is not recognized and the packet must be skipped.
    pub fn classify(&self, packet: &PacketDescription) -> Option<Classification> {
        if !self.is_recognized(&packet.group) {
            return None;
        }
        Some(Classification {
            guarded: self.is_guarded(&packet.group),
        })
    }

    /// Meta groups in declaration order.
    pub fn meta_groups(&self) -> impl Iterator<Item = &'a str> {
        self.groups.meta_groups.iter().map(String::as_str)
    }

    pub fn guard_feature(&self) -> &'a str {
        &self.groups.guard_feature
    }
}
