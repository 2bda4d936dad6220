//! Packet descriptions: the ordered event table the generator works from.

/// One event/packet: declared name, numeric type id and its ordered fields.
#[derive(Debug, Clone, PartialEq)]
pub struct PacketDescription {
    pub type_id: u32,
    pub name: String,
    /// Namespace prefix of `name` (text before the first `_`), e.g. `HCI`, `GATT`.
    pub group: String,
    /// One single-character type code per field.
    pub format: Vec<char>,
    pub field_names: Vec<String>,
}

impl PacketDescription {
    pub fn new<I, S>(type_id: u32, name: &str, format: &str, field_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        PacketDescription {
            type_id,
            name: name.to_string(),
            group: group_of(name).to_string(),
            format: format.chars().collect(),
            field_names: field_names.into_iter().map(Into::into).collect(),
        }
    }

    /// Format string as declared (`"1B2"`).
    pub fn format_str(&self) -> String {
        self.format.iter().collect()
    }

    /// True when every type code has a field name and vice versa.
    pub fn arity_matches(&self) -> bool {
        self.format.len() == self.field_names.len()
    }

    /// Type code / field name pairs, truncated to the shorter list.
    pub fn fields(&self) -> impl Iterator<Item = (char, &str)> + '_ {
        self.format
            .iter()
            .copied()
            .zip(self.field_names.iter().map(String::as_str))
    }

    /// Lower-cased name used as accessor prefix; `_event` is appended unless already present.
    pub fn base_name(&self) -> String {
        let lower = self.name.to_lowercase();
        if lower.contains("event") {
            lower
        } else {
            format!("{}_event", lower)
        }
    }
}

/// Group prefix of an event name.
pub fn group_of(name: &str) -> &str {
    name.split('_').next().unwrap_or(name)
}

/// Ordered event table as produced by the loader.
#[derive(Debug, Clone, Default)]
pub struct EventTable {
    pub events: Vec<PacketDescription>,
}

impl EventTable {
    pub fn new(events: Vec<PacketDescription>) -> Self {
        EventTable { events }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
