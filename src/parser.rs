//! Load the event table from an annotated C header using PEST.
//!
//! ```text
//! /**
//!  * @format 1H
//!  * @param status
//!  * @param handle
//!  */
//! #define GAP_EVENT_SECURITY_LEVEL 0xD8
//! ```
//!
//! Lines between the block and its `#define` are skipped; a new `/**` block before any
//! `#define` replaces the pending one. Doc blocks without a `@format` tag (and everything
//! outside doc blocks) are ignored.

use crate::ast::{EventTable, PacketDescription};
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser as PestParser;
use std::path::Path;

#[derive(PestParser)]
#[grammar = "grammar.pest"]
struct TableParser;

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Syntax(String),
    #[error("line {line}: @param without a field name")]
    MissingParamName { line: usize },
    #[error("{name}: type id {value} out of range")]
    InvalidTypeId { name: String, value: String },
}

/// Parse header source into an ordered event table.
pub fn parse(source: &str) -> Result<EventTable, TableError> {
    let mut pairs = TableParser::parse(Rule::table, source).map_err(|e| TableError::Syntax(e.to_string()))?;
    let mut events = Vec::new();
    if let Some(table) = pairs.next() {
        for pair in table.into_inner() {
            if pair.as_rule() == Rule::event_def {
                if let Some(event) = build_event(pair)? {
                    events.push(event);
                }
            }
        }
    }
    Ok(EventTable::new(events))
}

/// Read and parse a header file.
pub fn parse_file(path: &Path) -> Result<EventTable, TableError> {
    let source = std::fs::read_to_string(path)?;
    parse(&source)
}

fn build_event(pair: Pair<Rule>) -> Result<Option<PacketDescription>, TableError> {
    let mut format: Option<String> = None;
    let mut params = Vec::new();
    let mut define = None;

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::doc_tag => {
                let line = inner.as_span().start_pos().line_col().0;
                let mut parts = inner.into_inner();
                let tag = parts.next().map(|p| p.as_str()).unwrap_or_default();
                let value = parts.next().map(|p| p.as_str()).unwrap_or_default();
                match tag {
                    "format" if format.is_none() => {
                        format = Some(value.split_whitespace().next().unwrap_or_default().to_string());
                    }
                    "param" => {
                        let name = value
                            .split_whitespace()
                            .next()
                            .ok_or(TableError::MissingParamName { line })?;
                        params.push(name.to_string());
                    }
                    _ => {}
                }
            }
            Rule::define => define = Some(build_define(inner)?),
            _ => {}
        }
    }

    match (format, define) {
        (Some(format), Some((name, type_id))) => Ok(Some(PacketDescription::new(type_id, &name, &format, params))),
        _ => Ok(None),
    }
}

fn build_define(pair: Pair<Rule>) -> Result<(String, u32), TableError> {
    let mut name = String::new();
    let mut value = "";
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::ident => name = inner.as_str().to_string(),
            Rule::number => value = inner.as_str(),
            _ => {}
        }
    }
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => value.parse::<u32>(),
    };
    let type_id = parsed.map_err(|_| TableError::InvalidTypeId {
        name: name.clone(),
        value: value.to_string(),
    })?;
    Ok((name, type_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_single_event() {
        let src = "/**\n * @format 1H\n * @param status\n * @param handle\n */\n#define GAP_EVENT_SECURITY_LEVEL 0xD8\n";
        let table = parse(src).expect("parse");
        assert_eq!(table.len(), 1);
        let e = &table.events[0];
        assert_eq!(e.type_id, 0xd8);
        assert_eq!(e.name, "GAP_EVENT_SECURITY_LEVEL");
        assert_eq!(e.group, "GAP");
        assert_eq!(e.format, vec!['1', 'H']);
        assert_eq!(e.field_names, vec!["status", "handle"]);
    }

    #[test]
    fn doc_without_format_is_ignored() {
        let src = "/**\n * @brief not an event\n */\n#define HCI_CON_HANDLE_INVALID 0xffff\n";
        let table = parse(src).expect("parse");
        assert!(table.is_empty());
    }

    #[test]
    fn param_without_name_is_error() {
        let src = "/**\n * @format 1\n * @param\n */\n#define HCI_EVENT_X 0x01\n";
        match parse(src) {
            Err(TableError::MissingParamName { line }) => assert_eq!(line, 3),
            other => panic!("expected MissingParamName, got {:?}", other),
        }
    }

    #[test]
    fn type_id_overflow_is_error() {
        let src = "/**\n * @format 1\n * @param status\n */\n#define HCI_EVENT_X 0x1FFFFFFFF\n";
        assert!(matches!(parse(src), Err(TableError::InvalidTypeId { .. })));
    }
}
