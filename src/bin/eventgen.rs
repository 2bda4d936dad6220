//! Generate the event accessor header from the annotated defines header.
//!
//! Usage:
//!   eventgen [DEFINES.h [OUTPUT.h]]
//!
//! Without arguments, paths are derived from the tool's location: the project root is the
//! parent of the directory holding the tool, the table is `src/btstack_defines.h` and the
//! output is `src/btstack_event.h`. The output is only rewritten when its content changes.

use anyhow::{bail, Context};
use eventgen::{generate, parse_file, GeneratorConfig, Severity, ToolPaths};
use std::path::{Path, PathBuf};

const PROGRAM_INFO: &str = "
Event Getter Generator
Generates field accessors for HCI-style event packets
";

fn write_if_different(path: &Path, content: &str) -> anyhow::Result<bool> {
    match std::fs::read_to_string(path) {
        Ok(existing) if existing == content => return Ok(false),
        _ => {}
    }
    std::fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;
    Ok(true)
}

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args();
    let tool = args.next().unwrap_or_else(|| "eventgen".to_string());
    let rest: Vec<String> = args.collect();

    let defaults = ToolPaths::from_tool_location(Path::new(&tool));
    let (defines, output) = match rest.as_slice() {
        [] => (defaults.defines, defaults.output),
        [defines] => (PathBuf::from(defines), defaults.output),
        [defines, output] => (PathBuf::from(defines), PathBuf::from(output)),
        _ => bail!("usage: eventgen [DEFINES.h [OUTPUT.h]]"),
    };

    println!("{}", PROGRAM_INFO);

    let table = parse_file(&defines).with_context(|| format!("reading event table {}", defines.display()))?;
    let generated = generate(&table.events, &GeneratorConfig::default());

    for d in &generated.diagnostics {
        let severity = match d.severity() {
            Severity::Warning => "warning",
            Severity::Note => "note",
        };
        println!("{}: {}", severity, d);
    }

    if write_if_different(&output, &generated.text)? {
        println!(
            "{}: {} events, {} accessors written",
            output.display(),
            table.len(),
            generated.accessor_count
        );
    } else {
        println!("{}: up to date", output.display());
    }
    println!("Done!");
    Ok(())
}
