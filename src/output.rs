//! Terminal output for query results, warnings and records

use crate::query::{QueryOutcome, QueryWarning};
use crate::record::Record;
use std::collections::BTreeMap;
use std::io::{self, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

fn color_choice(color: bool) -> ColorChoice {
    if color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    }
}

/// Print matching identifiers, one per line, and warnings on stderr
pub fn print_outcome(outcome: &QueryOutcome, color: bool) -> io::Result<()> {
    let mut stdout = StandardStream::stdout(color_choice(color));
    for id in &outcome.ids {
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        write!(stdout, "{}", id)?;
        stdout.reset()?;
        writeln!(stdout)?;
    }

    print_warnings(&outcome.warnings, color)
}

/// Print the outcome as a single JSON object
pub fn print_outcome_json(outcome: &QueryOutcome) -> io::Result<()> {
    let warnings: Vec<String> = outcome.warnings.iter().map(ToString::to_string).collect();
    let value = serde_json::json!({
        "ids": outcome.ids,
        "warnings": warnings,
    });
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", value)
}

/// Print each distinct warning once, with the number of records that raised it
pub fn print_warnings(warnings: &[QueryWarning], color: bool) -> io::Result<()> {
    let mut stderr = StandardStream::stderr(color_choice(color));

    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for warning in warnings {
        *counts.entry(warning.to_string()).or_insert(0) += 1;
    }

    for (message, count) in counts {
        stderr.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true))?;
        write!(stderr, "warning")?;
        stderr.reset()?;
        writeln!(stderr, ": {} ({} records)", message, count)?;
    }

    Ok(())
}

/// Print records with their flattened fields
pub fn print_records(records: &[Record], color: bool) -> io::Result<()> {
    let mut stdout = StandardStream::stdout(color_choice(color));

    for (i, record) in records.iter().enumerate() {
        if i > 0 {
            writeln!(stdout)?;
        }

        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)).set_bold(true))?;
        write!(stdout, "{}", record.identifier)?;
        stdout.reset()?;
        if let Some(source) = &record.source {
            write!(stdout, "  {}", source.display())?;
        }
        writeln!(stdout)?;

        let json = record.to_json();
        if let Some(fields) = json.as_object() {
            let width = fields.keys().map(String::len).max().unwrap_or(0);
            for (name, value) in fields {
                stdout.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
                write!(stdout, "  {:width$}", name, width = width)?;
                stdout.reset()?;
                writeln!(stdout, "  {}", value)?;
            }
        }
    }

    Ok(())
}

/// Print records as JSON lines
pub fn print_records_json(records: &[Record]) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    for record in records {
        writeln!(stdout, "{}", record.to_json())?;
    }
    Ok(())
}
