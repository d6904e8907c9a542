//! Event definitions, typed in at a prompt or read from a bulk CSV file.

use crate::error::{Result, ScraperError};
use crate::types::{DraftWindow, Event};
use serde::Deserialize;
use std::io::{self, BufRead, Read, Write};
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryMode {
    Bulk,
    Direct,
}

/// Line-oriented prompts that re-ask until the answer is usable.
///
/// Running out of input is reported as an error rather than looping forever.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl Prompter<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn read_line(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(ScraperError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed while waiting for an answer",
            )));
        }
        Ok(line.trim().to_string())
    }

    pub fn text(&mut self, prompt: &str) -> Result<String> {
        loop {
            let answer = self.read_line(prompt)?;
            if !answer.is_empty() {
                return Ok(answer);
            }
        }
    }

    pub fn int(&mut self, prompt: &str) -> Result<u32> {
        loop {
            if let Ok(value) = self.read_line(prompt)?.parse::<u32>() {
                return Ok(value);
            }
            writeln!(self.output, "Please enter a whole number.")?;
        }
    }

    pub fn bool(&mut self, prompt: &str) -> Result<bool> {
        loop {
            let answer = self.read_line(prompt)?.to_lowercase();
            match answer.chars().next() {
                Some('t') | Some('y') => return Ok(true),
                Some('f') | Some('n') => return Ok(false),
                _ => writeln!(self.output, "Please answer true or false.")?,
            }
        }
    }

    pub fn entry_mode(&mut self) -> Result<EntryMode> {
        loop {
            match self.read_line("1. Bulk Entry\n2. Direct Entry\n> ")?.as_str() {
                "1" => return Ok(EntryMode::Bulk),
                "2" => return Ok(EntryMode::Direct),
                _ => {}
            }
        }
    }

    /// Asks for an event count, then each event's fields in turn.
    pub fn events(&mut self) -> Result<Vec<Event>> {
        let count = self.int("How many events are being added? ")?;
        let mut events = Vec::new();

        for _ in 0..count {
            let name = self.text("Event name found in the URL: ")?;
            let display_name = self.read_line("Event name to be shown: ")?;
            let rounds_total = self.int("# of rounds at the event: ")?;
            let has_draft = self.bool("Rounds of draft (True/False): ")?;

            let event = loop {
                let draft = if has_draft {
                    Some(DraftWindow {
                        start: self.int("First round of draft: ")?,
                        end: self.int("Last round of draft: ")?,
                    })
                } else {
                    None
                };
                match Event::new(name.clone(), display_name.clone(), rounds_total, draft) {
                    Ok(event) => break event,
                    Err(e) => writeln!(self.output, "{}", e)?,
                }
            };
            events.push(event);
        }

        Ok(events)
    }
}

#[derive(Debug, Deserialize)]
struct EventCsvRow {
    url_name: String,
    display_name: String,
    rounds_total: String,
    draft_rounds: String,
    #[serde(default)]
    draft_rounds_start: Option<String>,
    #[serde(default)]
    draft_rounds_end: Option<String>,
}

/// Reads events from CSV with columns
/// `url_name, display_name, rounds_total, draft_rounds, draft_rounds_start, draft_rounds_end`.
pub fn bulk_entry<R: Read>(reader: R) -> Result<Vec<Event>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut events = Vec::new();

    for (idx, record) in rdr.deserialize::<EventCsvRow>().enumerate() {
        let row = record?;
        let line = idx + 2;
        let rounds_total = parse_round(&row.rounds_total, "rounds_total", line)?;
        let draft = if parse_flag(&row.draft_rounds, line)? {
            let start = required(&row.draft_rounds_start, "draft_rounds_start", line)?;
            let end = required(&row.draft_rounds_end, "draft_rounds_end", line)?;
            Some(DraftWindow {
                start: parse_round(start, "draft_rounds_start", line)?,
                end: parse_round(end, "draft_rounds_end", line)?,
            })
        } else {
            None
        };
        events.push(Event::new(row.url_name, row.display_name, rounds_total, draft)?);
    }

    Ok(events)
}

pub fn bulk_entry_path(path: &Path) -> Result<Vec<Event>> {
    let file = std::fs::File::open(path)?;
    let events = bulk_entry(file)?;
    info!("Loaded {} events from {}", events.len(), path.display());
    Ok(events)
}

fn required<'a>(value: &'a Option<String>, column: &str, line: usize) -> Result<&'a str> {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ScraperError::InvalidEvent(format!("line {}: {} is required when draft_rounds is set", line, column)))
}

// Spreadsheet exports write whole numbers as "3.0" once a column has gaps.
fn parse_round(value: &str, column: &str, line: usize) -> Result<u32> {
    let invalid = || ScraperError::InvalidEvent(format!("line {}: {} '{}' is not a whole number", line, column, value));
    if let Ok(v) = value.parse::<u32>() {
        return Ok(v);
    }
    let f: f64 = value.parse().map_err(|_| invalid())?;
    if f.fract() == 0.0 && f >= 0.0 && f <= f64::from(u32::MAX) {
        Ok(f as u32)
    } else {
        Err(invalid())
    }
}

fn parse_flag(value: &str, line: usize) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "1" | "1.0" => Ok(true),
        "false" | "f" | "no" | "n" | "0" | "0.0" | "" => Ok(false),
        other => Err(ScraperError::InvalidEvent(format!(
            "line {}: draft_rounds '{}' is not a true/false value",
            line, other
        ))),
    }
}
