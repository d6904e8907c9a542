use crate::constants::{EVENT_NAME_COLUMN, GEM_ID_COLUMN};
use crate::error::{Result, ScraperError};
use crate::parser::first_digit_run;
use crate::storage::{Cell, Frame};
use crate::types::{CardLine, DecklistRow, Event, PairingRecord, ParticipantId, ParticipantProfile};
use once_cell::sync::Lazy;
use regex::Regex;

static CARD_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+) x (.+)$").expect("valid card line regex"));

// Column 2 of a decklist row is never read; its meaning on the page is unknown.
const NAME: usize = 0;
const EVENT_DATE: usize = 1;
const FORMAT: usize = 3;
const HERO: usize = 4;
const FIRST_CARD_SLOT: usize = 5;

/// Splits raw decklist rows into one profile per row and one card line per
/// well-formed `"<copies> x <card>"` slot.
///
/// Fails if a row's first cell carries no digit run to key it by.
pub fn reshape(event_name: &str, rows: &[DecklistRow]) -> Result<(Vec<ParticipantProfile>, Vec<CardLine>)> {
    let mut profiles = Vec::with_capacity(rows.len());
    let mut card_lines = Vec::new();

    for row in rows {
        let participant_id = row_participant_id(row)?;

        for slot in row.0.iter().skip(FIRST_CARD_SLOT).flatten() {
            if let Some((copies, card)) = split_card_line(slot) {
                card_lines.push(CardLine {
                    participant_id: participant_id.clone(),
                    copies: copies.to_string(),
                    card: card.to_string(),
                    event_name: event_name.to_string(),
                });
            }
        }

        let owned = |idx: usize| row.cell(idx).map(str::to_string);
        profiles.push(ParticipantProfile {
            participant_id,
            name: owned(NAME),
            event_date: owned(EVENT_DATE),
            format: owned(FORMAT),
            hero: owned(HERO),
            event_name: event_name.to_string(),
        });
    }

    Ok((profiles, card_lines))
}

fn row_participant_id(row: &DecklistRow) -> Result<ParticipantId> {
    let name = row.cell(NAME).unwrap_or_default();
    first_digit_run(name)
        .map(ParticipantId::new)
        .ok_or_else(|| ScraperError::Parse(format!("no participant id in decklist name cell '{}'", name)))
}

/// `"3 x Command and Conquer"` -> `("3", "Command and Conquer")`
pub fn split_card_line(slot: &str) -> Option<(&str, &str)> {
    let caps = CARD_LINE.captures(slot)?;
    Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
}

pub fn profiles_frame(profiles: &[ParticipantProfile]) -> Frame {
    let mut frame = Frame::new(["Name", "Event Date", "Format", "Hero", EVENT_NAME_COLUMN]).with_index(GEM_ID_COLUMN);
    for p in profiles {
        frame.push_keyed(
            p.participant_id.as_str(),
            vec![
                Cell::from(p.name.clone()),
                Cell::from(p.event_date.clone()),
                Cell::from(p.format.clone()),
                Cell::from(p.hero.clone()),
                Cell::from(p.event_name.as_str()),
            ],
        );
    }
    frame
}

pub fn card_lines_frame(lines: &[CardLine]) -> Frame {
    let mut frame = Frame::new(["Copies", "Card", EVENT_NAME_COLUMN]).with_index(GEM_ID_COLUMN);
    for line in lines {
        frame.push_keyed(
            line.participant_id.as_str(),
            vec![
                Cell::from(line.copies.as_str()),
                Cell::from(line.card.as_str()),
                Cell::from(line.event_name.as_str()),
            ],
        );
    }
    frame
}

pub fn pairings_frame(pairings: &[PairingRecord]) -> Frame {
    let mut frame = Frame::new(["Event", "Round", "Table", "Seat", GEM_ID_COLUMN, "Outcome"]);
    for p in pairings {
        frame.push(vec![
            Cell::from(p.event.as_str()),
            Cell::from(i64::from(p.round)),
            Cell::from(i64::from(p.table)),
            Cell::from(i64::from(p.seat)),
            Cell::from(p.participant_id.as_ref().map(|id| id.to_string())),
            Cell::from(p.outcome.as_str()),
        ]);
    }
    frame
}

pub fn event_frame(event: &Event) -> Frame {
    let mut frame = Frame::new(["event_url_portion", "event_name"]);
    frame.push(vec![
        Cell::from(event.name.as_str()),
        Cell::from(event.display_name.as_str()),
    ]);
    frame
}
