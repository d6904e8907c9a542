use crate::constants::UNKNOWN;
use crate::error::{Result, ScraperError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Inclusive, 1-indexed window of draft rounds within an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftWindow {
    pub start: u32,
    pub end: u32,
}

impl DraftWindow {
    pub fn contains(&self, round: u32) -> bool {
        (self.start..=self.end).contains(&round)
    }
}

/// A world tour event as entered by the user or read from the bulk file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Slug used in coverage URLs
    pub name: String,
    pub display_name: String,
    pub rounds_total: u32,
    pub draft: Option<DraftWindow>,
}

impl Event {
    /// Builds an event, rejecting draft windows outside `1..=rounds_total`.
    pub fn new(
        name: impl Into<String>,
        display_name: impl Into<String>,
        rounds_total: u32,
        draft: Option<DraftWindow>,
    ) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ScraperError::InvalidEvent("event URL name is empty".into()));
        }
        if let Some(window) = draft {
            if window.start < 1 || window.start > window.end || window.end > rounds_total {
                return Err(ScraperError::InvalidEvent(format!(
                    "{}: draft rounds {}..={} do not fit within {} rounds",
                    name, window.start, window.end, rounds_total
                )));
            }
        }
        Ok(Self {
            name,
            display_name: display_name.into(),
            rounds_total,
            draft,
        })
    }
}

/// Opaque player identifier lifted from a profile or decklist link.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Loss,
    Draw,
}

impl Outcome {
    /// Outcome for `seat` given the seat reported as winner, 0 meaning a draw.
    pub fn for_seat(winning_seat: u8, seat: u8) -> Self {
        match winning_seat {
            0 => Outcome::Draw,
            w if w == seat => Outcome::Win,
            _ => Outcome::Loss,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Win => "Win",
            Outcome::Loss => "Loss",
            Outcome::Draw => "Draw",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One seat's result at one table in one round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PairingRecord {
    pub event: String,
    pub round: u32,
    pub table: u32,
    /// 1 or 2
    pub seat: u8,
    /// Player sitting in this seat; `None` for byes and withdrawn players
    pub participant_id: Option<ParticipantId>,
    pub outcome: Outcome,
}

/// Raw cells scraped from a decklist page:
/// `[name, event date, (unused), format, hero, card-line...]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DecklistRow(pub Vec<Option<String>>);

impl DecklistRow {
    pub fn from_cells<I, S>(cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(cells.into_iter().map(|c| Some(c.into())).collect())
    }

    /// Stand-in row for a decklist page that could not be fetched.
    pub fn sentinel(id: &ParticipantId) -> Self {
        Self(vec![
            Some(id.to_string()),
            Some(UNKNOWN.to_string()),
            None,
            None,
            None,
            Some(UNKNOWN.to_string()),
        ])
    }

    pub fn cell(&self, idx: usize) -> Option<&str> {
        self.0.get(idx).and_then(|c| c.as_deref())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParticipantProfile {
    pub participant_id: ParticipantId,
    pub name: Option<String>,
    pub event_date: Option<String>,
    pub format: Option<String>,
    pub hero: Option<String>,
    pub event_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardLine {
    pub participant_id: ParticipantId,
    /// Digits only, kept as text the way the page shows it
    pub copies: String,
    pub card: String,
    pub event_name: String,
}
