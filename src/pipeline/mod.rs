//! Per-event scrape: plan rounds, pull pairings, collect participants, pull
//! decklists, reshape, and append everything to the sink.

pub mod decklists;
pub mod pairings;
pub mod reshape;

use crate::app::ports::{HttpClientPort, TabularSink};
use crate::constants::{DECKLISTS_TABLE, EVENTS_TABLE, PAIRINGS_TABLE, PARTICIPANTS_TABLE};
use crate::error::Result;
use crate::participants::collect_participants;
use crate::types::Event;
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, warn, Instrument};

pub use decklists::{fetch_decklist, fetch_decklists, DecklistBatch};
pub use pairings::{fetch_rounds, RoundBatch};
pub use reshape::reshape;

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub base_url: String,
    /// Skip rounds whose page cannot be fetched instead of aborting the event
    pub continue_on_round_error: bool,
}

/// What one event contributed to the sink.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EventSummary {
    pub event: String,
    pub rounds_planned: usize,
    pub rounds_scraped: Vec<u32>,
    pub rounds_skipped: Vec<u32>,
    pub pairings: usize,
    pub participants: usize,
    pub missing_decklists: usize,
    pub card_lines: usize,
}

/// Outcome of a multi-event run; failed events do not stop later ones.
#[derive(Debug, Default)]
pub struct RunReport {
    pub completed: Vec<EventSummary>,
    pub failed: Vec<(String, String)>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

pub struct Pipeline {
    http: Arc<dyn HttpClientPort>,
    sink: Arc<dyn TabularSink>,
    options: PipelineOptions,
}

impl Pipeline {
    pub fn new(http: Arc<dyn HttpClientPort>, sink: Arc<dyn TabularSink>, options: PipelineOptions) -> Self {
        Self { http, sink, options }
    }

    /// Scrapes one event end to end. Nothing is written unless every round and
    /// the reshape succeed; once writing starts each table is appended on its
    /// own, so a sink failure can leave earlier tables written.
    pub async fn run_event(&self, event: &Event) -> Result<EventSummary> {
        let span = tracing::info_span!("event", event = %event.name);
        self.scrape_event(event).instrument(span).await
    }

    async fn scrape_event(&self, event: &Event) -> Result<EventSummary> {
        info!("Scraping {}", event.display_name);

        let rounds = event.constructed_rounds();
        if rounds.is_empty() {
            warn!("No constructed rounds to scrape");
        }

        let batch = fetch_rounds(
            self.http.as_ref(),
            &self.options.base_url,
            &event.name,
            &rounds,
            self.options.continue_on_round_error,
        )
        .await?;

        let participants = collect_participants(&batch.pairings);
        info!("Found {} participants", participants.len());

        let decklists = fetch_decklists(self.http.as_ref(), &self.options.base_url, &event.name, &participants).await;
        if !decklists.failed.is_empty() {
            warn!("{} decklists replaced with placeholders", decklists.failed.len());
        }

        let (profiles, card_lines) = reshape(&event.name, &decklists.rows)?;

        self.sink
            .append(PARTICIPANTS_TABLE, &reshape::profiles_frame(&profiles), true)?;
        self.sink
            .append(DECKLISTS_TABLE, &reshape::card_lines_frame(&card_lines), true)?;
        self.sink
            .append(PAIRINGS_TABLE, &reshape::pairings_frame(&batch.pairings), false)?;
        self.sink.append(EVENTS_TABLE, &reshape::event_frame(event), false)?;

        let summary = EventSummary {
            event: event.name.clone(),
            rounds_planned: rounds.len(),
            rounds_scraped: batch.scraped,
            rounds_skipped: batch.skipped,
            pairings: batch.pairings.len(),
            participants: participants.len(),
            missing_decklists: decklists.failed.len(),
            card_lines: card_lines.len(),
        };
        info!(
            pairings = summary.pairings,
            participants = summary.participants,
            card_lines = summary.card_lines,
            "Event stored"
        );
        Ok(summary)
    }

    /// Runs every event in order, logging and recording failures.
    pub async fn run(&self, events: &[Event]) -> RunReport {
        let mut report = RunReport::default();
        for event in events {
            match self.run_event(event).await {
                Ok(summary) => report.completed.push(summary),
                Err(e) => {
                    error!(event = %event.name, "Event failed: {}", e);
                    report.failed.push((event.name.clone(), e.to_string()));
                }
            }
        }
        report
    }
}
