use crate::app::ports::HttpClientPort;
use crate::constants::decklist_url;
use crate::parser::extract_cells;
use crate::types::{DecklistRow, ParticipantId};
use tracing::{debug, warn};

/// One row per requested participant, in request order.
#[derive(Debug, Default)]
pub struct DecklistBatch {
    pub rows: Vec<DecklistRow>,
    /// Participants whose page could not be fetched and got a sentinel row
    pub failed: Vec<ParticipantId>,
}

/// Fetches one decklist page. Transport errors, non-success statuses and pages
/// without any cells all come back as `None`.
pub async fn fetch_decklist(
    http: &dyn HttpClientPort,
    base_url: &str,
    event: &str,
    participant_id: &ParticipantId,
) -> Option<DecklistRow> {
    let url = decklist_url(base_url, event, participant_id.as_str());
    match http.get(&url).await {
        Ok(resp) if resp.is_success() => {
            let row = extract_cells(&resp.body);
            if row.is_empty() {
                warn!(participant = %participant_id, "Decklist page has no cells");
                return None;
            }
            debug!(participant = %participant_id, cells = row.len(), "Fetched decklist");
            Some(row)
        }
        Ok(resp) => {
            warn!(participant = %participant_id, status = resp.status, "Decklist unavailable");
            None
        }
        Err(e) => {
            warn!(participant = %participant_id, "Decklist fetch failed: {}", e);
            None
        }
    }
}

pub async fn fetch_decklists(
    http: &dyn HttpClientPort,
    base_url: &str,
    event: &str,
    participants: &[ParticipantId],
) -> DecklistBatch {
    let mut batch = DecklistBatch::default();
    for id in participants {
        match fetch_decklist(http, base_url, event, id).await {
            Some(row) => batch.rows.push(row),
            None => {
                batch.rows.push(DecklistRow::sentinel(id));
                batch.failed.push(id.clone());
            }
        }
    }
    batch
}
