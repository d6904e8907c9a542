use crate::app::ports::HttpClientPort;
use crate::constants::results_url;
use crate::error::{Result, ScraperError};
use crate::parser::extract_pairings;
use crate::types::PairingRecord;
use tracing::{info, warn};

/// Pairings gathered for one event, plus the rounds dropped under the
/// continue-on-error policy.
#[derive(Debug, Default)]
pub struct RoundBatch {
    pub pairings: Vec<PairingRecord>,
    pub scraped: Vec<u32>,
    pub skipped: Vec<u32>,
}

/// Fetches and parses each round in order, one page at a time.
///
/// A round page that cannot be fetched aborts the event unless
/// `continue_on_error` is set, in which case the round is skipped. Markup that
/// does not parse always aborts.
pub async fn fetch_rounds(
    http: &dyn HttpClientPort,
    base_url: &str,
    event: &str,
    rounds: &[u32],
    continue_on_error: bool,
) -> Result<RoundBatch> {
    let mut batch = RoundBatch::default();

    for &round in rounds {
        let url = results_url(base_url, event, round);
        let markup = match fetch_round(http, &url, event, round).await {
            Ok(markup) => markup,
            Err(e) if continue_on_error => {
                warn!(round, "Skipping round: {}", e);
                batch.skipped.push(round);
                continue;
            }
            Err(e) => return Err(e),
        };

        let records = extract_pairings(event, round, &markup)?;
        info!(round, "Parsed {} pairing records", records.len());
        batch.pairings.extend(records);
        batch.scraped.push(round);
    }

    Ok(batch)
}

async fn fetch_round(http: &dyn HttpClientPort, url: &str, event: &str, round: u32) -> Result<String> {
    let resp = http.get(url).await?;
    if !resp.is_success() {
        return Err(ScraperError::RoundFetch {
            event: event.to_string(),
            round,
            status: resp.status,
        });
    }
    Ok(resp.body)
}
