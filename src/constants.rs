//! Coverage site and table-name constants shared across the pipeline.

pub const DEFAULT_BASE_URL: &str = "https://fabtcg.com/en";
pub const DEFAULT_DATABASE: &str = "fab_world_tour.db";
pub const DEFAULT_EXPORT_SOURCE: &str = "csv_output";
pub const DEFAULT_LOG_DIR: &str = "logs";
pub const DEFAULT_EVENTS_CSV: &str = "events.csv";
pub const DEFAULT_USER_AGENT: &str = concat!("wt_scraper/", env!("CARGO_PKG_VERSION"));

// CSS selectors for coverage markup
pub const PLAYER_BLOCK_SELECTOR: &str = "div.tournament-coverage__player-hero-and-deck";
pub const RESULT_BLOCK_SELECTOR: &str = "div.tournament-coverage__result";
pub const LINK_SELECTOR: &str = "a[href]";
pub const CELL_SELECTOR: &str = "td";

// Sink table names
pub const EVENTS_TABLE: &str = "events";
pub const PARTICIPANTS_TABLE: &str = "participants";
pub const DECKLISTS_TABLE: &str = "decklists";
pub const PAIRINGS_TABLE: &str = "pairings";

// Column names as they appear in the sink
pub const GEM_ID_COLUMN: &str = "Gem ID";
pub const EVENT_NAME_COLUMN: &str = "Event Name";

/// Placeholder written into sentinel rows for unreachable decklists.
pub const UNKNOWN: &str = "Unknown";

/// `{base}/coverage/{event}/results/{round}/`
pub fn results_url(base_url: &str, event: &str, round: u32) -> String {
    format!("{}/coverage/{}/results/{}/", base_url.trim_end_matches('/'), event, round)
}

/// `{base}/coverage/{event}/decklist/{participant}/`
pub fn decklist_url(base_url: &str, event: &str, participant_id: &str) -> String {
    format!(
        "{}/coverage/{}/decklist/{}/",
        base_url.trim_end_matches('/'),
        event,
        participant_id
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_results_url() {
        assert_eq!(
            results_url("https://fabtcg.com/en", "calling-vegas", 4),
            "https://fabtcg.com/en/coverage/calling-vegas/results/4/"
        );
    }

    #[test]
    fn test_decklist_url_trims_trailing_slash() {
        assert_eq!(
            decklist_url("https://fabtcg.com/en/", "calling-vegas", "12345"),
            "https://fabtcg.com/en/coverage/calling-vegas/decklist/12345/"
        );
    }
}
