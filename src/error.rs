use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("SQLite error: {0}")]
    Sql(#[from] rusqlite::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Sink error: {0}")]
    Sink(String),

    #[error("Invalid event definition: {0}")]
    InvalidEvent(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Player blocks and result blocks are misaligned: {players} players, {results} results")]
    Alignment { players: usize, results: usize },

    #[error("Round {round} of {event} could not be fetched (status {status})")]
    RoundFetch { event: String, round: u32, status: u16 },
}

pub type Result<T> = std::result::Result<T, ScraperError>;
