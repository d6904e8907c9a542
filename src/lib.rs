pub mod app;
pub mod config;
pub mod constants;
pub mod error;
pub mod events_input;
pub mod infra;
pub mod logging;
pub mod parser;
pub mod participants;
pub mod pipeline;
pub mod rounds;
pub mod storage;
pub mod types;

pub use error::{Result, ScraperError};
