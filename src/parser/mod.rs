//! Markup parsing for coverage pages. Nothing in here performs I/O.

pub mod decklist;
pub mod ids;
pub mod pairings;

pub use decklist::extract_cells;
pub use ids::{first_digit_run, participant_id_from_href};
pub use pairings::extract_pairings;
