//! Participant ids are the first run of digits in a link or cell. Every lookup
//! of that convention goes through this module.

use crate::types::ParticipantId;
use once_cell::sync::Lazy;
use regex::Regex;

static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)").expect("valid digit regex"));
static PATH_DIGIT_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/(\d+)").expect("valid path digit regex"));

/// First run of ASCII digits anywhere in `text`.
pub fn first_digit_run(text: &str) -> Option<&str> {
    DIGIT_RUN
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Id from a player link, taken from the first path segment that starts with digits.
pub fn participant_id_from_href(href: &str) -> Option<ParticipantId> {
    PATH_DIGIT_RUN
        .captures(href)
        .and_then(|caps| caps.get(1))
        .map(|m| ParticipantId::new(m.as_str()))
}

/// Winning seat announced in a result block; 0 when the text has no digit (a draw).
pub fn winning_seat(text: &str) -> u8 {
    text.chars()
        .find(char::is_ascii_digit)
        .and_then(|c| c.to_digit(10))
        .map(|d| d as u8)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_digit_run() {
        assert_eq!(first_digit_run("Jane Doe (12345)"), Some("12345"));
        assert_eq!(first_digit_run("id 7 then 88"), Some("7"));
        assert_eq!(first_digit_run("no digits"), None);
    }

    #[test]
    fn test_participant_id_from_href() {
        assert_eq!(
            participant_id_from_href("/en/coverage/pro-tour/decklist/40213/"),
            Some(ParticipantId::new("40213"))
        );
        // digits outside a path segment start are ignored
        assert_eq!(participant_id_from_href("/en/coverage/calling-2025/x/"), None);
        assert_eq!(participant_id_from_href("#"), None);
    }

    #[test]
    fn test_winning_seat() {
        assert_eq!(winning_seat("Player 2 Wins 2-1"), 2);
        assert_eq!(winning_seat("Player 1 Wins"), 1);
        assert_eq!(winning_seat("Draw"), 0);
        assert_eq!(winning_seat(""), 0);
    }
}
