use crate::constants::{LINK_SELECTOR, PLAYER_BLOCK_SELECTOR, RESULT_BLOCK_SELECTOR};
use crate::error::{Result, ScraperError};
use crate::parser::ids::{participant_id_from_href, winning_seat};
use crate::types::{Outcome, PairingRecord, ParticipantId};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

static PLAYER_BLOCK: Lazy<Selector> =
    Lazy::new(|| Selector::parse(PLAYER_BLOCK_SELECTOR).expect("valid player selector"));
static RESULT_BLOCK: Lazy<Selector> =
    Lazy::new(|| Selector::parse(RESULT_BLOCK_SELECTOR).expect("valid result selector"));
static LINK: Lazy<Selector> = Lazy::new(|| Selector::parse(LINK_SELECTOR).expect("valid link selector"));

/// Parses one round's results page into one record per seat.
///
/// Player blocks and result blocks are matched by position: players `2t` and
/// `2t + 1` sit at table `t + 1` and share result block `t`. Any other ratio is
/// rejected instead of guessed at.
pub fn extract_pairings(event: &str, round: u32, markup: &str) -> Result<Vec<PairingRecord>> {
    let document = Html::parse_document(markup);
    let players: Vec<ElementRef> = document.select(&PLAYER_BLOCK).collect();
    let results: Vec<String> = document
        .select(&RESULT_BLOCK)
        .map(|block| block.text().collect::<String>())
        .collect();

    if players.len() % 2 != 0 || results.len() * 2 != players.len() {
        return Err(ScraperError::Alignment {
            players: players.len(),
            results: results.len(),
        });
    }

    let mut records = Vec::with_capacity(players.len());
    for (idx, block) in players.iter().enumerate() {
        let table = (idx / 2) as u32 + 1;
        let seat = (idx % 2) as u8 + 1;
        let winner = winning_seat(&results[idx / 2]);
        if winner == 0 && seat == 1 {
            debug!(round, table, "Table recorded as a draw");
        }

        records.push(PairingRecord {
            event: event.to_string(),
            round,
            table,
            seat,
            participant_id: block_participant_id(block),
            outcome: Outcome::for_seat(winner, seat),
        });
    }

    Ok(records)
}

fn block_participant_id(block: &ElementRef) -> Option<ParticipantId> {
    block
        .select(&LINK)
        .filter_map(|link| link.value().attr("href"))
        .find_map(participant_id_from_href)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(href: Option<&str>) -> String {
        match href {
            Some(h) => format!(
                r#"<div class="tournament-coverage__player-hero-and-deck"><a href="{h}">Player</a></div>"#
            ),
            None => r#"<div class="tournament-coverage__player-hero-and-deck"><span>BYE</span></div>"#.to_string(),
        }
    }

    fn result(text: &str) -> String {
        format!(r#"<div class="tournament-coverage__result">{text}</div>"#)
    }

    fn page(tables: &[(Option<&str>, Option<&str>, &str)]) -> String {
        let mut body = String::from("<html><body>");
        for (p1, p2, res) in tables {
            body.push_str("<div class=\"tournament-coverage__row\">");
            body.push_str(&player(*p1));
            body.push_str(&result(res));
            body.push_str(&player(*p2));
            body.push_str("</div>");
        }
        body.push_str("</body></html>");
        body
    }

    #[test]
    fn test_win_and_draw_tables() {
        let html = page(&[
            (Some("/en/coverage/x/decklist/101/"), Some("/en/coverage/x/decklist/102/"), "Player 2 Wins 2-1"),
            (Some("/en/coverage/x/decklist/103/"), Some("/en/coverage/x/decklist/104/"), "Draw"),
        ]);
        let records = extract_pairings("x", 4, &html).unwrap();
        assert_eq!(records.len(), 4);

        let summary: Vec<(u32, u8, Outcome)> = records.iter().map(|r| (r.table, r.seat, r.outcome)).collect();
        assert_eq!(
            summary,
            vec![
                (1, 1, Outcome::Loss),
                (1, 2, Outcome::Win),
                (2, 1, Outcome::Draw),
                (2, 2, Outcome::Draw),
            ]
        );
        assert_eq!(records[0].participant_id, Some(ParticipantId::new("101")));
        assert_eq!(records[3].participant_id, Some(ParticipantId::new("104")));
        assert!(records.iter().all(|r| r.round == 4 && r.event == "x"));
    }

    #[test]
    fn test_player_without_link_has_no_id() {
        let html = page(&[(Some("/players/55/"), None, "Player 1 Wins")]);
        let records = extract_pairings("x", 1, &html).unwrap();
        assert_eq!(records[0].participant_id, Some(ParticipantId::new("55")));
        assert_eq!(records[0].outcome, Outcome::Win);
        assert_eq!(records[1].participant_id, None);
        assert_eq!(records[1].outcome, Outcome::Loss);
    }

    #[test]
    fn test_first_numeric_link_wins() {
        let html = format!(
            r#"<div class="tournament-coverage__player-hero-and-deck"><a href="/heroes/dorinthea/">Hero</a><a href="/decklist/77/">Deck</a></div>
               <div class="tournament-coverage__player-hero-and-deck"><a href="/decklist/78/">Deck</a></div>{}"#,
            result("Player 1 Wins")
        );
        let records = extract_pairings("x", 1, &html).unwrap();
        assert_eq!(records[0].participant_id, Some(ParticipantId::new("77")));
    }

    #[test]
    fn test_tables_and_outcomes_are_complementary() {
        let html = page(&[
            (Some("/p/1/"), Some("/p/2/"), "Player 1 Wins 2-0"),
            (Some("/p/3/"), Some("/p/4/"), "Player 2 Wins"),
            (Some("/p/5/"), Some("/p/6/"), "Match drawn"),
        ]);
        let records = extract_pairings("x", 2, &html).unwrap();
        for table in 1..=3u32 {
            let seats: Vec<&PairingRecord> = records.iter().filter(|r| r.table == table).collect();
            assert_eq!(seats.len(), 2);
            assert_eq!(seats[0].seat, 1);
            assert_eq!(seats[1].seat, 2);
            let outcomes = (seats[0].outcome, seats[1].outcome);
            assert!(matches!(
                outcomes,
                (Outcome::Win, Outcome::Loss) | (Outcome::Loss, Outcome::Win) | (Outcome::Draw, Outcome::Draw)
            ));
        }
    }

    #[test]
    fn test_misaligned_blocks_are_rejected() {
        let html = format!("{}{}{}", player(Some("/p/1/")), player(Some("/p/2/")), player(Some("/p/3/")));
        let err = extract_pairings("x", 1, &format!("{}{}", html, result("Player 1 Wins"))).unwrap_err();
        assert!(matches!(err, ScraperError::Alignment { players: 3, results: 1 }));

        let html = format!("{}{}", player(Some("/p/1/")), player(Some("/p/2/")));
        assert!(extract_pairings("x", 1, &html).is_err());
    }

    #[test]
    fn test_empty_round() {
        let records = extract_pairings("x", 1, "<html><body></body></html>").unwrap();
        assert!(records.is_empty());
    }
}
