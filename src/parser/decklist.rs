use crate::constants::CELL_SELECTOR;
use crate::types::DecklistRow;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

static CELL: Lazy<Selector> = Lazy::new(|| Selector::parse(CELL_SELECTOR).expect("valid cell selector"));

/// Every `td` on a decklist page in document order, whitespace-trimmed.
pub fn extract_cells(markup: &str) -> DecklistRow {
    let document = Html::parse_document(markup);
    DecklistRow::from_cells(
        document
            .select(&CELL)
            .map(|cell| cell.text().collect::<String>().trim().to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cells_are_trimmed_in_document_order() {
        let html = r#"
            <table>
              <tr><td> Jane Doe (12345) </td><td>2025-01-01</td></tr>
              <tr><td></td><td>Classic Constructed</td><td>
                  Dorinthea
              </td></tr>
            </table>
            <table><tr><td>3 x <a href="/cards/cnc">Command and Conquer</a></td></tr></table>
        "#;
        let row = extract_cells(html);
        assert_eq!(
            row,
            DecklistRow::from_cells([
                "Jane Doe (12345)",
                "2025-01-01",
                "",
                "Classic Constructed",
                "Dorinthea",
                "3 x Command and Conquer",
            ])
        );
    }

    #[test]
    fn test_page_without_cells() {
        assert!(extract_cells("<p>Decklist not published</p>").is_empty());
    }
}
