use crate::types::{DraftWindow, Event};

/// Rounds `1..=rounds_total` with the draft window removed, in order.
///
/// A window spanning the whole event leaves nothing to scrape; callers treat an
/// empty plan as a normal outcome.
pub fn constructed_rounds(rounds_total: u32, draft: Option<DraftWindow>) -> Vec<u32> {
    (1..=rounds_total)
        .filter(|round| !draft.is_some_and(|window| window.contains(*round)))
        .collect()
}

impl Event {
    pub fn constructed_rounds(&self) -> Vec<u32> {
        constructed_rounds(self.rounds_total, self.draft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(start: u32, end: u32) -> Option<DraftWindow> {
        Some(DraftWindow { start, end })
    }

    #[test]
    fn test_no_draft_window_keeps_every_round() {
        assert_eq!(constructed_rounds(5, None), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_leading_draft_window() {
        assert_eq!(constructed_rounds(8, window(1, 3)), vec![4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_middle_draft_window() {
        assert_eq!(constructed_rounds(15, window(4, 6)), vec![1, 2, 3, 7, 8, 9, 10, 11, 12, 13, 14, 15]);
    }

    #[test]
    fn test_full_draft_window_is_empty() {
        assert!(constructed_rounds(3, window(1, 3)).is_empty());
    }

    #[test]
    fn test_window_and_plan_partition_the_event() {
        for total in 1..=10u32 {
            for start in 1..=total {
                for end in start..=total {
                    let plan = constructed_rounds(total, window(start, end));
                    let mut all: Vec<u32> = plan.iter().copied().chain(start..=end).collect();
                    all.sort_unstable();
                    assert_eq!(all, (1..=total).collect::<Vec<_>>());
                    assert!(plan.iter().all(|r| *r < start || *r > end));
                }
            }
        }
    }

    #[test]
    fn test_event_constructed_rounds() {
        let event = Event::new("calling-vegas", "Calling: Las Vegas", 8, window(1, 3)).unwrap();
        assert_eq!(event.constructed_rounds(), vec![4, 5, 6, 7, 8]);
    }
}
