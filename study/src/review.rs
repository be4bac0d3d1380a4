//! Review queue: cards whose next review time has arrived, and the fixed
//! interval schedule that sets the next review time after a grade.

#[cfg(test)]
#[path = "review_test.rs"]
mod review_test;

use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::card::Flashcard;

/// Cards due at `now`, most overdue first. Cards never scheduled come last,
/// in deck order.
#[must_use]
pub fn due_cards(cards: &[Flashcard], now: OffsetDateTime) -> Vec<Flashcard> {
    let mut scheduled: Vec<&Flashcard> =
        cards.iter().filter(|c| c.next_review_at.is_some_and(|at| at <= now)).collect();
    scheduled.sort_by_key(|c| (c.next_review_at, c.position));

    let mut fresh: Vec<&Flashcard> = cards.iter().filter(|c| c.next_review_at.is_none()).collect();
    fresh.sort_by_key(|c| c.position);

    scheduled.into_iter().chain(fresh).cloned().collect()
}

/// Number of cards [`due_cards`] would return.
#[must_use]
pub fn due_count(cards: &[Flashcard], now: OffsetDateTime) -> usize {
    cards.iter().filter(|c| c.next_review_at.is_none_or(|at| at <= now)).count()
}

/// Self-assessed recall for a reviewed card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewGrade {
    Forgot,
    Hard,
    Good,
    Easy,
}

impl ReviewGrade {
    #[must_use]
    pub fn interval(self) -> Duration {
        match self {
            Self::Forgot => Duration::minutes(10),
            Self::Hard => Duration::days(1),
            Self::Good => Duration::days(3),
            Self::Easy => Duration::days(7),
        }
    }
}

/// When a card graded at `now` comes due again.
#[must_use]
pub fn next_review_at(now: OffsetDateTime, grade: ReviewGrade) -> OffsetDateTime {
    now + grade.interval()
}
