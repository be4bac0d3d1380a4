//! Per-session answer tally.

#[cfg(test)]
#[path = "stats_test.rs"]
mod stats_test;

use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub correct: u32,
    pub incorrect: u32,
}

impl SessionStats {
    pub fn record(&mut self, correct: bool) {
        if correct {
            self.correct += 1;
        } else {
            self.incorrect += 1;
        }
    }

    #[must_use]
    pub fn answered(&self) -> u32 {
        self.correct + self.incorrect
    }

    /// Percentage of correct answers, rounded half away from zero. 0 when nothing was answered.
    #[must_use]
    pub fn accuracy(&self) -> u32 {
        accuracy(self.correct, self.incorrect)
    }
}

#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub fn accuracy(correct: u32, incorrect: u32) -> u32 {
    let total = u64::from(correct) + u64::from(incorrect);
    if total == 0 {
        return 0;
    }
    // Value lies in 0..=100.
    (f64::from(correct) / total as f64 * 100.0).round() as u32
}
