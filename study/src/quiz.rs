//! Quiz answers for multiple-choice and true/false elements.
//!
//! A selection may change freely until results are shown. Checking an answer
//! shows the results and freezes the selection for the rest of the session.

#[cfg(test)]
#[path = "quiz_test.rs"]
mod quiz_test;

use std::collections::HashMap;

use canvas::element::{CanvasElement, ElementId};
use canvas::render::Selection;
use uuid::Uuid;

use crate::StudyError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    Correct,
    Incorrect,
}

impl AnswerOutcome {
    #[must_use]
    pub fn is_correct(self) -> bool {
        self == Self::Correct
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct QuizAnswer {
    selected: usize,
    show_results: bool,
}

/// Answers for every quiz element seen in a session, keyed by card and element.
#[derive(Debug, Clone, Default)]
pub struct QuizBoard {
    answers: HashMap<(Uuid, ElementId), QuizAnswer>,
}

impl QuizBoard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a tentative choice without showing results.
    ///
    /// # Errors
    ///
    /// Fails when the element is not a quiz, the option is out of range, or
    /// results are already shown.
    pub fn select(&mut self, card: Uuid, element: &CanvasElement, index: usize) -> Result<(), StudyError> {
        let options = element.kind.option_count().ok_or_else(|| StudyError::NotAQuiz(element.id.clone()))?;
        if index >= options {
            return Err(StudyError::OptionOutOfRange { element: element.id.clone(), index, options });
        }
        let entry = self
            .answers
            .entry((card, element.id.clone()))
            .or_insert(QuizAnswer { selected: index, show_results: false });
        if entry.show_results {
            return Err(StudyError::AnswerLocked(element.id.clone()));
        }
        entry.selected = index;
        Ok(())
    }

    /// Show results for the current selection and score it.
    ///
    /// # Errors
    ///
    /// Fails when nothing was selected, the element is not a quiz, or
    /// results are already shown.
    pub fn check(&mut self, card: Uuid, element: &CanvasElement) -> Result<AnswerOutcome, StudyError> {
        let correct = element.kind.correct_answer().ok_or_else(|| StudyError::NotAQuiz(element.id.clone()))?;
        let answer = self
            .answers
            .get_mut(&(card, element.id.clone()))
            .ok_or_else(|| StudyError::NoSelection(element.id.clone()))?;
        if answer.show_results {
            return Err(StudyError::AnswerLocked(element.id.clone()));
        }
        answer.show_results = true;
        Ok(if answer.selected == correct { AnswerOutcome::Correct } else { AnswerOutcome::Incorrect })
    }

    /// Select and check in one step.
    ///
    /// # Errors
    ///
    /// See [`QuizBoard::select`] and [`QuizBoard::check`].
    pub fn answer(&mut self, card: Uuid, element: &CanvasElement, index: usize) -> Result<AnswerOutcome, StudyError> {
        self.select(card, element, index)?;
        self.check(card, element)
    }

    #[must_use]
    pub fn is_revealed(&self, card: Uuid, element: &ElementId) -> bool {
        self.answers.get(&(card, element.clone())).is_some_and(|a| a.show_results)
    }

    /// Renderer selections for one card.
    #[must_use]
    pub fn selections_for(&self, card: Uuid) -> HashMap<ElementId, Selection> {
        self.answers
            .iter()
            .filter(|((c, _), _)| *c == card)
            .map(|((_, id), a)| (id.clone(), Selection { selected: a.selected, revealed: a.show_results }))
            .collect()
    }
}
