//! Study session state machine.
//!
//! DESIGN
//! ======
//! A session owns its card list in study order (by `position`, optionally
//! shuffled once at start). The host drives it with user actions and a
//! one-second [`StudySession::tick`]. Each card starts on its front; moving
//! to another card always resets the side and restarts the countdown.
//! A side's countdown fires at most once per visit to a card: flipping back
//! to a side whose timer already fired leaves it without a timer.
//!
//! Without free navigation the session is forward-only and completes after
//! the last card. With it, previous/next wrap around and jumps are allowed.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::collections::{HashMap, HashSet};

use canvas::element::{CanvasElement, ElementId};
use canvas::render::{EmbeddedDeck, RenderContext};
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, info};
use uuid::Uuid;

use crate::StudyError;
use crate::card::{CountdownBehavior, Flashcard, FlashcardSet, Side};
use crate::countdown::Countdown;
use crate::quiz::{AnswerOutcome, QuizBoard};
use crate::stats::SessionStats;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    pub shuffle: bool,
    pub allow_navigation: bool,
    /// Run per-side countdowns. Off turns every card into a manual card.
    pub countdown: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self { shuffle: false, allow_navigation: false, countdown: true }
    }
}

impl SessionOptions {
    /// Force shuffling when the set asks for it.
    #[must_use]
    pub fn for_set(mut self, set: &FlashcardSet) -> Self {
        self.shuffle |= set.permanent_shuffle;
        self
    }
}

/// What a session action changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Flipped(Side),
    Moved { index: usize },
    Completed,
}

pub struct StudySession {
    cards: Vec<Flashcard>,
    index: usize,
    side: Side,
    options: SessionOptions,
    stats: SessionStats,
    quiz: QuizBoard,
    timer: Option<Countdown>,
    /// Sides of the current card whose countdown already fired.
    fired: HashSet<Side>,
    unlocked: HashSet<Uuid>,
    completed: bool,
}

impl StudySession {
    /// # Errors
    ///
    /// Returns [`StudyError::NoCards`] for an empty card list.
    pub fn new(cards: Vec<Flashcard>, options: SessionOptions) -> Result<Self, StudyError> {
        Self::with_rng(cards, options, &mut rand::rng())
    }

    /// # Errors
    ///
    /// Returns [`StudyError::NoCards`] for an empty card list.
    pub fn with_rng<R: Rng + ?Sized>(
        mut cards: Vec<Flashcard>,
        options: SessionOptions,
        rng: &mut R,
    ) -> Result<Self, StudyError> {
        cards.sort_by_key(|c| c.position);
        if options.shuffle {
            cards.shuffle(rng);
        }
        Self::start(cards, options)
    }

    /// A session over `cards` in exactly the given order, such as a review
    /// queue. The shuffle option is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`StudyError::NoCards`] for an empty card list.
    pub fn from_queue(cards: Vec<Flashcard>, options: SessionOptions) -> Result<Self, StudyError> {
        Self::start(cards, SessionOptions { shuffle: false, ..options })
    }

    fn start(cards: Vec<Flashcard>, options: SessionOptions) -> Result<Self, StudyError> {
        if cards.is_empty() {
            return Err(StudyError::NoCards);
        }
        info!(cards = cards.len(), shuffle = options.shuffle, "study session started");
        let mut session = Self {
            cards,
            index: 0,
            side: Side::Front,
            options,
            stats: SessionStats::default(),
            quiz: QuizBoard::new(),
            timer: None,
            fired: HashSet::new(),
            unlocked: HashSet::new(),
            completed: false,
        };
        session.restart_timer();
        Ok(session)
    }

    // --- Accessors ---

    #[must_use]
    pub fn current(&self) -> &Flashcard {
        &self.cards[self.index]
    }

    #[must_use]
    pub fn cards(&self) -> &[Flashcard] {
        &self.cards
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[must_use]
    pub fn side(&self) -> Side {
        self.side
    }

    #[must_use]
    pub fn options(&self) -> SessionOptions {
        self.options
    }

    #[must_use]
    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    #[must_use]
    pub fn accuracy(&self) -> u32 {
        self.stats.accuracy()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completed
    }

    /// Seconds left on the visible side's countdown, if one is running.
    #[must_use]
    pub fn remaining_seconds(&self) -> Option<u32> {
        self.timer.filter(|t| !t.has_fired()).map(|t| t.remaining())
    }

    /// The current card is password-protected and not yet unlocked.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        let card = self.current();
        card.requires_password() && !self.unlocked.contains(&card.id)
    }

    /// Elements on the visible side. Empty while the card is locked.
    #[must_use]
    pub fn visible_elements(&self) -> &[CanvasElement] {
        if self.is_locked() { &[] } else { self.current().elements(self.side) }
    }

    /// Render lookups for the visible side, carrying this session's quiz selections.
    #[must_use]
    pub fn render_context(&self, embeds: HashMap<String, EmbeddedDeck>) -> RenderContext {
        RenderContext { embeds, selections: self.quiz.selections_for(self.current().id) }
    }

    // --- Actions ---

    /// Show the other side of the current card.
    ///
    /// # Errors
    ///
    /// Fails on locked cards, front-only cards, and completed sessions.
    pub fn flip(&mut self) -> Result<Transition, StudyError> {
        self.ensure_active()?;
        if !self.current().has_back() {
            return Err(StudyError::NoBackSide);
        }
        self.side = self.side.other();
        debug!(card = %self.current().id, side = ?self.side, "flipped");
        self.restart_timer();
        Ok(Transition::Flipped(self.side))
    }

    /// Advance to the next card. Past the last card this wraps when free
    /// navigation is on and completes the session otherwise.
    pub fn next(&mut self) -> Transition {
        if self.completed {
            return Transition::Completed;
        }
        if self.index + 1 < self.cards.len() {
            self.move_to(self.index + 1)
        } else if self.options.allow_navigation {
            self.move_to(0)
        } else {
            self.completed = true;
            self.timer = None;
            info!(correct = self.stats.correct, incorrect = self.stats.incorrect, "study session complete");
            Transition::Completed
        }
    }

    /// Go back one card, wrapping to the last card from the first.
    ///
    /// # Errors
    ///
    /// Fails when free navigation is off or the session is complete.
    pub fn previous(&mut self) -> Result<Transition, StudyError> {
        if !self.options.allow_navigation {
            return Err(StudyError::NavigationDisabled);
        }
        if self.completed {
            return Err(StudyError::SessionComplete);
        }
        let target = if self.index == 0 { self.cards.len() - 1 } else { self.index - 1 };
        Ok(self.move_to(target))
    }

    /// Jump straight to card `index`.
    ///
    /// # Errors
    ///
    /// Fails when free navigation is off, the session is complete, or the index is out of range.
    pub fn go_to(&mut self, index: usize) -> Result<Transition, StudyError> {
        if !self.options.allow_navigation {
            return Err(StudyError::NavigationDisabled);
        }
        if self.completed {
            return Err(StudyError::SessionComplete);
        }
        if index >= self.cards.len() {
            return Err(StudyError::IndexOutOfRange { index, len: self.cards.len() });
        }
        Ok(self.move_to(index))
    }

    /// One second of wall time. Returns the transition the countdown caused, if any.
    pub fn tick(&mut self) -> Option<Transition> {
        if self.completed || self.is_locked() {
            return None;
        }
        let behavior = self.timer.as_mut()?.tick()?;
        self.fired.insert(self.side);
        debug!(card = %self.current().id, ?behavior, "countdown fired");
        if behavior == CountdownBehavior::Flip && self.current().has_back() {
            self.side = self.side.other();
            self.restart_timer();
            return Some(Transition::Flipped(self.side));
        }
        Some(self.next())
    }

    /// Answer a quiz element on the visible side and score it.
    ///
    /// # Errors
    ///
    /// Fails on locked cards, completed sessions, unknown or non-quiz
    /// elements, and answers whose results are already shown.
    pub fn answer(&mut self, element_id: &ElementId, index: usize) -> Result<AnswerOutcome, StudyError> {
        self.ensure_active()?;
        let card = &self.cards[self.index];
        let element =
            card.find_element(self.side, element_id).ok_or_else(|| StudyError::ElementNotFound(element_id.clone()))?;
        let outcome = self.quiz.answer(card.id, element, index)?;
        self.stats.record(outcome.is_correct());
        debug!(card = %card.id, element = %element_id, ?outcome, "quiz answered");
        Ok(outcome)
    }

    /// Unlock the current password-protected card.
    ///
    /// # Errors
    ///
    /// Returns [`StudyError::WrongPassword`] when the password does not match.
    pub fn unlock(&mut self, password: &str) -> Result<(), StudyError> {
        let card = self.current();
        if !card.requires_password() {
            return Ok(());
        }
        if card.password.as_deref() != Some(password) {
            return Err(StudyError::WrongPassword);
        }
        let id = card.id;
        self.unlocked.insert(id);
        self.restart_timer();
        Ok(())
    }

    /// Start over from the first card with fresh statistics and answers.
    pub fn restart(&mut self) {
        self.stats = SessionStats::default();
        self.quiz = QuizBoard::new();
        self.completed = false;
        self.move_to(0);
    }

    // --- Internals ---

    fn ensure_active(&self) -> Result<(), StudyError> {
        if self.completed {
            return Err(StudyError::SessionComplete);
        }
        if self.is_locked() {
            return Err(StudyError::CardLocked);
        }
        Ok(())
    }

    fn move_to(&mut self, index: usize) -> Transition {
        self.index = index;
        self.side = Side::Front;
        self.fired.clear();
        debug!(index, card = %self.current().id, "moved");
        self.restart_timer();
        Transition::Moved { index }
    }

    fn restart_timer(&mut self) {
        self.timer = None;
        if !self.options.countdown || self.is_locked() || self.fired.contains(&self.side) {
            return;
        }
        let card = self.current();
        self.timer = Countdown::start(card.countdown_seconds(self.side), card.effective_countdown_behavior(self.side));
    }
}
