//! Interactive study screen for the terminal.
//!
//! DESIGN
//! ======
//! One event loop per screen: `tokio::select!` over input lines and a
//! one-second interval. Lines become [`StudyInput`] commands applied to the
//! session; interval ticks drive the card countdown. The visible side is
//! redrawn after every change. Deck embeds are resolved once per card.

use std::collections::HashMap;
use std::io::Write;
use std::time::Duration;

use canvas::element::ElementId;
use canvas::render::{ElementView, EmbedView, OptionState, RenderedElement, Segment, render_element};
use study::StudyError;
use study::card::Side;
use study::review::ReviewGrade;
use study::session::{StudySession, Transition};
use time::OffsetDateTime;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::time::MissedTickBehavior;
use tracing::debug;
use uuid::Uuid;

use crate::CliError;
use crate::services::study::{grade_card, resolve_embeds};
use crate::state::AppState;

const HELP: &str = "commands: f flip | n next | p previous | j <n> jump | a [element] <option> answer | \
                    u <password> unlock | g forgot|hard|good|easy grade (review) | r restart | h help | q quit";

// =============================================================================
// INPUT
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudyInput {
    Flip,
    Next,
    Previous,
    /// Zero-based card index.
    Jump(usize),
    /// Zero-based option. Without an element the first unanswered quiz is used.
    Answer { element: Option<ElementId>, option: usize },
    Unlock(String),
    Grade(ReviewGrade),
    Restart,
    Help,
    Quit,
}

/// Parse one input line. Numbers typed by the user are one-based.
///
/// # Errors
///
/// Returns a message to show when the line is not a command.
pub fn parse_input(line: &str) -> Result<StudyInput, String> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(StudyInput::Next);
    };
    let rest: Vec<&str> = words.collect();
    match (command, rest.as_slice()) {
        ("f" | "flip", []) => Ok(StudyInput::Flip),
        ("n" | "next", []) => Ok(StudyInput::Next),
        ("p" | "prev" | "previous", []) => Ok(StudyInput::Previous),
        ("j" | "jump", [n]) => one_based(n).map(StudyInput::Jump),
        ("a" | "answer", [option]) => Ok(StudyInput::Answer { element: None, option: one_based(option)? }),
        ("a" | "answer", [element, option]) => {
            Ok(StudyInput::Answer { element: Some((*element).to_string()), option: one_based(option)? })
        }
        ("u" | "unlock", [password]) => Ok(StudyInput::Unlock((*password).to_string())),
        ("g" | "grade", [grade]) => serde_json::from_value(serde_json::Value::String(grade.to_ascii_lowercase()))
            .map(StudyInput::Grade)
            .map_err(|_| format!("unknown grade: {grade}")),
        ("r" | "restart", []) => Ok(StudyInput::Restart),
        ("h" | "help" | "?", []) => Ok(StudyInput::Help),
        ("q" | "quit" | "exit", []) => Ok(StudyInput::Quit),
        _ => Err(format!("unknown command: {}", line.trim())),
    }
}

fn one_based(word: &str) -> Result<usize, String> {
    match word.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n - 1),
        _ => Err(format!("expected a number from 1: {word}")),
    }
}

// =============================================================================
// DRAWING
// =============================================================================

/// Terminal lines for one rendered element.
#[must_use]
pub fn view_lines(rendered: &RenderedElement) -> Vec<String> {
    match &rendered.view {
        ElementView::Text { lines } => lines.iter().map(|l| format!("  {l}")).collect(),
        ElementView::Image { src, alt } => vec![format!("  [image] {alt} <{src}>")],
        ElementView::Audio { src } => vec![format!("  [audio] <{src}>")],
        ElementView::Drawing { paths } => vec![format!("  [drawing, {} strokes]", paths.len())],
        ElementView::Choice { question, options } => {
            let mut lines = vec![format!("  [{}] {question}", rendered.id)];
            for (i, option) in options.iter().enumerate() {
                let mark = match option.state {
                    OptionState::Idle => " ",
                    OptionState::Selected => ">",
                    OptionState::Correct => "+",
                    OptionState::Incorrect => "x",
                };
                lines.push(format!("   {mark} {}) {}", i + 1, option.label));
            }
            lines
        }
        ElementView::FillInBlank { segments } => {
            let text: String = segments
                .iter()
                .map(|s| match s {
                    Segment::Text { text } => text.clone(),
                    Segment::Blank { answer, .. } => "_".repeat(answer.chars().count().max(3)),
                })
                .collect();
            vec![format!("  {text}")]
        }
        ElementView::Youtube { embed_url } => vec![format!("  [video] <{embed_url}>")],
        ElementView::DeckEmbed { embed } => vec![match embed {
            EmbedView::Unlinked => "  [deck] not linked".to_string(),
            EmbedView::Resolved { title, card_count, .. } => format!("  [deck] {title} ({card_count} cards)"),
            EmbedView::NotFound { deck_id } => format!("  [deck] not found: {deck_id}"),
        }],
        ElementView::Tts { text, .. } => vec![format!("  [speak] {text}")],
        ElementView::Placeholder { label } => vec![format!("  [{label}]")],
    }
}

// =============================================================================
// LOOP
// =============================================================================

/// Final tally printed when the screen closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StudySummary {
    pub correct: u32,
    pub incorrect: u32,
    pub accuracy: u32,
    pub completed: bool,
}

pub struct StudyScreen<'a, W: Write> {
    state: &'a AppState,
    session: StudySession,
    review: bool,
    out: W,
    embeds: HashMap<String, canvas::render::EmbeddedDeck>,
    embeds_for: Option<Uuid>,
}

impl<'a, W: Write> StudyScreen<'a, W> {
    pub fn new(state: &'a AppState, session: StudySession, review: bool, out: W) -> Self {
        Self { state, session, review, out, embeds: HashMap::new(), embeds_for: None }
    }

    /// Run until the input ends or the user quits.
    ///
    /// # Errors
    ///
    /// Fails when reading input or writing output fails. Session and backend
    /// errors are shown and the loop continues.
    pub async fn run<R: AsyncBufRead + Unpin>(mut self, input: R) -> Result<StudySummary, CliError> {
        let mut lines = input.lines();
        let mut ticker = tokio::time::interval(Duration::from_secs(1));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;

        writeln!(self.out, "{HELP}")?;
        self.draw().await?;
        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    match parse_input(&line) {
                        Ok(StudyInput::Quit) => break,
                        Ok(input) => self.apply(input).await?,
                        Err(message) => writeln!(self.out, "{message}")?,
                    }
                }
                _ = ticker.tick() => {
                    if let Some(transition) = self.session.tick() {
                        debug!(?transition, "countdown transition");
                        self.draw().await?;
                    }
                }
            }
        }

        let stats = self.session.stats();
        let summary = StudySummary {
            correct: stats.correct,
            incorrect: stats.incorrect,
            accuracy: self.session.accuracy(),
            completed: self.session.is_complete(),
        };
        writeln!(self.out, "correct {} | incorrect {} | accuracy {}%", summary.correct, summary.incorrect, summary.accuracy)?;
        Ok(summary)
    }

    async fn apply(&mut self, input: StudyInput) -> Result<(), CliError> {
        let result = match input {
            StudyInput::Flip => self.session.flip().map(Some),
            StudyInput::Next => Ok(Some(self.session.next())),
            StudyInput::Previous => self.session.previous().map(Some),
            StudyInput::Jump(index) => self.session.go_to(index).map(Some),
            StudyInput::Answer { element, option } => return self.answer(element, option).await,
            StudyInput::Unlock(password) => self.session.unlock(&password).map(|()| None),
            StudyInput::Grade(grade) => return self.grade(grade).await,
            StudyInput::Restart => {
                self.session.restart();
                Ok(Some(Transition::Moved { index: 0 }))
            }
            StudyInput::Help => {
                writeln!(self.out, "{HELP}")?;
                return Ok(());
            }
            StudyInput::Quit => return Ok(()),
        };
        match result {
            Ok(_) => self.draw().await,
            Err(e) => Ok(writeln!(self.out, "{e}")?),
        }
    }

    async fn answer(&mut self, element: Option<ElementId>, option: usize) -> Result<(), CliError> {
        let candidates: Vec<ElementId> = match element {
            Some(id) => vec![id],
            None => self
                .session
                .visible_elements()
                .iter()
                .filter(|e| e.kind.correct_answer().is_some())
                .map(|e| e.id.clone())
                .collect(),
        };
        if candidates.is_empty() {
            writeln!(self.out, "nothing to answer on this side")?;
            return Ok(());
        }
        let mut last_err = None;
        for id in &candidates {
            match self.session.answer(id, option) {
                Ok(outcome) => {
                    let verdict = if outcome.is_correct() { "correct" } else { "incorrect" };
                    writeln!(self.out, "{verdict}")?;
                    return self.draw().await;
                }
                Err(e @ StudyError::AnswerLocked(_)) => last_err = Some(e),
                Err(e) => {
                    writeln!(self.out, "{e}")?;
                    return Ok(());
                }
            }
        }
        if let Some(e) = last_err {
            writeln!(self.out, "{e}")?;
        }
        Ok(())
    }

    async fn grade(&mut self, grade: ReviewGrade) -> Result<(), CliError> {
        if !self.review {
            writeln!(self.out, "grading is only available in review mode")?;
            return Ok(());
        }
        let card_id = self.session.current().id;
        match grade_card(self.state, card_id, grade, OffsetDateTime::now_utc()).await {
            Ok(_) => {
                writeln!(self.out, "graded {grade:?}")?;
                self.session.next();
                self.draw().await
            }
            Err(e) => {
                let notice = crate::notice::Notice::from_error("grade card", &e);
                Ok(writeln!(self.out, "{notice}")?)
            }
        }
    }

    async fn draw(&mut self) -> Result<(), CliError> {
        if self.session.is_complete() {
            writeln!(
                self.out,
                "session complete: accuracy {}% (r to restart, q to quit)",
                self.session.accuracy()
            )?;
            return Ok(());
        }
        let card_id = self.session.current().id;
        if self.embeds_for != Some(card_id) {
            let card = self.session.current();
            let elements: Vec<_> = card.front_elements.iter().chain(&card.back_elements).cloned().collect();
            self.embeds = resolve_embeds(self.state, &elements).await;
            self.embeds_for = Some(card_id);
        }

        let side = match self.session.side() {
            Side::Front => "front",
            Side::Back => "back",
        };
        let timer = self.session.remaining_seconds().map(|s| format!(" | {s}s")).unwrap_or_default();
        writeln!(self.out, "-- card {}/{} | {side}{timer} --", self.session.index() + 1, self.session.len())?;
        if self.session.is_locked() {
            writeln!(self.out, "  locked: u <password> to unlock")?;
            return Ok(());
        }
        let ctx = self.session.render_context(self.embeds.clone());
        let mut elements: Vec<_> = self.session.visible_elements().iter().collect();
        elements.sort_by_key(|e| e.z_index);
        for element in elements {
            for line in view_lines(&render_element(element, &ctx)) {
                writeln!(self.out, "{line}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "study_loop_test.rs"]
mod tests;
