//! Flashcard data model and the study-mode state machine.
//!
//! The study flow is driven by a host event loop: it calls
//! [`session::StudySession::tick`] once per second and forwards user actions
//! (flip, next, answer). Sessions are ephemeral; nothing here persists.
//!
//! | Module | Role |
//! |--------|------|
//! | [`card`] | Sets, cards, card types, countdown settings |
//! | [`countdown`] | One-shot per-side countdown timer |
//! | [`quiz`] | Quiz answer state with freeze-on-reveal |
//! | [`stats`] | Correct/incorrect tally and accuracy |
//! | [`session`] | Study session: navigation, flipping, timers, scoring |
//! | [`review`] | Due-card filtering for the review queue |

pub mod card;
pub mod countdown;
pub mod quiz;
pub mod review;
pub mod session;
pub mod stats;

use canvas::element::ElementId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StudyError {
    #[error("the set has no cards to study")]
    NoCards,
    #[error("free navigation is disabled for this session")]
    NavigationDisabled,
    #[error("card index {index} out of range (0..{len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("element not found on the visible side: {0}")]
    ElementNotFound(ElementId),
    #[error("element {0} is not a quiz")]
    NotAQuiz(ElementId),
    #[error("option {index} out of range for element {element} ({options} options)")]
    OptionOutOfRange { element: ElementId, index: usize, options: usize },
    #[error("no option selected for element {0}")]
    NoSelection(ElementId),
    #[error("results already shown for element {0}")]
    AnswerLocked(ElementId),
    #[error("this card has no back side")]
    NoBackSide,
    #[error("the session is complete")]
    SessionComplete,
    #[error("card is locked; enter its password first")]
    CardLocked,
    #[error("wrong password")]
    WrongPassword,
}
