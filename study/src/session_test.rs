use canvas::element::ElementKind;
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::*;
use crate::card::CardType;

fn card(position: i32) -> Flashcard {
    Flashcard::new(Uuid::new_v4(), position)
}

fn deck(n: i32) -> Vec<Flashcard> {
    (0..n).map(card).collect()
}

fn manual() -> SessionOptions {
    SessionOptions { countdown: false, ..SessionOptions::default() }
}

fn navigable() -> SessionOptions {
    SessionOptions { allow_navigation: true, ..manual() }
}

fn navigable_timed() -> SessionOptions {
    SessionOptions { allow_navigation: true, ..SessionOptions::default() }
}

fn quiz_card(position: i32, correct: usize) -> Flashcard {
    let mut c = card(position);
    c.front_elements.push(CanvasElement::new(
        "q",
        ElementKind::TrueFalse { question: "Water is wet".into(), correct_answer: correct },
        0.0,
        0.0,
    ));
    c
}

// --- Construction ---

#[test]
fn empty_deck_is_rejected() {
    assert!(matches!(StudySession::new(Vec::new(), manual()), Err(StudyError::NoCards)));
}

#[test]
fn cards_are_ordered_by_position() {
    let cards = vec![card(2), card(0), card(1)];
    let session = StudySession::new(cards, manual()).unwrap();
    let positions: Vec<i32> = session.cards().iter().map(|c| c.position).collect();
    assert_eq!(positions, vec![0, 1, 2]);
}

#[test]
fn shuffle_keeps_every_card() {
    let cards = deck(20);
    let mut ids: Vec<Uuid> = cards.iter().map(|c| c.id).collect();
    let opts = SessionOptions { shuffle: true, ..manual() };
    let session = StudySession::with_rng(cards, opts, &mut StdRng::seed_from_u64(7)).unwrap();
    let mut shuffled: Vec<Uuid> = session.cards().iter().map(|c| c.id).collect();
    ids.sort();
    shuffled.sort();
    assert_eq!(ids, shuffled);
}

#[test]
fn permanent_shuffle_forces_shuffle() {
    let mut set = FlashcardSet::new(Uuid::new_v4(), "Spanish");
    set.permanent_shuffle = true;
    assert!(manual().for_set(&set).shuffle);
    set.permanent_shuffle = false;
    assert!(!manual().for_set(&set).shuffle);
}

#[test]
fn queue_keeps_given_order() {
    let cards = vec![card(2), card(0), card(1)];
    let opts = SessionOptions { shuffle: true, ..manual() };
    let session = StudySession::from_queue(cards, opts).unwrap();
    let positions: Vec<i32> = session.cards().iter().map(|c| c.position).collect();
    assert_eq!(positions, vec![2, 0, 1]);
    assert!(!session.options().shuffle);
    assert!(matches!(StudySession::from_queue(Vec::new(), manual()), Err(StudyError::NoCards)));
}

// --- Navigation ---

#[test]
fn forward_only_completes_after_last_card() {
    let mut session = StudySession::new(deck(2), manual()).unwrap();
    assert_eq!(session.next(), Transition::Moved { index: 1 });
    assert_eq!(session.next(), Transition::Completed);
    assert!(session.is_complete());
    assert_eq!(session.next(), Transition::Completed);
}

#[test]
fn previous_requires_navigation() {
    let mut session = StudySession::new(deck(3), manual()).unwrap();
    assert_eq!(session.previous(), Err(StudyError::NavigationDisabled));
    assert_eq!(session.go_to(2), Err(StudyError::NavigationDisabled));
}

#[test]
fn navigation_wraps_both_ways() {
    let mut session = StudySession::new(deck(3), navigable()).unwrap();
    assert_eq!(session.previous(), Ok(Transition::Moved { index: 2 }));
    assert_eq!(session.next(), Transition::Moved { index: 0 });
    assert!(!session.is_complete());
}

#[test]
fn go_to_checks_range() {
    let mut session = StudySession::new(deck(3), navigable()).unwrap();
    assert_eq!(session.go_to(1), Ok(Transition::Moved { index: 1 }));
    assert_eq!(session.go_to(3), Err(StudyError::IndexOutOfRange { index: 3, len: 3 }));
}

#[test]
fn moving_resets_to_front() {
    let mut session = StudySession::new(deck(2), manual()).unwrap();
    session.flip().unwrap();
    assert_eq!(session.side(), Side::Back);
    session.next();
    assert_eq!(session.side(), Side::Front);
}

#[test]
fn front_only_cards_cannot_flip() {
    let mut c = card(0);
    c.card_type = CardType::SingleSided;
    let mut session = StudySession::new(vec![c], manual()).unwrap();
    assert_eq!(session.flip(), Err(StudyError::NoBackSide));
}

// --- Countdown ---

#[test]
fn flip_countdown_fires_exactly_once() {
    let mut c = card(0);
    c.countdown_timer_front = 2;
    c.countdown_behavior_front = Some(CountdownBehavior::Flip);
    let mut session = StudySession::new(vec![c, card(1)], SessionOptions::default()).unwrap();
    assert_eq!(session.tick(), None);
    assert_eq!(session.tick(), Some(Transition::Flipped(Side::Back)));
    for _ in 0..5 {
        assert_eq!(session.tick(), None);
    }
    assert_eq!(session.side(), Side::Back);
    assert_eq!(session.index(), 0);
}

#[test]
fn front_countdown_stays_spent_after_flipping_back() {
    let mut c = card(0);
    c.countdown_timer_front = 2;
    c.countdown_behavior_front = Some(CountdownBehavior::Flip);
    let mut session = StudySession::new(vec![c, card(1)], SessionOptions::default()).unwrap();
    assert_eq!(session.tick(), None);
    assert_eq!(session.tick(), Some(Transition::Flipped(Side::Back)));
    assert_eq!(session.flip(), Ok(Transition::Flipped(Side::Front)));
    assert_eq!(session.remaining_seconds(), None);
    for _ in 0..4 {
        assert_eq!(session.tick(), None);
    }
    assert_eq!(session.side(), Side::Front);
}

#[test]
fn flip_on_both_sides_does_not_bounce() {
    let mut c = card(0);
    c.countdown_timer_front = 1;
    c.countdown_timer_back = 1;
    c.countdown_behavior_front = Some(CountdownBehavior::Flip);
    c.countdown_behavior_back = Some(CountdownBehavior::Flip);
    let mut session = StudySession::new(vec![c, card(1)], SessionOptions::default()).unwrap();
    assert_eq!(session.tick(), Some(Transition::Flipped(Side::Back)));
    assert_eq!(session.tick(), Some(Transition::Flipped(Side::Front)));
    for _ in 0..4 {
        assert_eq!(session.tick(), None);
    }
    assert_eq!(session.side(), Side::Front);
}

#[test]
fn returning_to_a_card_rearms_its_countdown() {
    let mut c = card(0);
    c.countdown_timer_front = 1;
    c.countdown_behavior_front = Some(CountdownBehavior::Flip);
    let mut session = StudySession::new(vec![c, card(1)], navigable_timed()).unwrap();
    assert_eq!(session.tick(), Some(Transition::Flipped(Side::Back)));
    session.next();
    session.previous().unwrap();
    assert_eq!(session.remaining_seconds(), Some(1));
}

#[test]
fn single_sided_countdown_advances() {
    let mut c = card(0);
    c.card_type = CardType::SingleSided;
    c.countdown_timer_front = 1;
    c.countdown_behavior_front = Some(CountdownBehavior::Flip);
    let mut session = StudySession::new(vec![c, card(1)], SessionOptions::default()).unwrap();
    assert_eq!(session.tick(), Some(Transition::Moved { index: 1 }));
}

#[test]
fn back_countdown_starts_after_flip() {
    let mut c = card(0);
    c.countdown_timer_back = 1;
    c.countdown_behavior_back = Some(CountdownBehavior::Next);
    let mut session = StudySession::new(vec![c, card(1)], SessionOptions::default()).unwrap();
    assert_eq!(session.remaining_seconds(), None);
    session.flip().unwrap();
    assert_eq!(session.remaining_seconds(), Some(1));
    assert_eq!(session.tick(), Some(Transition::Moved { index: 1 }));
}

#[test]
fn countdown_disabled_never_fires() {
    let mut c = card(0);
    c.countdown_timer_front = 1;
    let mut session = StudySession::new(vec![c], manual()).unwrap();
    assert_eq!(session.tick(), None);
    assert_eq!(session.side(), Side::Front);
}

#[test]
fn last_card_countdown_completes() {
    let mut c = card(0);
    c.card_type = CardType::Informational;
    c.countdown_timer_front = 1;
    let mut session = StudySession::new(vec![c], SessionOptions::default()).unwrap();
    assert_eq!(session.tick(), Some(Transition::Completed));
    assert_eq!(session.tick(), None);
}

// --- Quiz scoring ---

#[test]
fn answers_drive_accuracy() {
    let cards = vec![quiz_card(0, 0), quiz_card(1, 0), quiz_card(2, 1), quiz_card(3, 1)];
    let mut session = StudySession::new(cards, manual()).unwrap();
    let q: ElementId = "q".into();
    let picks = [0, 0, 1, 0];
    for pick in picks {
        session.answer(&q, pick).unwrap();
        session.next();
    }
    assert_eq!(session.stats(), SessionStats { correct: 3, incorrect: 1 });
    assert_eq!(session.accuracy(), 75);
}

#[test]
fn shown_results_cannot_be_rescored() {
    let mut session = StudySession::new(vec![quiz_card(0, 0), card(1)], navigable()).unwrap();
    let q: ElementId = "q".into();
    session.answer(&q, 1).unwrap();
    session.next();
    session.previous().unwrap();
    assert_eq!(session.answer(&q, 0), Err(StudyError::AnswerLocked(q.clone())));
    assert_eq!(session.stats(), SessionStats { correct: 0, incorrect: 1 });
    let ctx = session.render_context(HashMap::new());
    assert!(ctx.selections.get(&q).is_some_and(|s| s.revealed && s.selected == 1));
}

#[test]
fn answer_only_sees_visible_side() {
    let mut session = StudySession::new(vec![quiz_card(0, 0)], manual()).unwrap();
    session.flip().unwrap();
    let q: ElementId = "q".into();
    assert_eq!(session.answer(&q, 0), Err(StudyError::ElementNotFound(q.clone())));
}

// --- Password ---

#[test]
fn password_card_stays_locked_until_unlocked() {
    let mut c = quiz_card(0, 0);
    c.card_type = CardType::PasswordProtected;
    c.password = Some("hunter2".into());
    c.countdown_timer_front = 1;
    let mut session = StudySession::new(vec![c], SessionOptions::default()).unwrap();
    assert!(session.is_locked());
    assert!(session.visible_elements().is_empty());
    assert_eq!(session.flip(), Err(StudyError::CardLocked));
    assert_eq!(session.tick(), None);

    assert_eq!(session.unlock("wrong"), Err(StudyError::WrongPassword));
    session.unlock("hunter2").unwrap();
    assert!(!session.is_locked());
    assert_eq!(session.visible_elements().len(), 1);
    assert_eq!(session.remaining_seconds(), Some(1));
}

#[test]
fn password_type_without_password_is_open() {
    let mut c = card(0);
    c.card_type = CardType::PasswordProtected;
    let session = StudySession::new(vec![c], manual()).unwrap();
    assert!(!session.is_locked());
}

// --- Restart ---

#[test]
fn restart_clears_progress() {
    let mut session = StudySession::new(vec![quiz_card(0, 0)], manual()).unwrap();
    session.answer(&"q".into(), 0).unwrap();
    session.next();
    assert!(session.is_complete());
    session.restart();
    assert!(!session.is_complete());
    assert_eq!(session.index(), 0);
    assert_eq!(session.stats().answered(), 0);
    assert!(session.answer(&"q".into(), 0).is_ok());
}
