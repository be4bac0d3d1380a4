use super::*;

#[test]
fn zero_seconds_means_no_countdown() {
    assert!(Countdown::start(0, CountdownBehavior::Flip).is_none());
}

#[test]
fn fires_on_the_tick_that_reaches_zero() {
    let Some(mut cd) = Countdown::start(3, CountdownBehavior::Next) else {
        panic!("countdown should start");
    };
    assert_eq!(cd.tick(), None);
    assert_eq!(cd.remaining(), 2);
    assert_eq!(cd.tick(), None);
    assert_eq!(cd.tick(), Some(CountdownBehavior::Next));
    assert!(cd.has_fired());
}

#[test]
fn never_fires_twice() {
    let Some(mut cd) = Countdown::start(1, CountdownBehavior::Flip) else {
        panic!("countdown should start");
    };
    assert_eq!(cd.tick(), Some(CountdownBehavior::Flip));
    for _ in 0..10 {
        assert_eq!(cd.tick(), None);
    }
    assert_eq!(cd.remaining(), 0);
}
