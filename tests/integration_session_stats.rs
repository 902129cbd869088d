use assert_matches::assert_matches;
use oche::{
    session::{Session, SessionConfig, SessionEvent, ThrowResult, THROWS_PER_ROUND},
    stats::{format_median, Rate, SessionStats},
    targets::{EndOption, GameMode, Multiplier, TargetSequence},
};

/// End-to-end behaviour of practice sessions and the numbers derived from them

fn hit(session: &mut Session) -> bool {
    session.record_throw(ThrowResult::Hit, None)
}

fn miss(session: &mut Session) -> bool {
    session.record_throw(ThrowResult::Miss, None)
}

#[test]
fn doubles_to_end_first_round() {
    let mut session = Session::new(SessionConfig::new(GameMode::Doubles, EndOption::End, false));
    assert_eq!(
        session.targets().as_slice(),
        (1..=20).collect::<Vec<u8>>().as_slice()
    );

    assert!(hit(&mut session));
    assert_eq!(session.current_target(), Some(2));
    assert_eq!(session.pending().len(), 1);

    assert!(miss(&mut session));
    assert!(miss(&mut session));

    assert_eq!(session.rounds().len(), 1);
    assert_eq!(session.rounds()[0].len(), THROWS_PER_ROUND);
    assert!(session.pending().is_empty());
    assert!(session
        .take_events()
        .contains(&SessionEvent::RoundSubmitted {
            throws: 3,
            auto: true
        }));
}

#[test]
fn singles_skip_treble_passes_over_two_targets() {
    let mut session = Session::new(SessionConfig::new(GameMode::Singles, EndOption::End, true));
    for _ in 0..4 {
        hit(&mut session);
    }
    assert_eq!(session.current_target(), Some(5));

    assert!(session.record_throw(ThrowResult::Hit, Some(Multiplier::Treble)));
    assert_eq!(session.current_index(), 7);
    assert_eq!(session.current_target(), Some(8));
    assert_eq!(session.skipped(), &[6, 7]);

    let stats = SessionStats::from_session(&session);
    let row = |t: u8| stats.targets.iter().find(|s| s.target == t).copied().unwrap();
    assert_eq!(row(5).attempts, 1);
    assert_eq!(row(6).rate, Rate::Unavailable);
    assert_eq!(row(6).attempts, 0);
}

#[test]
fn empty_submit_records_three_misses_on_current_target() {
    let mut session = Session::new(SessionConfig::default());
    hit(&mut session);
    hit(&mut session);
    hit(&mut session);
    assert_eq!(session.current_target(), Some(4));

    assert!(session.submit_round());
    let last = session.rounds().last().unwrap();
    assert_eq!(last.len(), 3);
    assert!(last.iter().all(|t| !t.is_hit() && t.target == 4));
    assert_eq!(session.current_target(), Some(4));
}

#[test]
fn undo_after_auto_submit_reopens_the_round() {
    let mut session = Session::new(SessionConfig::default());
    hit(&mut session);
    hit(&mut session);
    hit(&mut session);
    assert_eq!(session.rounds().len(), 1);
    assert_eq!(session.current_index(), 3);

    assert!(session.undo());
    assert!(session.rounds().is_empty());
    assert_eq!(session.pending().len(), 3);
    assert_eq!(session.current_index(), 0);
}

#[test]
fn hit_rate_and_median_over_a_session() {
    let mut session = Session::new(SessionConfig::default());
    assert_eq!(SessionStats::from_session(&session).hit_rate.to_string(), "-");

    hit(&mut session);
    hit(&mut session);
    miss(&mut session); // auto-submitted round of 3
    hit(&mut session);
    session.submit_round(); // short round of 1

    let stats = SessionStats::from_session(&session);
    assert_eq!(stats.hits, 3);
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hit_rate.to_string(), "75.0");
    assert_eq!(format_median(stats.median_round_length), "2.0");
}

#[test]
fn index_never_leaves_the_sequence() {
    let mut session = Session::new(SessionConfig::new(GameMode::Trebles, EndOption::Inner, true));
    let len = TargetSequence::generate(EndOption::Inner).len();

    for _ in 0..(len * 4) {
        session.record_throw(ThrowResult::Hit, Some(Multiplier::Treble));
        session.skip_target();
        session.submit_round();
        assert!(session.current_index() <= len);
    }
    assert!(session.is_complete());
    assert!(!session.skip_target());
    assert!(!session.record_throw(ThrowResult::Miss, None));
}

#[test]
fn completion_is_announced_on_the_final_bull() {
    let mut session = Session::new(SessionConfig::new(GameMode::Singles, EndOption::Bull, false));
    for _ in 0..20 {
        session.skip_target();
    }
    session.take_events();
    assert_eq!(session.current_target(), Some(25));

    miss(&mut session);
    hit(&mut session);
    assert_eq!(session.current_target(), Some(50));
    assert!(!session
        .take_events()
        .iter()
        .any(|e| matches!(e, SessionEvent::Completed { .. })));

    hit(&mut session);
    let events = session.take_events();
    assert!(events.contains(&SessionEvent::Completed { darts_thrown: 3 }));
    // third dart of the round still auto-submits after completion
    assert_matches!(
        events.last(),
        Some(SessionEvent::RoundSubmitted {
            throws: 3,
            auto: true
        })
    );
    assert!(session.is_complete());
}

#[test]
fn inner_bull_follows_twenty() {
    let mut session = Session::new(SessionConfig::new(GameMode::Doubles, EndOption::Inner, false));
    for _ in 0..20 {
        session.skip_target();
    }
    assert_eq!(session.current_target(), Some(50));

    hit(&mut session);
    assert_matches!(
        session.take_events().last(),
        Some(SessionEvent::Completed { darts_thrown: 1 })
    );
}
