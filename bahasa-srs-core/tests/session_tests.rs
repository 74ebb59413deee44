use bahasa_srs_core::{
    FixedClock, Grade, MemoryStore, ReviewSession, SessionTally, SrsEngine, DEFAULT_NEW_LIMIT,
};
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;
use std::sync::Arc;

fn engine() -> (SrsEngine, Arc<FixedClock>) {
    let clock = Arc::new(FixedClock::new(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()));
    (SrsEngine::new(Arc::new(MemoryStore::new()), clock.clone()), clock)
}

fn pool(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("w{i:02}")).collect()
}

#[test]
fn deck_is_due_plus_capped_new() {
    let (engine, clock) = engine();
    let ids = pool(20);
    engine.grade("w05", Grade::Good);
    engine.grade("w06", Grade::Good);
    engine.grade("w07", Grade::Easy);
    clock.advance_days(1);

    let mut rng = StdRng::seed_from_u64(7);
    let session = ReviewSession::build(&engine, &ids, DEFAULT_NEW_LIMIT, &mut rng);
    let deck: HashSet<&str> = session.deck().iter().map(String::as_str).collect();

    // w05/w06 due tomorrow, w07 scheduled 3 days out
    assert_eq!(deck.len(), 12);
    assert!(deck.contains("w05") && deck.contains("w06"));
    assert!(!deck.contains("w07"));
    for id in ["w00", "w01", "w02", "w03", "w04", "w08", "w09", "w10", "w11", "w12"] {
        assert!(deck.contains(id), "missing {id}");
    }
    assert!(!deck.contains("w13"));
}

#[test]
fn success_advances_and_counts() {
    let (engine, _) = engine();
    let mut rng = StdRng::seed_from_u64(1);
    let mut session = ReviewSession::from_deck(pool(2));

    session.answer(&engine, Grade::Good, &mut rng).unwrap();
    session.answer(&engine, Grade::Easy, &mut rng).unwrap();

    assert!(session.is_finished());
    assert!(session.answer(&engine, Grade::Good, &mut rng).is_none());
    assert_eq!(
        session.tally(),
        SessionTally {
            reviewed: 2,
            correct: 2,
            wrong: 0
        }
    );
    assert_eq!(engine.stats(&pool(2)).learned, 2);
}

#[test]
fn failed_card_is_pushed_three_to_five_back() {
    let (engine, _) = engine();
    for seed in 0..20 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut session = ReviewSession::from_deck(pool(10));
        let p = session.answer(&engine, Grade::Again, &mut rng).unwrap();
        assert_eq!(p.interval, 0);

        assert_eq!(session.position(), 0);
        assert_eq!(session.deck().len(), 10);
        let at = session.deck().iter().position(|id| id == "w00").unwrap();
        assert!((3..=5).contains(&at), "seed {seed} reinserted at {at}");
        assert_eq!(session.current(), Some("w01"));
    }
}

#[test]
fn failed_card_near_the_end_goes_last() {
    let (engine, _) = engine();
    let mut rng = StdRng::seed_from_u64(3);
    let mut session = ReviewSession::from_deck(pool(3));
    session.skip();
    session.answer(&engine, Grade::Again, &mut rng).unwrap();

    assert_eq!(session.deck(), ["w00", "w02", "w01"]);
    assert_eq!(session.current(), Some("w02"));
    assert_eq!(session.tally().wrong, 1);
    assert_eq!(session.remaining(), 2);
}
