use bahasa_srs_core::{FixedClock, Grade, MemoryStore, SrsEngine, EASE_MAX, EASE_MIN};
use chrono::NaiveDate;
use proptest::prelude::*;
use std::sync::Arc;

fn engine() -> (SrsEngine, Arc<FixedClock>) {
    let clock = Arc::new(FixedClock::new(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()));
    (SrsEngine::new(Arc::new(MemoryStore::new()), clock.clone()), clock)
}

fn grade() -> impl Strategy<Value = Grade> {
    prop_oneof![Just(Grade::Again), Just(Grade::Good), Just(Grade::Easy)]
}

proptest! {
    #[test]
    fn ease_stays_in_bounds(grades in prop::collection::vec(grade(), 1..60)) {
        let (engine, clock) = engine();
        for g in grades {
            let p = engine.grade("apple", g);
            prop_assert!(p.ease >= EASE_MIN - 1e-9 && p.ease <= EASE_MAX + 1e-9);
            if g == Grade::Again {
                prop_assert_eq!(p.repetitions, 0);
                prop_assert_eq!(p.interval, 0);
                prop_assert_eq!(p.next_review, p.last_review);
            }
            clock.advance_days(1);
        }
    }

    #[test]
    fn new_and_learned_partition_candidates(
        graded in prop::collection::vec((0usize..12, grade()), 0..30),
        days in 0i64..40,
    ) {
        let (engine, clock) = engine();
        let ids: Vec<String> = (0..12).map(|i| format!("w{i}")).collect();
        for (i, g) in graded {
            engine.grade(&ids[i], g);
        }
        clock.advance_days(days);

        let s = engine.stats(&ids);
        prop_assert_eq!(s.new + s.learned, s.total);
        prop_assert!(s.due <= s.learned);
        prop_assert!(s.mature <= s.learned);

        let due = engine.due_item_ids(&ids);
        let fresh = engine.new_item_ids(&ids);
        prop_assert!(due.iter().all(|d| !fresh.contains(d)));
        prop_assert_eq!(due.len(), s.due);
        prop_assert_eq!(fresh.len(), s.new);
        prop_assert_eq!(engine.stats(&ids), s);
    }

    #[test]
    fn consecutive_goods_strictly_grow(extra in 0usize..6) {
        let (engine, _) = engine();
        let mut last = engine.grade("apple", Grade::Good).interval;
        for _ in 0..(2 + extra) {
            let next = engine.grade("apple", Grade::Good).interval;
            prop_assert!(next > last);
            last = next;
        }
    }
}
