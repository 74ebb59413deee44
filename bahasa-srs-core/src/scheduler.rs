use crate::{CardProgress, Grade, EASE_MAX, EASE_MIN};
use chrono::{Days, NaiveDate};

const EASE_PENALTY: f64 = 0.2;
const EASE_BONUS: f64 = 0.15;
const EASY_MULTIPLIER: f64 = 1.3;

/// Apply one grading event to `card` as of `today`.
///
/// For `good` and `easy` the interval branch is picked from the incremented
/// repetition count, and the growth factor uses the interval and ease held
/// before this call. `easy` raises the ease only after the new interval is
/// computed.
pub fn apply_grade(mut card: CardProgress, grade: Grade, today: NaiveDate) -> CardProgress {
    match grade {
        Grade::Again => {
            card.repetitions = 0;
            card.interval = 0;
            card.ease = (card.ease - EASE_PENALTY).max(EASE_MIN);
        }
        Grade::Good => {
            card.repetitions += 1;
            card.interval = match card.repetitions {
                1 => 1,
                2 => 3,
                _ => grow(card.interval, card.ease),
            };
        }
        Grade::Easy => {
            card.repetitions += 1;
            card.interval = match card.repetitions {
                1 => 3,
                2 => 7,
                _ => grow(card.interval, card.ease * EASY_MULTIPLIER),
            };
            card.ease = (card.ease + EASE_BONUS).min(EASE_MAX);
        }
    }

    card.next_review = add_days(today, card.interval);
    card.last_review = today;
    card
}

/// Saturates at `u32::MAX` days.
fn grow(interval: u32, factor: f64) -> u32 {
    let next = (f64::from(interval) * factor).round();
    if next >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        next.max(0.0) as u32
    }
}

/// Saturates at the last representable date.
pub fn add_days(date: NaiveDate, days: u32) -> NaiveDate {
    date.checked_add_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MAX)
}
