use crate::CardProgress;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

/// Aggregate counts over a candidate set of item ids.
#[derive(Clone, Copy, Debug, Default, Serialize, PartialEq, Eq)]
pub struct SrsStats {
    pub total: usize,
    pub learned: usize,
    pub due: usize,
    pub new: usize,
    pub mature: usize,
}

pub fn summarize<S: AsRef<str>>(
    progress: &HashMap<String, CardProgress>,
    candidates: &[S],
    today: NaiveDate,
) -> SrsStats {
    let mut stats = SrsStats {
        total: candidates.len(),
        ..SrsStats::default()
    };
    for id in candidates {
        if let Some(p) = progress.get(id.as_ref()) {
            stats.learned += 1;
            if p.is_due(today) {
                stats.due += 1;
            }
            if p.is_mature() {
                stats.mature += 1;
            }
        }
    }
    stats.new = stats.total - stats.learned;
    stats
}
