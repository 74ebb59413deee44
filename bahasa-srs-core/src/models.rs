use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::CoreError;

pub type ItemId = String;

pub const EASE_MIN: f64 = 1.3;
pub const EASE_MAX: f64 = 3.0;
pub const EASE_DEFAULT: f64 = 2.5;

/// Interval (in days) at which a card counts as mature.
pub const MATURE_INTERVAL_DAYS: u32 = 21;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Grade {
    Again,
    Good,
    Easy,
}

impl Grade {
    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::Again => "again",
            Grade::Good => "good",
            Grade::Easy => "easy",
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self, Grade::Again)
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Grade {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1" | "a" | "again" => Ok(Grade::Again),
            "2" | "g" | "good" => Ok(Grade::Good),
            "3" | "e" | "easy" => Ok(Grade::Easy),
            _ => Err(CoreError::InvalidGrade(s.to_string())),
        }
    }
}

/// Scheduling state of one item that has been graded at least once.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CardProgress {
    #[serde(alias = "wordId")]
    pub item_id: ItemId,
    pub interval: u32,
    pub ease: f64,
    pub repetitions: u32,
    pub next_review: NaiveDate,
    pub last_review: NaiveDate,
}

impl CardProgress {
    /// Default record for an item seen for the first time on `today`.
    pub fn new(item_id: impl Into<ItemId>, today: NaiveDate) -> Self {
        Self {
            item_id: item_id.into(),
            interval: 0,
            ease: EASE_DEFAULT,
            repetitions: 0,
            next_review: today,
            last_review: today,
        }
    }

    pub fn is_due(&self, today: NaiveDate) -> bool {
        self.next_review <= today
    }

    pub fn is_mature(&self) -> bool {
        self.interval >= MATURE_INTERVAL_DAYS
    }

    pub fn phase(&self) -> Phase {
        if self.repetitions <= 1 {
            Phase::Learning
        } else if self.is_mature() {
            Phase::Mature
        } else {
            Phase::Young
        }
    }
}

/// Qualitative phase of an item's progress.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    New,
    Learning,
    Young,
    Mature,
}

impl Phase {
    pub fn of(progress: Option<&CardProgress>) -> Self {
        progress.map(CardProgress::phase).unwrap_or(Phase::New)
    }
}
