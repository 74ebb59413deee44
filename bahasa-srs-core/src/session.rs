use crate::engine::as_strs;
use crate::{CardProgress, Grade, SrsEngine};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

pub const DEFAULT_NEW_LIMIT: usize = 10;

/// How far back in the deck a failed card is pushed: `3 + 0..3` positions.
const REQUEUE_MIN_OFFSET: usize = 3;
const REQUEUE_SPREAD: usize = 3;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionTally {
    pub reviewed: u32,
    pub correct: u32,
    pub wrong: u32,
}

/// One pass over the due items of a pool plus a capped batch of new ones.
#[derive(Clone, Debug)]
pub struct ReviewSession {
    deck: Vec<String>,
    index: usize,
    tally: SessionTally,
}

impl ReviewSession {
    pub fn build<S, R>(engine: &SrsEngine, pool: &[S], new_limit: usize, rng: &mut R) -> Self
    where
        S: AsRef<str>,
        R: Rng + ?Sized,
    {
        let mut picked: HashSet<String> = engine.due_item_ids(pool).into_iter().collect();
        picked.extend(engine.new_item_ids(pool).into_iter().take(new_limit));

        let mut deck: Vec<String> = as_strs(pool)
            .filter(|id| picked.remove(*id))
            .map(str::to_string)
            .collect();
        deck.shuffle(rng);

        Self {
            deck,
            index: 0,
            tally: SessionTally::default(),
        }
    }

    pub fn from_deck(deck: Vec<String>) -> Self {
        Self {
            deck,
            index: 0,
            tally: SessionTally::default(),
        }
    }

    pub fn deck(&self) -> &[String] {
        &self.deck
    }

    pub fn position(&self) -> usize {
        self.index
    }

    pub fn tally(&self) -> SessionTally {
        self.tally
    }

    pub fn current(&self) -> Option<&str> {
        self.deck.get(self.index).map(String::as_str)
    }

    pub fn is_finished(&self) -> bool {
        self.index >= self.deck.len()
    }

    pub fn remaining(&self) -> usize {
        self.deck.len().saturating_sub(self.index)
    }

    /// Grade the current card. Returns `None` once the session is finished.
    pub fn answer<R: Rng + ?Sized>(
        &mut self,
        engine: &SrsEngine,
        grade: Grade,
        rng: &mut R,
    ) -> Option<CardProgress> {
        let id = self.current()?.to_string();
        let progress = engine.grade(&id, grade);

        self.tally.reviewed += 1;
        if grade.is_success() {
            self.tally.correct += 1;
            self.index += 1;
        } else {
            self.tally.wrong += 1;
            let card = self.deck.remove(self.index);
            let offset = REQUEUE_MIN_OFFSET + rng.gen_range(0..REQUEUE_SPREAD);
            let pos = (self.index + offset).min(self.deck.len());
            self.deck.insert(pos, card);
        }
        Some(progress)
    }

    /// Move past the current card without grading it.
    pub fn skip(&mut self) {
        if !self.is_finished() {
            self.index += 1;
        }
    }
}
