//! Practice sessions: one learner drilling one category for a fixed number of rounds.
//!
//! Each session owns its picker, so recency windows are never shared between learners.

use std::time::{Duration, Instant};

use rand::Rng;
use serde::Serialize;

use crate::error::DrillError;
use crate::picker::{SentencePicker, SentencePool};

pub const DEFAULT_ROUNDS: usize = 10;

/// One sentence handed to the learner.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct SentenceTurn {
  pub index: usize,
  pub sentence: String,
  pub round: usize,
  pub total: usize,
}

#[derive(Debug)]
pub struct PracticeSession {
  pub id: String,
  pub lang: String,
  pub category: String,
  pub total: usize,
  round: usize,
  picker: SentencePicker,
  current: Option<(usize, String)>,
  touched: Instant,
}

impl PracticeSession {
  pub fn new(id: String, lang: &str, category: &str, pool: SentencePool, rounds: Option<usize>) -> Self {
    Self {
      id,
      lang: lang.to_string(),
      category: category.to_string(),
      total: rounds.unwrap_or(DEFAULT_ROUNDS).max(1),
      round: 0,
      picker: SentencePicker::new(pool),
      current: None,
      touched: Instant::now(),
    }
  }

  /// Time since the session was created or last advanced.
  pub fn idle_for(&self) -> Duration { self.touched.elapsed() }

  pub fn round(&self) -> usize { self.round }

  pub fn is_finished(&self) -> bool { self.round >= self.total }

  /// Sentence currently awaiting an answer.
  pub fn current(&self) -> Option<&str> {
    self.current.as_ref().map(|(_, s)| s.as_str())
  }

  pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<SentenceTurn, DrillError> {
    if self.is_finished() {
      return Err(DrillError::SessionFinished(self.id.clone()));
    }
    let (index, sentence) = self.picker.pick_with(rng);
    self.round += 1;
    self.touched = Instant::now();
    self.current = Some((index, sentence.clone()));
    Ok(SentenceTurn { index, sentence, round: self.round, total: self.total })
  }
}
