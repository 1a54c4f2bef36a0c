//! No-repeat sentence sampling for one category.
//!
//! The recency window holds as many indices as the pool has sentences, so a
//! sentence comes back only after every other one was shown since its last
//! appearance. A pool of one sentence repeats it forever.

use std::collections::VecDeque;

use rand::{seq::SliceRandom, Rng};
use tracing::{debug, instrument};

use crate::error::DrillError;

/// Trimmed, non-blank sentences of one category. Never empty.
#[derive(Clone, Debug)]
pub struct SentencePool {
  sentences: Vec<String>,
}

impl SentencePool {
  pub fn from_lines<I, S>(lines: I) -> Result<Self, DrillError>
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let sentences: Vec<String> = lines
      .into_iter()
      .map(|l| l.as_ref().trim().to_string())
      .filter(|l| !l.is_empty())
      .collect();
    if sentences.is_empty() {
      return Err(DrillError::InvalidInput("sentence pool has no non-blank lines".into()));
    }
    Ok(Self { sentences })
  }

  pub fn len(&self) -> usize { self.sentences.len() }

  pub fn is_empty(&self) -> bool { self.sentences.is_empty() }

  pub fn get(&self, index: usize) -> Option<&str> {
    self.sentences.get(index).map(String::as_str)
  }
}

/// Bounded FIFO of recently shown indices with O(1) membership.
#[derive(Clone, Debug)]
pub struct RecencyWindow {
  order: VecDeque<usize>,
  // per-index occurrence count inside `order`
  counts: Vec<u32>,
  capacity: usize,
}

impl RecencyWindow {
  pub fn new(capacity: usize) -> Self {
    Self { order: VecDeque::with_capacity(capacity), counts: vec![0; capacity], capacity }
  }

  pub fn len(&self) -> usize { self.order.len() }

  pub fn is_empty(&self) -> bool { self.order.is_empty() }

  pub fn is_full(&self) -> bool { self.order.len() >= self.capacity }

  pub fn contains(&self, index: usize) -> bool {
    self.counts.get(index).is_some_and(|c| *c > 0)
  }

  pub fn push_back(&mut self, index: usize) {
    self.order.push_back(index);
    if let Some(c) = self.counts.get_mut(index) {
      *c += 1;
    }
  }

  pub fn pop_front(&mut self) -> Option<usize> {
    let index = self.order.pop_front()?;
    if let Some(c) = self.counts.get_mut(index) {
      *c = c.saturating_sub(1);
    }
    Some(index)
  }
}

/// Stateful sampler. Each practice session owns its own picker.
#[derive(Clone, Debug)]
pub struct SentencePicker {
  pool: SentencePool,
  window: RecencyWindow,
}

impl SentencePicker {
  pub fn new(pool: SentencePool) -> Self {
    let window = RecencyWindow::new(pool.len());
    Self { pool, window }
  }

  pub fn from_lines<I, S>(lines: I) -> Result<Self, DrillError>
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    Ok(Self::new(SentencePool::from_lines(lines)?))
  }

  /// Pick with the thread-local RNG.
  pub fn pick(&mut self) -> (usize, String) {
    self.pick_with(&mut rand::thread_rng())
  }

  #[instrument(level = "debug", skip(self, rng), fields(pool = self.pool.len(), window = self.window.len()))]
  pub fn pick_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> (usize, String) {
    if self.window.is_full() {
      self.window.pop_front();
    }
    let mut candidates: Vec<usize> = (0..self.pool.len()).filter(|i| !self.window.contains(*i)).collect();
    if candidates.is_empty() {
      candidates = (0..self.pool.len()).collect();
    }
    let index = candidates.choose(rng).copied().unwrap_or(0);
    self.window.push_back(index);
    debug!(target: "drill", index, candidates = candidates.len(), "Picked sentence");
    let sentence = self.pool.get(index).unwrap_or_default().to_string();
    (index, sentence)
  }
}
