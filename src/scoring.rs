//! Lexical overlap scoring.
//!
//! Scores are recall-oriented: the overlap is measured against the reference's
//! unique words only, so missing reference words cost more than extra learner
//! words. The ratio is dampened through a square root, then shifted by the
//! configurable `scale`/`offset` pair and clamped to [0, 5].

use std::collections::HashSet;

use serde::Deserialize;

pub const MAX_SCORE: f64 = 5.0;

/// Word count at which the heuristic (reference-free) score saturates.
const HEURISTIC_SATURATION_WORDS: f64 = 8.0;

/// Tunable knobs applied after the base curve.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
pub struct ScoreParams {
  #[serde(default = "default_scale")] pub scale: f64,
  #[serde(default = "default_offset")] pub offset: f64,
  /// Reserved for asymmetric scoring. Parsed and carried, not used by any formula yet.
  #[serde(default = "default_penalty_factor")] pub penalty_factor: f64,
}

fn default_scale() -> f64 { 1.0 }
fn default_offset() -> f64 { 0.4 }
fn default_penalty_factor() -> f64 { 0.6 }

impl Default for ScoreParams {
  fn default() -> Self {
    Self { scale: default_scale(), offset: default_offset(), penalty_factor: default_penalty_factor() }
  }
}

impl ScoreParams {
  fn finish(&self, base: f64) -> f64 {
    clamp_score(round2(base * self.scale + self.offset))
  }
}

/// Case-folded runs of Unicode letters. Digits, `_` and punctuation separate words.
pub fn unicode_words(s: &str) -> Vec<String> {
  s.split(|c: char| !c.is_alphabetic())
    .filter(|w| !w.is_empty())
    .map(caseless::default_case_fold_str)
    .collect()
}

/// Overlap of `user` against `reference` mapped to [0, 5].
/// Returns exactly 0.0 when either side has no words.
pub fn overlap_score(user: &str, reference: &str, params: &ScoreParams) -> f64 {
  let u: HashSet<String> = unicode_words(user).into_iter().collect();
  let r: HashSet<String> = unicode_words(reference).into_iter().collect();
  if u.is_empty() || r.is_empty() {
    return 0.0;
  }
  let ratio = u.intersection(&r).count() as f64 / r.len() as f64;
  params.finish(MAX_SCORE * ratio.sqrt())
}

/// Completeness guess from the learner's own word count when nothing else is known.
pub fn heuristic_score(user: &str, params: &ScoreParams) -> f64 {
  let words = unicode_words(user).len() as f64;
  let rough = ((words / HEURISTIC_SATURATION_WORDS) * MAX_SCORE).clamp(0.0, MAX_SCORE);
  params.finish(rough)
}

fn round2(x: f64) -> f64 {
  (x * 100.0).round() / 100.0
}

fn clamp_score(x: f64) -> f64 {
  x.clamp(0.0, MAX_SCORE)
}
