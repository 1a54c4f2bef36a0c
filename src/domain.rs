//! Domain models used by the backend: drill items, reference packs, evaluation results.

use serde::{Deserialize, Serialize};

/// The only target language learners translate into.
pub const TARGET_LANG: &str = "en";

/// One practice record: trigger keywords, a canonical answer and accepted alternatives.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DrillItem {
  #[serde(default)] pub triggers: Vec<String>,
  #[serde(default, rename = "ref")] pub reference: String,
  #[serde(default, rename = "alts")] pub alternatives: Vec<String>,
}

impl DrillItem {
  /// Number of non-empty triggers that occur literally in `text`.
  pub fn match_count(&self, text: &str) -> usize {
    self.triggers.iter().filter(|t| !t.is_empty() && text.contains(t.as_str())).count()
  }
}

/// Ordered drill items for one source language. Empty when no usable pack exists.
pub type ReferencePack = Vec<DrillItem>;

/// Which stage of the fallback chain produced a score?
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
  Bridged,   // external translation bridge supplied the reference
  Reference, // reference pack item supplied the reference
  Heuristic, // no reference at all, learner text scored on its own
}

impl Tier {
  pub fn as_str(&self) -> &'static str {
    match self {
      Tier::Bridged => "bridged",
      Tier::Reference => "reference",
      Tier::Heuristic => "heuristic",
    }
  }
}

/// Score in [0, 5] (two decimals) plus exactly five suggested translations.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct EvaluationResult {
  pub score: f64,
  pub alternatives: [String; 5],
  pub tier: Tier,
}
