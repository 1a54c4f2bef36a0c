//! Tiered evaluation of a learner's translation.
//!
//! First usable tier wins:
//!   1. bridged   - the configured bridge translated the source sentence
//!   2. reference - the best-matching pack item has a canonical answer
//!   3. heuristic - only the learner text itself is available
//!
//! Missing packs, unmatched triggers and failing bridges only move evaluation
//! down the chain. Every path returns a well-formed `EvaluationResult`.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::bridge::TranslationBridge;
use crate::domain::{EvaluationResult, Tier};
use crate::refpack::{select_best, ReferenceStore};
use crate::scoring::{heuristic_score, overlap_score, ScoreParams};
use crate::suggest::dedup5;
use crate::util::{capitalize, strip_trailing_period};

#[derive(Clone)]
pub struct Evaluator {
  store: Arc<ReferenceStore>,
  bridge: Option<Arc<dyn TranslationBridge>>,
  params: ScoreParams,
}

impl Evaluator {
  pub fn new(store: Arc<ReferenceStore>, bridge: Option<Arc<dyn TranslationBridge>>, params: ScoreParams) -> Self {
    Self { store, bridge, params }
  }

  /// Re-read the reference pack for `lang`, replacing any cached copy. Returns its item count.
  pub fn reload_pack(&self, lang: &str) -> usize {
    self.store.reload(lang).len()
  }

  pub fn bridge_name(&self) -> Option<&str> {
    self.bridge.as_deref().map(|b| b.name())
  }

  #[instrument(level = "info", skip(self, source_text, user_text),
               fields(src_len = source_text.len(), answer_len = user_text.len(), %source_lang, %target_lang))]
  pub async fn evaluate(&self, source_text: &str, user_text: &str, source_lang: &str, target_lang: &str) -> EvaluationResult {
    let user = user_text.trim();
    let pack = self.store.pack(source_lang);
    let item = select_best(source_text, &pack);
    let alternatives: &[String] = item.map(|i| i.alternatives.as_slice()).unwrap_or_default();
    let reference = item.map(|i| i.reference.trim()).filter(|r| !r.is_empty());

    if let Some(bridge) = &self.bridge {
      let bridged = bridge.translate(source_text, source_lang, target_lang).await;
      if !bridged.is_empty() {
        let score = overlap_score(user, &bridged, &self.params);
        let alts = dedup5(std::iter::once(bridged.as_str()).chain(alternatives.iter().map(String::as_str)));
        return finish(Tier::Bridged, score, alts);
      }
      debug!(target: "drill", bridge = bridge.name(), "Bridge gave no reference; falling through");
    }

    if let Some(reference) = reference {
      let score = overlap_score(user, reference, &self.params);
      let alts = dedup5(std::iter::once(reference).chain(alternatives.iter().map(String::as_str)));
      return finish(Tier::Reference, score, alts);
    }

    let score = heuristic_score(user, &self.params);
    let capitalized = capitalize(user);
    let alts = dedup5([user, capitalized.as_str(), strip_trailing_period(user)]);
    finish(Tier::Heuristic, score, alts)
  }
}

fn finish(tier: Tier, score: f64, alternatives: [String; 5]) -> EvaluationResult {
  info!(target: "drill", tier = tier.as_str(), score, "Evaluation finished");
  EvaluationResult { score, alternatives, tier }
}
