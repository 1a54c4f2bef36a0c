//! Core behaviors shared by both HTTP and WebSocket handlers.
//!
//! This includes:
//!   - Free-standing evaluation (source language defaults to the learner settings)
//!   - Practice session flow (start, next sentence, answer, end)
//!   - Catalog listing and learner settings

use tracing::{info, instrument};

use crate::domain::EvaluationResult;
use crate::error::DrillError;
use crate::protocol::{AnswerOut, CategoriesOut, LanguagesOut, RefsReloadOut, SessionOut, SettingsOut};
use crate::session::SentenceTurn;
use crate::settings::LearnerSettings;
use crate::state::AppState;

/// Explicit language, else the learner's saved source language.
fn resolve_lang(state: &AppState, lang: Option<String>) -> String {
  lang
    .map(|l| l.trim().to_string())
    .filter(|l| !l.is_empty())
    .unwrap_or_else(|| state.settings().src_lang)
}

#[instrument(level = "info", skip(state, source_text, user_text), fields(src_len = source_text.len(), answer_len = user_text.len()))]
pub async fn do_evaluate(state: &AppState, source_text: &str, user_text: &str, source_lang: Option<String>) -> EvaluationResult {
  let lang = resolve_lang(state, source_lang);
  let result = state.evaluate(source_text, user_text, &lang).await;
  info!(target: "drill", %lang, score = %format!("{:.2}", result.score), tier = result.tier.as_str(), "Evaluation served");
  result
}

pub fn do_languages(state: &AppState) -> LanguagesOut {
  LanguagesOut { languages: state.languages() }
}

pub fn do_categories(state: &AppState, lang: &str) -> CategoriesOut {
  CategoriesOut { lang: lang.to_string(), categories: state.categories(lang) }
}

pub async fn do_start_session(
  state: &AppState,
  lang: Option<String>,
  category: &str,
  rounds: Option<usize>,
) -> Result<SessionOut, DrillError> {
  let lang = resolve_lang(state, lang);
  state.start_session(&lang, category, rounds).await.map(SessionOut::from)
}

pub async fn do_next_sentence(state: &AppState, session_id: &str) -> Result<SentenceTurn, DrillError> {
  state.next_sentence(session_id).await
}

pub async fn do_submit_answer(state: &AppState, session_id: &str, answer: &str) -> Result<AnswerOut, DrillError> {
  let answer = state.submit_answer(session_id, answer).await?;
  info!(target: "drill", session = %session_id, round = answer.round, score = %format!("{:.2}", answer.result.score), "Answer evaluated");
  Ok(answer.into())
}

pub async fn do_end_session(state: &AppState, session_id: &str) -> bool {
  state.end_session(session_id).await
}

pub fn do_reload_refs(state: &AppState, lang: &str) -> Result<RefsReloadOut, DrillError> {
  let lang = lang.trim().to_lowercase();
  if lang.is_empty() {
    return Err(DrillError::InvalidInput("lang must not be empty".into()));
  }
  let items = state.reload_refs(&lang);
  Ok(RefsReloadOut { lang, items })
}

pub fn do_get_settings(state: &AppState) -> SettingsOut {
  state.settings().into()
}

pub fn do_save_settings(state: &AppState, src_lang: &str) -> Result<SettingsOut, DrillError> {
  let src_lang = src_lang.trim();
  if src_lang.is_empty() {
    return Err(DrillError::InvalidInput("srcLang must not be empty".into()));
  }
  let current = state.settings();
  let saved = state.save_settings(LearnerSettings { src_lang: src_lang.to_string(), ..current })?;
  Ok(saved.into())
}
