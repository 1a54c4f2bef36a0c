//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs parameters and basic result info.

use std::sync::Arc;
use axum::{extract::{Path, Query, State}, Json, response::IntoResponse};
use tracing::{info, instrument};

use crate::error::DrillError;
use crate::logic::*;
use crate::protocol::*;
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn http_health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(HealthOut { ok: true, bridge: state.evaluator.bridge_name().map(String::from) })
}

#[instrument(level = "info", skip(state, body), fields(src_len = body.source_text.len(), answer_len = body.user_text.len()))]
pub async fn http_post_evaluate(
  State(state): State<Arc<AppState>>,
  Json(body): Json<EvaluateIn>,
) -> impl IntoResponse {
  Json(do_evaluate(&state, &body.source_text, &body.user_text, body.source_lang).await)
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_languages(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(do_languages(&state))
}

#[instrument(level = "info", skip(state), fields(lang = %q.lang))]
pub async fn http_get_categories(
  State(state): State<Arc<AppState>>,
  Query(q): Query<CategoriesQuery>,
) -> impl IntoResponse {
  Json(do_categories(&state, &q.lang))
}

#[instrument(level = "info", skip(state, body), fields(category = %body.category))]
pub async fn http_post_session(
  State(state): State<Arc<AppState>>,
  Json(body): Json<StartSessionIn>,
) -> Result<Json<SessionOut>, DrillError> {
  let out = do_start_session(&state, body.lang, &body.category, body.rounds).await?;
  info!(target: "drill", session = %out.session_id, lang = %out.lang, "HTTP session started");
  Ok(Json(out))
}

#[instrument(level = "info", skip(state, body), fields(session = %body.session_id))]
pub async fn http_post_next(
  State(state): State<Arc<AppState>>,
  Json(body): Json<SessionRef>,
) -> Result<Json<crate::session::SentenceTurn>, DrillError> {
  Ok(Json(do_next_sentence(&state, &body.session_id).await?))
}

#[instrument(level = "info", skip(state, body), fields(session = %body.session_id, answer_len = body.answer.len()))]
pub async fn http_post_answer(
  State(state): State<Arc<AppState>>,
  Json(body): Json<AnswerIn>,
) -> Result<Json<AnswerOut>, DrillError> {
  Ok(Json(do_submit_answer(&state, &body.session_id, &body.answer).await?))
}

#[instrument(level = "info", skip(state))]
pub async fn http_delete_session(
  State(state): State<Arc<AppState>>,
  Path(session_id): Path<String>,
) -> Result<Json<EndOut>, DrillError> {
  if do_end_session(&state, &session_id).await {
    Ok(Json(EndOut { existed: true }))
  } else {
    Err(DrillError::UnknownSession(session_id))
  }
}

#[instrument(level = "info", skip(state))]
pub async fn http_post_refs_reload(
  State(state): State<Arc<AppState>>,
  Path(lang): Path<String>,
) -> Result<Json<RefsReloadOut>, DrillError> {
  Ok(Json(do_reload_refs(&state, &lang)?))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_settings(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(do_get_settings(&state))
}

#[instrument(level = "info", skip(state, body), fields(src_lang = %body.src_lang))]
pub async fn http_post_settings(
  State(state): State<Arc<AppState>>,
  Json(body): Json<SettingsIn>,
) -> Result<Json<SettingsOut>, DrillError> {
  Ok(Json(do_save_settings(&state, &body.src_lang)?))
}
