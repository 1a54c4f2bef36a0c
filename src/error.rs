//! Error types.
//!
//! `DrillError` is what callers see. `BridgeError` never leaves a translation
//! bridge: bridges log it and answer with an empty string instead.

use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DrillError {
  /// A sentence pool ended up with no usable (non-blank) line.
  #[error("invalid input: {0}")]
  InvalidInput(String),

  #[error("unknown session: {0}")]
  UnknownSession(String),

  #[error("unknown category '{category}' for language '{lang}'")]
  UnknownCategory { lang: String, category: String },

  #[error("session {0} has no rounds left")]
  SessionFinished(String),

  #[error("session {0} has no sentence to answer yet")]
  NoCurrentSentence(String),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("settings error: {0}")]
  Settings(#[from] serde_json::Error),
}

impl DrillError {
  pub fn status(&self) -> StatusCode {
    match self {
      DrillError::InvalidInput(_) | DrillError::UnknownCategory { .. } => StatusCode::BAD_REQUEST,
      DrillError::UnknownSession(_) => StatusCode::NOT_FOUND,
      DrillError::SessionFinished(_) | DrillError::NoCurrentSentence(_) => StatusCode::CONFLICT,
      DrillError::Io(_) | DrillError::Settings(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl IntoResponse for DrillError {
  fn into_response(self) -> Response {
    let status = self.status();
    (status, Json(json!({ "error": self.to_string() }))).into_response()
  }
}

/// Transport-level failures of an external translation bridge.
#[derive(Debug, Error)]
pub enum BridgeError {
  #[error("bridge credentials are missing")]
  MissingCredentials,

  #[error("request timed out after {0}s")]
  Timeout(u64),

  #[error("HTTP {status}: {message}")]
  Http { status: u16, message: String },

  #[error("network error: {0}")]
  Network(String),

  #[error("malformed response: {0}")]
  Malformed(String),
}
