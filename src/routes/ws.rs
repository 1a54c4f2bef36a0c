//! WebSocket upgrade + message loop. Each client message is parsed as JSON and
//! forwarded to core logic. We reply with a single JSON message per request.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{info, error, instrument, debug};

use crate::error::DrillError;
use crate::logic::*;
use crate::protocol::{ClientWsMessage, ServerWsMessage};
use crate::state::AppState;

#[instrument(level = "info", skip(ws, state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "transdrill_backend", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "transdrill_backend", "WebSocket connected");
  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        let reply = reply_to_text(&txt, &state).await;
        if let Err(e) = socket.send(Message::Text(reply)).await {
          error!(target: "transdrill_backend", error = %e, "WS send error");
          break;
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "transdrill_backend", "WebSocket disconnected");
}

/// Parse, dispatch, serialize one text frame.
pub async fn reply_to_text(txt: &str, state: &AppState) -> String {
  let reply_msg = match serde_json::from_str::<ClientWsMessage>(txt) {
    Ok(incoming) => {
      debug!(target: "transdrill_backend", "WS received: {:?}", &incoming);
      handle_client_ws(incoming, state).await
    }
    Err(e) => ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) },
  };

  serde_json::to_string(&reply_msg).unwrap_or_else(|e| {
    serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
  })
}

fn error_msg(e: DrillError) -> ServerWsMessage {
  ServerWsMessage::Error { message: e.to_string() }
}

#[instrument(level = "info", skip(state))]
async fn handle_client_ws(msg: ClientWsMessage, state: &AppState) -> ServerWsMessage {
  match msg {
    ClientWsMessage::Ping => ServerWsMessage::Pong,

    ClientWsMessage::Evaluate { source_text, user_text, source_lang } => {
      let result = do_evaluate(state, &source_text, &user_text, source_lang).await;
      ServerWsMessage::Evaluation { result }
    }

    ClientWsMessage::ListLanguages => ServerWsMessage::Languages { languages: do_languages(state).languages },

    ClientWsMessage::ListCategories { lang } => {
      let out = do_categories(state, &lang);
      ServerWsMessage::Categories { lang: out.lang, categories: out.categories }
    }

    ClientWsMessage::StartSession { lang, category, rounds } => {
      match do_start_session(state, lang, &category, rounds).await {
        Ok(session) => {
          info!(target: "drill", session = %session.session_id, "WS session started");
          ServerWsMessage::Session { session }
        }
        Err(e) => error_msg(e),
      }
    }

    ClientWsMessage::NextSentence { session_id } => match do_next_sentence(state, &session_id).await {
      Ok(turn) => ServerWsMessage::Sentence { turn },
      Err(e) => error_msg(e),
    },

    ClientWsMessage::SubmitAnswer { session_id, answer } => match do_submit_answer(state, &session_id, &answer).await {
      Ok(answer) => ServerWsMessage::AnswerResult { answer },
      Err(e) => error_msg(e),
    },

    ClientWsMessage::EndSession { session_id } => {
      let existed = do_end_session(state, &session_id).await;
      ServerWsMessage::SessionEnded { session_id, existed }
    }

    ClientWsMessage::GetSettings => ServerWsMessage::Settings { settings: do_get_settings(state) },

    ClientWsMessage::ReloadRefs { lang } => match do_reload_refs(state, &lang) {
      Ok(reload) => ServerWsMessage::RefsReloaded { reload },
      Err(e) => error_msg(e),
    },

    ClientWsMessage::SaveSettings { src_lang } => match do_save_settings(state, &src_lang) {
      Ok(settings) => ServerWsMessage::Settings { settings },
      Err(e) => error_msg(e),
    },
  }
}
