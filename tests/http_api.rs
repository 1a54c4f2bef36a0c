use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use transdrill_backend::config::TrainerConfig;
use transdrill_backend::routes::build_router;
use transdrill_backend::routes::ws::reply_to_text;
use transdrill_backend::state::AppState;

struct Fixture {
  dir: TempDir,
  state: Arc<AppState>,
}

fn fixture() -> Fixture {
  let dir = tempfile::tempdir().expect("tempdir");
  let root = dir.path();
  std::fs::create_dir_all(root.join("refs")).expect("refs dir");
  std::fs::write(
    root.join("refs").join("ko.json"),
    r#"[{"triggers":["서버"],"ref":"The server is down","alts":["The server is offline"]}]"#,
  )
  .expect("pack");
  std::fs::create_dir_all(root.join("text").join("ko")).expect("text dir");
  std::fs::write(root.join("text").join("ko").join("it.txt"), "서버가 다운됐어요\n\n서버 오류가 났어요\n").expect("pool");
  std::fs::write(root.join("text").join("ko").join("empty.txt"), "\n   \n").expect("pool");

  let mut cfg = TrainerConfig::default();
  cfg.paths.refs_dir = root.join("refs");
  cfg.paths.text_root = root.join("text");
  cfg.paths.settings_path = root.join(".appconfig.json");
  let state = Arc::new(AppState::with_bridge(cfg, None));
  Fixture { dir, state }
}

async fn call(state: &Arc<AppState>, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
  let mut req = Request::builder().method(method).uri(uri);
  let body = match body {
    Some(v) => {
      req = req.header("content-type", "application/json");
      Body::from(serde_json::to_vec(&v).expect("serialize"))
    }
    None => Body::empty(),
  };
  let response = build_router(state.clone())
    .oneshot(req.body(body).expect("request"))
    .await
    .expect("router dispatch");
  let status = response.status();
  let bytes = to_bytes(response.into_body(), 1024 * 1024).await.expect("body");
  let payload = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
  (status, payload)
}

#[tokio::test]
async fn health_reports_missing_bridge() {
  let f = fixture();
  let (status, body) = call(&f.state, "GET", "/api/v1/health", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body, json!({"ok": true, "bridge": null}));
}

#[tokio::test]
async fn evaluate_uses_reference_pack() {
  let f = fixture();
  let (status, body) = call(
    &f.state,
    "POST",
    "/api/v1/evaluate",
    Some(json!({"sourceText": "서버가 다운됐어요", "userText": "The server is down", "sourceLang": "ko"})),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["tier"], "reference");
  assert_eq!(body["score"], 5.0);
  assert_eq!(body["alternatives"].as_array().map(Vec::len), Some(5));
  assert_eq!(body["alternatives"][1], "The server is offline");
}

#[tokio::test]
async fn evaluate_defaults_language_from_settings() {
  let f = fixture();
  let (_, saved) = call(&f.state, "POST", "/api/v1/settings", Some(json!({"srcLang": "ja"}))).await;
  assert_eq!(saved, json!({"srcLang": "ja", "tgtLang": "en"}));

  // no ja pack on disk, so the ko triggers are never consulted
  let (_, body) = call(
    &f.state,
    "POST",
    "/api/v1/evaluate",
    Some(json!({"sourceText": "서버가 다운됐어요", "userText": "The server is down"})),
  )
  .await;
  assert_eq!(body["tier"], "heuristic");
}

#[tokio::test]
async fn catalog_listing() {
  let f = fixture();
  let (_, langs) = call(&f.state, "GET", "/api/v1/languages", None).await;
  assert_eq!(langs, json!({"languages": ["ko"]}));
  let (_, cats) = call(&f.state, "GET", "/api/v1/categories?lang=ko", None).await;
  assert_eq!(cats, json!({"lang": "ko", "categories": ["empty", "it"]}));
}

#[tokio::test]
async fn practice_session_round_trip() {
  let f = fixture();
  let (status, started) = call(&f.state, "POST", "/api/v1/session", Some(json!({"lang": "ko", "category": "it", "rounds": 2}))).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(started["total"], 2);
  let id = started["sessionId"].as_str().expect("session id").to_string();

  let (status, early) = call(&f.state, "POST", "/api/v1/session/answer", Some(json!({"sessionId": id, "answer": "hi"}))).await;
  assert_eq!(status, StatusCode::CONFLICT);
  assert!(early["error"].as_str().is_some());

  let (_, first) = call(&f.state, "POST", "/api/v1/session/next", Some(json!({"sessionId": id}))).await;
  let (_, answered) = call(&f.state, "POST", "/api/v1/session/answer", Some(json!({"sessionId": id, "answer": "The server is down"}))).await;
  assert_eq!(answered["sentence"], first["sentence"]);
  assert_eq!(answered["tier"], "reference");
  assert_eq!(answered["round"], 1);

  let (_, second) = call(&f.state, "POST", "/api/v1/session/next", Some(json!({"sessionId": id}))).await;
  assert_ne!(first["index"], second["index"]);

  let (status, _) = call(&f.state, "POST", "/api/v1/session/next", Some(json!({"sessionId": id}))).await;
  assert_eq!(status, StatusCode::CONFLICT);

  let (status, ended) = call(&f.state, "DELETE", &format!("/api/v1/session/{id}"), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(ended, json!({"existed": true}));
  let (status, _) = call(&f.state, "POST", "/api/v1/session/next", Some(json!({"sessionId": id}))).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn session_closes_after_final_answer() {
  let f = fixture();
  let (_, started) = call(&f.state, "POST", "/api/v1/session", Some(json!({"lang": "ko", "category": "it", "rounds": 1}))).await;
  let id = started["sessionId"].as_str().expect("session id").to_string();

  let (status, _) = call(&f.state, "POST", "/api/v1/session/next", Some(json!({"sessionId": id}))).await;
  assert_eq!(status, StatusCode::OK);
  let (status, answered) = call(&f.state, "POST", "/api/v1/session/answer", Some(json!({"sessionId": id, "answer": "The server is down"}))).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!((answered["round"].as_u64(), answered["total"].as_u64()), (Some(1), Some(1)));

  assert!(f.state.sessions.read().await.is_empty());
  let (status, _) = call(&f.state, "POST", "/api/v1/session/answer", Some(json!({"sessionId": id, "answer": "again"}))).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  let (status, _) = call(&f.state, "DELETE", &format!("/api/v1/session/{id}"), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn idle_sessions_are_pruned() {
  let f = fixture();
  call(&f.state, "POST", "/api/v1/session", Some(json!({"lang": "ko", "category": "it"}))).await;
  call(&f.state, "POST", "/api/v1/session", Some(json!({"lang": "ko", "category": "it"}))).await;
  assert_eq!(f.state.prune_idle(Duration::from_secs(3600)).await, 0);
  assert_eq!(f.state.sessions.read().await.len(), 2);

  assert_eq!(f.state.prune_idle(Duration::ZERO).await, 2);
  assert!(f.state.sessions.read().await.is_empty());
}

#[tokio::test]
async fn reload_picks_up_a_new_pack() {
  let f = fixture();
  let eval = json!({"sourceText": "こんにちは 世界", "userText": "hello world", "sourceLang": "ja"});
  let (_, before) = call(&f.state, "POST", "/api/v1/evaluate", Some(eval.clone())).await;
  assert_eq!(before["tier"], "heuristic");

  std::fs::write(
    f.dir.path().join("refs").join("ja.json"),
    r#"[{"triggers":["こんにちは"],"ref":"hello world","alts":["hi world"]}]"#,
  )
  .expect("pack");
  // still cached as empty until reloaded
  let (_, cached) = call(&f.state, "POST", "/api/v1/evaluate", Some(eval.clone())).await;
  assert_eq!(cached["tier"], "heuristic");

  let (status, reloaded) = call(&f.state, "POST", "/api/v1/refs/JA/reload", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(reloaded, json!({"lang": "ja", "items": 1}));

  let (_, after) = call(&f.state, "POST", "/api/v1/evaluate", Some(eval)).await;
  assert_eq!(after["tier"], "reference");
  assert_eq!(after["score"], 5.0);
}

#[tokio::test]
async fn session_start_errors() {
  let f = fixture();
  let (status, _) = call(&f.state, "POST", "/api/v1/session", Some(json!({"lang": "ko", "category": "missing"}))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  let (status, body) = call(&f.state, "POST", "/api/v1/session", Some(json!({"lang": "ko", "category": "empty"}))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap_or_default().starts_with("invalid input"));
}

#[tokio::test]
async fn websocket_messages_share_the_same_logic() {
  let f = fixture();
  let pong: Value = serde_json::from_str(&reply_to_text(r#"{"type":"ping"}"#, &f.state).await).expect("json");
  assert_eq!(pong, json!({"type": "pong"}));

  let eval: Value = serde_json::from_str(
    &reply_to_text(r#"{"type":"evaluate","sourceText":"서버","userText":"server down","sourceLang":"ko"}"#, &f.state).await,
  )
  .expect("json");
  assert_eq!(eval["type"], "evaluation");
  assert_eq!(eval["tier"], "reference");

  let bad: Value = serde_json::from_str(&reply_to_text("{nope", &f.state).await).expect("json");
  assert_eq!(bad["type"], "error");

  let missing: Value = serde_json::from_str(&reply_to_text(r#"{"type":"next_sentence","sessionId":"nope"}"#, &f.state).await).expect("json");
  assert_eq!(missing["message"], "unknown session: nope");

  let reload: Value = serde_json::from_str(&reply_to_text(r#"{"type":"reload_refs","lang":"ko"}"#, &f.state).await).expect("json");
  assert_eq!(reload, json!({"type": "refs_reloaded", "lang": "ko", "items": 1}));
}
