use std::sync::Arc;

use async_trait::async_trait;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use transdrill_backend::bridge::{build_bridge, TranslationBridge};
use transdrill_backend::config::{BridgeCfg, Prompts};
use transdrill_backend::refpack::ReferenceStore;
use transdrill_backend::{BridgeError, Evaluator, ScoreParams, Tier};

const SERVER_PACK: &str = r#"[
  {"triggers": ["server"], "ref": "the server is down", "alts": ["server is offline"]}
]"#;

fn refs(lang: &str, raw: Option<&str>) -> (TempDir, Arc<ReferenceStore>) {
  let dir = tempfile::tempdir().expect("tempdir");
  if let Some(raw) = raw {
    std::fs::write(dir.path().join(format!("{lang}.json")), raw).expect("write pack");
  }
  let store = Arc::new(ReferenceStore::cached(dir.path()));
  (dir, store)
}

fn close(a: f64, b: f64) -> bool {
  (a - b).abs() < 1e-9
}

/// Bridge that "succeeds" with nothing, like a provider answering an empty body.
struct Silent;

#[async_trait]
impl TranslationBridge for Silent {
  fn name(&self) -> &str { "silent" }

  async fn try_translate(&self, _text: &str, _src: &str, _tgt: &str) -> Result<String, BridgeError> {
    Ok(String::new())
  }
}

#[tokio::test]
async fn reference_pack_tier_scores_recall_overlap() {
  let (_dir, store) = refs("x", Some(SERVER_PACK));
  let ev = Evaluator::new(store, None, ScoreParams::default());

  let out = ev.evaluate("server error occurred", "server down", "x", "en").await;

  assert_eq!(out.tier, Tier::Reference);
  assert!(close(out.score, 3.94), "score was {}", out.score);
  assert_eq!(out.alternatives[0], "the server is down");
  assert_eq!(out.alternatives[1], "server is offline");
  assert!(out.alternatives[2..].iter().all(|a| a == "server is offline"));
}

#[tokio::test]
async fn heuristic_tier_without_pack_or_bridge() {
  let (_dir, store) = refs("x", None);
  let ev = Evaluator::new(store, None, ScoreParams::default());

  let out = ev.evaluate("anything at all", "hello world foo", "x", "en").await;

  assert_eq!(out.tier, Tier::Heuristic);
  assert!(close(out.score, 2.28), "score was {}", out.score);
  assert_eq!(out.alternatives[0], "hello world foo");
  assert_eq!(out.alternatives[1], "Hello world foo");
  assert_eq!(out.alternatives.len(), 5);
}

#[tokio::test]
async fn empty_bridge_output_falls_back_to_reference_pack() {
  let (_dir, store) = refs("x", Some(SERVER_PACK));
  let ev = Evaluator::new(store, Some(Arc::new(Silent)), ScoreParams::default());

  let out = ev.evaluate("server error occurred", "server down", "x", "en").await;

  assert_eq!(out.tier, Tier::Reference);
  assert!(close(out.score, 3.94));
  assert_eq!(out.alternatives[0], "the server is down");
}

#[tokio::test]
async fn failing_libre_server_falls_back_to_reference_pack() {
  let server = MockServer::start().await;
  Mock::given(method("POST"))
    .and(path("/translate"))
    .respond_with(ResponseTemplate::new(500).set_body_string("model crashed"))
    .expect(1)
    .mount(&server)
    .await;

  let cfg = BridgeCfg { provider: Some("libre".into()), libre_url: server.uri(), ..BridgeCfg::default() };
  let bridge = build_bridge(&cfg, &Prompts::default()).expect("libre bridge");
  let (_dir, store) = refs("x", Some(SERVER_PACK));
  let ev = Evaluator::new(store, Some(bridge), ScoreParams::default());

  let out = ev.evaluate("server error occurred", "server down", "x", "en").await;
  assert_eq!(out.tier, Tier::Reference);
  assert!(close(out.score, 3.94));
}

#[tokio::test]
async fn failing_bridge_without_pack_is_heuristic() {
  let (_dir, store) = refs("x", None);
  let ev = Evaluator::new(store, Some(Arc::new(Silent)), ScoreParams::default());

  let out = ev.evaluate("server error occurred", "the server is down", "x", "en").await;
  assert_eq!(out.tier, Tier::Heuristic);
  assert!(close(out.score, 2.9));
}

#[tokio::test]
async fn libre_translation_becomes_the_reference() {
  let server = MockServer::start().await;
  Mock::given(method("POST"))
    .and(path("/translate"))
    .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
      "translatedText": "The server does not respond"
    })))
    .mount(&server)
    .await;

  let cfg = BridgeCfg { provider: Some("libre".into()), libre_url: server.uri(), ..BridgeCfg::default() };
  let bridge = build_bridge(&cfg, &Prompts::default()).expect("libre bridge");
  let (_dir, store) = refs("x", Some(SERVER_PACK));
  let ev = Evaluator::new(store, Some(bridge), ScoreParams::default());

  let out = ev.evaluate("server error occurred", "The server is not responding", "x", "en").await;

  assert_eq!(out.tier, Tier::Bridged);
  assert!(close(out.score, 5.0));
  // normalized machine output leads, pack alternatives follow
  assert_eq!(out.alternatives[0], "The server is not responding");
  assert_eq!(out.alternatives[1], "server is offline");
}

#[tokio::test]
async fn scale_and_offset_shift_every_tier() {
  let params = ScoreParams { scale: 0.5, offset: 1.0, penalty_factor: 0.6 };
  let (_dir, store) = refs("x", Some(SERVER_PACK));
  let ev = Evaluator::new(store, None, params);

  let out = ev.evaluate("server error occurred", "the server is down", "x", "en").await;
  assert!(close(out.score, 3.5));
}
