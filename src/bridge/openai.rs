//! Cloud translation through OpenAI chat.completions.
//!
//! One plain-text completion per call, temperature 0. Calls log the model,
//! latency and token usage, never the API key or the texts themselves.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::TranslationBridge;
use crate::config::{BridgeCfg, Prompts};
use crate::error::BridgeError;
use crate::util::fill_template;

#[derive(Clone)]
pub struct OpenAiBridge {
  client: reqwest::Client,
  api_key: Option<String>,
  base_url: String,
  model: String,
  system_template: String,
  timeout_secs: u64,
}

impl OpenAiBridge {
  pub fn new(client: reqwest::Client, cfg: &BridgeCfg, prompts: &Prompts) -> Self {
    Self {
      client,
      api_key: cfg.openai_api_key.clone(),
      base_url: cfg.openai_base_url.trim_end_matches('/').to_string(),
      model: cfg.openai_model.clone(),
      system_template: prompts.translate_system.clone(),
      timeout_secs: cfg.timeout_secs,
    }
  }

  #[instrument(level = "info", skip(self, api_key, system, user), fields(model = %self.model))]
  async fn chat_plain(&self, api_key: &str, system: &str, user: &str) -> Result<String, BridgeError> {
    let url = format!("{}/chat/completions", self.base_url);
    let req = ChatCompletionRequest {
      model: self.model.clone(),
      messages: vec![
        ChatMessageReq { role: "system".into(), content: system.into() },
        ChatMessageReq { role: "user".into(), content: user.into() },
      ],
      temperature: 0.0,
    };

    let start = std::time::Instant::now();
    let res = self.client.post(&url)
      .header(USER_AGENT, "transdrill-backend/0.1")
      .header(CONTENT_TYPE, "application/json")
      .header(AUTHORIZATION, format!("Bearer {}", api_key))
      .json(&req).send().await
      .map_err(|e| transport_error(e, self.timeout_secs))?;

    if !res.status().is_success() {
      let status = res.status();
      let body = res.text().await.unwrap_or_default();
      let message = extract_openai_error(&body).unwrap_or(body);
      return Err(BridgeError::Http { status: status.as_u16(), message });
    }

    let body: ChatCompletionResponse = res.json().await.map_err(|e| BridgeError::Malformed(e.to_string()))?;
    if let Some(usage) = &body.usage {
      info!(elapsed = ?start.elapsed(), prompt_tokens = ?usage.prompt_tokens, completion_tokens = ?usage.completion_tokens, "OpenAI usage");
    }
    let text = body.choices.first()
      .and_then(|c| c.message.content.clone())
      .ok_or_else(|| BridgeError::Malformed("no message content in choices".into()))?;
    Ok(text.trim().to_string())
  }
}

#[async_trait]
impl TranslationBridge for OpenAiBridge {
  fn name(&self) -> &str { "openai" }

  async fn try_translate(&self, text: &str, src: &str, tgt: &str) -> Result<String, BridgeError> {
    let api_key = self.api_key.as_deref().ok_or(BridgeError::MissingCredentials)?;
    let system = fill_template(&self.system_template, &[("src", src), ("tgt", tgt)]);
    self.chat_plain(api_key, &system, text).await
  }
}

pub(crate) fn transport_error(e: reqwest::Error, timeout_secs: u64) -> BridgeError {
  if e.is_timeout() {
    BridgeError::Timeout(timeout_secs)
  } else {
    BridgeError::Network(e.to_string())
  }
}

// --- Chat DTOs ---

#[derive(Serialize)]
struct ChatCompletionRequest {
  model: String,
  messages: Vec<ChatMessageReq>,
  temperature: f32,
}
#[derive(Serialize)]
struct ChatMessageReq { role: String, content: String }

#[derive(Deserialize)]
struct ChatCompletionResponse {
  choices: Vec<ChatChoice>,
  #[serde(default)] usage: Option<Usage>,
}
#[derive(Deserialize)]
struct ChatChoice { message: ChatMessageResp }
#[derive(Deserialize)]
struct ChatMessageResp { content: Option<String> }
#[derive(Deserialize)]
struct Usage {
  #[serde(default)] prompt_tokens: Option<u32>,
  #[serde(default)] completion_tokens: Option<u32>,
}

/// Try to extract a clean error message from OpenAI error body.
fn extract_openai_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EWrap { error: EObj }
  #[derive(Deserialize)]
  struct EObj { message: String }
  serde_json::from_str::<EWrap>(body).ok().map(|w| w.error.message)
}
