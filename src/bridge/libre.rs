//! Self-hosted LibreTranslate server.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::openai::transport_error;
use super::TranslationBridge;
use crate::config::BridgeCfg;
use crate::error::BridgeError;

#[derive(Clone)]
pub struct LibreBridge {
  client: reqwest::Client,
  url: String,
  api_key: Option<String>,
  timeout_secs: u64,
}

#[derive(Serialize)]
struct TranslateReq<'a> {
  q: &'a str,
  source: &'a str,
  target: &'a str,
  format: &'static str,
  #[serde(skip_serializing_if = "Option::is_none")]
  api_key: Option<&'a str>,
}

#[derive(Deserialize)]
struct TranslateResp {
  #[serde(rename = "translatedText")]
  translated_text: String,
}

impl LibreBridge {
  pub fn new(client: reqwest::Client, cfg: &BridgeCfg) -> Self {
    Self {
      client,
      url: cfg.libre_url.trim_end_matches('/').to_string(),
      api_key: cfg.libre_api_key.clone(),
      timeout_secs: cfg.timeout_secs,
    }
  }
}

#[async_trait]
impl TranslationBridge for LibreBridge {
  fn name(&self) -> &str { "libre" }

  #[instrument(level = "info", skip(self, text), fields(text_len = text.len(), %src, %tgt))]
  async fn try_translate(&self, text: &str, src: &str, tgt: &str) -> Result<String, BridgeError> {
    let req = TranslateReq { q: text, source: src, target: tgt, format: "text", api_key: self.api_key.as_deref() };
    let res = self.client.post(format!("{}/translate", self.url))
      .json(&req).send().await
      .map_err(|e| transport_error(e, self.timeout_secs))?;

    if !res.status().is_success() {
      let status = res.status().as_u16();
      let message = res.text().await.unwrap_or_default();
      return Err(BridgeError::Http { status, message });
    }

    let body: TranslateResp = res.json().await.map_err(|e| BridgeError::Malformed(e.to_string()))?;
    Ok(body.translated_text.trim().to_string())
  }
}
