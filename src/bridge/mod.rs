//! External translation bridges.
//!
//! A bridge turns a source sentence into a machine reference translation.
//! Backends are chosen by name from configuration (`MT_PROVIDER`). Transport
//! failures stay inside the bridge: `translate` logs them and returns an empty
//! string, which the evaluator reads as "tier unavailable".

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{error, info, warn};

use crate::config::{BridgeCfg, Prompts};
use crate::domain::TARGET_LANG;
use crate::error::BridgeError;

pub mod libre;
pub mod openai;

pub use libre::LibreBridge;
pub use openai::OpenAiBridge;

#[async_trait]
pub trait TranslationBridge: Send + Sync {
  fn name(&self) -> &str;

  /// One attempt against the backend. `text` is already trimmed and non-empty.
  async fn try_translate(&self, text: &str, src: &str, tgt: &str) -> Result<String, BridgeError>;

  /// Translation or an empty string. Never fails.
  async fn translate(&self, text: &str, src: &str, tgt: &str) -> String {
    let input = text.trim();
    if input.is_empty() {
      return String::new();
    }
    match self.try_translate(input, src, tgt).await {
      Ok(out) if tgt.eq_ignore_ascii_case(TARGET_LANG) => normalize_english(&out),
      Ok(out) => out.trim().to_string(),
      Err(e) => {
        warn!(target: "transdrill_backend", bridge = self.name(), %src, %tgt, error = %e, "Bridge translation failed");
        String::new()
      }
    }
  }
}

/// Named backends selectable through configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BridgeKind {
  OpenAi,
  Libre,
}

impl BridgeKind {
  pub fn parse(name: &str) -> Option<Self> {
    match name.trim().to_ascii_lowercase().as_str() {
      "openai" => Some(Self::OpenAi),
      "libre" | "libretranslate" => Some(Self::Libre),
      _ => None,
    }
  }
}

/// Build the configured bridge, or `None` when no (known) provider is named.
pub fn build_bridge(cfg: &BridgeCfg, prompts: &Prompts) -> Option<Arc<dyn TranslationBridge>> {
  let name = cfg.provider.as_deref()?;
  let Some(kind) = BridgeKind::parse(name) else {
    warn!(target: "transdrill_backend", provider = %name, "Unknown MT provider; bridge disabled");
    return None;
  };

  let client = match reqwest::Client::builder().timeout(Duration::from_secs(cfg.timeout_secs)).build() {
    Ok(c) => c,
    Err(e) => {
      error!(target: "transdrill_backend", error = %e, "Failed to build HTTP client; bridge disabled");
      return None;
    }
  };

  let bridge: Arc<dyn TranslationBridge> = match kind {
    BridgeKind::OpenAi => Arc::new(OpenAiBridge::new(client, cfg, prompts)),
    BridgeKind::Libre => Arc::new(LibreBridge::new(client, cfg)),
  };
  info!(target: "transdrill_backend", bridge = bridge.name(), timeout_secs = cfg.timeout_secs, "Translation bridge enabled");
  Some(bridge)
}

static ENGLISH_RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
  [
    (r"\bThe server does not respond\b", "The server is not responding"),
    (r"\bUploading of files failed\b", "The file upload has failed"),
    (r"\bIt's too slow\b", "It is too slow"),
    (r"\bI'm\b", "I am"),
    (r"\bHe's\b", "He is"),
    (r"\bShe's\b", "She is"),
    (r"\bCan't\b", "cannot"),
    (r"\bdoesn't\b", "does not"),
  ]
  .into_iter()
  .filter_map(|(pat, rep)| Regex::new(pat).ok().map(|re| (re, rep)))
  .collect()
});

/// Rewrite machine English toward the uncontracted forms learners are drilled on.
pub fn normalize_english(text: &str) -> String {
  let mut out = text.to_string();
  for (re, rep) in ENGLISH_RULES.iter() {
    out = re.replace_all(&out, *rep).into_owned();
  }
  out.trim().to_string()
}
