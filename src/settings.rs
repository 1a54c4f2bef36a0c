//! Learner settings persisted as JSON. The target language is pinned to English.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::domain::TARGET_LANG;
use crate::error::DrillError;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LearnerSettings {
  #[serde(default = "default_src_lang")]
  pub src_lang: String,
  #[serde(default = "default_tgt_lang")]
  pub tgt_lang: String,
}

fn default_src_lang() -> String { "ko".into() }
fn default_tgt_lang() -> String { TARGET_LANG.into() }

impl Default for LearnerSettings {
  fn default() -> Self {
    Self { src_lang: default_src_lang(), tgt_lang: default_tgt_lang() }
  }
}

impl LearnerSettings {
  fn pinned(mut self) -> Self {
    self.tgt_lang = TARGET_LANG.into();
    self
  }
}

/// Settings from `path`; anything missing or unreadable gives the defaults.
pub fn load_settings(path: &Path) -> LearnerSettings {
  let raw = match std::fs::read_to_string(path) {
    Ok(s) => s,
    Err(_) => return LearnerSettings::default(),
  };
  match serde_json::from_str::<LearnerSettings>(&raw) {
    Ok(s) => s.pinned(),
    Err(e) => {
      warn!(target: "transdrill_backend", path = %path.display(), error = %e, "Corrupt settings file; using defaults");
      LearnerSettings::default()
    }
  }
}

/// Write settings as pretty JSON and return what was stored.
pub fn save_settings(path: &Path, settings: LearnerSettings) -> Result<LearnerSettings, DrillError> {
  let settings = settings.pinned();
  let body = serde_json::to_string_pretty(&settings)?;
  std::fs::write(path, body)?;
  info!(target: "transdrill_backend", path = %path.display(), src_lang = %settings.src_lang, "Saved learner settings");
  Ok(settings)
}
