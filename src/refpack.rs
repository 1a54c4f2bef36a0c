//! Reference packs: loading per source language and picking the best drill item.
//!
//! A pack lives at `{refs_dir}/{lang}.json` (language code lower-cased) and is a
//! JSON array of `{"triggers": [...], "ref": "...", "alts": [...]}` objects.
//! A missing or malformed file is an empty pack, never an error.

use std::{
  collections::HashMap,
  path::{Path, PathBuf},
  sync::{Arc, RwLock},
};

use tracing::{debug, info, instrument, warn};

use crate::domain::{DrillItem, ReferencePack};

/// Read and parse the pack for `lang`. Absence and parse failures yield an empty pack.
#[instrument(level = "debug", skip(refs_dir), fields(%lang))]
pub fn load_pack(refs_dir: &Path, lang: &str) -> ReferencePack {
  let path = pack_path(refs_dir, lang);
  let raw = match std::fs::read_to_string(&path) {
    Ok(s) => s,
    Err(e) => {
      debug!(target: "drill", path = %path.display(), error = %e, "No reference pack");
      return Vec::new();
    }
  };
  match serde_json::from_str::<ReferencePack>(&raw) {
    Ok(pack) => {
      info!(target: "drill", path = %path.display(), items = pack.len(), "Loaded reference pack");
      pack
    }
    Err(e) => {
      warn!(target: "drill", path = %path.display(), error = %e, "Malformed reference pack; treating as empty");
      Vec::new()
    }
  }
}

pub fn pack_path(refs_dir: &Path, lang: &str) -> PathBuf {
  refs_dir.join(format!("{}.json", lang.trim().to_lowercase()))
}

/// Item with the most trigger hits in `source_text`. Ties keep the earlier item;
/// `None` only for an empty pack.
pub fn select_best<'a>(source_text: &str, pack: &'a [DrillItem]) -> Option<&'a DrillItem> {
  let mut best: Option<(&DrillItem, usize)> = None;
  for item in pack {
    let hits = item.match_count(source_text);
    match best {
      Some((_, best_hits)) if hits <= best_hits => {}
      _ => best = Some((item, hits)),
    }
  }
  best.map(|(item, _)| item)
}

/// Load-once, read-many pack cache keyed by language code.
/// Entries are replaced wholesale on reload, never mutated in place.
pub struct ReferenceStore {
  refs_dir: PathBuf,
  cache: Option<RwLock<HashMap<String, Arc<ReferencePack>>>>,
}

impl ReferenceStore {
  pub fn cached(refs_dir: impl Into<PathBuf>) -> Self {
    Self { refs_dir: refs_dir.into(), cache: Some(RwLock::new(HashMap::new())) }
  }

  /// Every call re-reads the file.
  pub fn uncached(refs_dir: impl Into<PathBuf>) -> Self {
    Self { refs_dir: refs_dir.into(), cache: None }
  }

  pub fn pack(&self, lang: &str) -> Arc<ReferencePack> {
    let Some(cache) = &self.cache else {
      return Arc::new(load_pack(&self.refs_dir, lang));
    };
    let key = lang.trim().to_lowercase();
    if let Some(hit) = cache.read().unwrap_or_else(|e| e.into_inner()).get(&key) {
      return hit.clone();
    }
    let loaded = Arc::new(load_pack(&self.refs_dir, &key));
    cache
      .write()
      .unwrap_or_else(|e| e.into_inner())
      .entry(key)
      .or_insert(loaded)
      .clone()
  }

  /// Drop the cached pack for `lang` and load it again from disk.
  pub fn reload(&self, lang: &str) -> Arc<ReferencePack> {
    let key = lang.trim().to_lowercase();
    let fresh = Arc::new(load_pack(&self.refs_dir, &key));
    if let Some(cache) = &self.cache {
      cache.write().unwrap_or_else(|e| e.into_inner()).insert(key, fresh.clone());
    }
    fresh
  }
}
