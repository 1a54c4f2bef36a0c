//! Sentence catalog on disk: `{text_root}/{lang}/{category}.txt`, one sentence per line.

use std::path::{Component, Path};

use tracing::{debug, instrument};

use crate::error::DrillError;
use crate::picker::SentencePool;

/// Sorted language directories under the text root. Missing root lists nothing.
pub fn list_languages(text_root: &Path) -> Vec<String> {
  let mut langs = entries(text_root, |p| p.is_dir().then(|| file_name(p)).flatten());
  langs.sort();
  langs
}

/// Sorted category names (`*.txt` stems) for one language.
pub fn list_categories(text_root: &Path, lang: &str) -> Vec<String> {
  if !is_plain_name(lang) {
    return Vec::new();
  }
  let mut cats = entries(&text_root.join(lang), |p| {
    let is_txt = p.is_file() && p.extension().is_some_and(|e| e == "txt");
    is_txt.then(|| p.file_stem().and_then(|s| s.to_str()).map(String::from)).flatten()
  });
  cats.sort();
  cats
}

#[instrument(level = "debug", skip(text_root), fields(%lang, %category))]
pub fn load_pool(text_root: &Path, lang: &str, category: &str) -> Result<SentencePool, DrillError> {
  let unknown = || DrillError::UnknownCategory { lang: lang.to_string(), category: category.to_string() };
  if !is_plain_name(lang) || !is_plain_name(category) {
    return Err(unknown());
  }
  let path = text_root.join(lang).join(format!("{category}.txt"));
  let raw = match std::fs::read_to_string(&path) {
    Ok(s) => s,
    Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(unknown()),
    Err(e) => return Err(e.into()),
  };
  let pool = SentencePool::from_lines(raw.lines())?;
  debug!(target: "drill", path = %path.display(), sentences = pool.len(), "Loaded sentence pool");
  Ok(pool)
}

fn entries<F>(dir: &Path, keep: F) -> Vec<String>
where
  F: Fn(&Path) -> Option<String>,
{
  match std::fs::read_dir(dir) {
    Ok(rd) => rd.filter_map(|e| e.ok()).filter_map(|e| keep(&e.path())).collect(),
    Err(_) => Vec::new(),
  }
}

fn file_name(p: &Path) -> Option<String> {
  p.file_name().and_then(|n| n.to_str()).map(String::from)
}

// A single normal path component: no separators, no `..`, not empty.
fn is_plain_name(name: &str) -> bool {
  let mut comps = Path::new(name).components();
  matches!((comps.next(), comps.next()), (Some(Component::Normal(_)), None))
    && !name.contains(['/', '\\'])
}
