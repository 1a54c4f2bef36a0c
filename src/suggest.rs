//! Shaping suggested translations into a fixed-size list.

use std::collections::HashSet;

pub const SUGGESTION_COUNT: usize = 5;

/// Trim, drop empties, keep first occurrences (exact, case-sensitive) and
/// return exactly five entries. Short lists are padded with their last entry;
/// nothing usable yields five empty strings.
pub fn dedup5<I, S>(candidates: I) -> [String; SUGGESTION_COUNT]
where
  I: IntoIterator<Item = S>,
  S: AsRef<str>,
{
  let mut seen = HashSet::new();
  let mut out: Vec<String> = Vec::with_capacity(SUGGESTION_COUNT);
  for c in candidates {
    let t = c.as_ref().trim();
    if t.is_empty() || !seen.insert(t.to_string()) {
      continue;
    }
    out.push(t.to_string());
    if out.len() == SUGGESTION_COUNT {
      break;
    }
  }
  if let Some(last) = out.last().cloned() {
    out.resize(SUGGESTION_COUNT, last);
  }
  out.try_into().unwrap_or_default()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_input_gives_five_blanks() {
    let out = dedup5(Vec::<String>::new());
    assert_eq!(out, ["", "", "", "", ""].map(String::from));
    let blanks = dedup5(["  ", "", "\t"]);
    assert!(blanks.iter().all(|s| s.is_empty()));
  }

  #[test]
  fn pads_with_last_entry() {
    let out = dedup5([" The server is down ", "The server is offline", "The server is down"]);
    assert_eq!(
      out,
      ["The server is down", "The server is offline", "The server is offline", "The server is offline", "The server is offline"]
        .map(String::from)
    );
  }

  #[test]
  fn dedup_is_case_sensitive_and_truncates() {
    let out = dedup5(["a", "A", "b", "a", "c", "d", "e", "f"]);
    assert_eq!(out, ["a", "A", "b", "c", "d"].map(String::from));
  }
}
