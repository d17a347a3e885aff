//! Dataset loading and preprocessing.
//!
//! Accepts Candid-style JSON (`{"grants": [...]}`). Field handling mirrors
//! the upstream feed quirks: amounts and years arrive as numbers or numeric
//! strings, multi-valued tags are semicolon-delimited, blanks mean `Unknown`.
//! Records are de-duplicated by (year, grant key).

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use super::{Dataset, DatasetError, GrantRecord, UNKNOWN};

#[derive(Deserialize)]
struct RawDocument {
  grants: Vec<RawGrant>,
}

/// Wire-format grant. Every field is optional; coercion happens in
/// `preprocess`, not in serde, so one bad field never rejects the file.
#[derive(Deserialize, Default)]
#[serde(default)]
struct RawGrant {
  grant_key: String,
  funder_name: String,
  funder_type: String,
  funder_city: String,
  funder_state: String,
  recip_name: String,
  recip_city: String,
  recip_state: String,
  amount_usd: Value,
  year_issued: Value,
  grant_subject_tran: String,
  grant_population_tran: String,
  grant_strategy_tran: String,
  grant_duration: String,
  grant_description: String,
  last_updated: String,
}

/// Load and preprocess a dataset from a file path.
pub fn load_path(path: &Path) -> Result<Dataset, DatasetError> {
  let file = File::open(path)?;
  load_reader(BufReader::new(file))
}

/// Load and preprocess a dataset from any reader.
pub fn load_reader<R: Read>(reader: R) -> Result<Dataset, DatasetError> {
  let document: RawDocument = serde_json::from_reader(reader)
    .map_err(|e| DatasetError::Format(format!("expected {{\"grants\": [...]}}: {e}")))?;

  preprocess(document.grants)
}

fn preprocess(raw: Vec<RawGrant>) -> Result<Dataset, DatasetError> {
  let mut seen: HashSet<(Option<i32>, String)> = HashSet::new();
  let mut records = Vec::with_capacity(raw.len());

  for grant in raw {
    let year_issued = coerce_year(&grant.year_issued);

    // Same (year, grant key) pair counts once.
    if !grant.grant_key.is_empty() && !seen.insert((year_issued, grant.grant_key.clone())) {
      continue;
    }

    records.push(GrantRecord {
      grant_key: fill(grant.grant_key),
      funder_name: fill(grant.funder_name),
      funder_type: fill(grant.funder_type),
      funder_city: fill(grant.funder_city),
      funder_state: fill(grant.funder_state),
      recip_name: fill(grant.recip_name),
      recip_city: fill(grant.recip_city),
      recip_state: fill(grant.recip_state),
      amount_usd: coerce_amount(&grant.amount_usd),
      year_issued,
      subjects: split_tags(&grant.grant_subject_tran),
      populations: split_tags(&grant.grant_population_tran),
      strategies: split_tags(&grant.grant_strategy_tran),
      grant_duration: fill(grant.grant_duration),
      grant_description: grant.grant_description.trim().to_string(),
      last_updated: grant.last_updated,
    });
  }

  Dataset::new(records)
}

fn fill(value: String) -> String {
  let trimmed = value.trim();
  if trimmed.is_empty() {
    UNKNOWN.to_string()
  } else {
    trimmed.to_string()
  }
}

/// Split a semicolon-delimited tag field into individual values.
fn split_tags(value: &str) -> Vec<String> {
  let tags: Vec<String> = value
    .split(';')
    .map(str::trim)
    .filter(|t| !t.is_empty())
    .map(str::to_string)
    .collect();

  if tags.is_empty() {
    vec![UNKNOWN.to_string()]
  } else {
    tags
  }
}

/// Amounts arrive as JSON numbers or numeric strings; anything else is `None`.
fn coerce_amount(value: &Value) -> Option<u64> {
  match value {
    Value::Number(n) => {
      if let Some(v) = n.as_u64() {
        Some(v)
      } else {
        n.as_f64().filter(|v| *v >= 0.0).map(|v| v.round() as u64)
      }
    }
    Value::String(s) => {
      let cleaned = s.trim().replace([',', '$'], "");
      cleaned.parse::<u64>().ok().or_else(|| {
        cleaned.parse::<f64>().ok().filter(|v| *v >= 0.0).map(|v| v.round() as u64)
      })
    }
    _ => None,
  }
}

fn coerce_year(value: &Value) -> Option<i32> {
  match value {
    Value::Number(n) => n.as_i64().map(|v| v as i32),
    Value::String(s) => s.trim().parse::<i32>().ok(),
    _ => None,
  }
  .filter(|year| (1000..=9999).contains(year))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn tags_split_on_semicolons() {
    assert_eq!(split_tags("education; health ;arts"), vec!["education", "health", "arts"]);
    assert_eq!(split_tags(""), vec![UNKNOWN]);
    assert_eq!(split_tags(" ; "), vec![UNKNOWN]);
  }

  #[test]
  fn amounts_coerce_from_numbers_and_strings() {
    assert_eq!(coerce_amount(&serde_json::json!(125000)), Some(125_000));
    assert_eq!(coerce_amount(&serde_json::json!(125000.6)), Some(125_001));
    assert_eq!(coerce_amount(&serde_json::json!("98,500")), Some(98_500));
    assert_eq!(coerce_amount(&serde_json::json!("$12000")), Some(12_000));
    assert_eq!(coerce_amount(&serde_json::json!("n/a")), None);
    assert_eq!(coerce_amount(&serde_json::json!(null)), None);
    assert_eq!(coerce_amount(&serde_json::json!(-500)), None);
  }

  #[test]
  fn years_coerce_and_bound() {
    assert_eq!(coerce_year(&serde_json::json!("2021")), Some(2021));
    assert_eq!(coerce_year(&serde_json::json!(2019)), Some(2019));
    assert_eq!(coerce_year(&serde_json::json!("unknown")), None);
    assert_eq!(coerce_year(&serde_json::json!(0)), None);
  }
}
