//! Relationship analysis: description length vs. award amount, average
//! award by tag factor, and per-funder affinity toward factor values.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::dataset::{Dataset, GrantRecord, UNKNOWN};

use super::format_usd;

/// Tag family a relationship view slices by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
pub enum Factor {
  Subject,
  Population,
  Strategy,
}

impl Factor {
  pub fn label(&self) -> &'static str {
    match self {
      Factor::Subject => "subject",
      Factor::Population => "population",
      Factor::Strategy => "strategy",
    }
  }

  fn values<'a>(&self, record: &'a GrantRecord) -> &'a [String] {
    match self {
      Factor::Subject => &record.subjects,
      Factor::Population => &record.populations,
      Factor::Strategy => &record.strategies,
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct RelationshipsConfig {
  pub factor: Factor,
  /// Restrict the affinity breakdown to one funder.
  pub funder: Option<String>,
  /// Cap on ranked factor rows.
  pub limit: usize,
}

impl Default for RelationshipsConfig {
  fn default() -> Self {
    Self { factor: Factor::Subject, funder: None, limit: 10 }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct FactorAverage {
  pub value: String,
  pub grants: usize,
  pub average_amount: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct FunderAffinity {
  pub funder: String,
  pub grants: usize,
  pub slices: Vec<AffinitySlice>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AffinitySlice {
  pub value: String,
  pub total_amount: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RelationshipsAnalysis {
  pub factor: Factor,
  /// Records carrying both an amount and a description.
  pub paired_records: usize,
  /// Pearson correlation of description word count vs. amount.
  pub word_count_correlation: Option<f64>,
  pub averages_by_factor: Vec<FactorAverage>,
  pub funder_affinity: Option<FunderAffinity>,
}

pub fn relationships(dataset: &Dataset, config: &RelationshipsConfig) -> RelationshipsAnalysis {
  let records = dataset.records();

  // Description length vs. amount.
  let pairs: Vec<(f64, f64)> = records
    .iter()
    .filter(|r| r.has_description())
    .filter_map(|r| r.amount_usd.map(|a| (r.description_word_count() as f64, a as f64)))
    .collect();
  let word_count_correlation = pearson(&pairs);

  // Average amount per factor value. A record contributes once per tag.
  let mut by_value: BTreeMap<&str, (usize, u64)> = BTreeMap::new();
  for record in records {
    let Some(amount) = record.amount_usd else { continue };
    for value in config.factor.values(record) {
      if value == UNKNOWN {
        continue;
      }
      let entry = by_value.entry(value).or_default();
      entry.0 += 1;
      entry.1 += amount;
    }
  }
  let mut averages_by_factor: Vec<FactorAverage> = by_value
    .into_iter()
    .map(|(value, (grants, total))| FactorAverage {
      value: value.to_string(),
      grants,
      average_amount: total as f64 / grants as f64,
    })
    .collect();
  averages_by_factor.sort_by(|a, b| {
    b.average_amount.partial_cmp(&a.average_amount).unwrap_or(std::cmp::Ordering::Equal).then(a.value.cmp(&b.value))
  });
  averages_by_factor.truncate(config.limit);

  let funder_affinity =
    config.funder.as_deref().map(|funder| affinity(records, funder, config.factor, config.limit));

  RelationshipsAnalysis {
    factor: config.factor,
    paired_records: pairs.len(),
    word_count_correlation,
    averages_by_factor,
    funder_affinity,
  }
}

/// Total amount per factor value for one funder's grants.
fn affinity(records: &[GrantRecord], funder: &str, factor: Factor, limit: usize) -> FunderAffinity {
  let mut grants = 0;
  let mut by_value: BTreeMap<&str, u64> = BTreeMap::new();

  for record in records.iter().filter(|r| r.funder_name == funder) {
    grants += 1;
    let Some(amount) = record.amount_usd else { continue };
    for value in factor.values(record) {
      if value != UNKNOWN {
        *by_value.entry(value).or_default() += amount;
      }
    }
  }

  let mut slices: Vec<AffinitySlice> = by_value
    .into_iter()
    .map(|(value, total_amount)| AffinitySlice { value: value.to_string(), total_amount })
    .collect();
  slices.sort_by(|a, b| b.total_amount.cmp(&a.total_amount).then(a.value.cmp(&b.value)));
  slices.truncate(limit);

  FunderAffinity { funder: funder.to_string(), grants, slices }
}

/// Pearson correlation coefficient; `None` below two points or with zero
/// variance on either axis.
fn pearson(pairs: &[(f64, f64)]) -> Option<f64> {
  if pairs.len() < 2 {
    return None;
  }

  let n = pairs.len() as f64;
  let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
  let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

  let mut cov = 0.0;
  let mut var_x = 0.0;
  let mut var_y = 0.0;
  for (x, y) in pairs {
    let dx = x - mean_x;
    let dy = y - mean_y;
    cov += dx * dy;
    var_x += dx * dx;
    var_y += dy * dy;
  }

  if var_x == 0.0 || var_y == 0.0 {
    return None;
  }

  Some(cov / (var_x.sqrt() * var_y.sqrt()))
}

impl RelationshipsAnalysis {
  pub fn extract_lines(&self) -> Vec<String> {
    let mut lines = Vec::new();

    match self.word_count_correlation {
      Some(r) => lines.push(format!(
        "Description length vs. amount: r = {r:.3} over {} grants",
        self.paired_records
      )),
      None => lines.push("Description length vs. amount: not enough paired data".to_string()),
    }

    for row in &self.averages_by_factor {
      lines.push(format!(
        "Average by {} `{}`: {} across {} grants",
        self.factor.label(),
        row.value,
        format_usd(row.average_amount.round() as u64),
        row.grants
      ));
    }

    if let Some(affinity) = &self.funder_affinity {
      lines.push(format!("Funder affinity for {} ({} grants):", affinity.funder, affinity.grants));
      for slice in &affinity.slices {
        lines.push(format!("  {} -> {}", slice.value, format_usd(slice.total_amount)));
      }
    }

    lines
  }
}
