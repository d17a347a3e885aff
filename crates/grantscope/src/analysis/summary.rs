//! Dataset summary: headline metrics, top funders, funder types, yearly
//! totals, and the leading subject/population/strategy tags.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::dataset::{Dataset, UNKNOWN};

use super::{format_usd, median};

#[derive(Debug, Clone, Serialize)]
pub struct SummaryConfig {
  /// How many top funders to rank.
  pub top_funders: usize,
  /// How many leading tags per tag family.
  pub top_tags: usize,
}

impl Default for SummaryConfig {
  fn default() -> Self {
    Self { top_funders: 10, top_tags: 5 }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct FunderTotal {
  pub name: String,
  pub grants: usize,
  pub total_amount: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct FunderTypeSlice {
  pub funder_type: String,
  pub grants: usize,
  pub total_amount: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct YearTotal {
  pub year: i32,
  pub grants: usize,
  pub total_amount: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryAnalysis {
  pub total_grants: usize,
  pub grants_with_amounts: usize,
  pub total_amount: u64,
  pub average_amount: f64,
  pub median_amount: f64,
  pub unique_funders: usize,
  pub unique_recipients: usize,
  pub year_range: Option<(i32, i32)>,
  pub top_funders: Vec<FunderTotal>,
  pub funder_types: Vec<FunderTypeSlice>,
  pub totals_by_year: Vec<YearTotal>,
  pub top_subjects: Vec<(String, usize)>,
  pub top_populations: Vec<(String, usize)>,
  pub top_strategies: Vec<(String, usize)>,
}

pub fn summarize(dataset: &Dataset, config: &SummaryConfig) -> SummaryAnalysis {
  let records = dataset.records();

  let mut amounts: Vec<u64> = records.iter().filter_map(|r| r.amount_usd).collect();
  let grants_with_amounts = amounts.len();
  let total_amount: u64 = amounts.iter().sum();
  let average_amount = if grants_with_amounts == 0 {
    0.0
  } else {
    total_amount as f64 / grants_with_amounts as f64
  };
  let median_amount = median(&mut amounts);

  let unique_funders = records.iter().map(|r| r.funder_name.as_str()).collect::<HashSet<_>>().len();
  let unique_recipients =
    records.iter().map(|r| r.recip_name.as_str()).collect::<HashSet<_>>().len();

  let years: Vec<i32> = records.iter().filter_map(|r| r.year_issued).collect();
  let year_range = match (years.iter().min(), years.iter().max()) {
    (Some(min), Some(max)) => Some((*min, *max)),
    _ => None,
  };

  // Per-funder totals.
  let mut by_funder: BTreeMap<&str, (usize, u64)> = BTreeMap::new();
  for record in records {
    let entry = by_funder.entry(&record.funder_name).or_default();
    entry.0 += 1;
    entry.1 += record.amount_usd.unwrap_or(0);
  }
  let mut top_funders: Vec<FunderTotal> = by_funder
    .into_iter()
    .map(|(name, (grants, total_amount))| FunderTotal { name: name.to_string(), grants, total_amount })
    .collect();
  top_funders.sort_by(|a, b| b.total_amount.cmp(&a.total_amount).then(a.name.cmp(&b.name)));
  top_funders.truncate(config.top_funders);

  // Funder type breakdown.
  let mut by_type: BTreeMap<&str, (usize, u64)> = BTreeMap::new();
  for record in records {
    let entry = by_type.entry(&record.funder_type).or_default();
    entry.0 += 1;
    entry.1 += record.amount_usd.unwrap_or(0);
  }
  let mut funder_types: Vec<FunderTypeSlice> = by_type
    .into_iter()
    .map(|(funder_type, (grants, total_amount))| FunderTypeSlice {
      funder_type: funder_type.to_string(),
      grants,
      total_amount,
    })
    .collect();
  funder_types.sort_by(|a, b| b.grants.cmp(&a.grants).then(a.funder_type.cmp(&b.funder_type)));

  // Yearly totals, ascending.
  let mut by_year: BTreeMap<i32, (usize, u64)> = BTreeMap::new();
  for record in records {
    if let Some(year) = record.year_issued {
      let entry = by_year.entry(year).or_default();
      entry.0 += 1;
      entry.1 += record.amount_usd.unwrap_or(0);
    }
  }
  let totals_by_year: Vec<YearTotal> = by_year
    .into_iter()
    .map(|(year, (grants, total_amount))| YearTotal { year, grants, total_amount })
    .collect();

  SummaryAnalysis {
    total_grants: records.len(),
    grants_with_amounts,
    total_amount,
    average_amount,
    median_amount,
    unique_funders,
    unique_recipients,
    year_range,
    top_funders,
    funder_types,
    totals_by_year,
    top_subjects: top_tags(records.iter().map(|r| &r.subjects), config.top_tags),
    top_populations: top_tags(records.iter().map(|r| &r.populations), config.top_tags),
    top_strategies: top_tags(records.iter().map(|r| &r.strategies), config.top_tags),
  }
}

/// Most frequent known tags across all records.
fn top_tags<'a>(families: impl Iterator<Item = &'a Vec<String>>, limit: usize) -> Vec<(String, usize)> {
  let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
  for tags in families {
    for tag in tags {
      if tag != UNKNOWN {
        *counts.entry(tag).or_default() += 1;
      }
    }
  }

  let mut ranked: Vec<(String, usize)> =
    counts.into_iter().map(|(tag, count)| (tag.to_string(), count)).collect();
  ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
  ranked.truncate(limit);
  ranked
}

impl SummaryAnalysis {
  pub fn extract_lines(&self) -> Vec<String> {
    let mut lines = vec![
      format!("Total grants: {}", self.total_grants),
      format!("Total amount: {}", format_usd(self.total_amount)),
      format!("Average amount: {}", format_usd(self.average_amount.round() as u64)),
      format!("Median amount: {}", format_usd(self.median_amount.round() as u64)),
      format!("Unique funders: {}", self.unique_funders),
      format!("Unique recipients: {}", self.unique_recipients),
    ];

    if let Some((min, max)) = self.year_range {
      lines.push(format!("Years covered: {min} to {max}"));
    }
    if let Some(top) = self.top_funders.first() {
      lines.push(format!("Top funder: {} ({})", top.name, format_usd(top.total_amount)));
    }
    if !self.top_subjects.is_empty() {
      let subjects: Vec<&str> = self.top_subjects.iter().map(|(s, _)| s.as_str()).collect();
      lines.push(format!("Leading subjects: {}", subjects.join(", ")));
    }

    lines
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::dataset::GrantRecord;

  fn record(funder: &str, recip: &str, amount: Option<u64>, year: Option<i32>) -> GrantRecord {
    GrantRecord {
      grant_key: format!("{funder}-{recip}-{amount:?}-{year:?}"),
      funder_name: funder.to_string(),
      funder_type: "Foundation".to_string(),
      funder_city: UNKNOWN.to_string(),
      funder_state: "CA".to_string(),
      recip_name: recip.to_string(),
      recip_city: UNKNOWN.to_string(),
      recip_state: "NY".to_string(),
      amount_usd: amount,
      year_issued: year,
      subjects: vec!["Education".to_string()],
      populations: vec![UNKNOWN.to_string()],
      strategies: vec![UNKNOWN.to_string()],
      grant_duration: UNKNOWN.to_string(),
      grant_description: "supporting classroom programs".to_string(),
      last_updated: String::new(),
    }
  }

  #[test]
  fn headline_metrics() {
    let dataset = Dataset::new(vec![
      record("Alpha Fund", "School A", Some(10_000), Some(2020)),
      record("Alpha Fund", "School B", Some(30_000), Some(2021)),
      record("Beta Trust", "School A", Some(20_000), Some(2021)),
    ])
    .unwrap();

    let summary = summarize(&dataset, &SummaryConfig::default());
    assert_eq!(summary.total_grants, 3);
    assert_eq!(summary.total_amount, 60_000);
    assert_eq!(summary.average_amount, 20_000.0);
    assert_eq!(summary.median_amount, 20_000.0);
    assert_eq!(summary.unique_funders, 2);
    assert_eq!(summary.unique_recipients, 2);
    assert_eq!(summary.year_range, Some((2020, 2021)));
    assert_eq!(summary.top_funders[0].name, "Alpha Fund");
    assert_eq!(summary.top_funders[0].total_amount, 40_000);
  }

  #[test]
  fn no_amounts_yields_zeroed_metrics() {
    let dataset = Dataset::new(vec![record("Alpha Fund", "School A", None, Some(2020))]).unwrap();
    let summary = summarize(&dataset, &SummaryConfig::default());
    assert_eq!(summary.grants_with_amounts, 0);
    assert_eq!(summary.total_amount, 0);
    assert_eq!(summary.average_amount, 0.0);
  }

  #[test]
  fn unknown_tags_are_not_ranked() {
    let dataset = Dataset::new(vec![record("Alpha Fund", "School A", Some(1), None)]).unwrap();
    let summary = summarize(&dataset, &SummaryConfig::default());
    assert!(summary.top_populations.is_empty());
    assert_eq!(summary.top_subjects, vec![("Education".to_string(), 1)]);
  }
}
