//! Top categories by unique grant count.
//!
//! Unique means unique `grant_key`: a grant exploded across several tags
//! still counts once per category value it carries.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::dataset::{Dataset, GrantRecord, UNKNOWN};

use super::format_usd;
use super::summary::FunderTotal;

/// Categorical column a top-categories view ranks by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
pub enum CategoryColumn {
  FunderName,
  FunderType,
  FunderState,
  RecipName,
  Subject,
  Population,
  Strategy,
}

impl CategoryColumn {
  pub fn label(&self) -> &'static str {
    match self {
      CategoryColumn::FunderName => "funder name",
      CategoryColumn::FunderType => "funder type",
      CategoryColumn::FunderState => "funder state",
      CategoryColumn::RecipName => "recipient name",
      CategoryColumn::Subject => "grant subject",
      CategoryColumn::Population => "target population",
      CategoryColumn::Strategy => "grant strategy",
    }
  }

  fn values<'a>(&self, record: &'a GrantRecord) -> Vec<&'a str> {
    match self {
      CategoryColumn::FunderName => vec![record.funder_name.as_str()],
      CategoryColumn::FunderType => vec![record.funder_type.as_str()],
      CategoryColumn::FunderState => vec![record.funder_state.as_str()],
      CategoryColumn::RecipName => vec![record.recip_name.as_str()],
      CategoryColumn::Subject => record.subjects.iter().map(String::as_str).collect(),
      CategoryColumn::Population => record.populations.iter().map(String::as_str).collect(),
      CategoryColumn::Strategy => record.strategies.iter().map(String::as_str).collect(),
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct TopCategoriesConfig {
  pub column: CategoryColumn,
  pub limit: usize,
}

impl Default for TopCategoriesConfig {
  fn default() -> Self {
    Self { column: CategoryColumn::Subject, limit: 10 }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryCount {
  pub value: String,
  pub unique_grants: usize,
  pub total_amount: u64,
  pub average_amount: f64,
}

/// Detail for the leading category: its top funders by total amount.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryDetail {
  pub value: String,
  pub top_funders: Vec<FunderTotal>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopCategoriesAnalysis {
  pub column: CategoryColumn,
  pub categories: Vec<CategoryCount>,
  pub leader: Option<CategoryDetail>,
}

pub fn top_categories(dataset: &Dataset, config: &TopCategoriesConfig) -> TopCategoriesAnalysis {
  let records = dataset.records();

  // Unique grant keys and amount totals per category value.
  let mut per_value: BTreeMap<&str, (HashSet<&str>, u64, usize)> = BTreeMap::new();
  for record in records {
    for value in config.column.values(record) {
      if value == UNKNOWN {
        continue;
      }
      let entry = per_value.entry(value).or_default();
      if entry.0.insert(&record.grant_key) {
        if let Some(amount) = record.amount_usd {
          entry.1 += amount;
          entry.2 += 1;
        }
      }
    }
  }

  let mut categories: Vec<CategoryCount> = per_value
    .into_iter()
    .map(|(value, (keys, total_amount, amounted))| CategoryCount {
      value: value.to_string(),
      unique_grants: keys.len(),
      total_amount,
      average_amount: if amounted == 0 { 0.0 } else { total_amount as f64 / amounted as f64 },
    })
    .collect();
  categories.sort_by(|a, b| b.unique_grants.cmp(&a.unique_grants).then(a.value.cmp(&b.value)));
  categories.truncate(config.limit);

  let leader = categories.first().map(|top| CategoryDetail {
    value: top.value.clone(),
    top_funders: leading_funders(records, config.column, &top.value),
  });

  TopCategoriesAnalysis { column: config.column, categories, leader }
}

/// Top five funders by total amount within one category value.
fn leading_funders(records: &[GrantRecord], column: CategoryColumn, value: &str) -> Vec<FunderTotal> {
  let mut by_funder: BTreeMap<&str, (usize, u64)> = BTreeMap::new();
  let mut seen: HashSet<&str> = HashSet::new();

  for record in records {
    if !column.values(record).contains(&value) || !seen.insert(&record.grant_key) {
      continue;
    }
    let entry = by_funder.entry(&record.funder_name).or_default();
    entry.0 += 1;
    entry.1 += record.amount_usd.unwrap_or(0);
  }

  let mut funders: Vec<FunderTotal> = by_funder
    .into_iter()
    .map(|(name, (grants, total_amount))| FunderTotal { name: name.to_string(), grants, total_amount })
    .collect();
  funders.sort_by(|a, b| b.total_amount.cmp(&a.total_amount).then(a.name.cmp(&b.name)));
  funders.truncate(5);
  funders
}

impl TopCategoriesAnalysis {
  pub fn extract_lines(&self) -> Vec<String> {
    let mut lines = Vec::new();
    for category in &self.categories {
      lines.push(format!(
        "{}: {} unique grants, {} total",
        category.value,
        category.unique_grants,
        format_usd(category.total_amount)
      ));
    }
    if let Some(leader) = &self.leader {
      if let Some(top) = leader.top_funders.first() {
        lines.push(format!(
          "Leading funder in `{}`: {} ({})",
          leader.value,
          top.name,
          format_usd(top.total_amount)
        ));
      }
    }
    lines
  }
}
