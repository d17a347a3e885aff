//! Derived analyses over a loaded dataset.
//!
//! Every module is a pure function `Dataset x config -> result`: no I/O, no
//! network, no shared state. Results use sorted vectors throughout so the
//! same dataset and configuration always serialize byte-identically, which is
//! what the insight cache fingerprints rely on.

pub mod descriptions;
pub mod distribution;
pub mod relationships;
pub mod summary;
pub mod top_categories;

use serde::Serialize;
use sha2::{Digest, Sha256};

pub use descriptions::{DescriptionsAnalysis, DescriptionsConfig};
pub use distribution::{DistributionAnalysis, DistributionConfig};
pub use relationships::{Factor, RelationshipsAnalysis, RelationshipsConfig};
pub use summary::{SummaryAnalysis, SummaryConfig};
pub use top_categories::{CategoryColumn, TopCategoriesAnalysis, TopCategoriesConfig};

/// Report sections, in their fixed document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Section {
  Summary,
  AmountDistribution,
  Relationships,
  TopCategories,
  Descriptions,
  Comprehensive,
}

impl Section {
  /// The order sections appear in the assembled report.
  pub const REPORT_ORDER: [Section; 6] = [
    Section::Summary,
    Section::AmountDistribution,
    Section::Relationships,
    Section::TopCategories,
    Section::Descriptions,
    Section::Comprehensive,
  ];

  pub fn title(&self) -> &'static str {
    match self {
      Section::Summary => "Data Summary",
      Section::AmountDistribution => "Grant Amount Distribution",
      Section::Relationships => "Relationship Analysis",
      Section::TopCategories => "Top Categories",
      Section::Descriptions => "Description Text Analysis",
      Section::Comprehensive => "Comprehensive Analysis",
    }
  }
}

/// A computed analysis, tagged with the section it belongs to.
#[derive(Debug, Clone, Serialize)]
pub enum AnalysisResult {
  Summary(SummaryAnalysis),
  Distribution(DistributionAnalysis),
  Relationships(RelationshipsAnalysis),
  TopCategories(TopCategoriesAnalysis),
  Descriptions(DescriptionsAnalysis),
}

impl AnalysisResult {
  pub fn section(&self) -> Section {
    match self {
      AnalysisResult::Summary(_) => Section::Summary,
      AnalysisResult::Distribution(_) => Section::AmountDistribution,
      AnalysisResult::Relationships(_) => Section::Relationships,
      AnalysisResult::TopCategories(_) => Section::TopCategories,
      AnalysisResult::Descriptions(_) => Section::Descriptions,
    }
  }

  /// Stable content hash. Identical dataset + configuration always produces
  /// the same fingerprint; the insight cache keys on it.
  pub fn fingerprint(&self) -> String {
    let serialized = serde_json::to_vec(self).expect("analysis results always serialize");
    let mut hasher = Sha256::new();
    hasher.update(&serialized);
    format!("{:x}", hasher.finalize())
  }

  /// Compact key-data lines for prompts and the report's data extract.
  pub fn extract_lines(&self) -> Vec<String> {
    match self {
      AnalysisResult::Summary(a) => a.extract_lines(),
      AnalysisResult::Distribution(a) => a.extract_lines(),
      AnalysisResult::Relationships(a) => a.extract_lines(),
      AnalysisResult::TopCategories(a) => a.extract_lines(),
      AnalysisResult::Descriptions(a) => a.extract_lines(),
    }
  }
}

/// Format whole dollars with thousands separators: `$1,234,567`.
pub fn format_usd(amount: u64) -> String {
  let digits = amount.to_string();
  let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
  for (i, ch) in digits.chars().enumerate() {
    if i > 0 && (digits.len() - i) % 3 == 0 {
      grouped.push(',');
    }
    grouped.push(ch);
  }
  format!("${grouped}")
}

/// Median of an unsorted sample; 0.0 for an empty one.
pub(crate) fn median(values: &mut Vec<u64>) -> f64 {
  if values.is_empty() {
    return 0.0;
  }
  values.sort_unstable();
  let mid = values.len() / 2;
  if values.len() % 2 == 0 {
    (values[mid - 1] + values[mid]) as f64 / 2.0
  } else {
    values[mid] as f64
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn usd_formatting_groups_thousands() {
    assert_eq!(format_usd(0), "$0");
    assert_eq!(format_usd(950), "$950");
    assert_eq!(format_usd(50_000), "$50,000");
    assert_eq!(format_usd(1_234_567), "$1,234,567");
  }

  #[test]
  fn median_handles_even_and_odd_samples() {
    assert_eq!(median(&mut vec![5, 1, 3]), 3.0);
    assert_eq!(median(&mut vec![4, 1, 3, 2]), 2.5);
    assert_eq!(median(&mut Vec::new()), 0.0);
  }

  #[test]
  fn report_order_has_six_distinct_sections() {
    let order = Section::REPORT_ORDER;
    assert_eq!(order.len(), 6);
    for (i, a) in order.iter().enumerate() {
      for b in order.iter().skip(i + 1) {
        assert_ne!(a, b);
      }
    }
  }
}
