//! Grant amount distribution across the fixed USD bands.

use serde::Serialize;

use crate::dataset::{AmountBand, Dataset};

use super::format_usd;

#[derive(Debug, Clone, Serialize)]
pub struct DistributionConfig {
  /// Bands to include, in display order. Defaults to all five.
  pub bands: Vec<AmountBand>,
}

impl Default for DistributionConfig {
  fn default() -> Self {
    Self { bands: AmountBand::ALL.to_vec() }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct BandBucket {
  pub band: AmountBand,
  pub grants: usize,
  pub total_amount: u64,
  /// Share of the selected bands' combined amount, in [0, 1].
  pub share_of_total: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DistributionAnalysis {
  pub buckets: Vec<BandBucket>,
  pub grants_with_amounts: usize,
}

pub fn distribution(dataset: &Dataset, config: &DistributionConfig) -> DistributionAnalysis {
  let mut counts = [0usize; AmountBand::ALL.len()];
  let mut totals = [0u64; AmountBand::ALL.len()];
  let mut grants_with_amounts = 0;

  for record in dataset.records() {
    let Some(amount) = record.amount_usd else { continue };
    grants_with_amounts += 1;
    let idx = AmountBand::classify(amount).index();
    counts[idx] += 1;
    totals[idx] += amount;
  }

  let selected_total: u64 = config.bands.iter().map(|band| totals[band.index()]).sum();

  let buckets = config
    .bands
    .iter()
    .map(|band| {
      let idx = band.index();
      BandBucket {
        band: *band,
        grants: counts[idx],
        total_amount: totals[idx],
        share_of_total: if selected_total == 0 {
          0.0
        } else {
          totals[idx] as f64 / selected_total as f64
        },
      }
    })
    .collect();

  DistributionAnalysis { buckets, grants_with_amounts }
}

impl DistributionAnalysis {
  pub fn extract_lines(&self) -> Vec<String> {
    let mut lines = vec![format!("Grants with amounts: {}", self.grants_with_amounts)];
    for bucket in &self.buckets {
      lines.push(format!(
        "{}: {} grants, {} total ({:.1}% of selection)",
        bucket.band.label(),
        bucket.grants,
        format_usd(bucket.total_amount),
        bucket.share_of_total * 100.0
      ));
    }
    lines
  }

  /// True when no selected band holds any grants.
  pub fn is_degenerate(&self) -> bool {
    self.buckets.iter().all(|b| b.grants == 0)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::dataset::{GrantRecord, UNKNOWN};

  fn record(key: &str, amount: Option<u64>) -> GrantRecord {
    GrantRecord {
      grant_key: key.to_string(),
      funder_name: "Fund".to_string(),
      funder_type: UNKNOWN.to_string(),
      funder_city: UNKNOWN.to_string(),
      funder_state: UNKNOWN.to_string(),
      recip_name: "Recip".to_string(),
      recip_city: UNKNOWN.to_string(),
      recip_state: UNKNOWN.to_string(),
      amount_usd: amount,
      year_issued: None,
      subjects: vec![UNKNOWN.to_string()],
      populations: vec![UNKNOWN.to_string()],
      strategies: vec![UNKNOWN.to_string()],
      grant_duration: UNKNOWN.to_string(),
      grant_description: String::new(),
      last_updated: String::new(),
    }
  }

  #[test]
  fn buckets_count_and_total() {
    let dataset = Dataset::new(vec![
      record("a", Some(10_000)),
      record("b", Some(20_000)),
      record("c", Some(75_000)),
      record("d", Some(2_000_000)),
      record("e", None),
    ])
    .unwrap();

    let result = distribution(&dataset, &DistributionConfig::default());
    assert_eq!(result.grants_with_amounts, 4);

    let counts: Vec<usize> = result.buckets.iter().map(|b| b.grants).collect();
    assert_eq!(counts, vec![2, 1, 0, 0, 1]);

    let shares: f64 = result.buckets.iter().map(|b| b.share_of_total).sum();
    assert!((shares - 1.0).abs() < 1e-9);
  }

  #[test]
  fn band_filter_restricts_buckets() {
    let dataset = Dataset::new(vec![record("a", Some(10_000)), record("b", Some(75_000))]).unwrap();
    let config = DistributionConfig { bands: vec![AmountBand::To100K] };

    let result = distribution(&dataset, &config);
    assert_eq!(result.buckets.len(), 1);
    assert_eq!(result.buckets[0].grants, 1);
    assert_eq!(result.buckets[0].share_of_total, 1.0);
  }

  #[test]
  fn no_amounts_is_degenerate_not_an_error() {
    let dataset = Dataset::new(vec![record("a", None)]).unwrap();
    let result = distribution(&dataset, &DistributionConfig::default());
    assert!(result.is_degenerate());
    assert_eq!(result.grants_with_amounts, 0);
  }
}
