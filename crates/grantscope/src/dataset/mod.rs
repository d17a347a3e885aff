//! Grant dataset model: records, amount bands, column coverage.
//!
//! A `Dataset` is loaded once per session and read-only afterwards; analyses
//! only ever borrow it. Heterogeneous uploads are tolerated: absent columns
//! are tracked in `ColumnCoverage` instead of failing the load, and each view
//! decides whether a missing column is fatal for it.

pub mod loader;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use loader::{load_path, load_reader};

/// Placeholder for blank categorical values, as in the source data feeds.
pub const UNKNOWN: &str = "Unknown";

#[derive(Debug, Error)]
pub enum DatasetError {
  #[error("could not read dataset: {0}")]
  Io(#[from] std::io::Error),

  #[error("dataset is not valid grant JSON: {0}")]
  Format(String),

  #[error("dataset contains no usable grant records")]
  Empty,

  #[error("dataset has no usable `{0}` values; upload a file that includes them")]
  MissingColumn(&'static str),
}

/// One grant: immutable once loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrantRecord {
  pub grant_key: String,
  pub funder_name: String,
  pub funder_type: String,
  pub funder_city: String,
  pub funder_state: String,
  pub recip_name: String,
  pub recip_city: String,
  pub recip_state: String,
  /// Whole US dollars; `None` when the source value was absent or unparseable.
  pub amount_usd: Option<u64>,
  pub year_issued: Option<i32>,
  pub subjects: Vec<String>,
  pub populations: Vec<String>,
  pub strategies: Vec<String>,
  pub grant_duration: String,
  pub grant_description: String,
  pub last_updated: String,
}

impl GrantRecord {
  /// Amount band, when an amount is present.
  pub fn band(&self) -> Option<AmountBand> {
    self.amount_usd.map(AmountBand::classify)
  }

  /// Whitespace word count of the description.
  pub fn description_word_count(&self) -> usize {
    self.grant_description.split_whitespace().count()
  }

  pub fn has_description(&self) -> bool {
    !self.grant_description.trim().is_empty()
  }
}

/// Fixed clustering of award amounts used across distribution views.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
pub enum AmountBand {
  #[value(name = "0-50k")]
  UpTo50K,
  #[value(name = "50k-100k")]
  To100K,
  #[value(name = "100k-500k")]
  To500K,
  #[value(name = "500k-1m")]
  To1M,
  #[value(name = "1m+")]
  Over1M,
}

impl AmountBand {
  pub const ALL: [AmountBand; 5] = [
    AmountBand::UpTo50K,
    AmountBand::To100K,
    AmountBand::To500K,
    AmountBand::To1M,
    AmountBand::Over1M,
  ];

  pub fn classify(amount: u64) -> Self {
    match amount {
      0..=49_999 => AmountBand::UpTo50K,
      50_000..=99_999 => AmountBand::To100K,
      100_000..=499_999 => AmountBand::To500K,
      500_000..=999_999 => AmountBand::To1M,
      _ => AmountBand::Over1M,
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      AmountBand::UpTo50K => "0-50k",
      AmountBand::To100K => "50k-100k",
      AmountBand::To500K => "100k-500k",
      AmountBand::To1M => "500k-1M",
      AmountBand::Over1M => "1M+",
    }
  }

  /// Position in `ALL`; used for fixed-size accumulators.
  pub fn index(&self) -> usize {
    match self {
      AmountBand::UpTo50K => 0,
      AmountBand::To100K => 1,
      AmountBand::To500K => 2,
      AmountBand::To1M => 3,
      AmountBand::Over1M => 4,
    }
  }
}

/// Which logical columns carry usable values in the loaded dataset.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ColumnCoverage {
  pub amounts: bool,
  pub years: bool,
  pub subjects: bool,
  pub populations: bool,
  pub strategies: bool,
  pub descriptions: bool,
  pub funder_types: bool,
}

/// An ordered, read-only collection of grant records plus column coverage.
#[derive(Debug, Clone)]
pub struct Dataset {
  records: Vec<GrantRecord>,
  coverage: ColumnCoverage,
}

impl Dataset {
  pub fn new(records: Vec<GrantRecord>) -> Result<Self, DatasetError> {
    if records.is_empty() {
      return Err(DatasetError::Empty);
    }
    let coverage = measure_coverage(&records);
    Ok(Self { records, coverage })
  }

  pub fn records(&self) -> &[GrantRecord] {
    &self.records
  }

  pub fn len(&self) -> usize {
    self.records.len()
  }

  pub fn is_empty(&self) -> bool {
    self.records.is_empty()
  }

  pub fn coverage(&self) -> &ColumnCoverage {
    &self.coverage
  }

  /// Error unless the dataset has usable amounts.
  pub fn require_amounts(&self) -> Result<(), DatasetError> {
    if self.coverage.amounts {
      Ok(())
    } else {
      Err(DatasetError::MissingColumn("amount_usd"))
    }
  }

  /// Error unless the dataset has usable descriptions.
  pub fn require_descriptions(&self) -> Result<(), DatasetError> {
    if self.coverage.descriptions {
      Ok(())
    } else {
      Err(DatasetError::MissingColumn("grant_description"))
    }
  }
}

fn measure_coverage(records: &[GrantRecord]) -> ColumnCoverage {
  let known = |values: &[String]| values.iter().any(|v| v != UNKNOWN);

  ColumnCoverage {
    amounts: records.iter().any(|r| r.amount_usd.is_some()),
    years: records.iter().any(|r| r.year_issued.is_some()),
    subjects: records.iter().any(|r| known(&r.subjects)),
    populations: records.iter().any(|r| known(&r.populations)),
    strategies: records.iter().any(|r| known(&r.strategies)),
    descriptions: records.iter().any(|r| r.has_description()),
    funder_types: records.iter().any(|r| r.funder_type != UNKNOWN),
  }
}
