//! Shared fixtures for the integration tests.
#![allow(dead_code)] // not every test binary uses every fixture

use grantscope::dataset::{self, Dataset};

/// A small Candid-style document with mixed coverage: one duplicate key,
/// one record without an amount, one numeric-string amount.
pub fn sample_json() -> String {
  r#"{
    "grants": [
      {
        "grant_key": "g-001",
        "funder_name": "Alpha Education Fund",
        "funder_type": "Independent Foundation",
        "funder_state": "CA",
        "recip_name": "Bright Futures Academy",
        "recip_state": "CA",
        "amount_usd": 25000,
        "year_issued": "2021",
        "grant_subject_tran": "Education;Youth development",
        "grant_population_tran": "Children and youth",
        "grant_strategy_tran": "Program development",
        "grant_description": "After school tutoring and literacy programs for elementary students"
      },
      {
        "grant_key": "g-001",
        "funder_name": "Alpha Education Fund",
        "funder_type": "Independent Foundation",
        "funder_state": "CA",
        "recip_name": "Bright Futures Academy",
        "recip_state": "CA",
        "amount_usd": 25000,
        "year_issued": "2021",
        "grant_subject_tran": "Education",
        "grant_population_tran": "Children and youth",
        "grant_strategy_tran": "Program development",
        "grant_description": "After school tutoring and literacy programs for elementary students"
      },
      {
        "grant_key": "g-002",
        "funder_name": "Beta Health Trust",
        "funder_type": "Operating Foundation",
        "funder_state": "NY",
        "recip_name": "Community Clinic Network",
        "recip_state": "NY",
        "amount_usd": "150,000",
        "year_issued": 2022,
        "grant_subject_tran": "Health",
        "grant_population_tran": "Low-income families",
        "grant_strategy_tran": "Capacity building",
        "grant_description": "Expanding preventive care outreach in underserved neighborhoods"
      },
      {
        "grant_key": "g-003",
        "funder_name": "Alpha Education Fund",
        "funder_type": "Independent Foundation",
        "funder_state": "CA",
        "recip_name": "Rural Schools Alliance",
        "recip_state": "MT",
        "amount_usd": 750000,
        "year_issued": "2022",
        "grant_subject_tran": "Education",
        "grant_population_tran": "Rural communities",
        "grant_strategy_tran": "Capital and infrastructure",
        "grant_description": "Classroom construction and teacher training across rural districts"
      },
      {
        "grant_key": "g-004",
        "funder_name": "Gamma Arts Council",
        "funder_type": "Public Charity",
        "funder_state": "WA",
        "recip_name": "City Arts Collective",
        "recip_state": "WA",
        "amount_usd": "not reported",
        "year_issued": "2023",
        "grant_subject_tran": "Arts and culture",
        "grant_population_tran": "",
        "grant_strategy_tran": "",
        "grant_description": "Public murals and community arts workshops"
      },
      {
        "grant_key": "g-005",
        "funder_name": "Beta Health Trust",
        "funder_type": "Operating Foundation",
        "funder_state": "NY",
        "recip_name": "Bright Futures Academy",
        "recip_state": "CA",
        "amount_usd": 2000000,
        "year_issued": "2023",
        "grant_subject_tran": "Health;Education",
        "grant_population_tran": "Children and youth",
        "grant_strategy_tran": "Program development",
        "grant_description": "School nutrition and student health screening initiative"
      }
    ]
  }"#
  .to_string()
}

/// A document whose records carry no usable amounts.
pub fn amountless_json() -> String {
  r#"{
    "grants": [
      {
        "grant_key": "n-001",
        "funder_name": "Delta Fund",
        "recip_name": "Org One",
        "grant_subject_tran": "Environment",
        "grant_description": "Watershed restoration and habitat monitoring"
      },
      {
        "grant_key": "n-002",
        "funder_name": "Delta Fund",
        "recip_name": "Org Two",
        "grant_subject_tran": "Environment",
        "grant_description": "Community composting education"
      }
    ]
  }"#
  .to_string()
}

pub fn sample_dataset() -> Dataset {
  dataset::load_reader(sample_json().as_bytes()).expect("sample dataset loads")
}

pub fn amountless_dataset() -> Dataset {
  dataset::load_reader(amountless_json().as_bytes()).expect("amountless dataset loads")
}
