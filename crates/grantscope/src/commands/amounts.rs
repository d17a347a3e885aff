//! Grant amount distribution view across the fixed USD bands.

use anyhow::Result;

use crate::analysis::{distribution, AnalysisResult, DistributionConfig};
use crate::chart;
use crate::dataset::AmountBand;

use super::ApiOptions;

pub async fn handle(api: &ApiOptions, bands: Vec<AmountBand>, insight: bool) -> Result<()> {
  let store = super::open_store()?;
  let (session, dataset) = super::load_bound(&store)?;

  // Amount views are meaningless without amounts; fail with remediation.
  dataset.require_amounts()?;

  let config = if bands.is_empty() {
    DistributionConfig::default()
  } else {
    DistributionConfig { bands }
  };
  let result = AnalysisResult::Distribution(distribution::distribution(&dataset, &config));

  super::print_charts(&chart::render(&result));

  if insight {
    if let Some(engine) = super::build_engine(api, &store, true) {
      let commentary =
        engine.section_insight(&dataset, &result, session.theme.as_ref(), None).await;
      super::print_insight(result.section().title(), &commentary);
    }
  }

  Ok(())
}
