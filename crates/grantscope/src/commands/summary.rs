//! Data summary view: headline metrics, top funders, funder types, yearly
//! totals, with optional AI commentary.

use anyhow::Result;

use crate::analysis::{summary, AnalysisResult, SummaryConfig};
use crate::chart;

use super::ApiOptions;

pub async fn handle(api: &ApiOptions, top: usize, insight: bool) -> Result<()> {
  let store = super::open_store()?;
  let (session, dataset) = super::load_bound(&store)?;

  let config = SummaryConfig { top_funders: top, ..SummaryConfig::default() };
  let result = AnalysisResult::Summary(summary::summarize(&dataset, &config));

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
