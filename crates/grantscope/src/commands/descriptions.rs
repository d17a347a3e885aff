//! Description text analysis: word frequencies overall and per subject.

use anyhow::Result;

use crate::analysis::{descriptions, AnalysisResult, DescriptionsConfig};
use crate::chart;

use super::ApiOptions;

pub async fn handle(api: &ApiOptions, limit: usize, insight: bool) -> Result<()> {
  let store = super::open_store()?;
  let (session, dataset) = super::load_bound(&store)?;

  dataset.require_descriptions()?;

  let config = DescriptionsConfig { top_words: limit, ..DescriptionsConfig::default() };
  let result = AnalysisResult::Descriptions(descriptions::descriptions(&dataset, &config));

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
