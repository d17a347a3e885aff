//! Relationship analysis view: description length vs. amount, averages by
//! tag factor, optional funder affinity.

use anyhow::Result;

use crate::analysis::{relationships, AnalysisResult, Factor, RelationshipsConfig};
use crate::chart;

use super::ApiOptions;

pub async fn handle(
  api: &ApiOptions,
  factor: Factor,
  funder: Option<String>,
  insight: bool,
) -> Result<()> {
  let store = super::open_store()?;
  let (session, dataset) = super::load_bound(&store)?;

  dataset.require_amounts()?;

  let config = RelationshipsConfig { factor, funder, ..RelationshipsConfig::default() };
  let result = AnalysisResult::Relationships(relationships::relationships(&dataset, &config));

  super::print_charts(&chart::render(&result));
  for line in result.extract_lines().iter().take(1) {
    println!("{line}");
    println!();
  }

  if insight {
    if let Some(engine) = super::build_engine(api, &store, true) {
      let commentary =
        engine.section_insight(&dataset, &result, session.theme.as_ref(), None).await;
      super::print_insight(result.section().title(), &commentary);
    }
  }

  Ok(())
}
