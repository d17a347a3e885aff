//! Top categories by unique grant count.

use anyhow::Result;

use crate::analysis::{top_categories, AnalysisResult, CategoryColumn, TopCategoriesConfig};
use crate::chart;

use super::ApiOptions;

pub async fn handle(
  api: &ApiOptions,
  column: CategoryColumn,
  limit: usize,
  insight: bool,
) -> Result<()> {
  let store = super::open_store()?;
  let (session, dataset) = super::load_bound(&store)?;

  let config = TopCategoriesConfig { column, limit };
  let result = AnalysisResult::TopCategories(top_categories::top_categories(&dataset, &config));

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
