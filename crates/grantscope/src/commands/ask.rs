//! Free-text question over the bound dataset. Shares the insight contract
//! with the section views: same retry policy, same caching, same degraded
//! behavior when the service is unavailable.

use anyhow::Result;

use crate::analysis::{summary, AnalysisResult, SummaryConfig};
use crate::insight::SectionInsight;

use super::ApiOptions;

pub async fn handle(api: &ApiOptions, question: String) -> Result<()> {
  let store = super::open_store()?;
  let (session, dataset) = super::load_bound(&store)?;

  // Questions run against the whole-dataset summary as their data context.
  let context = AnalysisResult::Summary(summary::summarize(&dataset, &SummaryConfig::default()));

  let commentary = match super::build_engine(api, &store, true) {
    Some(engine) => {
      engine
        .section_insight(&dataset, &context, session.theme.as_ref(), Some(&question))
        .await
    }
    None => SectionInsight::Unavailable {
      reason: format!("insights unavailable: {}", sibyl::InsightError::MissingCredential),
    },
  };

  super::print_insight("Your Question", &commentary);
  Ok(())
}
