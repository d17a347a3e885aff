//! Generate the full six-section Markdown report.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::report::{self, ReportOptions};

use super::ApiOptions;

pub async fn handle(api: &ApiOptions, output: PathBuf) -> Result<()> {
  let store = super::open_store()?;
  let (session, dataset) = super::load_bound(&store)?;

  if session.theme.is_none() {
    harper::warn("no project theme set; the report will not be tailored to a project");
  }

  let engine = super::build_engine(api, &store, true);
  if engine.is_some() {
    harper::info("generating section commentary; this may take a moment");
  }

  let built = report::build(
    &dataset,
    &session.dataset_path.display().to_string(),
    session.theme.as_ref(),
    engine.as_ref(),
    &ReportOptions::default(),
  )
  .await;

  let missing = built.sections.iter().filter(|s| !s.insight.is_available()).count();
  if missing > 0 {
    harper::warn(&format!("{missing} of {} sections have no commentary", built.sections.len()));
  }

  std::fs::write(&output, built.to_markdown())
    .with_context(|| format!("could not write report to `{}`", output.display()))?;

  harper::success(&format!("report written to {}", output.display()));
  Ok(())
}
