//! Subcommand handlers. Each module owns one CLI verb; shared plumbing
//! (session loading, engine construction, output helpers) lives here.

pub mod amounts;
pub mod ask;
pub mod descriptions;
pub mod open;
pub mod relationships;
pub mod report;
pub mod reset;
pub mod status;
pub mod summary;
pub mod theme;
pub mod top;

use anyhow::{Context, Result};

use crate::chart::ChartArtifact;
use crate::dataset::{self, Dataset};
use crate::insight::{InsightEngine, SectionInsight};
use crate::session::{Session, SessionStore};

use sibyl::{credentials, InsightClient, OpenAiBackend};

/// Insight service options from the CLI's global flags.
#[derive(Debug, Clone)]
pub struct ApiOptions {
  pub api_key: Option<String>,
  pub model: String,
  pub base_url: String,
}

pub(crate) fn open_store() -> Result<SessionStore> {
  SessionStore::open_default()
}

/// The bound session and its freshly loaded dataset.
pub(crate) fn load_bound(store: &SessionStore) -> Result<(Session, Dataset)> {
  let session = store.require()?;
  let dataset = dataset::load_path(&session.dataset_path)
    .with_context(|| format!("could not load dataset `{}`", session.dataset_path.display()))?;
  Ok((session, dataset))
}

/// Build an insight engine, or `None` (with a warning) when no credential is
/// available. Charts never depend on this succeeding.
pub(crate) fn build_engine(
  api: &ApiOptions,
  store: &SessionStore,
  interactive: bool,
) -> Option<InsightEngine> {
  let key = match credentials::resolve(api.api_key.as_deref(), interactive) {
    Ok(key) => key,
    Err(err) => {
      harper::warn(&format!("{err}; charts will render without commentary"));
      return None;
    }
  };

  match OpenAiBackend::new(&api.base_url, &api.model, key) {
    Ok(backend) => Some(InsightEngine::new(
      InsightClient::new(Box::new(backend)),
      &api.model,
      store.insights_dir(),
    )),
    Err(err) => {
      harper::warn(&format!("{err}; charts will render without commentary"));
      None
    }
  }
}

pub(crate) fn print_charts(charts: &[ChartArtifact]) {
  for chart in charts {
    chart.print();
  }
}

/// Print one section's commentary, or its degraded notice.
pub(crate) fn print_insight(title: &str, insight: &SectionInsight) {
  println!("{}", harper::heading(&format!("AI Commentary: {title}")));
  match insight {
    SectionInsight::Generated { text, cached } => {
      if *cached {
        harper::debug("served from the insight cache");
      }
      let width = harper::terminal_width();
      for line in harper::wrap(text, width) {
        println!("{line}");
      }
    }
    SectionInsight::Unavailable { reason } => {
      harper::warn(reason);
    }
  }
  println!();
}
