//! Insight generation orchestration.
//!
//! The engine glues prompt assembly, the sibyl client, and the on-disk cache
//! together behind one rule: insight failures degrade, they never abort. A
//! failed generation comes back as `SectionInsight::Unavailable` with a
//! user-visible reason, and the surrounding charts render regardless.

pub mod cache;
pub mod prompt;

use crate::analysis::AnalysisResult;
use crate::dataset::Dataset;
use crate::session::ProjectTheme;

use cache::InsightCache;
use sibyl::{CompletionRequest, InsightClient, InsightError};

/// Commentary for one section: generated (possibly from cache) or degraded.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionInsight {
  Generated { text: String, cached: bool },
  Unavailable { reason: String },
}

impl SectionInsight {
  pub fn is_available(&self) -> bool {
    matches!(self, SectionInsight::Generated { .. })
  }

  pub fn text(&self) -> Option<&str> {
    match self {
      SectionInsight::Generated { text, .. } => Some(text),
      SectionInsight::Unavailable { .. } => None,
    }
  }

  /// The degraded notice shown where commentary would have appeared.
  pub fn placeholder(&self) -> Option<&str> {
    match self {
      SectionInsight::Generated { .. } => None,
      SectionInsight::Unavailable { reason } => Some(reason),
    }
  }
}

fn unavailable(err: &InsightError) -> SectionInsight {
  SectionInsight::Unavailable { reason: format!("insights unavailable: {err}") }
}

pub struct InsightEngine {
  client: InsightClient,
  model: String,
  cache: InsightCache,
}

impl InsightEngine {
  pub fn new(client: InsightClient, model: impl Into<String>, cache_dir: std::path::PathBuf) -> Self {
    Self { client, model: model.into(), cache: InsightCache::new(cache_dir) }
  }

  pub fn model(&self) -> &str {
    &self.model
  }

  /// Commentary for one analysis section. Checks the cache first; on any
  /// generation failure returns a degraded notice instead of an error.
  pub async fn section_insight(
    &self,
    dataset: &Dataset,
    result: &AnalysisResult,
    theme: Option<&ProjectTheme>,
    question: Option<&str>,
  ) -> SectionInsight {
    let fingerprint = result.fingerprint();
    let theme_context = theme.map(ProjectTheme::as_context).unwrap_or_default();
    let key = InsightCache::key(&[
      fingerprint.as_str(),
      theme_context.as_str(),
      question.unwrap_or(""),
      self.model.as_str(),
    ]);

    match self.cache.load(&key) {
      Ok(Some(text)) => {
        harper::debug(&format!("insight cache hit for {}", result.section().title()));
        return SectionInsight::Generated { text, cached: true };
      }
      Ok(None) => {}
      Err(err) => harper::warn(&format!("insight cache unreadable, regenerating: {err}")),
    }

    let request = prompt::section_prompt(dataset, result, theme, question);
    self.generate(request, &key, &fingerprint).await
  }

  /// The comprehensive final commentary, fed with per-section insight texts.
  pub async fn comprehensive_insight(
    &self,
    dataset: &Dataset,
    section_insights: &[(String, String)],
    theme: Option<&ProjectTheme>,
  ) -> SectionInsight {
    let combined: String = section_insights
      .iter()
      .map(|(title, text)| format!("{title}\n{text}"))
      .collect::<Vec<_>>()
      .join("\n");
    let theme_context = theme.map(ProjectTheme::as_context).unwrap_or_default();
    let fingerprint = InsightCache::key(&["comprehensive", combined.as_str()]);
    let key =
      InsightCache::key(&[fingerprint.as_str(), theme_context.as_str(), "", self.model.as_str()]);

    if let Ok(Some(text)) = self.cache.load(&key) {
      return SectionInsight::Generated { text, cached: true };
    }

    let request = prompt::comprehensive_prompt(dataset, section_insights, theme);
    self.generate(request, &key, &fingerprint).await
  }

  async fn generate(
    &self,
    request: CompletionRequest,
    key: &str,
    fingerprint: &str,
  ) -> SectionInsight {
    match self.client.generate(&request).await {
      Ok(completion) => {
        if let Err(err) = self.cache.store(key, &completion.model, fingerprint, &completion.text) {
          harper::warn(&format!("could not cache insight: {err}"));
        }
        SectionInsight::Generated { text: completion.text, cached: false }
      }
      Err(err) => {
        harper::warn(&format!("insight generation failed: {err}"));
        unavailable(&err)
      }
    }
  }
}
