//! Report assembly.
//!
//! Collects every analysis, its chart artifacts, and its commentary into one
//! Markdown document with exactly six sections in fixed order: Data Summary,
//! Grant Amount Distribution, Relationship Analysis, Top Categories,
//! Description Text Analysis, Comprehensive Analysis. A section whose
//! commentary failed keeps its charts and carries a placeholder instead.

use chrono::{DateTime, Utc};
use futures::future::join_all;

use crate::analysis::{
  self, AnalysisResult, DescriptionsConfig, DistributionConfig, RelationshipsConfig, Section,
  SummaryConfig, TopCategoriesConfig,
};
use crate::chart::{self, ChartArtifact};
use crate::dataset::Dataset;
use crate::insight::{InsightEngine, SectionInsight};
use crate::session::ProjectTheme;

const MISSING_INSIGHT: &str = "Insight not available";

#[derive(Debug, Clone)]
pub struct ReportSection {
  pub section: Section,
  pub charts: Vec<ChartArtifact>,
  pub extract: Vec<String>,
  pub insight: SectionInsight,
}

#[derive(Debug, Clone)]
pub struct Report {
  pub dataset_path: String,
  pub theme: Option<ProjectTheme>,
  pub generated_at: DateTime<Utc>,
  pub sections: Vec<ReportSection>,
}

/// Analysis configurations used for the report's five data sections.
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
  pub summary: SummaryConfig,
  pub distribution: DistributionConfig,
  pub relationships: RelationshipsConfig,
  pub top_categories: TopCategoriesConfig,
  pub descriptions: DescriptionsConfig,
}

/// Compute the five data analyses in report order.
fn analyses(dataset: &Dataset, options: &ReportOptions) -> Vec<AnalysisResult> {
  vec![
    AnalysisResult::Summary(analysis::summary::summarize(dataset, &options.summary)),
    AnalysisResult::Distribution(analysis::distribution::distribution(
      dataset,
      &options.distribution,
    )),
    AnalysisResult::Relationships(analysis::relationships::relationships(
      dataset,
      &options.relationships,
    )),
    AnalysisResult::TopCategories(analysis::top_categories::top_categories(
      dataset,
      &options.top_categories,
    )),
    AnalysisResult::Descriptions(analysis::descriptions::descriptions(
      dataset,
      &options.descriptions,
    )),
  ]
}

/// Build the full report. With an engine, per-section commentary is generated
/// concurrently and each section is isolated: one failure degrades only its
/// own section. Without one, every section carries the same degraded notice.
pub async fn build(
  dataset: &Dataset,
  dataset_path: &str,
  theme: Option<&ProjectTheme>,
  engine: Option<&InsightEngine>,
  options: &ReportOptions,
) -> Report {
  let results = analyses(dataset, options);

  let insights: Vec<SectionInsight> = match engine {
    Some(engine) => {
      join_all(
        results
          .iter()
          .map(|result| engine.section_insight(dataset, result, theme, None)),
      )
      .await
    }
    None => results
      .iter()
      .map(|_| SectionInsight::Unavailable {
        reason: format!("insights unavailable: {}", sibyl::InsightError::MissingCredential),
      })
      .collect(),
  };

  let mut sections: Vec<ReportSection> = results
    .iter()
    .zip(insights.iter())
    .map(|(result, insight)| ReportSection {
      section: result.section(),
      charts: chart::render(result),
      extract: result.extract_lines(),
      insight: insight.clone(),
    })
    .collect();

  // Comprehensive section feeds on whatever commentary succeeded.
  let gathered: Vec<(String, String)> = sections
    .iter()
    .filter_map(|s| {
      s.insight.text().map(|text| (s.section.title().to_string(), text.to_string()))
    })
    .collect();

  let comprehensive = match engine {
    Some(engine) => engine.comprehensive_insight(dataset, &gathered, theme).await,
    None => SectionInsight::Unavailable {
      reason: format!("insights unavailable: {}", sibyl::InsightError::MissingCredential),
    },
  };

  sections.push(ReportSection {
    section: Section::Comprehensive,
    charts: Vec::new(),
    extract: Vec::new(),
    insight: comprehensive,
  });

  debug_assert_eq!(sections.len(), Section::REPORT_ORDER.len());

  Report {
    dataset_path: dataset_path.to_string(),
    theme: theme.cloned(),
    generated_at: Utc::now(),
    sections,
  }
}

impl Report {
  pub fn to_markdown(&self) -> String {
    let mut out = String::from("# Comprehensive Grant Analysis Report\n\n");

    out.push_str(&format!("- Generated: {}\n", self.generated_at.format("%Y-%m-%d %H:%M UTC")));
    out.push_str(&format!("- Dataset: `{}`\n", self.dataset_path));
    if let Some(theme) = &self.theme {
      out.push_str(&format!("- Project theme: {}\n", theme.theme));
      if let Some(objectives) = &theme.objectives {
        out.push_str(&format!("- Objectives: {objectives}\n"));
      }
    }
    out.push('\n');

    for (index, section) in self.sections.iter().enumerate() {
      out.push_str(&format!("## {}. {}\n\n", index + 1, section.section.title()));

      for chart in &section.charts {
        out.push_str(&chart.to_markdown());
        out.push('\n');
      }

      if !section.extract.is_empty() {
        out.push_str("**Key data**\n\n");
        for line in &section.extract {
          out.push_str(&format!("- {line}\n"));
        }
        out.push('\n');
      }

      match &section.insight {
        SectionInsight::Generated { text, .. } => {
          out.push_str(text.trim());
          out.push_str("\n\n");
        }
        SectionInsight::Unavailable { reason } => {
          out.push_str(&format!("_{MISSING_INSIGHT}_ ({reason})\n\n"));
        }
      }
    }

    out
  }
}
