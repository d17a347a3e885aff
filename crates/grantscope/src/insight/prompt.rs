//! Prompt assembly for insight requests.
//!
//! Every prompt carries three layers of context: a dataset profile (headline
//! statistics), the data extract of the analysis being discussed, and the
//! user's project theme. The question layer is either the section's default
//! ask or the user's own free-text question.

use crate::analysis::{self, AnalysisResult, SummaryConfig};
use crate::dataset::Dataset;
use crate::session::ProjectTheme;

use sibyl::CompletionRequest;

const SYSTEM_PROMPT: &str = "You are an assistant helping a grant analyst explore a grant dataset \
to inform their funding search and grant writing. Ground every statement in the data provided; \
do not offer generic advice the data cannot support. Respond in Markdown.";

/// Default generation size; commentary, not essays.
const MAX_TOKENS: u32 = 900;

const TEMPERATURE: f32 = 0.2;

/// Headline statistics shared by every prompt.
pub fn dataset_profile(dataset: &Dataset) -> Vec<String> {
  let summary = analysis::summary::summarize(dataset, &SummaryConfig { top_funders: 3, top_tags: 5 });

  let mut lines = vec![format!(
    "The dataset contains {} grant records from {} unique funders to {} unique recipients.",
    summary.total_grants, summary.unique_funders, summary.unique_recipients
  )];

  if let Some((min, max)) = summary.year_range {
    lines.push(format!("Grants were issued between {min} and {max}."));
  }

  if summary.grants_with_amounts > 0 {
    lines.push(format!(
      "Total awarded: {}; average {}; median {}.",
      analysis::format_usd(summary.total_amount),
      analysis::format_usd(summary.average_amount.round() as u64),
      analysis::format_usd(summary.median_amount.round() as u64)
    ));
  }

  if !summary.top_subjects.is_empty() {
    let subjects: Vec<&str> = summary.top_subjects.iter().map(|(s, _)| s.as_str()).collect();
    lines.push(format!("Leading subjects: {}.", subjects.join(", ")));
  }
  if !summary.top_populations.is_empty() {
    let populations: Vec<&str> = summary.top_populations.iter().map(|(p, _)| p.as_str()).collect();
    lines.push(format!("Leading populations served: {}.", populations.join(", ")));
  }

  lines
}

/// Prompt for one analysis section, with an optional user question.
pub fn section_prompt(
  dataset: &Dataset,
  result: &AnalysisResult,
  theme: Option<&ProjectTheme>,
  question: Option<&str>,
) -> CompletionRequest {
  let section = result.section();
  let mut body = String::new();

  body.push_str("Dataset profile:\n");
  for line in dataset_profile(dataset) {
    body.push_str("- ");
    body.push_str(&line);
    body.push('\n');
  }

  body.push_str(&format!("\nCurrent view: {}.\nKey data points:\n", section.title()));
  for line in result.extract_lines() {
    body.push_str("- ");
    body.push_str(&line);
    body.push('\n');
  }

  if let Some(theme) = theme {
    body.push_str(&format!("\nProject theme: {}\n", theme.as_context()));
  }

  match question {
    Some(question) => body.push_str(&format!("\nThe user's question is: {question}\n")),
    None => body.push_str(&format!(
      "\nAnalyze the {} view. Provide insights, trends, and implications for a grant seeker{}.\n",
      section.title().to_lowercase(),
      if theme.is_some() { ", relating them to the project theme where relevant" } else { "" }
    )),
  }

  CompletionRequest::new(body)
    .with_system(SYSTEM_PROMPT)
    .with_max_tokens(MAX_TOKENS)
    .with_temperature(TEMPERATURE)
}

/// Prompt for the comprehensive final section, fed with the per-section
/// commentary gathered so far.
pub fn comprehensive_prompt(
  dataset: &Dataset,
  section_insights: &[(String, String)],
  theme: Option<&ProjectTheme>,
) -> CompletionRequest {
  let mut body = String::new();

  body.push_str("Dataset profile:\n");
  for line in dataset_profile(dataset) {
    body.push_str("- ");
    body.push_str(&line);
    body.push('\n');
  }

  if let Some(theme) = theme {
    body.push_str(&format!("\nProject theme: {}\n", theme.as_context()));
  }

  if !section_insights.is_empty() {
    body.push_str("\nSection analyses so far:\n");
    for (title, text) in section_insights {
      body.push_str(&format!("\n## {title}\n{text}\n"));
    }
  }

  body.push_str(
    "\nBased on the full analysis above, provide a final summary and recommendations covering:\n\
     1. How the data relates to the project theme.\n\
     2. The most relevant insights for this specific project.\n\
     3. Funding opportunities or strategies the data supports.\n\
     4. Challenges or areas of concern in this grant landscape.\n\
     5. Actionable recommendations for the grant seeker.\n\
     Organize the response into clear sections with headers.\n",
  );

  CompletionRequest::new(body)
    .with_system(SYSTEM_PROMPT)
    .with_max_tokens(MAX_TOKENS * 2)
    .with_temperature(TEMPERATURE)
}
