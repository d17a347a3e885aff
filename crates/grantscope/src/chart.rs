//! Chart artifacts: titled blocks of preformatted text (horizontal bars,
//! aligned tables) that embed in terminal output and in the Markdown report.
//!
//! Rendering never fails: empty input produces a `(no data)` placeholder.

use crate::analysis::{format_usd, AnalysisResult};

/// Maximum bar length in characters.
const BAR_WIDTH: usize = 40;

const NO_DATA: &str = "(no data)";

#[derive(Debug, Clone, PartialEq)]
pub struct ChartArtifact {
  pub title: String,
  pub lines: Vec<String>,
}

impl ChartArtifact {
  pub fn placeholder(title: impl Into<String>) -> Self {
    Self { title: title.into(), lines: vec![NO_DATA.to_string()] }
  }

  pub fn is_placeholder(&self) -> bool {
    self.lines.len() == 1 && self.lines[0] == NO_DATA
  }

  /// Fenced block for the Markdown report.
  pub fn to_markdown(&self) -> String {
    let mut out = format!("**{}**\n\n```text\n", self.title);
    for line in &self.lines {
      out.push_str(line);
      out.push('\n');
    }
    out.push_str("```\n");
    out
  }

  /// Print to stdout under a heading; diagnostics stay on stderr.
  pub fn print(&self) {
    println!("{}", harper::heading(&self.title));
    for line in &self.lines {
      println!("{line}");
    }
    println!();
  }
}

/// Horizontal bar chart. Bars scale to the largest value.
pub fn bar_chart(title: &str, rows: &[(String, u64)], format_value: fn(u64) -> String) -> ChartArtifact {
  if rows.is_empty() || rows.iter().all(|(_, v)| *v == 0) {
    return ChartArtifact::placeholder(title);
  }

  let label_width = rows.iter().map(|(label, _)| label.chars().count()).max().unwrap_or(0);
  let max_value = rows.iter().map(|(_, v)| *v).max().unwrap_or(1).max(1);
  let bar_width = BAR_WIDTH;

  let lines = rows
    .iter()
    .map(|(label, value)| {
      let filled = ((*value as f64 / max_value as f64) * bar_width as f64).round() as usize;
      let bar = "█".repeat(filled.max(usize::from(*value > 0)));
      let pad = " ".repeat(bar_width.saturating_sub(bar.chars().count()));
      format!("{label:<label_width$}  {bar}{pad}  {}", format_value(*value))
    })
    .collect();

  ChartArtifact { title: title.to_string(), lines }
}

/// Column-aligned table.
pub fn table(title: &str, headers: &[&str], rows: &[Vec<String>]) -> ChartArtifact {
  if rows.is_empty() {
    return ChartArtifact::placeholder(title);
  }

  let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
  for row in rows {
    for (i, cell) in row.iter().enumerate() {
      if i < widths.len() {
        widths[i] = widths[i].max(cell.chars().count());
      }
    }
  }

  let render_row = |cells: &[String]| {
    cells
      .iter()
      .enumerate()
      .map(|(i, cell)| format!("{cell:<width$}", width = widths.get(i).copied().unwrap_or(0)))
      .collect::<Vec<_>>()
      .join("  ")
      .trim_end()
      .to_string()
  };

  let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
  let separator = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().join("  ");

  let mut lines = vec![render_row(&header_cells), separator];
  lines.extend(rows.iter().map(|row| render_row(row)));

  ChartArtifact { title: title.to_string(), lines }
}

/// Every chart artifact for one analysis result.
pub fn render(result: &AnalysisResult) -> Vec<ChartArtifact> {
  match result {
    AnalysisResult::Summary(a) => {
      let metrics = table(
        "Dataset Overview",
        &["Metric", "Value"],
        &[
          vec!["Total grants".into(), a.total_grants.to_string()],
          vec!["Total amount".into(), format_usd(a.total_amount)],
          vec!["Average amount".into(), format_usd(a.average_amount.round() as u64)],
          vec!["Median amount".into(), format_usd(a.median_amount.round() as u64)],
          vec!["Unique funders".into(), a.unique_funders.to_string()],
          vec!["Unique recipients".into(), a.unique_recipients.to_string()],
        ],
      );

      let funders: Vec<(String, u64)> =
        a.top_funders.iter().map(|f| (f.name.clone(), f.total_amount)).collect();
      let types: Vec<(String, u64)> =
        a.funder_types.iter().map(|t| (t.funder_type.clone(), t.grants as u64)).collect();
      let years: Vec<(String, u64)> =
        a.totals_by_year.iter().map(|y| (y.year.to_string(), y.total_amount)).collect();

      vec![
        metrics,
        bar_chart("Top Funders by Total Amount", &funders, format_usd),
        bar_chart("Grants by Funder Type", &types, |v| v.to_string()),
        bar_chart("Total Amount by Year", &years, format_usd),
      ]
    }

    AnalysisResult::Distribution(a) => {
      let rows: Vec<(String, u64)> =
        a.buckets.iter().map(|b| (b.band.label().to_string(), b.total_amount)).collect();
      let counts: Vec<(String, u64)> =
        a.buckets.iter().map(|b| (b.band.label().to_string(), b.grants as u64)).collect();
      vec![
        bar_chart("Total Amount by USD Band", &rows, format_usd),
        bar_chart("Grant Count by USD Band", &counts, |v| v.to_string()),
      ]
    }

    AnalysisResult::Relationships(a) => {
      let averages: Vec<(String, u64)> = a
        .averages_by_factor
        .iter()
        .map(|row| (row.value.clone(), row.average_amount.round() as u64))
        .collect();

      let mut charts = vec![bar_chart(
        &format!("Average Amount by {}", capitalize(a.factor.label())),
        &averages,
        format_usd,
      )];

      if let Some(affinity) = &a.funder_affinity {
        let slices: Vec<(String, u64)> =
          affinity.slices.iter().map(|s| (s.value.clone(), s.total_amount)).collect();
        charts.push(bar_chart(&format!("Funder Affinity: {}", affinity.funder), &slices, format_usd));
      }

      charts
    }

    AnalysisResult::TopCategories(a) => {
      let rows: Vec<Vec<String>> = a
        .categories
        .iter()
        .map(|c| {
          vec![
            c.value.clone(),
            c.unique_grants.to_string(),
            format_usd(c.total_amount),
            format_usd(c.average_amount.round() as u64),
          ]
        })
        .collect();

      vec![table(
        &format!("Top Categories by {}", capitalize(a.column.label())),
        &["Category", "Unique grants", "Total", "Average"],
        &rows,
      )]
    }

    AnalysisResult::Descriptions(a) => {
      let words: Vec<(String, u64)> =
        a.top_words.iter().map(|w| (w.word.clone(), w.count as u64)).collect();

      let mut charts = vec![bar_chart("Most Frequent Description Words", &words, |v| v.to_string())];

      for subject in &a.by_subject {
        let words: Vec<(String, u64)> =
          subject.words.iter().map(|w| (w.word.clone(), w.count as u64)).collect();
        charts.push(bar_chart(&format!("Vocabulary: {}", subject.subject), &words, |v| {
          v.to_string()
        }));
      }

      charts
    }
  }
}

fn capitalize(text: &str) -> String {
  let mut chars = text.chars();
  match chars.next() {
    Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    None => String::new(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_rows_render_a_placeholder() {
    let chart = bar_chart("Nothing", &[], format_usd);
    assert!(chart.is_placeholder());

    let chart = table("Nothing", &["A", "B"], &[]);
    assert!(chart.is_placeholder());
  }

  #[test]
  fn zero_valued_rows_render_a_placeholder() {
    let rows = vec![("a".to_string(), 0u64), ("b".to_string(), 0u64)];
    assert!(bar_chart("Zeroes", &rows, format_usd).is_placeholder());
  }

  #[test]
  fn bars_scale_to_the_largest_value() {
    let rows = vec![("big".to_string(), 100u64), ("half".to_string(), 50u64)];
    let chart = bar_chart("Scale", &rows, |v| v.to_string());

    let bar_len = |line: &str| line.chars().filter(|c| *c == '█').count();
    assert_eq!(bar_len(&chart.lines[0]), 40);
    assert_eq!(bar_len(&chart.lines[1]), 20);
  }

  #[test]
  fn tiny_nonzero_values_still_get_a_mark() {
    let rows = vec![("big".to_string(), 1_000_000u64), ("tiny".to_string(), 1u64)];
    let chart = bar_chart("Marks", &rows, |v| v.to_string());
    assert!(chart.lines[1].contains('█'));
  }

  #[test]
  fn table_columns_align() {
    let rows = vec![
      vec!["Education".to_string(), "12".to_string()],
      vec!["Health".to_string(), "7".to_string()],
    ];
    let chart = table("T", &["Category", "Count"], &rows);

    // Header, separator, two rows.
    assert_eq!(chart.lines.len(), 4);
    assert!(chart.lines[0].starts_with("Category"));
    assert!(chart.lines[1].starts_with("--------"));
  }

  #[test]
  fn markdown_embeds_a_fenced_block() {
    let chart = bar_chart("Title", &[("a".to_string(), 1u64)], |v| v.to_string());
    let markdown = chart.to_markdown();
    assert!(markdown.starts_with("**Title**"));
    assert!(markdown.contains("```text"));
    assert!(markdown.ends_with("```\n"));
  }
}
