//! Description text analysis: stop-word filtered word frequencies over the
//! grant descriptions, overall and per leading subject.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::dataset::{Dataset, UNKNOWN};

/// Common English stop words excluded from frequency ranking.
const STOP_WORDS: &[&str] = &[
  // Articles and determiners
  "the", "a", "an", "this", "that", "these", "those", // Conjunctions
  "and", "or", "but", "as", "if", // Prepositions
  "in", "on", "at", "to", "for", "of", "with", "by", "from", "over", "through",
  // Common verbs
  "is", "are", "was", "were", "be", "been", "being", "have", "has", "had", "do", "does", "did",
  "will", "would", "could", "should", "can", "may", // Pronouns
  "you", "your", "we", "our", "us", "they", "them", "their", "it", "its", "he", "she",
  // Grant-speak so common it carries no signal
  "support", "supports", "grant", "grants", "funding", "general", "project", "program",
  "programs",
];

fn stop_words() -> HashSet<&'static str> {
  STOP_WORDS.iter().copied().collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct DescriptionsConfig {
  /// Ranked words overall.
  pub top_words: usize,
  /// Subjects to break out individually.
  pub subjects: usize,
  /// Ranked words per subject.
  pub words_per_subject: usize,
}

impl Default for DescriptionsConfig {
  fn default() -> Self {
    Self { top_words: 15, subjects: 5, words_per_subject: 8 }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct WordCount {
  pub word: String,
  pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubjectWords {
  pub subject: String,
  pub grants: usize,
  pub words: Vec<WordCount>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DescriptionsAnalysis {
  pub described_grants: usize,
  pub average_word_count: f64,
  pub top_words: Vec<WordCount>,
  pub by_subject: Vec<SubjectWords>,
}

/// Lowercased, punctuation-stripped tokens with stop words removed.
pub fn tokenize(text: &str) -> Vec<String> {
  let stops = stop_words();
  text
    .split_whitespace()
    .map(|w| {
      w.trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase()
    })
    .filter(|w| w.len() > 1 && !stops.contains(w.as_str()) && !w.chars().all(|c| c.is_numeric()))
    .collect()
}

pub fn descriptions(dataset: &Dataset, config: &DescriptionsConfig) -> DescriptionsAnalysis {
  let records = dataset.records();

  let described: Vec<_> = records.iter().filter(|r| r.has_description()).collect();
  let described_grants = described.len();
  let average_word_count = if described_grants == 0 {
    0.0
  } else {
    described.iter().map(|r| r.description_word_count()).sum::<usize>() as f64
      / described_grants as f64
  };

  // Overall frequencies.
  let mut counts: BTreeMap<String, usize> = BTreeMap::new();
  for record in &described {
    for token in tokenize(&record.grant_description) {
      *counts.entry(token).or_default() += 1;
    }
  }
  let top_words = rank(counts, config.top_words);

  // Per-subject frequencies for the most represented subjects.
  let mut subject_sizes: BTreeMap<&str, usize> = BTreeMap::new();
  for record in &described {
    for subject in &record.subjects {
      if subject != UNKNOWN {
        *subject_sizes.entry(subject).or_default() += 1;
      }
    }
  }
  let mut leading: Vec<(&str, usize)> = subject_sizes.into_iter().collect();
  leading.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
  leading.truncate(config.subjects);

  let by_subject = leading
    .into_iter()
    .map(|(subject, grants)| {
      let mut counts: BTreeMap<String, usize> = BTreeMap::new();
      for record in described.iter().filter(|r| r.subjects.iter().any(|s| s == subject)) {
        for token in tokenize(&record.grant_description) {
          *counts.entry(token).or_default() += 1;
        }
      }
      SubjectWords {
        subject: subject.to_string(),
        grants,
        words: rank(counts, config.words_per_subject),
      }
    })
    .collect();

  DescriptionsAnalysis { described_grants, average_word_count, top_words, by_subject }
}

fn rank(counts: BTreeMap<String, usize>, limit: usize) -> Vec<WordCount> {
  let mut ranked: Vec<WordCount> =
    counts.into_iter().map(|(word, count)| WordCount { word, count }).collect();
  ranked.sort_by(|a, b| b.count.cmp(&a.count).then(a.word.cmp(&b.word)));
  ranked.truncate(limit);
  ranked
}

impl DescriptionsAnalysis {
  pub fn extract_lines(&self) -> Vec<String> {
    let mut lines = vec![
      format!("Grants with descriptions: {}", self.described_grants),
      format!("Average description length: {:.1} words", self.average_word_count),
    ];

    if !self.top_words.is_empty() {
      let words: Vec<String> =
        self.top_words.iter().take(10).map(|w| format!("{} ({})", w.word, w.count)).collect();
      lines.push(format!("Most frequent words: {}", words.join(", ")));
    }

    for subject in &self.by_subject {
      let words: Vec<&str> = subject.words.iter().take(5).map(|w| w.word.as_str()).collect();
      lines.push(format!("`{}` vocabulary: {}", subject.subject, words.join(", ")));
    }

    lines
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::dataset::GrantRecord;

  fn record(key: &str, description: &str, subjects: &[&str]) -> GrantRecord {
    GrantRecord {
      grant_key: key.to_string(),
      funder_name: "Fund".to_string(),
      funder_type: UNKNOWN.to_string(),
      funder_city: UNKNOWN.to_string(),
      funder_state: UNKNOWN.to_string(),
      recip_name: "Recip".to_string(),
      recip_city: UNKNOWN.to_string(),
      recip_state: UNKNOWN.to_string(),
      amount_usd: None,
      year_issued: None,
      subjects: subjects.iter().map(|s| s.to_string()).collect(),
      populations: vec![UNKNOWN.to_string()],
      strategies: vec![UNKNOWN.to_string()],
      grant_duration: UNKNOWN.to_string(),
      grant_description: description.to_string(),
      last_updated: String::new(),
    }
  }

  #[test]
  fn tokenize_strips_stops_and_punctuation() {
    let tokens = tokenize("The after-school tutoring, for the students!");
    assert!(tokens.contains(&"after-school".to_string()));
    assert!(tokens.contains(&"tutoring".to_string()));
    assert!(tokens.contains(&"students".to_string()));
    assert!(!tokens.contains(&"the".to_string()));
    assert!(!tokens.contains(&"for".to_string()));
  }

  #[test]
  fn tokenize_drops_bare_numbers_and_single_letters() {
    let tokens = tokenize("a 2021 initiative x");
    assert_eq!(tokens, vec!["initiative".to_string()]);
  }

  #[test]
  fn frequencies_rank_descending() {
    let dataset = Dataset::new(vec![
      record("a", "tutoring tutoring literacy", &["Education"]),
      record("b", "literacy outreach", &["Education"]),
    ])
    .unwrap();

    let result = descriptions(&dataset, &DescriptionsConfig::default());
    assert_eq!(result.described_grants, 2);
    assert_eq!(result.top_words[0].word, "literacy");
    assert_eq!(result.top_words[0].count, 2);
    assert_eq!(result.top_words[1].word, "tutoring");
  }

  #[test]
  fn empty_descriptions_are_degenerate_not_errors() {
    let dataset = Dataset::new(vec![record("a", "", &["Education"])]).unwrap();
    let result = descriptions(&dataset, &DescriptionsConfig::default());
    assert_eq!(result.described_grants, 0);
    assert!(result.top_words.is_empty());
    assert!(result.by_subject.is_empty());
  }
}
