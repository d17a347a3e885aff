//! Harper - logging and output formatting for the GrantScope tools.
//!
//! All diagnostics go to stderr so stdout stays clean for data output
//! (tables, charts, report paths). Levels: `info`, `warn`, `error`,
//! `debug`, `success`. Formatting helpers (`heading`, `rule`, `wrap`)
//! return strings so callers decide which stream they belong on.

use colored::*;

/// Width reserved for the level tag column.
const TAG_WIDTH: usize = 6;

/// Fallback width when the terminal size cannot be determined.
const DEFAULT_WIDTH: usize = 80;

fn emit(tag: &str, color: Color, message: &str) {
  let pad = " ".repeat(TAG_WIDTH.saturating_sub(tag.len()));
  let tag = tag.color(color).bold();
  for line in message.lines() {
    eprintln!("{tag}{pad} {line}");
  }
}

/// General information.
pub fn info(message: &str) {
  emit("info", Color::Blue, message);
}

/// Something needs attention but execution continues.
pub fn warn(message: &str) {
  emit("warn", Color::Yellow, message);
}

/// Something went wrong.
pub fn error(message: &str) {
  emit("error", Color::Red, message);
}

/// Detailed diagnostic output.
pub fn debug(message: &str) {
  emit("debug", Color::Magenta, message);
}

/// An operation completed successfully.
pub fn success(message: &str) {
  emit("ok", Color::Green, message);
}

/// Width of the attached terminal, bounded to [40, DEFAULT_WIDTH].
pub fn terminal_width() -> usize {
  let (_, cols) = console::Term::stdout().size();
  (cols as usize).clamp(40, DEFAULT_WIDTH)
}

/// A horizontal rule sized to the terminal.
pub fn rule(ch: char) -> String {
  ch.to_string().repeat(terminal_width())
}

/// A section heading: bold title over a dashed rule of matching length.
pub fn heading(title: &str) -> String {
  let underline = "-".repeat(title.chars().count());
  format!("{}\n{}", title.bold(), underline)
}

/// Wrap text to the given width, preserving paragraph breaks.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
  let mut lines = Vec::new();

  for paragraph in text.split('\n') {
    if paragraph.trim().is_empty() {
      lines.push(String::new());
      continue;
    }

    let mut current = String::new();
    for word in paragraph.split_whitespace() {
      if current.is_empty() {
        current = word.to_string();
      } else if current.chars().count() + 1 + word.chars().count() <= width {
        current.push(' ');
        current.push_str(word);
      } else {
        lines.push(std::mem::take(&mut current));
        current = word.to_string();
      }
    }

    if !current.is_empty() {
      lines.push(current);
    }
  }

  lines
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn wrap_respects_width() {
    let text = "one two three four five six seven eight nine ten";
    for line in wrap(text, 12) {
      assert!(line.chars().count() <= 12, "line too long: {line}");
    }
  }

  #[test]
  fn wrap_preserves_paragraph_breaks() {
    let lines = wrap("first paragraph\n\nsecond paragraph", 40);
    assert!(lines.contains(&String::new()));
  }

  #[test]
  fn wrap_keeps_overlong_words_whole() {
    let lines = wrap("supercalifragilisticexpialidocious", 10);
    assert_eq!(lines.len(), 1);
  }

  #[test]
  fn heading_underline_matches_title_length() {
    let rendered = heading("Dataset Overview");
    let underline = rendered.lines().last().unwrap();
    assert_eq!(underline.chars().count(), "Dataset Overview".chars().count());
    assert!(underline.chars().all(|c| c == '-'));
  }
}
