//! Show the current session state.

use anyhow::Result;
use colored::*;

pub fn handle() -> Result<()> {
  let store = super::open_store()?;

  let Some(session) = store.load()? else {
    harper::info("no session; run `grantscope open <data.json>` to bind a dataset");
    return Ok(());
  };

  println!("{}", harper::heading("Session"));
  println!("Dataset:  {}", session.dataset_path.display().to_string().cyan());
  match &session.theme {
    Some(theme) => println!("Theme:    {}", theme.theme.yellow()),
    None => println!("Theme:    (none; set one with `grantscope theme <text>`)"),
  }
  println!("Cached insights: {}", store.cached_insights());

  match crate::dataset::load_path(&session.dataset_path) {
    Ok(dataset) => {
      let coverage = dataset.coverage();
      println!("Records:  {}", dataset.len());
      println!(
        "Coverage: amounts={} years={} subjects={} descriptions={}",
        coverage.amounts, coverage.years, coverage.subjects, coverage.descriptions
      );
    }
    Err(err) => harper::warn(&format!("bound dataset is not loadable: {err}")),
  }

  Ok(())
}
