//! Bind a dataset to the session.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::dataset;

pub fn handle(path: PathBuf) -> Result<()> {
  let store = super::open_store()?;

  let dataset = dataset::load_path(&path)
    .with_context(|| format!("could not load dataset `{}`", path.display()))?;

  let session = store.bind_dataset(path)?;

  harper::success(&format!(
    "bound `{}` with {} grant records",
    session.dataset_path.display(),
    dataset.len()
  ));

  let coverage = dataset.coverage();
  if !coverage.amounts {
    harper::warn("no usable amount values; amount-based views will be unavailable");
  }
  if !coverage.descriptions {
    harper::warn("no grant descriptions; description text analysis will be unavailable");
  }
  if !coverage.years {
    harper::warn("no usable year values; time-based views will be empty");
  }

  Ok(())
}
