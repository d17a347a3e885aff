//! Clear session state: bound dataset, theme, and cached insights.

use anyhow::Result;

pub fn handle() -> Result<()> {
  let store = super::open_store()?;
  store.clear()?;
  harper::success("session cleared");
  Ok(())
}
