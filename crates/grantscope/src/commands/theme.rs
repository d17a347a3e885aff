//! Set the project theme that frames all generated insights.

use anyhow::Result;

use crate::session::ProjectTheme;

pub fn handle(text: String, objectives: Option<String>) -> Result<()> {
  let store = super::open_store()?;
  let mut session = store.require()?;

  session.theme = Some(ProjectTheme::new(text, objectives)?);
  session.touch();
  store.save(&session)?;

  harper::success("project theme saved; insight requests will carry it as context");
  Ok(())
}
