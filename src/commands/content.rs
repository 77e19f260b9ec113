use anyhow::{bail, Result};

use crate::api::content::LogoAsset;
use crate::commands::{read_json_arg, ContentAction};
use crate::content::PartialSiteContent;
use crate::state::AppState;

pub async fn run(action: ContentAction, state: &AppState) -> Result<()> {
    let source = state.content.mount().await;
    tracing::debug!(?source, "Content mounted");

    match action {
        ContentAction::Show => {
            let content = state.content.content();
            println!("{}", serde_json::to_string_pretty(&content)?);
        }
        ContentAction::Update { json, logo } => {
            if !state.auth.is_admin() {
                bail!("Only administrators can edit site content");
            }
            let partial: PartialSiteContent = read_json_arg(&json)?;
            if partial.is_empty() && logo.is_none() {
                bail!("Nothing to update");
            }
            let logo = match logo {
                Some(path) => Some(LogoAsset::from_path(&path).await?),
                None => None,
            };

            let saved = state.content.update(partial, logo)?;
            println!("Updated local copy.");
            saved.await??;
            println!("Saved to backend.");
        }
    }
    Ok(())
}
