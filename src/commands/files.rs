use anyhow::{bail, Result};

use crate::api::files::format_file_size;
use crate::commands::FilesAction;
use crate::state::AppState;
use crate::views::FilesView;

pub async fn run(action: FilesAction, state: &AppState) -> Result<()> {
    match action {
        FilesAction::List => {
            let mut view = FilesView::new();
            view.load(&state.api).await;
            if view.items().is_empty() {
                println!("Aucun fichier.");
                return Ok(());
            }
            for f in view.items() {
                let owner = f.uploaded_by.as_ref().map(|u| u.name.as_str()).unwrap_or("-");
                println!(
                    "{:>6}  {:>10}  {:<12}  {}",
                    f.id,
                    format_file_size(f.size),
                    owner,
                    f.name
                );
            }
            println!("{} files, {}", view.items().len(), view.total_size_label());
        }
        FilesAction::Upload { path } => {
            let record = state.api.upload_file(&path).await?;
            println!("Uploaded {} as file {}", record.name, record.id);
        }
        FilesAction::Delete { id } => {
            let mut view = FilesView::new();
            view.load(&state.api).await;
            let user = state.auth.current_user();
            if !view.can_delete(&id, user.as_ref()) {
                bail!("File {} does not exist or was not uploaded by you", id);
            }
            view.delete(&state.api, &id).await?;
            println!("Deleted file {}", id);
        }
        FilesAction::Download { target, out } => {
            let url = if target.chars().all(|c| c.is_ascii_digit()) {
                state.api.file_download_url(&target)?
            } else {
                state.api.file_url(&target)
            };
            let bytes = state.api.download_file(&url).await?;
            tokio::fs::write(&out, &bytes).await?;
            println!("Saved {} to {}", format_file_size(bytes.len() as u64), out.display());
        }
    }
    Ok(())
}
