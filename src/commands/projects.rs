use anyhow::Result;

use crate::api::files::format_file_size;
use crate::api::projects::status_label;
use crate::commands::ProjectsAction;
use crate::state::AppState;
use crate::views::ProjectsView;

pub async fn run(action: ProjectsAction, state: &AppState) -> Result<()> {
    let mut view = ProjectsView::new();
    match action {
        ProjectsAction::List { query } => {
            view.load(&state.api).await;
            view.set_query(query.unwrap_or_default());
            let visible = view.visible();
            if visible.is_empty() {
                println!("Aucun projet trouvé");
            }
            for p in visible {
                let status = p.status.as_deref().map(status_label).unwrap_or("-");
                println!("{:>6}  {:<16}  {}", p.id, status, p.title);
            }
        }
        ProjectsAction::Documents { id } => {
            view.select(&state.api, &id).await;
            if view.documents().is_empty() {
                println!("Aucun document.");
            }
            for doc in view.documents() {
                println!(
                    "{:>6}  {:>10}  {:<16}  {}",
                    doc.id,
                    format_file_size(doc.size),
                    doc.uploader(),
                    state.api.file_url(&doc.file)
                );
            }
        }
    }
    Ok(())
}
