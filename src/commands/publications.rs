use anyhow::{bail, Result};

use crate::api::files::format_file_size;
use crate::api::publications::{Publication, PublicationDraft};
use crate::commands::{read_json_arg, PublicationsAction};
use crate::state::AppState;
use crate::views::{MemberSearch, PublicationFilter, PublicationsView};

fn print_row(p: &Publication) {
    let year = p.year().map(|y| y.to_string()).unwrap_or_else(|| "----".into());
    let category = p.category.map(|c| c.label()).unwrap_or("-");
    println!("{:>6}  {}  {:<18}  {}", p.id, year, category, p.title);
}

fn print_detail(p: &Publication) {
    println!("{}", p.title);
    if let Some(category) = p.category {
        println!("Catégorie: {}", category.label());
    }
    if let Some(year) = p.year() {
        println!("Année:     {}", year);
    }
    let authors = p.author_names();
    if !authors.is_empty() {
        println!("Auteurs:   {}", authors.join(", "));
    }
    if !p.keywords.is_empty() {
        println!("Mots-clés: {}", p.keywords.join(", "));
    }
    if !p.abstract_text.is_empty() {
        println!();
        println!("{}", p.abstract_text);
    }
    if !p.attached_files.is_empty() {
        println!();
        println!(
            "Fichiers joints ({}):",
            format_file_size(p.attachments_size())
        );
        for file in &p.attached_files {
            println!("  - {} ({})", file.name, format_file_size(file.size));
        }
    }
}

pub async fn run(action: PublicationsAction, state: &AppState) -> Result<()> {
    match action {
        PublicationsAction::List {
            query,
            category,
            year,
            page,
            per_page,
        } => {
            let mut view = PublicationsView::new();
            view.load(&state.api).await;
            view.set_filter(PublicationFilter {
                query: query.unwrap_or_default(),
                category,
                year,
            });

            if let Some(message) = view.empty_message() {
                println!("{}", message);
                return Ok(());
            }
            let page = view.page(page, per_page);
            for p in &page.items {
                print_row(p);
            }
            println!(
                "page {}/{} ({} publications)",
                page.number, page.total_pages, page.total_items
            );
        }
        PublicationsAction::Show { id } => {
            let publication = state.api.get_publication(&id).await?;
            print_detail(&publication);
        }
        PublicationsAction::Create { json } => {
            let draft: PublicationDraft = read_json_arg(&json)?;
            let created = state.api.create_publication(&draft).await?;
            println!("Created publication {}", created.id);
        }
        PublicationsAction::Update { id, json } => {
            let draft: PublicationDraft = read_json_arg(&json)?;
            let updated = state.api.update_publication(&id, &draft).await?;
            println!("Updated publication {}", updated.id);
        }
        PublicationsAction::Delete { id } => {
            let mut view = PublicationsView::new();
            view.load(&state.api).await;
            let user = state.auth.current_user();
            if !view.can_delete(&id, user.as_ref()) {
                bail!("Publication {} does not exist or was not posted by you", id);
            }
            view.delete(&state.api, &id).await?;
            println!("Deleted publication {}", id);
        }
        PublicationsAction::Members { query } => {
            let mut search = MemberSearch::new();
            search.search_members(&state.api, &query).await;
            for m in search.members.results() {
                println!("{:>6}  {:<24}  {}", m.id, m.name, m.username);
            }
        }
        PublicationsAction::Externals { query } => {
            let mut search = MemberSearch::new();
            search.search_externals(&state.api, &query).await;
            for e in search.externals.results() {
                println!("{:>6}  {:<24}  {}", e.id, e.name, e.email);
            }
        }
    }
    Ok(())
}
