//! Command-line subcommands.

pub mod content;
pub mod files;
pub mod projects;
pub mod publications;
pub mod session;

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Subcommand;

use crate::state::AppState;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the companion server (OAuth callback, login and dashboard pages).
    Serve,

    /// Sign in with Google through the companion server, then exit.
    Login,

    /// Forget the local session.
    Logout,

    /// Show the signed-in user.
    Whoami,

    /// Browse and edit publications.
    Publications {
        #[command(subcommand)]
        action: PublicationsAction,
    },

    /// Manage shared files.
    Files {
        #[command(subcommand)]
        action: FilesAction,
    },

    /// Browse public projects.
    Projects {
        #[command(subcommand)]
        action: ProjectsAction,
    },

    /// Show or edit the site content document.
    Content {
        #[command(subcommand)]
        action: ContentAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum PublicationsAction {
    /// List publications, filtered and paged.
    List {
        /// Text searched in title, abstract, authors and keywords.
        #[arg(long, short)]
        query: Option<String>,
        /// article, book_chapter, memoire or conference.
        #[arg(long)]
        category: Option<crate::api::publications::PublicationCategory>,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long, default_value_t = 10)]
        per_page: usize,
    },
    /// Show one publication.
    Show { id: String },
    /// Create a publication from JSON (inline or @file).
    Create { json: String },
    /// Replace a publication from JSON (inline or @file).
    Update { id: String, json: String },
    /// Delete a publication you posted.
    Delete { id: String },
    /// Search lab members to tag.
    Members { query: String },
    /// Search external authors to tag.
    Externals { query: String },
}

#[derive(Subcommand, Debug)]
pub enum FilesAction {
    /// List shared files.
    List,
    /// Upload a local file.
    Upload { path: PathBuf },
    /// Delete a file you uploaded.
    Delete { id: String },
    /// Download a file by id or URL.
    Download { target: String, out: PathBuf },
}

#[derive(Subcommand, Debug)]
pub enum ProjectsAction {
    /// List public projects.
    List {
        #[arg(long, short)]
        query: Option<String>,
    },
    /// List a project's documents.
    Documents { id: String },
}

#[derive(Subcommand, Debug)]
pub enum ContentAction {
    /// Print the current site content document.
    Show,
    /// Apply a section patch from JSON (inline or @file).
    Update {
        json: String,
        /// Logo image uploaded with the update.
        #[arg(long)]
        logo: Option<PathBuf>,
    },
}

pub async fn run(command: Command, state: AppState) -> Result<()> {
    match command {
        Command::Serve => session::serve(state).await,
        Command::Login => session::login(state).await,
        Command::Logout => session::logout(&state),
        Command::Whoami => session::whoami(&state),
        Command::Publications { action } => publications::run(action, &state).await,
        Command::Files { action } => files::run(action, &state).await,
        Command::Projects { action } => projects::run(action, &state).await,
        Command::Content { action } => content::run(action, &state).await,
    }
}

/// Read a JSON argument given inline or as `@path`.
pub(crate) fn read_json_arg<T: serde::de::DeserializeOwned>(arg: &str) -> Result<T> {
    let text = match arg.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path))?,
        None => arg.to_string(),
    };
    serde_json::from_str(&text).context("invalid JSON argument")
}
