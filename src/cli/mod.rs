//! Command-line front end.
//!
//! Each invocation opens the shelf, runs one command against it and exits.
//! Every mutating command is persisted before the process ends.

pub mod commands;
pub mod highlight;
pub mod tree;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use colored::Colorize;

use crate::clipboard::SystemClipboard;
use crate::config::Config;
use crate::search::SnippetQuery;
use crate::storage::FileStore;
use crate::store::SnippetStore;

#[derive(Debug, Parser)]
#[command(name = "snipshelf")]
#[command(version, about = "Store, tag, filter and copy short code snippets", long_about = None)]
#[command(after_help = "IDs can be shortened to any unique prefix, as shown in listings")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List snippets grouped by category
    #[command(visible_alias = "ls")]
    List {
        #[command(flatten)]
        filter: FilterArgs,

        /// Only favorite snippets
        #[arg(long)]
        favorites: bool,
    },

    /// Search titles, descriptions and tags
    #[command(visible_alias = "find")]
    Search {
        /// Case-insensitive text to look for
        query: String,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Display a snippet (partial title works)
    #[command(visible_aliases = ["view", "cat"])]
    Show {
        /// Snippet title or ID
        key: String,
    },

    /// Add a snippet; code comes from --code, --file or stdin
    #[command(visible_alias = "new")]
    Add(AddArgs),

    /// Change fields of a snippet
    Edit(EditArgs),

    /// Delete a snippet
    #[command(visible_alias = "rm")]
    Delete {
        /// Snippet ID or unique prefix
        id: String,
    },

    /// Toggle a snippet's favorite flag
    Fav {
        /// Snippet ID or unique prefix
        id: String,
    },

    /// List all favorite snippets
    #[command(visible_alias = "favs")]
    Favorites,

    /// List categories with snippet counts
    Categories,

    /// List languages with snippet counts
    Languages,

    /// Copy a snippet's code to the clipboard
    #[command(visible_alias = "cp")]
    Copy {
        /// Snippet title or ID
        key: String,
    },

    /// Write snippets and categories as JSON
    Export {
        path: PathBuf,

        /// Only favorite snippets
        #[arg(long)]
        favorites: bool,

        /// Only snippets in this category
        #[arg(long)]
        category: Option<String>,
    },

    /// Merge snippets from a JSON or YAML export
    Import {
        path: PathBuf,

        /// Replace snippets whose ID is already on the shelf
        #[arg(long)]
        overwrite: bool,
    },
}

#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// Only snippets in this category (exact name)
    #[arg(long)]
    pub category: Option<String>,

    /// Only snippets in this language (id, e.g. `python`)
    #[arg(long)]
    pub language: Option<String>,
}

impl FilterArgs {
    /// Narrows `query`; an absent filter means "all".
    pub fn apply(&self, query: SnippetQuery) -> SnippetQuery {
        query
            .category(self.category.clone().unwrap_or_default())
            .language(self.language.clone().unwrap_or_default())
    }
}

#[derive(Debug, Clone, Default, Args)]
pub struct CodeSource {
    /// Code given inline
    #[arg(long, conflicts_with = "file")]
    pub code: Option<String>,

    /// Read the code from a file
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct AddArgs {
    #[arg(long)]
    pub title: String,

    #[command(flatten)]
    pub source: CodeSource,

    #[arg(long)]
    pub description: Option<String>,

    /// Defaults to `default_language` from config.toml
    #[arg(long)]
    pub language: Option<String>,

    /// Defaults to `default_category` from config.toml
    #[arg(long)]
    pub category: Option<String>,

    /// May be repeated
    #[arg(long = "tag")]
    pub tags: Vec<String>,

    #[arg(long)]
    pub favorite: bool,
}

#[derive(Debug, Clone, Args)]
pub struct EditArgs {
    /// Snippet ID or unique prefix
    pub id: String,

    #[arg(long)]
    pub title: Option<String>,

    #[command(flatten)]
    pub source: CodeSource,

    #[arg(long, conflicts_with = "no_description")]
    pub description: Option<String>,

    /// Remove the description
    #[arg(long)]
    pub no_description: bool,

    #[arg(long)]
    pub language: Option<String>,

    #[arg(long)]
    pub category: Option<String>,

    /// Replaces all tags; may be repeated
    #[arg(long = "tag")]
    pub tags: Vec<String>,

    #[arg(long, conflicts_with = "unfavorite")]
    pub favorite: bool,

    #[arg(long)]
    pub unfavorite: bool,
}

/// Runs one parsed command against the shelf in the configured data dir.
pub fn execute_cli(cli: Cli, config: &Config) -> Result<()> {
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let storage = FileStore::open(config.resolve_data_dir()?)?;
    let mut store = SnippetStore::open(storage);
    for warning in store.load_warnings() {
        eprintln!(
            "{}  {} {}: {}",
            "┃".bright_magenta(),
            "Warning:".bright_yellow(),
            warning.slot,
            warning.message
        );
    }

    match command {
        Command::List { filter, favorites } => {
            commands::list_snippets(&store, &filter, favorites)?;
        }
        Command::Search { query, filter } => {
            commands::search(&store, &query, &filter)?;
        }
        Command::Show { key } => {
            commands::show(&store, &key)?;
        }
        Command::Add(args) => {
            commands::add(&mut store, args, config)?;
        }
        Command::Edit(args) => {
            commands::edit(&mut store, args)?;
        }
        Command::Delete { id } => {
            commands::delete(&mut store, &id)?;
        }
        Command::Fav { id } => {
            commands::toggle_favorite(&mut store, &id)?;
        }
        Command::Favorites => {
            commands::list_favorites(&store)?;
        }
        Command::Categories => {
            commands::list_categories(&store)?;
        }
        Command::Languages => {
            commands::list_languages(&store)?;
        }
        Command::Copy { key } => {
            let mut clipboard = SystemClipboard::new(config.clipboard_command.as_deref());
            commands::copy(&store, &key, &mut clipboard)?;
        }
        Command::Export {
            path,
            favorites,
            category,
        } => {
            commands::export(&store, &path, favorites, category)?;
        }
        Command::Import { path, overwrite } => {
            commands::import(&mut store, &path, overwrite)?;
        }
    }

    Ok(())
}
