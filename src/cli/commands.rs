use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::Path;

use anyhow::{Context, Result, bail};
use colored::Colorize;

use crate::cli::highlight::highlight_lines;
use crate::cli::tree::{render_grouped, short_id, snippet_line};
use crate::cli::{AddArgs, CodeSource, EditArgs, FilterArgs};
use crate::clipboard::ClipboardSink;
use crate::config::Config;
use crate::error::StoreError;
use crate::models::{
    ExportData, ExportOptions, Snippet, SnippetDraft, SnippetLanguage, SnippetPatch,
    export_to_file, import_from_file,
};
use crate::search::{SnippetQuery, search_snippets};
use crate::storage::KeyValueStore;
use crate::store::SnippetStore;

fn bar() -> colored::ColoredString {
    "┃".bright_magenta()
}

/// Puts the notification text in front, keeping the storage error as cause.
fn save_failed(e: StoreError) -> anyhow::Error {
    let message = e.user_message();
    anyhow::Error::new(e).context(message)
}

fn rule(width: usize) {
    println!("{}", "─".repeat(width).bright_magenta());
}

/// Lists snippets grouped by category, optionally narrowed.
pub fn list_snippets<S: KeyValueStore>(
    store: &SnippetStore<S>,
    filter: &FilterArgs,
    favorites_only: bool,
) -> Result<()> {
    let query = filter.apply(SnippetQuery::default());

    let mut snippets = store.filter(&query);
    if favorites_only {
        snippets.retain(|s| s.is_favorite);
    }

    if snippets.is_empty() {
        println!("{}  No snippets found.", bar());
        println!("{}  Try adjusting your search or filters", bar());
        return Ok(());
    }

    for line in render_grouped(store.categories(), &snippets) {
        println!("{line}");
    }
    println!(
        "{}  {} of {} snippets, {} favorites",
        bar(),
        snippets.len().to_string().bright_yellow(),
        store.total_count(),
        store.favorite_count()
    );
    Ok(())
}

/// Searches titles, descriptions and tags
pub fn search<S: KeyValueStore>(
    store: &SnippetStore<S>,
    text: &str,
    filter: &FilterArgs,
) -> Result<()> {
    let query = filter.apply(SnippetQuery::new(text));
    let results = search_snippets(store.snippets(), &query);

    println!(
        "{}  {} '{}'",
        bar(),
        "SEARCH RESULTS FOR".bold(),
        text.bright_white()
    );

    if results.is_empty() {
        println!("{}  No snippets found matching query: {}", bar(), text);
        return Ok(());
    }

    println!(
        "{}  Found {} snippets matching '{}':",
        bar(),
        results.len(),
        text
    );
    rule(60);

    for (idx, (snippet, field)) in results.iter().enumerate() {
        println!(
            "{}  {}. {} (match in: {})",
            bar(),
            (idx + 1).to_string().bright_yellow(),
            snippet_line(snippet),
            field.label().bright_green()
        );
        println!(
            "{}     {}: {}",
            bar(),
            "Category".bright_blue(),
            snippet.category
        );
    }
    Ok(())
}

/// Shows a snippet's metadata and highlighted code.
pub fn show<S: KeyValueStore>(store: &SnippetStore<S>, key: &str) -> Result<()> {
    let Some(snippet) = find_by_id_or_title(store, key) else {
        print_not_found(store, key);
        return Ok(());
    };

    let star = if snippet.is_favorite {
        " ★".yellow()
    } else {
        "".normal()
    };
    println!(
        "{}  {} {}{}",
        bar(),
        "SNIPPET".bright_green().bold(),
        snippet.title.bold(),
        star
    );
    rule(60);
    println!("{}  {}: {}", bar(), "Category".bright_blue(), snippet.category);
    println!(
        "{}  {}: {}",
        bar(),
        "Language".bright_yellow(),
        snippet.language.display_name()
    );
    if let Some(desc) = &snippet.description {
        println!("{}  {}: {}", bar(), "Description".bright_cyan(), desc);
    }
    if !snippet.tags.is_empty() {
        println!(
            "{}  {}: {}",
            bar(),
            "Tags".bright_magenta(),
            snippet.tags.join(", ")
        );
    }
    println!(
        "{}  {}: {}  {}: {}",
        bar(),
        "Created".bright_black(),
        snippet.created_at.format("%Y-%m-%d %H:%M"),
        "Updated".bright_black(),
        snippet.updated_at.format("%Y-%m-%d %H:%M")
    );
    println!("{}  {}: {}", bar(), "ID".bright_black(), snippet.id);
    rule(60);

    let colorize = colored::control::SHOULD_COLORIZE.should_colorize();
    for line in highlight_lines(&snippet.code, &snippet.language, colorize) {
        println!("{}  {}", bar(), line);
    }
    Ok(())
}

pub fn add<S: KeyValueStore>(
    store: &mut SnippetStore<S>,
    args: AddArgs,
    config: &Config,
) -> Result<()> {
    let code = read_code(&args.source)?.map_or_else(read_stdin, Ok)?;
    let language = args
        .language
        .as_deref()
        .unwrap_or(config.default_language.as_str());
    let category = args
        .category
        .as_deref()
        .unwrap_or(config.default_category.as_str());

    let mut draft = SnippetDraft::new(&args.title, code)?
        .language(SnippetLanguage::from_id(language))
        .category(category)
        .tags(args.tags)
        .favorite(args.favorite);
    if let Some(description) = args.description {
        draft = draft.description(description);
    }
    let title = draft.title.clone();

    let id = store.add(draft).map_err(save_failed)?;

    println!(
        "{}  {} {} {}",
        bar(),
        "Added".bright_green(),
        title.bright_white().bold(),
        short_id(&id).bright_black()
    );
    Ok(())
}

pub fn edit<S: KeyValueStore>(store: &mut SnippetStore<S>, args: EditArgs) -> Result<()> {
    let id = resolve_id(store, &args.id)?;

    let mut patch = SnippetPatch::default();
    if let Some(title) = args.title {
        let title = title.trim();
        if title.is_empty() {
            bail!("Snippet title cannot be empty");
        }
        patch.title = Some(title.to_string());
    }
    if let Some(code) = read_code(&args.source)? {
        let code = code.trim();
        if code.is_empty() {
            bail!("Snippet code cannot be empty");
        }
        patch.code = Some(code.to_string());
    }
    if args.no_description {
        patch.description = Some(None);
    } else if let Some(description) = args.description {
        let description = description.trim();
        patch.description = Some((!description.is_empty()).then(|| description.to_string()));
    }
    patch.language = args.language.as_deref().map(SnippetLanguage::from_id);
    patch.category = args.category;
    if !args.tags.is_empty() {
        patch.tags = Some(args.tags);
    }
    if args.favorite {
        patch.is_favorite = Some(true);
    } else if args.unfavorite {
        patch.is_favorite = Some(false);
    }

    let updated = store.update(&id, patch).map_err(save_failed)?;
    if updated {
        println!("{}  {} {}", bar(), "Updated".bright_green(), short_id(&id));
    }
    Ok(())
}

pub fn delete<S: KeyValueStore>(store: &mut SnippetStore<S>, key: &str) -> Result<()> {
    let id = resolve_id(store, key)?;
    let title = store.get(&id).map(|s| s.title.clone()).unwrap_or_default();

    if store.delete(&id).map_err(save_failed)? {
        println!(
            "{}  {} {}",
            bar(),
            "Deleted".bright_red(),
            title.bright_white()
        );
    }
    Ok(())
}

pub fn toggle_favorite<S: KeyValueStore>(
    store: &mut SnippetStore<S>,
    key: &str,
) -> Result<()> {
    let id = resolve_id(store, key)?;

    let state = store.toggle_favorite(&id).map_err(save_failed)?;
    if let Some(is_favorite) = state {
        println!(
            "{}  Snippet {} as favorite",
            bar(),
            if is_favorite { "marked" } else { "unmarked" }
        );
    }
    Ok(())
}

/// Lists all favorite snippets
pub fn list_favorites<S: KeyValueStore>(store: &SnippetStore<S>) -> Result<()> {
    let favorites: Vec<_> = store.favorites().collect();

    if favorites.is_empty() {
        println!("{}  No favorite snippets found.", bar());
        return Ok(());
    }

    println!("{}  {} favorite snippets:", bar(), favorites.len());
    for (idx, snippet) in favorites.iter().enumerate() {
        println!(
            "{}  {}. {}",
            bar(),
            (idx + 1).to_string().bright_yellow(),
            snippet_line(snippet)
        );
    }
    Ok(())
}

pub fn list_categories<S: KeyValueStore>(store: &SnippetStore<S>) -> Result<()> {
    println!("{}  {}", bar(), "CATEGORIES".bold());
    for category in store.categories() {
        println!(
            "{}  {:<16} {:>4}  {}",
            bar(),
            category.name.bright_white(),
            category.count.to_string().bright_yellow(),
            category.color.bright_black()
        );
    }
    println!(
        "{}  {:<16} {:>4}",
        bar(),
        "All snippets".bold(),
        store.total_count()
    );
    println!(
        "{}  {:<16} {:>4}",
        bar(),
        "Favorites".yellow(),
        store.favorite_count()
    );
    Ok(())
}

pub fn list_languages<S: KeyValueStore>(store: &SnippetStore<S>) -> Result<()> {
    println!("{}  {}", bar(), "LANGUAGES".bold());
    for language in SnippetLanguage::known() {
        let count = store
            .snippets()
            .iter()
            .filter(|s| &s.language == language)
            .count();
        println!(
            "{}  {:<12} {:<12} {:>4}",
            bar(),
            language.id().bright_white(),
            language.display_name().bright_black(),
            count
        );
    }

    for language in store.languages_in_use() {
        if matches!(language, SnippetLanguage::Other(_)) {
            let count = store
                .snippets()
                .iter()
                .filter(|s| &s.language == language)
                .count();
            println!(
                "{}  {:<12} {:<12} {:>4}",
                bar(),
                language.id().bright_white(),
                "(custom)".bright_black(),
                count
            );
        }
    }
    Ok(())
}

/// Copies a snippet's code. Store state is never touched.
pub fn copy<S: KeyValueStore>(
    store: &SnippetStore<S>,
    key: &str,
    clipboard: &mut dyn ClipboardSink,
) -> Result<()> {
    let Some(snippet) = find_by_id_or_title(store, key) else {
        print_not_found(store, key);
        return Ok(());
    };

    match clipboard.copy(&snippet.code) {
        Ok(()) => println!(
            "{}  {} \"{}\" has been copied to your clipboard.",
            bar(),
            "Copied to clipboard:".bright_green(),
            snippet.title
        ),
        Err(e) => println!(
            "{}  {} Unable to copy to clipboard ({e})",
            bar(),
            "Copy failed:".bright_red()
        ),
    }
    Ok(())
}

pub fn export<S: KeyValueStore>(
    store: &SnippetStore<S>,
    path: &Path,
    favorites_only: bool,
    category: Option<String>,
) -> Result<()> {
    let options = ExportOptions {
        include_favorites_only: favorites_only,
        category,
    };

    let data = ExportData::new(store.snippets(), store.categories(), &options);
    export_to_file(&data, path)?;

    println!(
        "{}  Exported {} snippets to {}",
        bar(),
        data.snippets.len().to_string().bright_yellow(),
        path.display().to_string().bright_white()
    );
    Ok(())
}

pub fn import<S: KeyValueStore>(
    store: &mut SnippetStore<S>,
    path: &Path,
    overwrite: bool,
) -> Result<()> {
    let data = import_from_file(path)?;
    let summary = store
        .import_snippets(data.snippets, overwrite)
        .map_err(save_failed)?;

    println!(
        "{}  Imported {} new, {} replaced, {} skipped",
        bar(),
        summary.added.to_string().bright_green(),
        summary.replaced.to_string().bright_yellow(),
        summary.skipped.to_string().bright_black()
    );
    Ok(())
}

/// Exact id, then a unique id prefix. A blank key never matches.
fn resolve_id<S: KeyValueStore>(store: &SnippetStore<S>, key: &str) -> Result<String> {
    let key = key.trim();
    if key.is_empty() {
        bail!("Missing snippet ID");
    }

    if let Some(snippet) = store.get(key) {
        return Ok(snippet.id.clone());
    }

    let matches: Vec<&Snippet> = store
        .snippets()
        .iter()
        .filter(|s| s.id.starts_with(key))
        .collect();
    match matches.as_slice() {
        [only] => Ok(only.id.clone()),
        [] => bail!("No snippet found with ID: {key}"),
        _ => bail!("ID prefix '{key}' matches {} snippets", matches.len()),
    }
}

/// Id or unique id prefix, then exact title, then partial title; titles
/// compare case-insensitively.
fn find_by_id_or_title<'a, S: KeyValueStore>(
    store: &'a SnippetStore<S>,
    key: &str,
) -> Option<&'a Snippet> {
    if let Ok(id) = resolve_id(store, key) {
        return store.get(&id);
    }

    let name = key.trim().to_lowercase();
    if name.is_empty() {
        return None;
    }
    store
        .snippets()
        .iter()
        .find(|s| s.title.to_lowercase() == name)
        .or_else(|| {
            store
                .snippets()
                .iter()
                .find(|s| s.title.to_lowercase().contains(&name))
        })
}

fn print_not_found<S: KeyValueStore>(store: &SnippetStore<S>, key: &str) {
    println!("{}  No snippet found with title or ID: {}", bar(), key);
    println!("{}  Available snippets:", bar());
    rule(60);

    for (idx, snippet) in store.snippets().iter().enumerate().take(10) {
        println!(
            "{}  {}. {}",
            bar(),
            (idx + 1).to_string().yellow(),
            snippet.title.bright_white()
        );
    }

    if store.total_count() > 10 {
        println!("{}  ... and {} more", bar(), store.total_count() - 10);
    }
}

/// `None` when neither `--code` nor `--file` was given.
fn read_code(source: &CodeSource) -> Result<Option<String>> {
    if let Some(code) = &source.code {
        return Ok(Some(code.clone()));
    }
    match &source.file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read code from {}", path.display()))
            .map(Some),
        None => Ok(None),
    }
}

fn read_stdin() -> Result<String> {
    if io::stdin().is_terminal() {
        bail!("Missing code: pass --code, --file, or pipe it on stdin");
    }
    let mut code = String::new();
    io::stdin()
        .read_to_string(&mut code)
        .context("Failed to read code from stdin")?;
    Ok(code)
}
