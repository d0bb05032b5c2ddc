use colored::Colorize;

use crate::models::{Category, Snippet};

/// Characters of an id shown in listings; any unique prefix resolves.
pub const SHORT_ID_LEN: usize = 8;

pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(SHORT_ID_LEN) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}

/// Renders snippets grouped under their categories, one tree per group.
///
/// Known categories come first, in shelf order; snippets whose category is
/// not on the shelf are grouped after them, marked as unlisted. Groups with
/// nothing to show are left out.
pub fn render_grouped(categories: &[Category], snippets: &[&Snippet]) -> Vec<String> {
    let mut groups: Vec<(&str, bool, Vec<&Snippet>)> = categories
        .iter()
        .map(|c| (c.name.as_str(), true, Vec::new()))
        .collect();

    for &snippet in snippets {
        match groups
            .iter_mut()
            .find(|(name, _, _)| *name == snippet.category)
        {
            Some((_, _, members)) => members.push(snippet),
            None => groups.push((snippet.category.as_str(), false, vec![snippet])),
        }
    }

    let mut lines = Vec::new();
    for (name, listed, members) in groups.iter().filter(|(_, _, m)| !m.is_empty()) {
        let marker = if *listed {
            "".normal()
        } else {
            " (unlisted)".bright_black()
        };
        lines.push(format!(
            "{}  {} {} {}{}",
            "┃".bright_magenta(),
            "●".bright_blue(),
            name.bold(),
            format!("({})", members.len()).bright_black(),
            marker
        ));

        for (i, snippet) in members.iter().enumerate() {
            let connector = if i == members.len() - 1 {
                "└── "
            } else {
                "├── "
            };
            lines.push(format!(
                "{}  {}{}",
                "┃".bright_magenta(),
                connector,
                snippet_line(snippet)
            ));
        }
    }
    lines
}

/// One-line summary: favorite star, title, language, tags and short id.
pub fn snippet_line(snippet: &Snippet) -> String {
    let star = if snippet.is_favorite {
        "★ ".yellow()
    } else {
        "".normal()
    };
    let tags = snippet
        .tags
        .iter()
        .map(|t| format!("#{t}"))
        .collect::<Vec<_>>()
        .join(" ");

    let mut line = format!(
        "{}{} [{}]",
        star,
        snippet.title.bright_white(),
        snippet.language.display_name().bright_black()
    );
    if !tags.is_empty() {
        line.push_str(&format!(" {}", tags.cyan()));
    }
    line.push_str(&format!(" {}", short_id(&snippet.id).bright_black().italic()));
    line
}
