use once_cell::sync::Lazy;
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;
use syntect::util::as_24_bit_terminal_escaped;

use crate::models::SnippetLanguage;

static SYNTAX_SET: Lazy<SyntaxSet> = Lazy::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: Lazy<ThemeSet> = Lazy::new(ThemeSet::load_defaults);

const THEME: &str = "base16-ocean.dark";
const RESET: &str = "\x1b[0m";

/// Returns one terminal-escaped string per code line, or the plain lines
/// when `colorize` is off or no theme is available.
pub fn highlight_lines(code: &str, language: &SnippetLanguage, colorize: bool) -> Vec<String> {
    let plain = || -> Vec<String> { code.lines().map(str::to_string).collect() };

    if !colorize {
        return plain();
    }

    let Some(theme) = THEME_SET
        .themes
        .get(THEME)
        .or_else(|| THEME_SET.themes.values().next())
    else {
        return plain();
    };

    let syntax = SYNTAX_SET
        .find_syntax_by_extension(language.file_extension())
        .unwrap_or_else(|| SYNTAX_SET.find_syntax_plain_text());
    let mut highlighter = HighlightLines::new(syntax, theme);

    code.lines()
        .map(|line| {
            let with_newline = format!("{line}\n");
            match highlighter.highlight_line(&with_newline, &SYNTAX_SET) {
                Ok(ranges) => {
                    let escaped = as_24_bit_terminal_escaped(&ranges, false);
                    format!("{}{RESET}", escaped.trim_end_matches('\n'))
                }
                Err(_) => line.to_string(),
            }
        })
        .collect()
}
