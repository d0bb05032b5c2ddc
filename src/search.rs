//! Query/filter engine over the snippet collection.
//!
//! Filtering is a pure function of its inputs: the same snapshot and query
//! always produce the same subsequence, in the same order.

use crate::models::Snippet;

/// What the user has typed and selected.
///
/// An empty `category` or `language` means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnippetQuery {
    pub text: String,
    pub category: String,
    pub language: String,
}

/// Which field satisfied the text part of a query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchField {
    /// The query was empty, so every snippet matches.
    Any,
    Title,
    Description,
    Tag,
}

impl MatchField {
    pub fn label(&self) -> &'static str {
        match self {
            MatchField::Any => "any",
            MatchField::Title => "title",
            MatchField::Description => "description",
            MatchField::Tag => "tag",
        }
    }
}

impl SnippetQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn matches(&self, snippet: &Snippet) -> bool {
        self.matches_filters(snippet) && text_match(snippet, &self.text.to_lowercase()).is_some()
    }

    /// Category and language predicates. Both compare exactly.
    fn matches_filters(&self, snippet: &Snippet) -> bool {
        let category_ok = self.category.is_empty() || snippet.category == self.category;
        let language_ok = self.language.is_empty() || snippet.language.id() == self.language;
        category_ok && language_ok
    }
}

/// Returns the snippets matching `query`, in input order.
pub fn filter_snippets<'a>(snippets: &'a [Snippet], query: &SnippetQuery) -> Vec<&'a Snippet> {
    search_snippets(snippets, query)
        .into_iter()
        .map(|(snippet, _)| snippet)
        .collect()
}

/// Like [`filter_snippets`], also reporting the first field the text
/// matched in (title, then description, then tags).
pub fn search_snippets<'a>(
    snippets: &'a [Snippet],
    query: &SnippetQuery,
) -> Vec<(&'a Snippet, MatchField)> {
    let needle = query.text.to_lowercase();

    snippets
        .iter()
        .filter(|snippet| query.matches_filters(snippet))
        .filter_map(|snippet| text_match(snippet, &needle).map(|field| (snippet, field)))
        .collect()
}

/// `needle` must already be lowercase.
fn text_match(snippet: &Snippet, needle: &str) -> Option<MatchField> {
    if needle.is_empty() {
        return Some(MatchField::Any);
    }

    if snippet.title.to_lowercase().contains(needle) {
        return Some(MatchField::Title);
    }

    if let Some(desc) = &snippet.description {
        if desc.to_lowercase().contains(needle) {
            return Some(MatchField::Description);
        }
    }

    if snippet
        .tags
        .iter()
        .any(|tag| tag.to_lowercase().contains(needle))
    {
        return Some(MatchField::Tag);
    }

    None
}
