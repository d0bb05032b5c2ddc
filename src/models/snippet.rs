use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A stored code fragment.
///
/// Field names follow the persisted layout of the `code-snippets` slot, so a
/// snapshot written by an earlier version of the shelf loads unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snippet {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub code: String,
    pub language: SnippetLanguage,
    #[serde(default)]
    pub tags: Vec<String>,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub is_favorite: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SnippetLanguage {
    #[default]
    JavaScript,
    TypeScript,
    Python,
    CSS,
    HTML,
    Json,
    Bash,
    SQL,
    Rust,
    Go,
    Yaml,
    Markdown,
    Other(String),
}

const KNOWN_LANGUAGES: [SnippetLanguage; 12] = [
    SnippetLanguage::JavaScript,
    SnippetLanguage::TypeScript,
    SnippetLanguage::Python,
    SnippetLanguage::CSS,
    SnippetLanguage::HTML,
    SnippetLanguage::Json,
    SnippetLanguage::Bash,
    SnippetLanguage::SQL,
    SnippetLanguage::Rust,
    SnippetLanguage::Go,
    SnippetLanguage::Yaml,
    SnippetLanguage::Markdown,
];

impl SnippetLanguage {
    /// The fixed set of languages offered by front ends.
    pub fn known() -> &'static [SnippetLanguage] {
        &KNOWN_LANGUAGES
    }

    /// Parse a language id. Unknown ids are kept verbatim.
    pub fn from_id(id: &str) -> Self {
        match id {
            "javascript" => SnippetLanguage::JavaScript,
            "typescript" => SnippetLanguage::TypeScript,
            "python" => SnippetLanguage::Python,
            "css" => SnippetLanguage::CSS,
            "html" => SnippetLanguage::HTML,
            "json" => SnippetLanguage::Json,
            "bash" => SnippetLanguage::Bash,
            "sql" => SnippetLanguage::SQL,
            "rust" => SnippetLanguage::Rust,
            "go" => SnippetLanguage::Go,
            "yaml" => SnippetLanguage::Yaml,
            "markdown" => SnippetLanguage::Markdown,
            other => SnippetLanguage::Other(other.to_string()),
        }
    }

    /// The id stored on disk and compared by the language filter.
    pub fn id(&self) -> &str {
        match self {
            SnippetLanguage::JavaScript => "javascript",
            SnippetLanguage::TypeScript => "typescript",
            SnippetLanguage::Python => "python",
            SnippetLanguage::CSS => "css",
            SnippetLanguage::HTML => "html",
            SnippetLanguage::Json => "json",
            SnippetLanguage::Bash => "bash",
            SnippetLanguage::SQL => "sql",
            SnippetLanguage::Rust => "rust",
            SnippetLanguage::Go => "go",
            SnippetLanguage::Yaml => "yaml",
            SnippetLanguage::Markdown => "markdown",
            SnippetLanguage::Other(id) => id,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            SnippetLanguage::JavaScript => "JavaScript",
            SnippetLanguage::TypeScript => "TypeScript",
            SnippetLanguage::Python => "Python",
            SnippetLanguage::CSS => "CSS",
            SnippetLanguage::HTML => "HTML",
            SnippetLanguage::Json => "JSON",
            SnippetLanguage::Bash => "Bash",
            SnippetLanguage::SQL => "SQL",
            SnippetLanguage::Rust => "Rust",
            SnippetLanguage::Go => "Go",
            SnippetLanguage::Yaml => "YAML",
            SnippetLanguage::Markdown => "Markdown",
            SnippetLanguage::Other(id) => id,
        }
    }

    /// File extension used to pick a syntax definition
    pub fn file_extension(&self) -> &str {
        match self {
            SnippetLanguage::JavaScript => "js",
            SnippetLanguage::TypeScript => "ts",
            SnippetLanguage::Python => "py",
            SnippetLanguage::CSS => "css",
            SnippetLanguage::HTML => "html",
            SnippetLanguage::Json => "json",
            SnippetLanguage::Bash => "sh",
            SnippetLanguage::SQL => "sql",
            SnippetLanguage::Rust => "rs",
            SnippetLanguage::Go => "go",
            SnippetLanguage::Yaml => "yaml",
            SnippetLanguage::Markdown => "md",
            SnippetLanguage::Other(_) => "txt",
        }
    }
}

impl From<String> for SnippetLanguage {
    fn from(id: String) -> Self {
        SnippetLanguage::from_id(&id)
    }
}

impl From<SnippetLanguage> for String {
    fn from(language: SnippetLanguage) -> Self {
        match language {
            SnippetLanguage::Other(id) => id,
            known => known.id().to_string(),
        }
    }
}

impl std::fmt::Display for SnippetLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// Rejections raised while building a draft.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DraftError {
    #[error("Snippet title cannot be empty")]
    EmptyTitle,

    #[error("Snippet code cannot be empty")]
    EmptyCode,
}

/// Snippet fields supplied by an editing surface, before an id and
/// timestamps are assigned.
///
/// [`SnippetDraft::new`] trims and validates title and code; the store
/// trusts a draft and does not validate it again.
#[derive(Debug, Clone, PartialEq)]
pub struct SnippetDraft {
    pub title: String,
    pub description: Option<String>,
    pub code: String,
    pub language: SnippetLanguage,
    pub category: String,
    pub tags: Vec<String>,
    pub is_favorite: bool,
}

impl SnippetDraft {
    pub fn new(title: impl Into<String>, code: impl Into<String>) -> Result<Self, DraftError> {
        let title = title.into().trim().to_string();
        let code = code.into().trim().to_string();

        if title.is_empty() {
            return Err(DraftError::EmptyTitle);
        }
        if code.is_empty() {
            return Err(DraftError::EmptyCode);
        }

        Ok(Self {
            title,
            description: None,
            code,
            language: SnippetLanguage::JavaScript,
            category: String::from("JavaScript"),
            tags: Vec::new(),
            is_favorite: false,
        })
    }

    /// Blank descriptions are stored as absent.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        let description = description.into().trim().to_string();
        self.description = (!description.is_empty()).then_some(description);
        self
    }

    pub fn language(mut self, language: SnippetLanguage) -> Self {
        self.language = language;
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        push_tag(&mut self.tags, tag.into());
        self
    }

    pub fn tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        for tag in tags {
            push_tag(&mut self.tags, tag.into());
        }
        self
    }

    pub fn favorite(mut self, is_favorite: bool) -> Self {
        self.is_favorite = is_favorite;
        self
    }
}

/// Partial update merged over an existing snippet. `None` leaves a field as
/// it is; `description: Some(None)` clears the description.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnippetPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub code: Option<String>,
    pub language: Option<SnippetLanguage>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub is_favorite: Option<bool>,
}

impl SnippetPatch {
    pub fn is_empty(&self) -> bool {
        *self == SnippetPatch::default()
    }

    pub fn favorite(is_favorite: bool) -> Self {
        Self {
            is_favorite: Some(is_favorite),
            ..Self::default()
        }
    }
}

impl From<SnippetDraft> for SnippetPatch {
    /// Saving an editor form over an existing snippet replaces every
    /// editable field.
    fn from(draft: SnippetDraft) -> Self {
        Self {
            title: Some(draft.title),
            description: Some(draft.description),
            code: Some(draft.code),
            language: Some(draft.language),
            category: Some(draft.category),
            tags: Some(draft.tags),
            is_favorite: Some(draft.is_favorite),
        }
    }
}

impl Snippet {
    pub fn from_draft(id: String, draft: SnippetDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            code: draft.code,
            language: draft.language,
            tags: dedup_tags(draft.tags),
            category: draft.category,
            created_at: now,
            updated_at: now,
            is_favorite: draft.is_favorite,
        }
    }

    /// Merge `patch` over this snippet and refresh `updated_at`.
    pub fn apply(&mut self, patch: SnippetPatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(code) = patch.code {
            self.code = code;
        }
        if let Some(language) = patch.language {
            self.language = language;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(tags) = patch.tags {
            self.tags = dedup_tags(tags);
        }
        if let Some(is_favorite) = patch.is_favorite {
            self.is_favorite = is_favorite;
        }
        self.touch(now);
    }

    /// `updated_at` never falls behind `created_at`, even if the clock does.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now.max(self.created_at);
    }

    pub fn line_count(&self) -> usize {
        self.code.lines().count()
    }
}

/// Trim, drop blanks and drop repeats, keeping first-seen order.
pub fn dedup_tags<I>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut out = Vec::new();
    for tag in tags {
        push_tag(&mut out, tag);
    }
    out
}

fn push_tag(tags: &mut Vec<String>, tag: String) {
    let tag = tag.trim();
    if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
        tags.push(tag.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample() -> Snippet {
        let draft = SnippetDraft::new("Fetch Helper", "fetch(url)")
            .unwrap()
            .description("wraps fetch")
            .tags(["api", "http"]);
        Snippet::from_draft("abc".to_string(), draft, Utc::now())
    }

    #[test]
    fn draft_rejects_blank_title_and_code() {
        assert_eq!(SnippetDraft::new("  ", "x").unwrap_err(), DraftError::EmptyTitle);
        assert_eq!(SnippetDraft::new("t", "\n\t").unwrap_err(), DraftError::EmptyCode);
    }

    #[test]
    fn draft_trims_and_deduplicates_tags() {
        let draft = SnippetDraft::new(" Title ", " code ")
            .unwrap()
            .tag("api")
            .tag(" api ")
            .tag("")
            .tag("css");
        assert_eq!(draft.title, "Title");
        assert_eq!(draft.code, "code");
        assert_eq!(draft.tags, vec!["api", "css"]);
    }

    #[test]
    fn blank_description_is_absent() {
        let draft = SnippetDraft::new("t", "c").unwrap().description("   ");
        assert_eq!(draft.description, None);
    }

    #[test]
    fn unknown_language_id_survives() {
        let lang = SnippetLanguage::from_id("elixir");
        assert_eq!(lang, SnippetLanguage::Other("elixir".to_string()));
        assert_eq!(lang.id(), "elixir");
        assert_eq!(SnippetLanguage::from_id("css"), SnippetLanguage::CSS);
        // ids are case-sensitive, like the filter
        assert_eq!(SnippetLanguage::from_id("CSS").id(), "CSS");
    }

    #[test]
    fn every_known_language_round_trips_through_its_id() {
        for lang in SnippetLanguage::known() {
            assert_eq!(&SnippetLanguage::from_id(lang.id()), lang);
        }
    }

    #[test]
    fn apply_merges_only_present_fields() {
        let mut snippet = sample();
        let before = snippet.clone();
        let later = snippet.created_at + Duration::seconds(5);

        snippet.apply(
            SnippetPatch {
                title: Some("Renamed".to_string()),
                ..SnippetPatch::default()
            },
            later,
        );

        assert_eq!(snippet.title, "Renamed");
        assert_eq!(snippet.code, before.code);
        assert_eq!(snippet.description, before.description);
        assert_eq!(snippet.tags, before.tags);
        assert_eq!(snippet.updated_at, later);
    }

    #[test]
    fn patch_can_clear_description() {
        let mut snippet = sample();
        snippet.apply(
            SnippetPatch {
                description: Some(None),
                ..SnippetPatch::default()
            },
            Utc::now(),
        );
        assert_eq!(snippet.description, None);
    }

    #[test]
    fn touch_never_moves_before_creation() {
        let mut snippet = sample();
        snippet.touch(snippet.created_at - Duration::hours(1));
        assert_eq!(snippet.updated_at, snippet.created_at);
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let snippet = sample();
        let value = serde_json::to_value(&snippet).unwrap();
        assert_eq!(value["language"], "javascript");
        assert_eq!(value["isFavorite"], false);
        assert!(value.get("createdAt").is_some());
        assert!(value.get("updatedAt").is_some());

        let back: Snippet = serde_json::from_value(value).unwrap();
        assert_eq!(back, snippet);
    }

    #[test]
    fn absent_description_is_omitted_and_reloads_as_none() {
        let mut snippet = sample();
        snippet.description = None;
        let json = serde_json::to_string(&snippet).unwrap();
        assert!(!json.contains("description"));
        let back: Snippet = serde_json::from_str(&json).unwrap();
        assert_eq!(back.description, None);
    }

    #[test]
    fn loads_javascript_style_dates() {
        let json = r#"{
            "id": "1700000000000",
            "title": "t",
            "code": "c",
            "language": "css",
            "tags": [],
            "category": "CSS",
            "createdAt": "2024-03-01T10:00:00.000Z",
            "updatedAt": "2024-03-02T10:00:00.000Z",
            "isFavorite": true
        }"#;
        let snippet: Snippet = serde_json::from_str(json).unwrap();
        assert_eq!(snippet.language, SnippetLanguage::CSS);
        assert!(snippet.updated_at > snippet.created_at);
        assert!(snippet.is_favorite);
    }
}
