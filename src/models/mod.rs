pub mod category;
pub mod export;
pub mod seed;
pub mod snippet;

pub use category::{Category, recompute_category_counts};
pub use export::{ExportData, ExportOptions, export_to_file, import_from_file};
pub use snippet::{DraftError, Snippet, SnippetDraft, SnippetLanguage, SnippetPatch, dedup_tags};
