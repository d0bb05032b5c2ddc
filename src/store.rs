//! The collection store: single owner of snippets and categories.
//!
//! Every mutation goes through [`SnippetStore`]. After each one the
//! category counts are recomputed and both collections are written back to
//! the key-value substrate before the call returns.

use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{Result, StoreError};
use crate::models::{
    Category, Snippet, SnippetDraft, SnippetLanguage, SnippetPatch, dedup_tags,
    recompute_category_counts, seed,
};
use crate::search::{SnippetQuery, filter_snippets};
use crate::storage::{CATEGORIES_KEY, KeyValueStore, SNIPPETS_KEY, backup_key};

/// A problem found while loading the persisted snapshot.
///
/// Loading never fails; the affected slot falls back to its seed defaults
/// and the warning is kept for the front end to surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadWarning {
    pub slot: &'static str,
    pub message: String,
}

/// Outcome of merging imported snippets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub added: usize,
    pub replaced: usize,
    pub skipped: usize,
}

#[derive(Debug)]
pub struct SnippetStore<S> {
    storage: S,
    snippets: Vec<Snippet>,
    categories: Vec<Category>,
    load_warnings: Vec<LoadWarning>,
    /// Raw text of slots that failed to load, not yet backed up.
    unparsed: Vec<(&'static str, String)>,
}

impl<S: KeyValueStore> SnippetStore<S> {
    /// Loads the persisted snapshot, seeding any slot that is empty or
    /// unreadable.
    ///
    /// Slots that loaded cleanly or were missing are written back. A slot
    /// that produced a warning is left untouched on disk; its raw text is
    /// copied to [`backup_key`] before the first mutation overwrites it.
    pub fn open(storage: S) -> Self {
        let mut load_warnings = Vec::new();
        let mut unparsed = Vec::new();

        let snippets = load_slot::<Snippet>(
            &storage,
            SNIPPETS_KEY,
            &mut load_warnings,
            &mut unparsed,
            unique_by_id,
        )
        .unwrap_or_else(|| seed::default_snippets(Utc::now()));
        let categories = load_slot::<Category>(
            &storage,
            CATEGORIES_KEY,
            &mut load_warnings,
            &mut unparsed,
            |items, _| items,
        )
        .unwrap_or_else(seed::default_categories);

        let held: Vec<&'static str> = load_warnings.iter().map(|w| w.slot).collect();
        let mut store = Self {
            storage,
            snippets,
            categories,
            load_warnings,
            unparsed,
        };

        store.recompute_category_counts();
        if let Err(e) = store.write_slots(&held) {
            warn!(error = %e, "could not write initial snapshot");
            store.load_warnings.push(LoadWarning {
                slot: e.slot(),
                message: e.to_string(),
            });
        }

        debug!(
            snippets = store.snippets.len(),
            categories = store.categories.len(),
            held = ?held,
            "snippet store opened"
        );
        store
    }

    /// Snippets, most recently added first.
    pub fn snippets(&self) -> &[Snippet] {
        &self.snippets
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn get(&self, id: &str) -> Option<&Snippet> {
        self.snippets.iter().find(|s| s.id == id)
    }

    pub fn load_warnings(&self) -> &[LoadWarning] {
        &self.load_warnings
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    pub fn total_count(&self) -> usize {
        self.snippets.len()
    }

    pub fn favorite_count(&self) -> usize {
        self.snippets.iter().filter(|s| s.is_favorite).count()
    }

    pub fn favorites(&self) -> impl Iterator<Item = &Snippet> {
        self.snippets.iter().filter(|s| s.is_favorite)
    }

    /// Distinct languages in use, in first-seen order.
    pub fn languages_in_use(&self) -> Vec<&SnippetLanguage> {
        let mut seen: Vec<&SnippetLanguage> = Vec::new();
        for snippet in &self.snippets {
            if !seen.contains(&&snippet.language) {
                seen.push(&snippet.language);
            }
        }
        seen
    }

    pub fn filter(&self, query: &SnippetQuery) -> Vec<&Snippet> {
        filter_snippets(&self.snippets, query)
    }

    /// Adds a snippet at the front of the collection and returns its id.
    ///
    /// On a persistence error the snippet is still in memory, at index 0.
    pub fn add(&mut self, draft: SnippetDraft) -> Result<String> {
        let id = self.next_id();
        let snippet = Snippet::from_draft(id.clone(), draft, Utc::now());
        self.snippets.insert(0, snippet);
        debug!(id = %id, "snippet added");

        self.commit()?;
        Ok(id)
    }

    /// Merges `patch` over the snippet with `id`.
    ///
    /// Returns `Ok(false)` without touching anything when no such snippet
    /// exists.
    pub fn update(&mut self, id: &str, patch: SnippetPatch) -> Result<bool> {
        let Some(snippet) = self.snippets.iter_mut().find(|s| s.id == id) else {
            debug!(id, "update skipped, no such snippet");
            return Ok(false);
        };

        snippet.apply(patch, Utc::now());
        debug!(id, "snippet updated");

        self.commit()?;
        Ok(true)
    }

    /// Removes the snippet with `id`. Returns `Ok(false)` if it was absent.
    pub fn delete(&mut self, id: &str) -> Result<bool> {
        let Some(index) = self.snippets.iter().position(|s| s.id == id) else {
            debug!(id, "delete skipped, no such snippet");
            return Ok(false);
        };

        self.snippets.remove(index);
        debug!(id, "snippet deleted");

        self.commit()?;
        Ok(true)
    }

    /// Flips the favorite flag and returns the new value, or `None` if no
    /// snippet has `id`.
    pub fn toggle_favorite(&mut self, id: &str) -> Result<Option<bool>> {
        let Some(current) = self.get(id).map(|s| s.is_favorite) else {
            debug!(id, "favorite toggle skipped, no such snippet");
            return Ok(None);
        };

        self.update(id, SnippetPatch::favorite(!current))?;
        Ok(Some(!current))
    }

    /// Merges snippets from an export. Ids already on the shelf are skipped
    /// unless `overwrite` is set, in which case the record is replaced in
    /// place. New snippets are prepended, keeping their order from the file.
    pub fn import_snippets(
        &mut self,
        incoming: Vec<Snippet>,
        overwrite: bool,
    ) -> Result<ImportSummary> {
        let mut summary = ImportSummary::default();
        let mut fresh: Vec<Snippet> = Vec::new();

        for mut snippet in incoming {
            if snippet.title.trim().is_empty() || snippet.code.trim().is_empty() {
                summary.skipped += 1;
                continue;
            }
            snippet.tags = dedup_tags(std::mem::take(&mut snippet.tags));
            snippet.updated_at = snippet.updated_at.max(snippet.created_at);

            let existing = self
                .snippets
                .iter_mut()
                .chain(fresh.iter_mut())
                .find(|s| s.id == snippet.id);

            match existing {
                Some(slot) if overwrite => {
                    *slot = snippet;
                    summary.replaced += 1;
                }
                Some(_) => summary.skipped += 1,
                None => {
                    fresh.push(snippet);
                    summary.added += 1;
                }
            }
        }

        self.snippets.splice(0..0, fresh);
        debug!(?summary, "snippets imported");

        if summary.added + summary.replaced > 0 {
            self.commit()?;
        }
        Ok(summary)
    }

    /// Rewrites each category's count from the current snippets.
    pub fn recompute_category_counts(&mut self) {
        recompute_category_counts(&mut self.categories, &self.snippets);
    }

    /// Writes both collections to their slots. Both writes are attempted
    /// even if the first fails; the first error is returned.
    ///
    /// Text of a slot that failed to load is first copied to its backup key,
    /// and nothing is overwritten if that copy fails.
    pub fn persist(&mut self) -> Result<()> {
        self.back_up_unparsed()?;
        self.write_slots(&[])
    }

    fn back_up_unparsed(&mut self) -> Result<()> {
        for (slot, raw) in &self.unparsed {
            let slot: &'static str = *slot;
            let key = backup_key(slot);
            self.storage
                .set(&key, raw)
                .map_err(|source| StoreError::Persist { slot, source })?;
            warn!(slot, backup = %key, "kept unreadable snapshot before overwriting");
        }
        self.unparsed.clear();
        Ok(())
    }

    fn write_slots(&mut self, skip: &[&str]) -> Result<()> {
        let snippets = if skip.contains(&SNIPPETS_KEY) {
            Ok(())
        } else {
            write_slot(&mut self.storage, SNIPPETS_KEY, &self.snippets)
        };
        let categories = if skip.contains(&CATEGORIES_KEY) {
            Ok(())
        } else {
            write_slot(&mut self.storage, CATEGORIES_KEY, &self.categories)
        };
        snippets.and(categories)
    }

    fn commit(&mut self) -> Result<()> {
        self.recompute_category_counts();
        self.persist().inspect_err(|e| {
            warn!(error = %e, "snapshot not persisted, keeping in-memory state");
        })
    }

    fn next_id(&self) -> String {
        loop {
            let id = Uuid::new_v4().to_string();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }
}

/// Reads and parses one slot. `None` means "use the seed".
///
/// When parsing fails, or `check` reports a problem, the raw text is pushed
/// onto `unparsed` so it can be backed up before it is overwritten.
fn load_slot<T: DeserializeOwned>(
    storage: &impl KeyValueStore,
    slot: &'static str,
    warnings: &mut Vec<LoadWarning>,
    unparsed: &mut Vec<(&'static str, String)>,
    check: impl FnOnce(Vec<T>, &mut Vec<LoadWarning>) -> Vec<T>,
) -> Option<Vec<T>> {
    let raw = match storage.get(slot) {
        Ok(Some(raw)) if !raw.trim().is_empty() => raw,
        Ok(_) => {
            debug!(slot, "no saved snapshot, using defaults");
            return None;
        }
        Err(e) => {
            warn!(slot, error = %e, "could not read snapshot, using defaults");
            warnings.push(LoadWarning {
                slot,
                message: e.to_string(),
            });
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(items) => {
            let before = warnings.len();
            let items = check(items, warnings);
            if warnings.len() > before {
                unparsed.push((slot, raw));
            }
            Some(items)
        }
        Err(e) => {
            warn!(slot, error = %e, "saved snapshot is malformed, using defaults");
            warnings.push(LoadWarning {
                slot,
                message: format!("Malformed snapshot: {e}"),
            });
            unparsed.push((slot, raw));
            None
        }
    }
}

/// Drops later records whose id repeats an earlier one.
fn unique_by_id(snippets: Vec<Snippet>, warnings: &mut Vec<LoadWarning>) -> Vec<Snippet> {
    let mut unique: Vec<Snippet> = Vec::with_capacity(snippets.len());
    for snippet in snippets {
        if unique.iter().any(|s| s.id == snippet.id) {
            warn!(id = %snippet.id, "dropping duplicate snippet id from snapshot");
            warnings.push(LoadWarning {
                slot: SNIPPETS_KEY,
                message: format!("Duplicate snippet id '{}' dropped", snippet.id),
            });
            continue;
        }
        unique.push(snippet);
    }
    unique
}

fn write_slot<T: Serialize>(
    storage: &mut impl KeyValueStore,
    slot: &'static str,
    items: &[T],
) -> Result<()> {
    let json =
        serde_json::to_string(items).map_err(|source| StoreError::Serialize { slot, source })?;
    storage
        .set(slot, &json)
        .map_err(|source| StoreError::Persist { slot, source })
}
