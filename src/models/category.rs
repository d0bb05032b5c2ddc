use serde::{Deserialize, Serialize};

use crate::models::Snippet;

/// A named, colored grouping of snippets.
///
/// Snippets join to a category by `name`, not by id. `count` is derived
/// from the snippet collection and is rewritten on every change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub color: String,
    #[serde(default)]
    pub count: usize,
}

impl Category {
    pub fn new(id: impl Into<String>, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: color.into(),
            count: 0,
        }
    }
}

/// Rewrite every category's count as the number of snippets whose category
/// string equals the category name exactly.
pub fn recompute_category_counts(categories: &mut [Category], snippets: &[Snippet]) {
    for category in categories.iter_mut() {
        category.count = snippets
            .iter()
            .filter(|s| s.category == category.name)
            .count();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SnippetDraft;
    use chrono::Utc;

    fn snippet_in(id: &str, category: &str) -> Snippet {
        let draft = SnippetDraft::new("t", "c").unwrap().category(category);
        Snippet::from_draft(id.to_string(), draft, Utc::now())
    }

    #[test]
    fn counts_match_exact_names_only() {
        let mut categories = vec![
            Category::new("1", "CSS", "blue"),
            Category::new("2", "React", "cyan"),
        ];
        let snippets = vec![
            snippet_in("a", "CSS"),
            snippet_in("b", "css"),
            snippet_in("c", "CSS"),
            snippet_in("d", "Unlisted"),
        ];

        recompute_category_counts(&mut categories, &snippets);

        assert_eq!(categories[0].count, 2);
        assert_eq!(categories[1].count, 0);
    }

    #[test]
    fn recompute_is_idempotent() {
        let mut categories = vec![Category::new("1", "CSS", "blue")];
        let snippets = vec![snippet_in("a", "CSS")];

        recompute_category_counts(&mut categories, &snippets);
        let first = categories.clone();
        recompute_category_counts(&mut categories, &snippets);

        assert_eq!(first, categories);
    }

    #[test]
    fn stale_persisted_counts_are_overwritten() {
        let mut categories = vec![Category {
            count: 42,
            ..Category::new("1", "CSS", "blue")
        }];
        recompute_category_counts(&mut categories, &[]);
        assert_eq!(categories[0].count, 0);
    }
}
