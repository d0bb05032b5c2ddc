use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Category, Snippet};

/// Export options for customizing what to export
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    pub include_favorites_only: bool,
    pub category: Option<String>,
}

/// Export file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportData {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub snippets: Vec<Snippet>,
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl ExportData {
    pub fn new(snippets: &[Snippet], categories: &[Category], options: &ExportOptions) -> Self {
        let snippets = snippets
            .iter()
            .filter(|s| !options.include_favorites_only || s.is_favorite)
            .filter(|s| {
                options
                    .category
                    .as_deref()
                    .is_none_or(|category| s.category == category)
            })
            .cloned()
            .collect();

        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            snippets,
            categories: categories.to_vec(),
        }
    }
}

/// Write an export document as pretty JSON
pub fn export_to_file(data: &ExportData, path: &Path) -> Result<()> {
    let json =
        serde_json::to_string_pretty(data).context("Failed to serialize snippets to JSON")?;
    fs::write(path, json).context("Failed to write JSON export file")?;
    Ok(())
}

/// Read an export document. JSON is tried first, then YAML.
pub fn import_from_file(path: &Path) -> Result<ExportData> {
    let contents = fs::read_to_string(path).context("Failed to read import file")?;

    let is_yaml = path
        .extension()
        .is_some_and(|ext| ext == "yaml" || ext == "yml");
    if is_yaml {
        return serde_yaml::from_str(&contents).context("Failed to parse YAML import file");
    }

    match serde_json::from_str(&contents) {
        Ok(data) => Ok(data),
        Err(json_err) => serde_yaml::from_str(&contents).map_err(|_| {
            anyhow::Error::new(json_err).context("Import file is neither valid JSON nor YAML")
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::seed;

    #[test]
    fn options_narrow_the_exported_snippets() {
        let snippets = seed::default_snippets(Utc::now());
        let categories = seed::default_categories();

        let all = ExportData::new(&snippets, &categories, &ExportOptions::default());
        assert_eq!(all.snippets.len(), 3);
        assert_eq!(all.categories.len(), 5);

        let favorites = ExportData::new(
            &snippets,
            &categories,
            &ExportOptions {
                include_favorites_only: true,
                category: None,
            },
        );
        assert!(favorites.snippets.iter().all(|s| s.is_favorite));
        assert_eq!(favorites.snippets.len(), 2);

        let css = ExportData::new(
            &snippets,
            &categories,
            &ExportOptions {
                include_favorites_only: false,
                category: Some("CSS".to_string()),
            },
        );
        assert_eq!(css.snippets.len(), 1);
        assert_eq!(css.snippets[0].title, "CSS Flexbox Center");
    }

    #[test]
    fn json_and_yaml_files_both_import() {
        let dir = tempfile::tempdir().unwrap();
        let data = ExportData::new(
            &seed::default_snippets(Utc::now()),
            &seed::default_categories(),
            &ExportOptions::default(),
        );

        let json_path = dir.path().join("shelf.json");
        export_to_file(&data, &json_path).unwrap();
        let from_json = import_from_file(&json_path).unwrap();
        assert_eq!(from_json.snippets, data.snippets);

        let yaml_path = dir.path().join("shelf.yaml");
        fs::write(&yaml_path, serde_yaml::to_string(&data).unwrap()).unwrap();
        let from_yaml = import_from_file(&yaml_path).unwrap();
        assert_eq!(from_yaml.snippets, data.snippets);
    }

    #[test]
    fn garbage_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("junk.txt");
        fs::write(&path, "{ not: [valid").unwrap();
        assert!(import_from_file(&path).is_err());
    }
}
