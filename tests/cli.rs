use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

struct Shelf {
    data: TempDir,
    config: TempDir,
}

impl Shelf {
    fn new() -> Self {
        Self {
            data: tempfile::tempdir().unwrap(),
            config: tempfile::tempdir().unwrap(),
        }
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("snipshelf").unwrap();
        cmd.env("SNIPSHELF_DATA_DIR", self.data.path())
            .env("XDG_CONFIG_HOME", self.config.path())
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG");
        cmd
    }

    fn snippets(&self) -> Vec<serde_json::Value> {
        read_array(&self.data.path().join("code-snippets.json"))
    }

    fn id_of(&self, title: &str) -> String {
        self.snippets()
            .into_iter()
            .find(|s| s["title"] == title)
            .and_then(|s| s["id"].as_str().map(String::from))
            .unwrap()
    }
}

fn read_array(path: &Path) -> Vec<serde_json::Value> {
    let raw = fs::read_to_string(path).unwrap();
    serde_json::from_str::<serde_json::Value>(&raw)
        .unwrap()
        .as_array()
        .unwrap()
        .clone()
}

#[test]
fn help_lists_commands() {
    Shelf::new()
        .cmd()
        .arg("help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Search titles, descriptions and tags"));
}

#[test]
fn conflicting_favorite_flags_are_usage_errors() {
    Shelf::new()
        .cmd()
        .args(["edit", "1", "--favorite", "--unfavorite"])
        .assert()
        .code(2);
}

#[test]
fn empty_id_deletes_nothing() {
    let shelf = Shelf::new();
    fs::write(shelf.data.path().join("code-snippets.json"), "[]").unwrap();
    shelf
        .cmd()
        .args(["add", "--title", "Solo", "--code", "solo()"])
        .assert()
        .success();

    shelf
        .cmd()
        .args(["delete", ""])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing snippet ID"));
    assert_eq!(shelf.snippets().len(), 1);
}

#[test]
fn first_run_lists_seed_snippets() {
    let shelf = Shelf::new();
    shelf
        .cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("React useState Hook"))
        .stdout(predicate::str::contains("3 of 3 snippets"));

    assert!(shelf.data.path().join("snippet-categories.json").is_file());
}

#[test]
fn add_then_search_and_filter() {
    let shelf = Shelf::new();
    shelf
        .cmd()
        .args([
            "add",
            "--title",
            "Retry Fetch",
            "--code",
            "retry(fetch)",
            "--category",
            "Utilities",
            "--tag",
            "network",
            "--tag",
            "network",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added"));

    let added = shelf.snippets();
    assert_eq!(added[0]["title"], "Retry Fetch");
    assert_eq!(added[0]["language"], "javascript");
    assert_eq!(added[0]["tags"], serde_json::json!(["network"]));

    shelf
        .cmd()
        .args(["search", "FETCH"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 2 snippets"))
        .stdout(predicate::str::contains("Retry Fetch"))
        .stdout(predicate::str::contains("Async Fetch Helper"));

    shelf
        .cmd()
        .args(["list", "--category", "Utilities"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Retry Fetch"))
        .stdout(predicate::str::contains("Async Fetch Helper").not());

    shelf
        .cmd()
        .arg("categories")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"Utilities\s+1").unwrap());
}

#[test]
fn add_reads_code_from_stdin() {
    let shelf = Shelf::new();
    shelf
        .cmd()
        .args(["add", "--title", "Hello", "--language", "python"])
        .write_stdin("print('hello')\n")
        .assert()
        .success();

    let added = &shelf.snippets()[0];
    assert_eq!(added["code"], "print('hello')");
    assert_eq!(added["language"], "python");
}

#[test]
fn blank_title_is_rejected() {
    Shelf::new()
        .cmd()
        .args(["add", "--title", "  ", "--code", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("title cannot be empty"));
}

#[test]
fn favorite_edit_and_delete_by_id_prefix() {
    let shelf = Shelf::new();
    shelf
        .cmd()
        .args(["add", "--title", "Temp", "--code", "tmp()"])
        .assert()
        .success();
    let id = shelf.id_of("Temp");
    let prefix = &id[..8];

    shelf.cmd().args(["fav", prefix]).assert().success();
    assert_eq!(shelf.snippets()[0]["isFavorite"], true);

    shelf
        .cmd()
        .args(["edit", prefix, "--title", "Renamed", "--description", "now described"])
        .assert()
        .success();
    let edited = &shelf.snippets()[0];
    assert_eq!(edited["title"], "Renamed");
    assert_eq!(edited["description"], "now described");
    assert_eq!(edited["code"], "tmp()");

    shelf
        .cmd()
        .args(["delete", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted"));
    assert_eq!(shelf.snippets().len(), 3);

    shelf
        .cmd()
        .args(["delete", &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No snippet found"));
}

#[test]
fn show_finds_by_partial_title() {
    Shelf::new()
        .cmd()
        .args(["show", "flexbox"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CSS Flexbox Center"))
        .stdout(predicate::str::contains("justify-content: center;"));
}

#[test]
fn corrupt_snapshot_warns_without_overwriting() {
    let shelf = Shelf::new();
    let path = shelf.data.path().join("code-snippets.json");
    fs::write(&path, "not json").unwrap();

    shelf
        .cmd()
        .arg("list")
        .assert()
        .success()
        .stderr(predicate::str::contains("Malformed snapshot"))
        .stdout(predicate::str::contains("CSS Flexbox Center"));
    assert_eq!(fs::read_to_string(&path).unwrap(), "not json");
}

#[test]
fn export_then_import_into_another_shelf() {
    let source = Shelf::new();
    source
        .cmd()
        .args(["add", "--title", "Portable", "--code", "move()", "--favorite"])
        .assert()
        .success();

    let export_path = source.config.path().join("export.json");
    source
        .cmd()
        .args(["export", export_path.to_str().unwrap(), "--favorites"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 3 snippets"));

    let target = Shelf::new();
    fs::write(target.data.path().join("code-snippets.json"), "[]").unwrap();
    target
        .cmd()
        .args(["import", export_path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 3 new"));

    target
        .cmd()
        .args(["import", export_path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("0 new, 0 replaced, 3 skipped"));

    let titles: Vec<_> = target
        .snippets()
        .iter()
        .map(|s| s["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        titles,
        vec!["Portable", "React useState Hook", "Async Fetch Helper"]
    );
}
