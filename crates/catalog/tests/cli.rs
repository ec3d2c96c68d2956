//! CLI integration tests for catalog commands.
//!
//! These focus on exit codes and the shape of the output rather than exact
//! formatting.

// Integration tests live outside cfg(test) by design
#![allow(clippy::tests_outside_test_module)]

use std::{fs, path::Path};

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

const CONFIG: &str = r#"root = true

[search]
search_fields = ["resource_internal_id", "name", "title"]
filter_keys = ["active"]

[facets]
fields = ["category", "provider"]
labels = { category = "Kinds" }

[index]
text_fields = ["name", "title", "description"]
keyword_fields = ["resource_internal_id", "category", "provider", "active"]
"#;

const DOCUMENTS: &str = r#"{"resource_internal_id": "svc-1", "name": "Open Cloud Compute", "category": "compute", "provider": "prov-a", "active": true}
{"resource_internal_id": "svc-2", "name": "Grid Storage", "category": "storage", "provider": "prov-a", "active": true}
{"resource_internal_id": "svc-3", "name": "Cloud Storage Archive", "category": ["storage", "compute"], "provider": "prov-b", "active": false}
{"resource_internal_id": "prov-a", "name": "Provider Alpha"}
{"resource_internal_id": "prov-b", "title": "Provider Beta"}
"#;

/// Helper to create a temp directory for tests.
fn temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().unwrap()
}

/// Helper to get a catalog command.
fn catalog() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("catalog").unwrap()
}

/// Helper to run `catalog` in `dir` with HOME isolated to `home`.
fn catalog_in(dir: &Path, home: &Path) -> Command {
    let mut cmd = catalog();
    cmd.current_dir(dir).env("HOME", home).env_remove("RUST_LOG");
    cmd
}

/// Strips ANSI escape sequences from a string.
fn strip_ansi(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(ch) = chars.next() {
        if ch == '\u{1b}' {
            for c in chars.by_ref() {
                if c == 'm' {
                    break;
                }
            }
        } else {
            output.push(ch);
        }
    }
    output
}

/// A configured project directory with an isolated home.
struct Project {
    /// Project root holding `.catalog.toml`.
    dir: tempfile::TempDir,
    /// Isolated home directory.
    home: tempfile::TempDir,
}

impl Project {
    fn new() -> Self {
        let project = Self {
            dir: temp_dir(),
            home: temp_dir(),
        };
        fs::write(project.dir.path().join(".catalog.toml"), CONFIG).unwrap();
        fs::write(project.dir.path().join("catalogue.jsonl"), DOCUMENTS).unwrap();
        project
    }

    fn indexed() -> Self {
        let project = Self::new();
        project
            .cmd()
            .args(["index", "catalogue.jsonl"])
            .assert()
            .success();
        project
    }

    fn cmd(&self) -> Command {
        catalog_in(self.dir.path(), self.home.path())
    }

    fn json(&self, args: &[&str]) -> Value {
        let output = self.cmd().args(args).output().unwrap();
        assert!(output.status.success(), "{output:?}");
        serde_json::from_slice(&output.stdout).unwrap()
    }
}

mod init {
    use super::*;

    #[test]
    fn creates_commented_config() {
        let dir = temp_dir();
        let home = temp_dir();

        catalog_in(dir.path(), home.path())
            .arg("init")
            .assert()
            .success()
            .stdout(predicate::str::contains("Created"));

        let contents = fs::read_to_string(dir.path().join(".catalog.toml")).unwrap();
        assert!(contents.contains("# [search]"));
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let dir = temp_dir();
        let home = temp_dir();
        fs::write(dir.path().join(".catalog.toml"), "existing").unwrap();

        catalog_in(dir.path(), home.path())
            .arg("init")
            .assert()
            .failure()
            .stderr(predicate::str::contains("already exists"));

        catalog_in(dir.path(), home.path())
            .args(["init", "--force"])
            .assert()
            .success();
        let contents = fs::read_to_string(dir.path().join(".catalog.toml")).unwrap();
        assert_ne!(contents, "existing");
    }

    #[test]
    fn adds_data_dir_to_gitignore() {
        let dir = temp_dir();
        let home = temp_dir();
        fs::write(dir.path().join(".gitignore"), "target/").unwrap();

        catalog_in(dir.path(), home.path())
            .arg("init")
            .assert()
            .success();

        let gitignore = fs::read_to_string(dir.path().join(".gitignore")).unwrap();
        assert_eq!(gitignore, "target/\n.catalog/\n");
    }
}

mod check {
    use super::*;

    #[test]
    fn clean_config_passes() {
        Project::new()
            .cmd()
            .arg("check")
            .assert()
            .success()
            .stdout(predicate::str::contains("No issues found."));
    }

    #[test]
    fn warnings_fail_with_hints() {
        let project = Project::new();
        fs::write(
            project.dir.path().join(".catalog.toml"),
            "root = true\n[search]\nbackend = \"sql\"\n[facets]\nfields = [\"provider\"]\n",
        )
        .unwrap();

        let output = project.cmd().arg("check").output().unwrap();
        assert!(!output.status.success());
        let stdout = strip_ansi(&String::from_utf8_lossy(&output.stdout));
        assert!(stdout.contains("Warnings (2):"));
        assert!(stdout.contains("unknown search backend 'sql'"));
        assert!(stdout.contains("Hint: facet fields must be listed in index.keyword_fields"));
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let project = Project::new();
        fs::write(project.dir.path().join(".catalog.toml"), "root = true\n[facets\n").unwrap();

        project
            .cmd()
            .arg("check")
            .assert()
            .failure()
            .stderr(predicate::str::contains("error: failed to load configuration"));
    }
}

mod index {
    use super::*;

    #[test]
    fn builds_index_beside_config() {
        let project = Project::new();
        project
            .cmd()
            .args(["index", "catalogue.jsonl"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Indexed 5 documents"));

        assert!(project.dir.path().join(".catalog/index/layout_hash").is_file());
    }

    #[test]
    fn reports_bad_lines() {
        let project = Project::new();
        fs::write(
            project.dir.path().join("broken.jsonl"),
            "{\"name\": \"ok\"}\n[1, 2]\n",
        )
        .unwrap();

        project
            .cmd()
            .args(["index", "broken.jsonl"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("2"));
    }

    #[test]
    fn missing_file_fails() {
        Project::new()
            .cmd()
            .args(["index", "nope.jsonl"])
            .assert()
            .failure()
            .stderr(predicate::str::starts_with("error:"));
    }
}

mod search {
    use super::*;

    #[test]
    fn requires_an_index() {
        Project::new()
            .cmd()
            .args(["search", "query=cloud"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("catalog index"));
    }

    #[test]
    fn keyword_search_as_json() {
        let project = Project::indexed();
        let json = project.json(&["search", "query=cloud", "--json"]);

        assert_eq!(json["total"], 2);
        let mut ids: Vec<&str> = json["results"]
            .as_array()
            .unwrap()
            .iter()
            .map(|doc| doc["resource_internal_id"][0].as_str().unwrap())
            .collect();
        ids.sort_unstable();
        assert_eq!(ids, ["svc-1", "svc-3"]);
    }

    #[test]
    fn facets_carry_labels() {
        let project = Project::indexed();
        let json = project.json(&["search", "--json"]);

        assert_eq!(json["total"], 5);
        let facets = json["facets"].as_array().unwrap();
        assert_eq!(facets[0]["label"], "Kinds");
        assert_eq!(facets[1]["label"], "Provider");
        let labels: Vec<&str> = facets[1]["values"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v["label"].as_str().unwrap())
            .collect();
        assert!(labels.contains(&"Provider Alpha"));
        assert!(labels.contains(&"Provider Beta"));
    }

    #[test]
    fn filters_and_paging() {
        let project = Project::indexed();
        let json = project.json(&["search", "category=storage", "active=true", "--json"]);
        assert_eq!(json["total"], 1);

        let json = project.json(&["search", "quantity=2", "from=1", "--json"]);
        assert_eq!(json["total"], 5);
        assert_eq!(json["from"], 1);
        assert_eq!(json["to"], 3);
    }

    #[test]
    fn textual_backend_has_no_facets() {
        let project = Project::indexed();
        let json = project.json(&[
            "search",
            "category=storage,compute",
            "--backend",
            "textual",
            "--json",
        ]);
        assert_eq!(json["total"], 3);
        assert!(json["facets"].as_array().unwrap().is_empty());
    }

    #[test]
    fn malformed_paging_fails() {
        Project::indexed()
            .cmd()
            .args(["search", "from=abc"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("from"));
    }

    #[test]
    fn prints_table_and_facets() {
        let project = Project::indexed();
        let output = project.cmd().args(["search", "query=cloud"]).output().unwrap();
        assert!(output.status.success());
        let stdout = strip_ansi(&String::from_utf8_lossy(&output.stdout));
        assert!(stdout.contains("Open Cloud Compute"));
        assert!(stdout.contains("Showing 1-2 of 2"));
        assert!(stdout.contains("Kinds"));
    }
}

mod explain {
    use super::*;

    #[test]
    fn shows_all_representations() {
        let project = Project::new();
        let output = project
            .cmd()
            .args(["explain", "query=cloud", "category=a,b"])
            .output()
            .unwrap();
        assert!(output.status.success());
        let stdout = strip_ansi(&String::from_utf8_lossy(&output.stdout));
        assert!(stdout.contains("Structured query"));
        assert!(stdout.contains("DisMax"));
        assert!(stdout.contains("( category=a OR category=b )"));
    }

    #[test]
    fn json_output_parses() {
        let project = Project::new();
        let json = project.json(&["explain", "active=true", "--json"]);
        assert_eq!(json["filter"]["quantity"], 10);
        assert!(!json["structured"]["filter"].as_array().unwrap().is_empty());
        assert_eq!(json["textual"], "active=true");
    }
}

mod render {
    use super::*;

    #[test]
    fn prints_textual_query() {
        Project::new()
            .cmd()
            .args(["render", "category=a,b"])
            .assert()
            .success()
            .stdout("( category=a OR category=b )\n");
    }
}

mod status {
    use super::*;

    #[test]
    fn reports_missing_then_current_index() {
        let project = Project::new();
        let output = project.cmd().arg("status").output().unwrap();
        let stdout = strip_ansi(&String::from_utf8_lossy(&output.stdout));
        assert!(stdout.contains("missing"));
        assert!(stdout.contains("[search]"));

        project
            .cmd()
            .args(["index", "catalogue.jsonl"])
            .assert()
            .success();
        let output = project.cmd().arg("status").output().unwrap();
        assert!(output.status.success());
        let stdout = strip_ansi(&String::from_utf8_lossy(&output.stdout));
        assert!(stdout.contains("current"));
        assert!(stdout.contains("5 documents"));
    }

    #[test]
    fn layout_change_marks_index_stale() {
        let project = Project::indexed();
        let config = CONFIG.replace("\"description\"", "\"summary\"");
        fs::write(project.dir.path().join(".catalog.toml"), config).unwrap();

        let output = project.cmd().arg("status").output().unwrap();
        let stdout = strip_ansi(&String::from_utf8_lossy(&output.stdout));
        assert!(stdout.contains("stale"));
    }
}
