//! Integration tests for catalog-config.
//!
//! Exercises the full loading pipeline: discovery -> parse -> merge -> validate.

// Integration tests live outside cfg(test) by design
#![allow(clippy::tests_outside_test_module)]

use std::{
    fs,
    path::{Path, PathBuf},
};

use catalog_config::{
    CONFIG_FILENAME, Config, ConfigError, ConfigWarning, FacetSettings, SearchSettings,
    local_template,
};

/// Temporary directory tree for a test.
struct TestEnv {
    /// Root of the tree.
    root: tempfile::TempDir,
}

impl TestEnv {
    fn new() -> Self {
        Self {
            root: tempfile::tempdir().unwrap(),
        }
    }

    fn path(&self) -> &Path {
        self.root.path()
    }

    /// Writes a `.catalog.toml` into `rel_dir` and returns its path.
    fn write_config(&self, rel_dir: &str, content: &str) -> PathBuf {
        let dir = self.root.path().join(rel_dir);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(CONFIG_FILENAME);
        fs::write(&path, content).unwrap();
        path
    }
}

#[test]
fn test_load_with_root_config_only() {
    let env = TestEnv::new();
    env.write_config(
        "",
        r#"
root = true

[search]
search_fields = ["name"]
filter_keys = "active"

[facets]
fields = ["category"]

[index]
keyword_fields = ["resource_internal_id", "category", "active"]
"#,
    );

    let config = Config::load(env.path()).unwrap();
    assert_eq!(config.search.search_fields, ["name"]);
    assert_eq!(config.search.filter_keys, ["active"]);
    assert_eq!(config.facets.fields, ["category"]);
    assert_eq!(config.config_root.as_deref(), Some(env.path()));
    assert!(config.validate().is_empty());
}

#[test]
fn test_nested_configs_merge_closest_first() {
    let env = TestEnv::new();
    env.write_config(
        "",
        "root = true\n[search]\nquantity = 5\nstemmer = \"french\"\n",
    );
    env.write_config("site", "[search]\nquantity = 30\n");
    let cwd = env.path().join("site/sub");
    fs::create_dir_all(&cwd).unwrap();

    let config = Config::load(&cwd).unwrap();
    assert_eq!(config.search.quantity, 30);
    assert_eq!(config.search.stemmer, "french");
    assert_eq!(config.config_root, Some(env.path().join("site")));
}

#[test]
fn test_invalid_file_reports_path() {
    let env = TestEnv::new();
    let path = env.write_config("", "root = true\n[facets\n");

    let err = Config::load(env.path()).unwrap_err();
    match err {
        ConfigError::ParseToml { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_validation_warnings_surface() {
    let env = TestEnv::new();
    env.write_config(
        "",
        "root = true\n[search]\nbackend = \"graphql\"\n[facets]\nfields = [\"provider\"]\n",
    );

    let warnings = Config::load(env.path()).unwrap().validate();
    assert!(warnings.contains(&ConfigWarning::UnknownBackend {
        backend: "graphql".into()
    }));
    assert!(warnings.contains(&ConfigWarning::FacetFieldNotKeyword {
        field: "provider".into()
    }));
}

#[test]
fn test_commented_template_loads_as_defaults() {
    let env = TestEnv::new();
    env.write_config("", &local_template());

    let config = Config::load_from_files(&[env.path().join(CONFIG_FILENAME)]).unwrap();
    assert_eq!(config.search, SearchSettings::default());
    assert_eq!(config.facets, FacetSettings::default());
}
