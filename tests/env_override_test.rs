//! SORTREE_* environment variables take precedence over config files.
//!
//! Kept to a single test: env vars are process-wide.

use std::env;
use std::fs;

use tempfile::TempDir;

use sortree::config::Settings;

#[test]
fn given_env_vars_when_load_then_override_files() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let local = temp.path().join("local.toml");
    fs::write(
        &local,
        r#"
default_index = 5
pretty = true

[tree]
indentation = 8
edit_mode = true
"#,
    )
    .unwrap();

    env::set_var("SORTREE_DEFAULT_INDEX", "7");
    env::set_var("SORTREE_TREE__INDENTATION", "64");
    env::set_var("SORTREE_TREE__EDIT_MODE", "false");

    // Act
    let settings = Settings::load_layers(None, Some(local.as_path()));

    env::remove_var("SORTREE_DEFAULT_INDEX");
    env::remove_var("SORTREE_TREE__INDENTATION");
    env::remove_var("SORTREE_TREE__EDIT_MODE");

    // Assert
    let settings = settings.unwrap();
    assert_eq!(settings.default_index, 7);
    assert_eq!(settings.tree.indentation, 64);
    assert!(!settings.tree.edit_mode);
    assert!(settings.pretty, "file value kept where no env var is set");
}
