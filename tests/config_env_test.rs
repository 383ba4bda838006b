//! Environment overrides for Settings.
//!
//! Kept in its own test binary: it sets process-wide `PLAYREG_*` variables.

use std::env;
use std::path::PathBuf;

use tempfile::TempDir;

use play_registry::config::Settings;

#[test]
fn given_playreg_env_vars_when_load_then_override_files_and_defaults() {
    let project = TempDir::new().unwrap();
    env::set_var("PLAYREG_PLAYS_DIR", "/srv/plays");
    env::set_var("PLAYREG_EXTENSIONS", "lua,py");

    let settings = Settings::load(Some(project.path()));

    env::remove_var("PLAYREG_PLAYS_DIR");
    env::remove_var("PLAYREG_EXTENSIONS");
    let settings = settings.expect("load settings");
    assert_eq!(settings.plays_dir, PathBuf::from("/srv/plays"));
    assert_eq!(settings.extensions, vec!["lua".to_string(), "py".to_string()]);
}
