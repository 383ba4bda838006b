//! Tests for PlayLoader against temporary play directories

use std::fs;
use std::path::{Path, PathBuf};

use rstest::{fixture, rstest};
use tempfile::{Builder, TempDir};

use play_registry::application::{ApplicationError, PlayLoader};
use play_registry::config::Settings;
use play_registry::domain::{DomainError, Play, PlayClass, PlayRegistry};
use play_registry::util::testing::init_test_setup;

fn touch(root: &Path, relative: &str) -> PathBuf {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "class Play: pass\n").unwrap();
    path
}

/// plays/
///   __init__.py
///   demo/__init__.py, demo/run_around.py
///   offense/set_pieces/corner_kick.py, offense/passing.py
///   README.md, .hidden/secret.py
#[fixture]
fn plays_dir() -> TempDir {
    init_test_setup();
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    for file in [
        "__init__.py",
        "demo/__init__.py",
        "demo/run_around.py",
        "offense/set_pieces/corner_kick.py",
        "offense/passing.py",
        "README.md",
        ".hidden/secret.py",
    ] {
        touch(root, file);
    }
    dir
}

fn loader_for(root: &Path) -> PlayLoader {
    PlayLoader::new(&Settings {
        plays_dir: root.to_path_buf(),
        ..Settings::default()
    })
}

// ============================================================
// Scanning
// ============================================================

#[rstest]
fn given_plays_dir_when_scan_then_finds_play_files_sorted(plays_dir: TempDir) {
    let plays = loader_for(plays_dir.path()).scan().unwrap();

    let module_paths: Vec<Vec<String>> = plays.iter().map(|p| p.module_path.clone()).collect();
    assert_eq!(
        module_paths,
        vec![
            vec!["demo".to_string(), "run_around".to_string()],
            vec!["offense".to_string(), "passing".to_string()],
            vec![
                "offense".to_string(),
                "set_pieces".to_string(),
                "corner_kick".to_string()
            ],
        ]
    );
    let names: Vec<&str> = plays.iter().map(|p| p.name()).collect();
    assert_eq!(names, vec!["RunAround", "Passing", "CornerKick"]);
}

#[test]
fn given_missing_dir_when_scan_then_scan_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope");

    let result = loader_for(&missing).scan();

    assert!(matches!(result, Err(ApplicationError::Scan { .. })));
}

#[rstest]
fn given_lua_extension_setting_when_scan_then_only_lua_plays(plays_dir: TempDir) {
    touch(plays_dir.path(), "scripted/dribble.lua");
    let loader = PlayLoader::new(&Settings {
        plays_dir: plays_dir.path().to_path_buf(),
        extensions: vec!["lua".to_string()],
        ..Settings::default()
    });

    let plays = loader.scan().unwrap();

    assert_eq!(plays.len(), 1);
    assert_eq!(plays[0].name, "Dribble");
}

// ============================================================
// Loading into the registry
// ============================================================

#[rstest]
fn given_plays_dir_when_load_all_then_registry_mirrors_folders(plays_dir: TempDir) {
    let mut registry = PlayRegistry::new();

    let count = loader_for(plays_dir.path()).load_all(&mut registry).unwrap();

    assert_eq!(count, 3);
    assert_eq!(
        registry.to_display_string(),
        "\
demo:
    RunAround [ENABLED]
offense:
    Passing [ENABLED]
    set_pieces:
        CornerKick [ENABLED]"
    );
}

#[rstest]
fn given_new_file_when_file_added_then_registered(plays_dir: TempDir) {
    let loader = loader_for(plays_dir.path());
    let mut registry = PlayRegistry::new();
    loader.load_all(&mut registry).unwrap();

    let file = touch(plays_dir.path(), "defense/zone_press.py");
    let play = loader.file_added(&mut registry, &file).unwrap().expect("play file");

    assert_eq!(play.name(), "ZonePress");
    assert!(registry.contains(&play));
    assert_eq!(registry.len(), 4);
}

#[rstest]
fn given_non_play_file_when_file_added_then_ignored(plays_dir: TempDir) {
    let loader = loader_for(plays_dir.path());
    let mut registry: PlayRegistry<PlayClass> = PlayRegistry::new();

    let file = touch(plays_dir.path(), "notes.txt");

    assert!(loader.file_added(&mut registry, &file).unwrap().is_none());
    assert!(!loader.file_removed(&mut registry, &file).unwrap());
    assert!(registry.is_empty());
}

#[rstest]
fn given_last_play_in_folder_when_file_removed_then_category_pruned(plays_dir: TempDir) {
    let loader = loader_for(plays_dir.path());
    let mut registry = PlayRegistry::new();
    loader.load_all(&mut registry).unwrap();

    let file = plays_dir.path().join("offense/set_pieces/corner_kick.py");
    assert!(loader.file_removed(&mut registry, &file).unwrap());

    assert_eq!(
        registry.to_display_string(),
        "demo:\n    RunAround [ENABLED]\noffense:\n    Passing [ENABLED]"
    );
}

#[rstest]
fn given_unregistered_file_when_file_removed_then_not_found(plays_dir: TempDir) {
    let loader = loader_for(plays_dir.path());
    let mut registry = PlayRegistry::new();
    loader.load_all(&mut registry).unwrap();

    let file = plays_dir.path().join("demo/ghost.py");
    let result = loader.file_removed(&mut registry, &file);

    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::NotFound { .. }))
    ));
    assert_eq!(registry.len(), 3);
}

#[rstest]
fn given_same_file_added_twice_then_duplicate(plays_dir: TempDir) {
    let loader = loader_for(plays_dir.path());
    let mut registry = PlayRegistry::new();
    loader.load_all(&mut registry).unwrap();

    let file = plays_dir.path().join("demo/run_around.py");
    let result = loader.file_added(&mut registry, &file);

    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::Duplicate { .. }))
    ));
    assert_eq!(registry.len(), 3);
}

#[test]
fn given_relative_plays_dir_when_absolute_file_events_then_registered_and_removed() {
    init_test_setup();
    let dir = Builder::new().prefix("plays").tempdir_in(".").unwrap();
    let relative_root = PathBuf::from(".").join(dir.path().file_name().unwrap());
    let loader = loader_for(&relative_root);
    let mut registry = PlayRegistry::new();
    let file = touch(&std::env::current_dir().unwrap().join(&relative_root), "demo/run_around.py");
    assert!(file.is_absolute());

    let play = loader.file_added(&mut registry, &file).unwrap().expect("play file");
    assert_eq!(play.module_path, vec!["demo".to_string(), "run_around".to_string()]);

    assert!(loader.file_removed(&mut registry, &file).unwrap());
    assert!(registry.is_empty());
}

// ============================================================
// Class name collisions
// ============================================================

/// a/pass2.py and a/pass_2.py both map to class `Pass2`
#[fixture]
fn colliding_dir() -> TempDir {
    init_test_setup();
    let dir = TempDir::new().unwrap();
    for file in ["a/alpha.py", "a/pass2.py", "a/pass_2.py", "z.py"] {
        touch(dir.path(), file);
    }
    dir
}

#[rstest]
fn given_colliding_class_names_when_load_all_then_duplicate_and_registry_untouched(
    colliding_dir: TempDir,
) {
    let mut registry = PlayRegistry::new();

    let result = loader_for(colliding_dir.path()).load_all(&mut registry);

    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::Duplicate { ref name, .. })) if name == "Pass2"
    ));
    assert!(registry.is_empty());
}

#[rstest]
fn given_conflict_with_registered_play_when_load_all_then_registry_untouched(
    plays_dir: TempDir,
) {
    let loader = loader_for(plays_dir.path());
    let mut registry = PlayRegistry::new();
    let early = touch(plays_dir.path(), "demo/run_around.py");
    loader.file_added(&mut registry, &early).unwrap();

    let result = loader.load_all(&mut registry);

    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::Duplicate { .. }))
    ));
    assert_eq!(registry.len(), 1);
}

#[rstest]
fn given_colliding_file_never_registered_when_file_removed_then_other_play_kept(
    colliding_dir: TempDir,
) {
    let loader = loader_for(colliding_dir.path());
    let mut registry = PlayRegistry::new();
    let registered = colliding_dir.path().join("a/pass2.py");
    let rejected = colliding_dir.path().join("a/pass_2.py");
    loader.file_added(&mut registry, &registered).unwrap();

    assert!(matches!(
        loader.file_added(&mut registry, &rejected),
        Err(ApplicationError::Domain(DomainError::Duplicate { .. }))
    ));
    let result = loader.file_removed(&mut registry, &rejected);

    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::NotFound { .. }))
    ));
    assert_eq!(registry.to_display_string(), "a:\n    Pass2 [ENABLED]");
    assert!(registry.iter().all(|node| node.module_name() == "pass2"));
}
