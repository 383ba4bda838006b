//! Play loader
//!
//! Maps play files below the plays directory onto module paths and feeds
//! them into a [`PlayRegistry`]. Watching the directory is left to the
//! caller, which reports changes through [`PlayLoader::file_added`] and
//! [`PlayLoader::file_removed`].

use std::path::{self, Component, Path, PathBuf};
use std::rc::Rc;

use regex::Regex;
use tracing::{debug, instrument, trace, warn};
use walkdir::WalkDir;

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::config::Settings;
use crate::domain::{class_name, display_path, DomainError, Play, PlayClass, PlayRegistry};

/// Discovers plays on disk.
pub struct PlayLoader {
    root: PathBuf,
    extensions: Vec<String>,
    ignore: Vec<String>,
    identifier: Regex,
}

impl PlayLoader {
    pub fn new(settings: &Settings) -> Self {
        Self {
            root: settings.plays_dir.clone(),
            extensions: settings.extensions.clone(),
            ignore: settings.ignore.clone(),
            identifier: Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier regex"),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// True for files with a play extension whose stem is a non-ignored identifier.
    pub fn is_play_file(&self, path: &Path) -> bool {
        let has_extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e == ext));
        let stem_ok = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .is_some_and(|stem| {
                self.identifier.is_match(stem) && !self.ignore.iter().any(|i| i == stem)
            });
        has_extension && stem_ok
    }

    /// Folder segments from the plays root down to the file, plus the file stem.
    ///
    /// `plays/demo/run_around.py` → `["demo", "run_around"]`
    ///
    /// Relative paths on either side resolve against the working directory.
    pub fn module_path(&self, file: &Path) -> ApplicationResult<Vec<String>> {
        let absolute_file = path::absolute(file).with_path_context("resolve play file", file)?;
        let absolute_root =
            path::absolute(&self.root).with_path_context("resolve plays dir", &self.root)?;
        let relative = pathdiff::diff_paths(&absolute_file, &absolute_root)
            .ok_or_else(|| ApplicationError::OutsideRoot(file.to_path_buf()))?;

        let mut segments = Vec::new();
        if let Some(folders) = relative.parent() {
            for component in folders.components() {
                match component {
                    Component::Normal(name) => segments.push(name.to_string_lossy().into_owned()),
                    Component::CurDir => {}
                    _ => return Err(ApplicationError::OutsideRoot(file.to_path_buf())),
                }
            }
        }
        let stem = relative
            .file_stem()
            .ok_or_else(|| ApplicationError::OutsideRoot(file.to_path_buf()))?;
        segments.push(stem.to_string_lossy().into_owned());
        Ok(segments)
    }

    /// All play files below the root, in file-name order per directory.
    #[instrument(level = "debug", skip(self), fields(root = %self.root.display()))]
    pub fn scan(&self) -> ApplicationResult<Vec<PlayClass>> {
        if !self.root.is_dir() {
            return Err(ApplicationError::Scan {
                path: self.root.clone(),
                message: "not a directory".to_string(),
            });
        }

        let mut plays = Vec::new();
        let walker = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry.path()));
        for entry in walker {
            let entry = entry.with_path_context("walk plays directory", &self.root)?;
            if !entry.file_type().is_file() || !self.is_play_file(entry.path()) {
                continue;
            }
            let module_path = self.module_path(entry.path())?;
            trace!(file = %entry.path().display(), ?module_path, "found play");
            plays.push(PlayClass::new(module_path, entry.path().to_path_buf()));
        }
        debug!("scan: found {} plays", plays.len());
        Ok(plays)
    }

    /// Register every play found by [`PlayLoader::scan`]; returns how many.
    ///
    /// Conflicts among the scanned files or with plays already registered
    /// fail with [`DomainError::Duplicate`] before anything is inserted.
    pub fn load_all(&self, registry: &mut PlayRegistry<PlayClass>) -> ApplicationResult<usize> {
        let plays: Vec<Rc<PlayClass>> = self.scan()?.into_iter().map(Rc::new).collect();

        let mut staged = PlayRegistry::new();
        for play in &plays {
            registry.check_insert(&play.module_path, play.name())?;
            staged
                .insert(&play.module_path, Rc::clone(play))
                .inspect_err(|_| warn!(file = %play.source.display(), "conflicting play file"))?;
        }

        for play in &plays {
            registry.insert(&play.module_path, Rc::clone(play))?;
        }
        let count = plays.len();
        debug!("registry after load:\n{}", registry);
        Ok(count)
    }

    /// Register a newly created file. Returns `None` for non-play files.
    #[instrument(level = "debug", skip(self, registry))]
    pub fn file_added(
        &self,
        registry: &mut PlayRegistry<PlayClass>,
        file: &Path,
    ) -> ApplicationResult<Option<Rc<PlayClass>>> {
        if !self.is_play_file(file) {
            return Ok(None);
        }
        let module_path = self.module_path(file)?;
        let play = Rc::new(PlayClass::new(module_path.clone(), file.to_path_buf()));
        registry.insert(&module_path, Rc::clone(&play))?;
        Ok(Some(play))
    }

    /// Unregister a deleted file. Returns `false` for non-play files.
    ///
    /// The play is keyed by the class name derived from the file stem and
    /// must have been registered from a file with that stem.
    #[instrument(level = "debug", skip(self, registry))]
    pub fn file_removed(
        &self,
        registry: &mut PlayRegistry<PlayClass>,
        file: &Path,
    ) -> ApplicationResult<bool> {
        if !self.is_play_file(file) {
            return Ok(false);
        }
        let module_path = self.module_path(file)?;
        let key = module_path
            .last()
            .map(|stem| class_name(stem))
            .unwrap_or_default();
        let id = registry.locate(&module_path, &key)?;
        let registered_from = registry
            .play(id)
            .map(|node| node.module_name().to_string())
            .unwrap_or_default();
        if module_path.last() != Some(&registered_from) {
            return Err(DomainError::NotFound {
                path: display_path(&module_path[..module_path.len() - 1]),
                key,
            }
            .into());
        }
        registry.delete(&module_path, &key)?;
        Ok(true)
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.'))
}
