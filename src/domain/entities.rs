//! Domain entities: the play payload contract and the loader's concrete payload

use std::fmt;
use std::path::PathBuf;

use itertools::Itertools;

/// A registered behavior unit.
///
/// The registry never inspects a play beyond its name: the name is shown in
/// the tree and keys the play among its siblings. Plays are held as `Rc<P>`
/// and compared by identity.
pub trait Play {
    fn name(&self) -> &str;
}

/// Play discovered on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayClass {
    /// Class name derived from the file stem, e.g. `RunAround`
    pub name: String,
    /// Folder segments below the plays root plus the file stem
    pub module_path: Vec<String>,
    /// Absolute or root-relative source file
    pub source: PathBuf,
}

impl PlayClass {
    pub fn new(module_path: Vec<String>, source: PathBuf) -> Self {
        let name = module_path
            .last()
            .map(|stem| class_name(stem))
            .unwrap_or_default();
        Self {
            name,
            module_path,
            source,
        }
    }
}

impl Play for PlayClass {
    fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for PlayClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.module_path.join("."))
    }
}

/// Convert a snake_case module name into its CamelCase class name.
///
/// `run_around` → `RunAround`, `pass_2_drill` → `Pass2Drill`
pub fn class_name(module_name: &str) -> String {
    module_name
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .join("")
}

/// Render a module path for messages: `demo/run_around`, or `/` for root.
pub fn display_path<S: AsRef<str>>(segments: &[S]) -> String {
    if segments.is_empty() {
        "/".to_string()
    } else {
        segments.iter().map(|s| s.as_ref()).join("/")
    }
}
