use nix::unistd::{AccessFlags, access};
use std::fs;
use std::path::{Path, PathBuf};

/// Ordered list of directories taken from a `PATH`-style value.
///
/// Build a fresh one for each lookup so that changes to the variable are
/// seen by the very next command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPath {
    dirs: Vec<PathBuf>,
}

impl SearchPath {
    /// Splits a colon separated list, skipping empty entries.
    pub fn parse(value: &str) -> Self {
        Self {
            dirs: value
                .split(':')
                .filter(|dir| !dir.is_empty())
                .map(PathBuf::from)
                .collect(),
        }
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Finds the first directory holding an executable `name`.
    pub fn lookup(&self, name: &str) -> Option<PathBuf> {
        for dir in &self.dirs {
            let path = dir.join(name);
            log::trace!("probing {}", path.display());
            if is_executable(&path) {
                return Some(path);
            }
        }

        None
    }
}

/// Resolves `name` to an executable path.
///
/// The name is tried as given first, relative to `cwd`, which is what makes
/// `./script` or `/usr/bin/env` work. Otherwise the directories of
/// `search_path` are tried in order and the first match wins.
pub fn resolve(name: &str, search_path: &SearchPath, cwd: Option<&Path>) -> Option<PathBuf> {
    if name.is_empty() {
        return None;
    }

    let direct = match cwd {
        Some(cwd) => cwd.join(name.trim_start_matches("./")),
        None => PathBuf::from(name),
    };
    if is_executable(&direct) {
        return Some(direct);
    }

    search_path.lookup(name)
}

/// A regular file the real user may execute.
pub fn is_executable(path: &Path) -> bool {
    match fs::metadata(path) {
        Ok(attr) if attr.is_file() => access(path, AccessFlags::X_OK).is_ok(),
        _ => false,
    }
}
