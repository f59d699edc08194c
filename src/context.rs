use crate::search_path::{self, SearchPath};
use nix::errno::Errno;
use nix::unistd::{User, getuid};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(thiserror::Error, Debug)]
pub enum ContextError {
    #[error("{0}: No such file or directory")]
    NotFound(String),
    #[error("{0}: Not a directory")]
    NotADirectory(String),
    #[error("{}: {}", .path, describe(.source))]
    ChangeDir { path: String, source: io::Error },
    #[error("HOME not set")]
    NoHome,
    #[error("{}", describe(.0))]
    CurrentDir(io::Error),
}

/// Short system description of an I/O error, without the `(os error N)` tail.
pub fn describe(err: &io::Error) -> String {
    match err.raw_os_error() {
        Some(code) => Errno::from_raw(code).desc().to_string(),
        None => err.to_string(),
    }
}

/// The mutable state the shell works against: environment variables and the
/// working directory.
#[derive(Debug, Clone)]
pub struct Context {
    scope: Scope,
}

#[derive(Debug, Clone)]
enum Scope {
    /// Everything is read from and written to the running process.
    Process,
    /// A fixed set of variables and a tracked directory, never touching the
    /// process.
    Isolated {
        vars: HashMap<String, String>,
        cwd: PathBuf,
    },
}

impl Context {
    pub fn from_process() -> Self {
        Self {
            scope: Scope::Process,
        }
    }

    pub fn isolated<I, K, V>(vars: I, cwd: impl Into<PathBuf>) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            scope: Scope::Isolated {
                vars: vars
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
                cwd: cwd.into(),
            },
        }
    }

    pub fn var(&self, name: &str) -> Option<String> {
        match &self.scope {
            Scope::Process => env::var(name).ok(),
            Scope::Isolated { vars, .. } => vars.get(name).cloned(),
        }
    }

    /// Directories of `PATH` as they are right now.
    pub fn search_path(&self) -> SearchPath {
        self.var("PATH")
            .map(|value| SearchPath::parse(&value))
            .unwrap_or_default()
    }

    pub fn current_dir(&self) -> Result<PathBuf, ContextError> {
        match &self.scope {
            Scope::Process => env::current_dir().map_err(ContextError::CurrentDir),
            Scope::Isolated { cwd, .. } => Ok(cwd.clone()),
        }
    }

    /// Changes the working directory, leaving it untouched on any failure.
    ///
    /// `display` is the path as the user typed it and only shows up in error
    /// messages.
    pub fn change_dir(&mut self, path: &Path, display: &str) -> Result<(), ContextError> {
        let target = match &self.scope {
            Scope::Process => path.to_path_buf(),
            Scope::Isolated { cwd, .. } => cwd.join(path),
        };

        match fs::metadata(&target) {
            Ok(attr) if attr.is_dir() => {}
            Ok(_) => return Err(ContextError::NotADirectory(display.to_string())),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(ContextError::NotFound(display.to_string()));
            }
            Err(source) => {
                return Err(ContextError::ChangeDir {
                    path: display.to_string(),
                    source,
                });
            }
        }

        match &mut self.scope {
            Scope::Process => {
                env::set_current_dir(&target).map_err(|source| ContextError::ChangeDir {
                    path: display.to_string(),
                    source,
                })?;
            }
            Scope::Isolated { cwd, .. } => {
                *cwd = fs::canonicalize(&target).map_err(|source| ContextError::ChangeDir {
                    path: display.to_string(),
                    source,
                })?;
            }
        }

        Ok(())
    }

    /// `HOME` when set, otherwise the password database entry of the real
    /// user.
    pub fn home_dir(&self) -> Result<PathBuf, ContextError> {
        if let Some(home) = self.var("HOME").filter(|home| !home.is_empty()) {
            return Ok(PathBuf::from(home));
        }

        match User::from_uid(getuid()) {
            Ok(Some(user)) => Ok(user.dir),
            _ => Err(ContextError::NoHome),
        }
    }

    /// Resolves a command name against the working directory and `PATH`.
    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        let cwd = self.current_dir().ok();
        search_path::resolve(name, &self.search_path(), cwd.as_deref())
    }
}
