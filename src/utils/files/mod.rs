//! Where configuration and state bytes come from and where the rewritten bytes go.

use crate::core::error::MigrateError;
use crate::core::types::ErrorCategory;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

pub const CONFIG_EXTENSION: &str = "tf";
pub const STATE_EXTENSION: &str = "tfstate";

#[derive(Debug, Error)]
pub enum FileError {
    #[error("{0} does not exist")]
    NotFound(PathBuf),
    #[error("{0} is not a directory")]
    NotADirectory(PathBuf),
    #[error("{path} is not a state file (expected one of: {expected})")]
    UnexpectedExtension { path: PathBuf, expected: String },
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

impl From<FileError> for MigrateError {
    fn from(err: FileError) -> Self {
        let path = match &err {
            FileError::NotFound(path) | FileError::NotADirectory(path) => path.clone(),
            FileError::UnexpectedExtension { path, .. }
            | FileError::Read { path, .. }
            | FileError::Write { path, .. }
            | FileError::Walk { path, .. } => path.clone(),
        };
        let category = match err {
            FileError::UnexpectedExtension { .. } | FileError::NotADirectory(_) => {
                ErrorCategory::ValidationError
            }
            _ => ErrorCategory::IoError,
        };
        MigrateError::with_source(category, err.to_string(), Box::new(err))
            .with_context("path", path.display().to_string())
    }
}

/// One unit of input: its logical name and raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    pub name: String,
    pub content: Vec<u8>,
}

pub trait SourceProvider {
    fn units(&self) -> Result<Vec<SourceUnit>, FileError>;
}

pub trait Sink {
    fn persist(&mut self, name: &str, content: &[u8]) -> Result<(), FileError>;
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.iter().any(|wanted| wanted.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

fn read(path: &Path) -> Result<Vec<u8>, FileError> {
    fs::read(path).map_err(|source| FileError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Every configuration file under a directory, in path order.
#[derive(Debug, Clone)]
pub struct FsConfigProvider {
    root: PathBuf,
    extensions: Vec<String>,
}

impl FsConfigProvider {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        FsConfigProvider {
            root: root.into(),
            extensions: vec![CONFIG_EXTENSION.to_string()],
        }
    }

    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions;
        self
    }

    pub fn paths(&self) -> Result<Vec<PathBuf>, FileError> {
        if !self.root.exists() {
            return Err(FileError::NotFound(self.root.clone()));
        }
        if !self.root.is_dir() {
            return Err(FileError::NotADirectory(self.root.clone()));
        }

        let mut paths = Vec::new();
        for entry in WalkDir::new(&self.root).follow_links(true) {
            let entry = entry.map_err(|source| FileError::Walk {
                path: self.root.clone(),
                source,
            })?;
            if entry.file_type().is_file() && has_extension(entry.path(), &self.extensions) {
                paths.push(entry.into_path());
            }
        }
        paths.sort();
        Ok(paths)
    }
}

impl SourceProvider for FsConfigProvider {
    /// Files that cannot be read are logged and left out.
    fn units(&self) -> Result<Vec<SourceUnit>, FileError> {
        let mut units = Vec::new();
        for path in self.paths()? {
            match read(&path) {
                Ok(content) => units.push(SourceUnit {
                    name: path.display().to_string(),
                    content,
                }),
                Err(err) => tracing::warn!("skipping configuration file: {}", err),
            }
        }
        Ok(units)
    }
}

/// A single state document on disk.
#[derive(Debug, Clone)]
pub struct FsStateProvider {
    path: PathBuf,
    extensions: Vec<String>,
}

impl FsStateProvider {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        FsStateProvider {
            path: path.into(),
            extensions: vec![STATE_EXTENSION.to_string()],
        }
    }

    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SourceProvider for FsStateProvider {
    fn units(&self) -> Result<Vec<SourceUnit>, FileError> {
        if !self.path.exists() {
            return Err(FileError::NotFound(self.path.clone()));
        }
        if self.path.is_dir() || !has_extension(&self.path, &self.extensions) {
            return Err(FileError::UnexpectedExtension {
                path: self.path.clone(),
                expected: self.extensions.join(", "),
            });
        }
        Ok(vec![SourceUnit {
            name: self.path.display().to_string(),
            content: read(&self.path)?,
        }])
    }
}

/// Writes each unit back to the path it was read from.
#[derive(Debug, Clone, Default)]
pub struct FsSink {
    dry_run: bool,
    written: Vec<PathBuf>,
}

impl FsSink {
    pub fn new(dry_run: bool) -> Self {
        FsSink {
            dry_run,
            written: Vec::new(),
        }
    }

    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl Sink for FsSink {
    /// The new content lands in a temporary file next to the target and is renamed over it, so
    /// a failed write never leaves a truncated file behind.
    fn persist(&mut self, name: &str, content: &[u8]) -> Result<(), FileError> {
        let path = PathBuf::from(name);
        if self.dry_run {
            tracing::info!(file = %path.display(), bytes = content.len(), "dry run, not writing");
            return Ok(());
        }

        let write_error = |source: std::io::Error| FileError::Write {
            path: path.clone(),
            source,
        };
        let directory = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let mut temp = tempfile::NamedTempFile::new_in(&directory).map_err(write_error)?;
        temp.write_all(content).map_err(write_error)?;
        temp.flush().map_err(write_error)?;
        // The temp file is created 0600; carry the target's mode over before the rename.
        if let Ok(metadata) = fs::metadata(&path) {
            fs::set_permissions(temp.path(), metadata.permissions()).map_err(write_error)?;
        }
        temp.persist(&path).map_err(|err| write_error(err.error))?;

        tracing::info!(file = %path.display(), bytes = content.len(), "wrote file");
        self.written.push(path);
        Ok(())
    }
}
