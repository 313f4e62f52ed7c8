//! View registry for directory-based and inline views.
//!
//! [`ViewRegistry`] resolves view names to their source, from inline strings
//! or from view directories on disk.
//!
//! # View Resolution
//!
//! 1. Inline views (added via [`ViewRegistry::add_inline`]) have highest priority
//! 2. File views from all registered directories
//! 3. Names can be given with or without extension: `"index"` and
//!    `"index.html"` both resolve to `index.html`
//!
//! # Supported Extensions
//!
//! | Priority | Extension |
//! |----------|-----------|
//! | 1 (highest) | `.jinja` |
//! | 2 | `.jinja2` |
//! | 3 | `.j2` |
//! | 4 | `.html` |
//! | 5 (lowest) | `.txt` |
//!
//! If one directory holds `index.jinja` and `index.html`, `"index"` resolves to
//! `index.jinja`. The same name in two *different* directories is a
//! [`RenderError::Collision`].
//!
//! File views are read when they are first rendered, not when the directory is
//! registered.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use verso_dispatch::RenderError;

/// Recognized view file extensions in priority order.
pub const VIEW_EXTENSIONS: &[&str] = &[".jinja", ".jinja2", ".j2", ".html", ".txt"];

/// A view file discovered while walking a view directory.
///
/// For `/app/views/users/show.html` with root `/app/views`:
/// `name` is `users/show`, `name_with_ext` is `users/show.html`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewFile {
    pub name: String,
    pub name_with_ext: String,
    pub path: PathBuf,
    pub source_dir: PathBuf,
}

impl ViewFile {
    /// Returns the extension priority (lower is higher priority).
    ///
    /// Returns `usize::MAX` if the extension is not recognized.
    pub fn extension_priority(&self) -> usize {
        VIEW_EXTENSIONS
            .iter()
            .position(|ext| self.name_with_ext.ends_with(ext))
            .unwrap_or(usize::MAX)
    }
}

/// Where a resolved view's source lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedView {
    /// Source stored in memory.
    Inline(String),
    /// Source read from disk on demand.
    File(PathBuf),
}

/// Registry of named views.
#[derive(Debug, Clone, Default)]
pub struct ViewRegistry {
    inline: HashMap<String, String>,
    /// Both `name` and `name_with_ext` map to the winning file.
    files: HashMap<String, ViewFile>,
    dirs: Vec<PathBuf>,
}

impl ViewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an inline view. Inline views shadow file views with the same name.
    pub fn add_inline(&mut self, name: impl Into<String>, source: impl Into<String>) {
        self.inline.insert(name.into(), source.into());
    }

    /// Adds every view under `dir`, recursively.
    ///
    /// # Errors
    ///
    /// - [`RenderError::Io`] if the directory cannot be read
    /// - [`RenderError::Collision`] if a view name is already provided by
    ///   another directory
    pub fn add_view_dir<P: AsRef<Path>>(&mut self, dir: P) -> Result<(), RenderError> {
        let root = canonical_dir(dir.as_ref())?;
        let files = walk_view_dir(&root)?;
        self.add_files(files)?;
        self.dirs.push(root);
        Ok(())
    }

    /// Registers view files, typically produced by [`walk_view_dir`].
    pub fn add_files(&mut self, files: Vec<ViewFile>) -> Result<(), RenderError> {
        let mut sorted = files;
        sorted.sort_by_key(ViewFile::extension_priority);

        for file in sorted {
            if let Some(existing) = self.files.get(&file.name) {
                if existing.source_dir != file.source_dir {
                    return Err(RenderError::Collision {
                        name: file.name.clone(),
                        first: existing.path.clone(),
                        second: file.path.clone(),
                    });
                }
                // Same directory, lower-priority extension: reachable by full name only.
                self.files.insert(file.name_with_ext.clone(), file);
                continue;
            }

            self.files.insert(file.name.clone(), file.clone());
            self.files.insert(file.name_with_ext.clone(), file);
        }

        Ok(())
    }

    /// Resolves a view name to its source location.
    pub fn resolve(&self, name: &str) -> Option<ResolvedView> {
        if let Some(source) = self.inline.get(name) {
            return Some(ResolvedView::Inline(source.clone()));
        }
        self.files
            .get(name)
            .map(|file| ResolvedView::File(file.path.clone()))
    }

    /// Returns the source of a view, reading it from disk if necessary.
    ///
    /// `Ok(None)` means no view has that name.
    pub fn load(&self, name: &str) -> Result<Option<String>, RenderError> {
        match self.resolve(name) {
            Some(ResolvedView::Inline(source)) => Ok(Some(source)),
            Some(ResolvedView::File(path)) => std::fs::read_to_string(&path)
                .map(Some)
                .map_err(|e| RenderError::Io {
                    path,
                    message: e.to_string(),
                }),
            None => Ok(None),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inline.contains_key(name) || self.files.contains_key(name)
    }

    /// All resolvable names, sorted. Names with extensions are included.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .inline
            .keys()
            .chain(self.files.keys())
            .map(String::as_str)
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Registered view directories, canonicalized.
    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    pub fn is_empty(&self) -> bool {
        self.inline.is_empty() && self.files.is_empty()
    }
}

/// Walks a directory recursively and collects files with view extensions.
pub fn walk_view_dir(root: &Path) -> Result<Vec<ViewFile>, RenderError> {
    let root = canonical_dir(root)?;
    let mut files = Vec::new();
    walk_recursive(&root, &root, &mut files)?;
    Ok(files)
}

fn canonical_dir(dir: &Path) -> Result<PathBuf, RenderError> {
    dir.canonicalize().map_err(|e| RenderError::Io {
        path: dir.to_path_buf(),
        message: e.to_string(),
    })
}

fn walk_recursive(current: &Path, root: &Path, files: &mut Vec<ViewFile>) -> Result<(), RenderError> {
    let io_err = |e: std::io::Error| RenderError::Io {
        path: current.to_path_buf(),
        message: e.to_string(),
    };

    for entry in std::fs::read_dir(current).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();

        if path.is_dir() {
            walk_recursive(&path, root, files)?;
        } else if path.is_file() {
            if let Some(file) = parse_view_file(&path, root) {
                files.push(file);
            }
        }
    }

    Ok(())
}

fn parse_view_file(path: &Path, root: &Path) -> Option<ViewFile> {
    let relative = path.strip_prefix(root).ok()?;
    let name_with_ext = relative
        .to_string_lossy()
        .replace(std::path::MAIN_SEPARATOR, "/");

    let extension = VIEW_EXTENSIONS
        .iter()
        .find(|ext| name_with_ext.ends_with(*ext))?;
    let name = name_with_ext.strip_suffix(extension)?.to_string();

    Some(ViewFile {
        name,
        name_with_ext,
        path: path.to_path_buf(),
        source_dir: root.to_path_buf(),
    })
}
