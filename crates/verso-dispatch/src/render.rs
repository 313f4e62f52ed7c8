//! View rendering contract.
//!
//! Defines the contract between dispatch and view renderers.
//! Dispatch doesn't know about templates - it just knows that there is
//! something that turns a view name into a string.

use crate::symbol::Symbol;
use std::path::PathBuf;
use std::sync::Arc;

/// Renders a named view with default options.
///
/// Implementations decide how views are located, compiled and cached. The
/// pipeline only ever calls [`render`](ViewRenderer::render) with a view name
/// and uses the returned string verbatim.
pub trait ViewRenderer: Send + Sync {
    fn render(&self, view: &Symbol) -> Result<String, RenderError>;
}

impl<T: ViewRenderer + ?Sized> ViewRenderer for Arc<T> {
    fn render(&self, view: &Symbol) -> Result<String, RenderError> {
        (**self).render(view)
    }
}

impl<T: ViewRenderer + ?Sized> ViewRenderer for Box<T> {
    fn render(&self, view: &Symbol) -> Result<String, RenderError> {
        (**self).render(view)
    }
}

/// Errors that can occur while rendering a view.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    /// No view is registered under this name
    #[error("view not found: {0}")]
    NotFound(String),

    /// Template syntax or evaluation failure
    #[error("template error: {0}")]
    Template(String),

    /// A view file could not be read
    #[error("I/O error reading {}: {message}", .path.display())]
    Io { path: PathBuf, message: String },

    /// The same view name is defined in two view directories
    #[error(
        "view `{name}` is defined in both {} and {}",
        .first.display(),
        .second.display()
    )]
    Collision {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// A renderer with no views. Every render is [`RenderError::NotFound`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NoViews;

impl ViewRenderer for NoViews {
    fn render(&self, view: &Symbol) -> Result<String, RenderError> {
        Err(RenderError::NotFound(view.as_str().to_string()))
    }
}

/// A [`ViewRenderer`] backed by a closure.
pub struct FnRenderer<F> {
    f: F,
}

impl<F> ViewRenderer for FnRenderer<F>
where
    F: Fn(&Symbol) -> Result<String, RenderError> + Send + Sync,
{
    fn render(&self, view: &Symbol) -> Result<String, RenderError> {
        (self.f)(view)
    }
}

/// Creates a renderer from a closure.
///
/// This is the way to plug in views rendered by something other than
/// `verso-render`:
///
/// ```rust
/// use verso_dispatch::{from_fn, Symbol, ViewRenderer};
///
/// let views = from_fn(|view| Ok(format!("v{}", view)));
/// assert_eq!(views.render(&Symbol::intern("sym")).unwrap(), "vsym");
/// ```
pub fn from_fn<F>(f: F) -> FnRenderer<F>
where
    F: Fn(&Symbol) -> Result<String, RenderError> + Send + Sync,
{
    FnRenderer { f }
}
