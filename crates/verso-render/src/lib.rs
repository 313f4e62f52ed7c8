//! # verso-render
//!
//! Named views for the verso micro-framework, compiled with
//! [MiniJinja](https://docs.rs/minijinja).
//!
//! - [`ViewRegistry`]: collects views from inline strings and view directories
//! - [`Views`]: renders registered views, optionally inside a default layout,
//!   and implements [`verso_dispatch::ViewRenderer`]
//!
//! ```rust,no_run
//! use verso_render::{ViewRegistry, Views};
//!
//! let mut registry = ViewRegistry::new();
//! registry.add_view_dir("./views")?;
//! let views = Views::new(registry).with_layout("layout");
//! views.check()?;
//! # Ok::<(), verso_dispatch::RenderError>(())
//! ```

mod registry;
mod views;

pub use registry::{walk_view_dir, ResolvedView, ViewFile, ViewRegistry, VIEW_EXTENSIONS};
pub use views::Views;

pub use verso_dispatch::{RenderError, ViewRenderer};
