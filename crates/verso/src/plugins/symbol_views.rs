//! Symbol views: handlers answer with a view name.
//!
//! With this plugin installed, a route whose handler returns a [`Symbol`]
//! responds with that view rendered by the app's [`ViewRenderer`]:
//!
//! ```rust
//! use verso::{from_fn, App, Request, Symbol, SymbolViews};
//!
//! let app = App::builder()
//!     .plugin(SymbolViews)
//!     .renderer(from_fn(|view| Ok(format!("v{}", view))))
//!     .get("/", |_, _| Ok::<_, anyhow::Error>(Symbol::intern("sym")))
//!     .build()?;
//!
//! assert_eq!(app.call(&Request::get("/")).body, "vsym");
//! # Ok::<(), verso::SetupError>(())
//! ```
//!
//! Every other result is left exactly as the handler produced it. Render
//! failures reach the caller as the renderer's own error.
//!
//! [`Symbol`]: verso_dispatch::Symbol

use verso_dispatch::{Hooks, RenderError, RouteResult, ViewRenderer};

use crate::plugin::Plugin;

pub const NAME: &str = "symbol_views";

/// Replaces a symbol result with the rendered view of that name.
///
/// Non-symbol results are returned untouched and the renderer is not called.
pub fn finalize(views: &dyn ViewRenderer, result: RouteResult) -> Result<RouteResult, RenderError> {
    match result {
        RouteResult::Symbol(view) => views.render(&view).map(RouteResult::Text),
        other => Ok(other),
    }
}

/// The symbol views plugin. It has no options.
#[derive(Debug, Clone, Copy, Default)]
pub struct SymbolViews;

impl Plugin for SymbolViews {
    fn name(&self) -> &'static str {
        NAME
    }

    fn install(&self, hooks: Hooks) -> Hooks {
        hooks.finalize(|_ctx, views, result| Ok(finalize(views, result)?))
    }
}
