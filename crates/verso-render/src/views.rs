//! MiniJinja-backed view rendering.
//!
//! [`Views`] compiles views from a [`ViewRegistry`] on first use and caches
//! them in a MiniJinja environment. When a default layout is configured,
//! every rendered view is passed to the layout as `content`.
//!
//! ```rust
//! use verso_dispatch::{Symbol, ViewRenderer};
//! use verso_render::{ViewRegistry, Views};
//!
//! let mut registry = ViewRegistry::new();
//! registry.add_inline("index", "<h1>Welcome</h1>");
//! registry.add_inline("layout", "<body>{{ content }}</body>");
//!
//! let views = Views::new(registry).with_layout("layout");
//! let html = views.render(&Symbol::intern("index")).unwrap();
//! assert_eq!(html, "<body><h1>Welcome</h1></body>");
//! ```

use std::fmt;
use std::sync::Arc;

use minijinja::{context, Environment, ErrorKind, Template, Value};
use serde::Serialize;
use tracing::trace;
use verso_dispatch::{RenderError, Symbol, ViewRenderer};

use crate::registry::ViewRegistry;

/// Named views rendered with MiniJinja.
pub struct Views {
    env: Environment<'static>,
    registry: Arc<ViewRegistry>,
    layout: Option<String>,
}

impl Views {
    /// Creates views backed by `registry`. Nothing is compiled yet.
    pub fn new(registry: ViewRegistry) -> Self {
        let registry = Arc::new(registry);
        let source = Arc::clone(&registry);

        let mut env = Environment::new();
        env.set_loader(move |name| {
            source.load(name).map_err(|err| {
                minijinja::Error::new(ErrorKind::InvalidOperation, "failed to load view")
                    .with_source(err)
            })
        });

        Self {
            env,
            registry,
            layout: None,
        }
    }

    /// Wraps every rendered view in the named layout view.
    pub fn with_layout(mut self, name: impl Into<String>) -> Self {
        self.layout = Some(name.into());
        self
    }

    pub fn layout(&self) -> Option<&str> {
        self.layout.as_deref()
    }

    pub fn registry(&self) -> &ViewRegistry {
        &self.registry
    }

    pub fn has_view(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    /// Access to the environment, for registering filters and functions.
    pub fn environment_mut(&mut self) -> &mut Environment<'static> {
        &mut self.env
    }

    /// Compiles every registered view and the layout.
    ///
    /// Surfaces syntax errors and a missing layout up front instead of on the
    /// first request that hits them.
    pub fn check(&self) -> Result<(), RenderError> {
        for name in self.registry.names() {
            self.template(name)?;
        }
        if let Some(layout) = &self.layout {
            self.template(layout)?;
        }
        Ok(())
    }

    /// Renders a view with the given locals, then applies the layout.
    pub fn render_with<S: Serialize>(&self, name: &str, locals: S) -> Result<String, RenderError> {
        trace!(view = name, "rendering view");
        let body = self
            .template(name)?
            .render(locals)
            .map_err(|err| convert_error(name, err))?;

        match &self.layout {
            Some(layout) => self
                .template(layout)?
                .render(context! { content => Value::from_safe_string(body) })
                .map_err(|err| convert_error(layout, err)),
            None => Ok(body),
        }
    }

    fn template(&self, name: &str) -> Result<Template<'_, '_>, RenderError> {
        self.env.get_template(name).map_err(|err| {
            if err.kind() == ErrorKind::TemplateNotFound {
                RenderError::NotFound(name.to_string())
            } else {
                convert_error(name, err)
            }
        })
    }
}

/// Recovers a registry error smuggled through the loader, or wraps the
/// MiniJinja error as a template error.
fn convert_error(name: &str, err: minijinja::Error) -> RenderError {
    let inner = std::error::Error::source(&err).and_then(|source| source.downcast_ref::<RenderError>());
    match inner {
        Some(render_err) => render_err.clone(),
        None => RenderError::Template(format!("{}: {}", name, err)),
    }
}

impl ViewRenderer for Views {
    fn render(&self, view: &Symbol) -> Result<String, RenderError> {
        self.render_with(view.as_str(), context! {})
    }
}

impl fmt::Debug for Views {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Views")
            .field("views", &self.registry.names().len())
            .field("layout", &self.layout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn views(entries: &[(&str, &str)]) -> Views {
        let mut registry = ViewRegistry::new();
        for (name, source) in entries {
            registry.add_inline(*name, *source);
        }
        Views::new(registry)
    }

    #[test]
    fn test_render_symbol() {
        let views = views(&[("sym", "vsym")]);
        assert_eq!(views.render(&Symbol::intern("sym")).unwrap(), "vsym");
    }

    #[test]
    fn test_render_has_no_locals() {
        let views = views(&[("greet", "Hello{% if name %}, {{ name }}{% endif %}!")]);
        assert_eq!(views.render(&Symbol::intern("greet")).unwrap(), "Hello!");
    }

    #[test]
    fn test_render_with_locals() {
        let views = views(&[("greet", "Hello, {{ name }}!")]);
        let out = views.render_with("greet", json!({"name": "Ada"})).unwrap();
        assert_eq!(out, "Hello, Ada!");
    }

    #[test]
    fn test_missing_view() {
        let views = views(&[]);
        assert_eq!(
            views.render(&Symbol::intern("nope")).unwrap_err(),
            RenderError::NotFound("nope".into())
        );
    }

    #[test]
    fn test_syntax_error_is_template_error() {
        let views = views(&[("broken", "{% if %}")]);
        let err = views.render(&Symbol::intern("broken")).unwrap_err();
        assert!(matches!(err, RenderError::Template(ref msg) if msg.starts_with("broken:")));
    }

    #[test]
    fn test_layout_wraps_content_unescaped() {
        let views = views(&[("page", "<p>hi</p>"), ("layout.html", "<main>{{ content }}</main>")])
            .with_layout("layout.html");
        assert_eq!(
            views.render(&Symbol::intern("page")).unwrap(),
            "<main><p>hi</p></main>"
        );
    }

    #[test]
    fn test_missing_layout() {
        let views = views(&[("page", "x")]).with_layout("layout");
        assert_eq!(
            views.render(&Symbol::intern("page")).unwrap_err(),
            RenderError::NotFound("layout".into())
        );
        assert!(views.check().is_err());
    }

    #[test]
    fn test_include_other_view() {
        let views = views(&[("header", "<h1>T</h1>"), ("page", "{% include 'header' %}body")]);
        assert_eq!(views.render(&Symbol::intern("page")).unwrap(), "<h1>T</h1>body");
    }

    #[test]
    fn test_check_passes_for_valid_views() {
        let views = views(&[("a", "{{ 1 + 1 }}"), ("b", "plain")]);
        assert!(views.check().is_ok());
    }

    #[test]
    fn test_custom_filter() {
        let mut views = views(&[("shout", "{{ 'hi' | shout }}")]);
        views
            .environment_mut()
            .add_filter("shout", |s: String| s.to_uppercase());
        assert_eq!(views.render(&Symbol::intern("shout")).unwrap(), "HI");
    }
}
