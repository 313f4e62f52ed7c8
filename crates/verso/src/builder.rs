//! AppBuilder for constructing App instances.
//!
//! # App State
//!
//! App-level state (database pools, settings, API clients) is injected with
//! `.app_state()` and read in handlers through `ctx.app_state`:
//!
//! ```rust
//! use verso::{App, Request};
//!
//! struct Greeting(&'static str);
//!
//! let app = App::builder()
//!     .app_state(Greeting("hi"))
//!     .get("/", |_, ctx| {
//!         let greeting = ctx.app_state.get_required::<Greeting>()?;
//!         Ok::<_, anyhow::Error>(greeting.0)
//!     })
//!     .build()?;
//!
//! assert_eq!(app.call(&Request::get("/")).body, "hi");
//! # Ok::<(), verso::SetupError>(())
//! ```
//!
//! # Views
//!
//! Views come from one of two places. An explicit [`renderer`](AppBuilder::renderer)
//! is used as is. Otherwise the builder collects inline views and view
//! directories into a [`ViewRegistry`] and renders them with [`Views`],
//! wrapped in the [`layout`](AppBuilder::layout) if one is set. With neither,
//! every view lookup fails with [`RenderError::NotFound`](verso_dispatch::RenderError::NotFound).

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};
use verso_dispatch::{
    DispatchError, Dispatcher, Extensions, FnHandler, Handler, HookError, Hooks,
    IntoHandlerResult, Method, NoViews, Request, RequestContext, Response, RouteResult, Router,
    Symbol, ViewRenderer,
};
use verso_render::{ViewRegistry, Views};

use crate::app::App;
use crate::config::AppConfig;
use crate::plugin::Plugin;
use crate::plugins;
use crate::setup::{ConfigError, SetupError};

/// Builder for constructing an [`App`].
pub struct AppBuilder {
    router: Router,
    hooks: Hooks,
    renderer: Option<Arc<dyn ViewRenderer>>,
    registry: ViewRegistry,
    layout: Option<String>,
    app_state: Extensions,
    plugins: Vec<&'static str>,
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AppBuilder {
    pub fn new() -> Self {
        Self {
            router: Router::new(),
            hooks: Hooks::new(),
            renderer: None,
            registry: ViewRegistry::new(),
            layout: None,
            app_state: Extensions::new(),
            plugins: Vec::new(),
        }
    }

    /// Registers a closure handler for `method` requests matching `pattern`.
    ///
    /// Routes are tried in registration order.
    pub fn route<F, R>(self, method: Method, pattern: &str, f: F) -> Self
    where
        F: Fn(&Request, &RequestContext) -> R + Send + Sync + 'static,
        R: IntoHandlerResult + 'static,
    {
        self.handler(method, pattern, FnHandler::new(f))
    }

    pub fn get<F, R>(self, pattern: &str, f: F) -> Self
    where
        F: Fn(&Request, &RequestContext) -> R + Send + Sync + 'static,
        R: IntoHandlerResult + 'static,
    {
        self.route(Method::GET, pattern, f)
    }

    pub fn post<F, R>(self, pattern: &str, f: F) -> Self
    where
        F: Fn(&Request, &RequestContext) -> R + Send + Sync + 'static,
        R: IntoHandlerResult + 'static,
    {
        self.route(Method::POST, pattern, f)
    }

    /// Registers a struct handler.
    pub fn handler<H>(mut self, method: Method, pattern: &str, handler: H) -> Self
    where
        H: Handler + 'static,
    {
        self.router.add(method, pattern, Arc::new(handler));
        self
    }

    pub fn pre_dispatch<F>(mut self, f: F) -> Self
    where
        F: Fn(&Request, &mut RequestContext) -> Result<(), HookError> + Send + Sync + 'static,
    {
        self.hooks = self.hooks.pre_dispatch(f);
        self
    }

    pub fn finalize<F>(mut self, f: F) -> Self
    where
        F: Fn(&RequestContext, &dyn ViewRenderer, RouteResult) -> Result<RouteResult, DispatchError>
            + Send
            + Sync
            + 'static,
    {
        self.hooks = self.hooks.finalize(f);
        self
    }

    pub fn post_output<F>(mut self, f: F) -> Self
    where
        F: Fn(&RequestContext, Response) -> Result<Response, HookError> + Send + Sync + 'static,
    {
        self.hooks = self.hooks.post_output(f);
        self
    }

    /// Uses `renderer` for all view lookups instead of the built-in views.
    pub fn renderer<V>(mut self, renderer: V) -> Self
    where
        V: ViewRenderer + 'static,
    {
        self.renderer = Some(Arc::new(renderer));
        self
    }

    /// Registers every view file under `dir`.
    ///
    /// Fails if the directory can't be read or a view name is already
    /// provided by another directory.
    pub fn view_dir<P: AsRef<Path>>(mut self, dir: P) -> Result<Self, SetupError> {
        self.registry.add_view_dir(dir)?;
        Ok(self)
    }

    /// Registers a view from a string. Inline views win over view files.
    pub fn inline_view(mut self, name: impl Into<String>, source: impl Into<String>) -> Self {
        self.registry.add_inline(name, source);
        self
    }

    /// Wraps every rendered view in the named layout view.
    pub fn layout(mut self, name: impl Into<String>) -> Self {
        self.layout = Some(name.into());
        self
    }

    /// Adds app-level state, available to handlers as `ctx.app_state`.
    ///
    /// Adding a second value of the same type replaces the first.
    pub fn app_state<T: Send + Sync + 'static>(mut self, value: T) -> Self {
        self.app_state.insert(value);
        self
    }

    /// Installs a plugin. Installing a plugin with the same name twice is a no-op.
    pub fn plugin<P: Plugin>(self, plugin: P) -> Self {
        self.install(&plugin)
    }

    fn install(mut self, plugin: &dyn Plugin) -> Self {
        let name = plugin.name();
        if self.plugins.contains(&name) {
            debug!(plugin = name, "plugin already installed");
            return self;
        }
        self.hooks = plugin.install(std::mem::take(&mut self.hooks));
        self.plugins.push(name);
        self
    }

    /// Applies view directories, layout and plugins from a loaded config.
    pub fn with_config(mut self, config: &AppConfig) -> Result<Self, SetupError> {
        for dir in &config.views.dirs {
            self = self.view_dir(dir)?;
        }
        if let Some(layout) = &config.views.layout {
            self = self.layout(layout.clone());
        }
        for name in &config.plugins {
            let plugin =
                plugins::by_name(name).ok_or_else(|| ConfigError::UnknownPlugin(name.clone()))?;
            self = self.install(plugin.as_ref());
        }
        Ok(self)
    }

    /// Returns the names of installed plugins, in install order.
    pub fn plugin_names(&self) -> &[&'static str] {
        &self.plugins
    }

    /// Builds the app.
    ///
    /// Registry-backed views are compiled here, so view syntax errors and a
    /// missing layout fail the build rather than a later request. Every
    /// registered view name is interned, so handlers can resolve request
    /// input with [`Symbol::lookup`](verso_dispatch::Symbol::lookup).
    pub fn build(self) -> Result<App, SetupError> {
        let views = self.build_views()?;

        debug!(
            routes = self.router.len(),
            plugins = ?self.plugins,
            "app built"
        );

        let dispatcher = Dispatcher::new(self.router, self.hooks, views, Arc::new(self.app_state));
        Ok(App::new(dispatcher))
    }

    fn build_views(&self) -> Result<Arc<dyn ViewRenderer>, SetupError> {
        if let Some(renderer) = &self.renderer {
            if self.layout.is_some() {
                return Err(SetupError::LayoutWithCustomRenderer);
            }
            if !self.registry.is_empty() {
                warn!("registered views are ignored when a custom renderer is set");
            }
            return Ok(Arc::clone(renderer));
        }

        if self.registry.is_empty() && self.layout.is_none() {
            return Ok(Arc::new(NoViews));
        }

        let mut views = Views::new(self.registry.clone());
        if let Some(layout) = &self.layout {
            if !views.has_view(layout) {
                return Err(SetupError::LayoutNotFound(layout.clone()));
            }
            views = views.with_layout(layout.clone());
        }
        views.check()?;

        for name in self.registry.names() {
            Symbol::intern(name);
        }

        Ok(Arc::new(views))
    }
}
