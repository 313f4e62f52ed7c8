//! # verso - a routing micro-framework with symbol views
//!
//! verso routes requests to handlers and turns what they return into
//! responses. It provides:
//!
//! - Literal and `:param` routes with closure or struct handlers
//! - Pre-dispatch, finalize and post-output hooks
//! - Named views compiled with MiniJinja, from inline strings or view directories
//! - Plugins, including [`SymbolViews`], which lets a handler answer with
//!   the name of a view
//! - YAML configuration and `tracing` based logging
//!
//! ## Quick Start
//!
//! ```rust
//! use verso::{App, Request, StatusCode, Symbol, SymbolViews};
//!
//! let app = App::builder()
//!     .plugin(SymbolViews)
//!     .inline_view("index", "<h1>Welcome</h1>")
//!     .inline_view("layout", "<body>{{ content }}</body>")
//!     .layout("layout")
//!     .get("/", |_, _| Ok::<_, anyhow::Error>(Symbol::intern("index")))
//!     .get("/hello/:name", |_, ctx| {
//!         Ok::<_, anyhow::Error>(format!("hello {}", ctx.param_required("name")?))
//!     })
//!     .build()?;
//!
//! assert_eq!(app.call(&Request::get("/")).body, "<body><h1>Welcome</h1></body>");
//! assert_eq!(app.call(&Request::get("/hello/ana")).body, "hello ana");
//! assert_eq!(app.call(&Request::get("/missing")).status, StatusCode::NOT_FOUND);
//! # Ok::<(), verso::SetupError>(())
//! ```
//!
//! ## What handlers return
//!
//! | Handler value        | Response                                   |
//! |----------------------|--------------------------------------------|
//! | `String` / `&str`    | `200`, HTML body                           |
//! | `serde_json::Value`  | `200`, JSON body                           |
//! | `Response`           | sent as is                                 |
//! | `()` / `None`        | `404`, empty body                          |
//! | `Symbol`             | rendered view with [`SymbolViews`], else `404` |
//!
//! ## Crates
//!
//! - `verso-dispatch`: routing, handlers, hooks and the [`ViewRenderer`] contract
//! - `verso-render`: MiniJinja views
//! - `verso`: this crate, the app builder, config and plugins

mod app;
mod builder;
pub mod config;
pub mod logging;
mod plugin;
pub mod plugins;
mod setup;

pub use app::App;
pub use builder::AppBuilder;
pub use config::{AppConfig, ViewsConfig};
pub use plugin::Plugin;
pub use plugins::SymbolViews;
pub use setup::{ConfigError, SetupError};

pub use verso_dispatch::{
    from_fn, header, into_response, DispatchError, Extensions, FnRenderer, Handler,
    HandlerResult, HeaderMap, HeaderValue, HookError, HookPhase, Hooks, IntoRouteResult, Method,
    NoViews, RenderError, Request, RequestContext, Response, RouteResult, StatusCode, Symbol, Uri,
    ViewRenderer,
};

pub use verso_render::{ViewRegistry, Views};
