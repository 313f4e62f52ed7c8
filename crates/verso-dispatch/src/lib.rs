//! Request routing and response hooks for the verso micro-framework.
//!
//! `verso-dispatch` provides routing, handler execution and the hook system.
//! It's designed to work with any view renderer (or none at all): it only
//! knows the [`ViewRenderer`] contract.
//!
//! # Features
//!
//! - **Routing**: literal and `:param` path patterns, first match wins
//! - **Handler traits**: closures or structs producing a [`RouteResult`]
//! - **Hook system**: pre-dispatch, finalize and post-output hooks
//! - **Symbols**: interned atomic names that handlers return to name views
//!
//! # Usage Without the App Shell
//!
//! ```rust
//! use std::sync::Arc;
//! use verso_dispatch::{
//!     from_fn, Dispatcher, Extensions, FnHandler, Hooks, Method, Request, RequestContext,
//!     RouteResult, Router,
//! };
//!
//! let mut router = Router::new();
//! router.add(
//!     Method::GET,
//!     "/",
//!     Arc::new(FnHandler::new(|_: &Request, _: &RequestContext| {
//!         Ok::<_, anyhow::Error>("hello")
//!     })),
//! );
//!
//! let dispatcher = Dispatcher::new(
//!     router,
//!     Hooks::new(),
//!     Arc::new(from_fn(|view| Ok(view.to_string()))),
//!     Arc::new(Extensions::new()),
//! );
//!
//! let response = dispatcher.dispatch(&Request::get("/"))?;
//! assert_eq!(response.body, "hello");
//! # Ok::<(), verso_dispatch::DispatchError>(())
//! ```

mod dispatch;
mod handler;
mod hooks;
mod message;
mod render;
mod router;
mod symbol;

pub use dispatch::{into_response, DispatchError, Dispatcher};

pub use handler::{
    Extensions, FnHandler, Handler, HandlerResult, IntoHandlerResult, IntoRouteResult,
    RequestContext, RouteResult,
};

pub use hooks::{FinalizeFn, HookError, HookPhase, Hooks, PostOutputFn, PreDispatchFn};

pub use message::{Request, Response, APPLICATION_JSON, TEXT_HTML};

pub use http::{header, HeaderMap, HeaderValue, Method, StatusCode, Uri};

pub use render::{from_fn, FnRenderer, NoViews, RenderError, ViewRenderer};

pub use router::{Route, RoutePattern, Router};

pub use symbol::Symbol;
