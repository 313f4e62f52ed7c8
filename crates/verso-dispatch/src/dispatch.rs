//! The dispatch pipeline.
//!
//! [`Dispatcher`] ties the router, the hooks and the view renderer together:
//!
//! ```text
//! Request → Router::lookup ─ miss → 404, empty body
//!                          └ hit  → pre-dispatch → handler → finalize → into_response → post-output
//! ```

use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::handler::{Extensions, RequestContext, RouteResult};
use crate::hooks::{HookError, Hooks};
use crate::message::{Request, Response};
use crate::render::{RenderError, ViewRenderer};
use crate::router::Router;

/// Errors surfaced by [`Dispatcher::dispatch`].
///
/// Each variant wraps the failing component's own error untouched.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The route handler returned an error
    #[error(transparent)]
    Handler(anyhow::Error),

    /// A hook aborted the request
    #[error(transparent)]
    Hook(#[from] HookError),

    /// The view renderer failed
    #[error(transparent)]
    Render(#[from] RenderError),
}

impl DispatchError {
    /// Returns the render error, if this is one.
    pub fn as_render(&self) -> Option<&RenderError> {
        match self {
            DispatchError::Render(err) => Some(err),
            _ => None,
        }
    }
}

/// Converts a route result into a response using the default rules.
///
/// Symbols are not meaningful here; a symbol that no finalize hook handled
/// produces the same response as an empty result.
pub fn into_response(result: RouteResult) -> Response {
    match result {
        RouteResult::Text(body) => Response::html(body),
        RouteResult::Json(value) => Response::json(&value),
        RouteResult::Response(response) => response,
        RouteResult::Empty | RouteResult::Symbol(_) => Response::not_found(),
    }
}

/// Routes requests through handlers and hooks.
pub struct Dispatcher {
    router: Router,
    hooks: Hooks,
    views: Arc<dyn ViewRenderer>,
    app_state: Arc<Extensions>,
}

impl Dispatcher {
    pub fn new(
        router: Router,
        hooks: Hooks,
        views: Arc<dyn ViewRenderer>,
        app_state: Arc<Extensions>,
    ) -> Self {
        Self {
            router,
            hooks,
            views,
            app_state,
        }
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn hooks(&self) -> &Hooks {
        &self.hooks
    }

    pub fn views(&self) -> &dyn ViewRenderer {
        self.views.as_ref()
    }

    /// Runs a request through the pipeline.
    ///
    /// An unmatched request is a `404` with an empty body, not an error.
    pub fn dispatch(&self, req: &Request) -> Result<Response, DispatchError> {
        let Some((route, params)) = self.router.lookup(&req.method, req.path()) else {
            debug!(method = %req.method, path = req.path(), "no route matched");
            return Ok(Response::not_found());
        };

        debug!(
            method = %req.method,
            path = req.path(),
            route = %route.pattern(),
            "route matched"
        );

        let mut ctx = RequestContext::new(route.pattern().as_str(), params, self.app_state.clone());
        self.hooks.run_pre_dispatch(req, &mut ctx)?;

        let result = route
            .handler()
            .handle(req, &ctx)
            .map_err(DispatchError::Handler)?;

        let result = self.hooks.run_finalize(&ctx, self.views.as_ref(), result)?;
        let response = into_response(result);

        Ok(self.hooks.run_post_output(&ctx, response)?)
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("routes", &self.router.len())
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}
