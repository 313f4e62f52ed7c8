//! Hook system for request processing.
//!
//! Hooks allow you to run custom code at specific points in the dispatch pipeline.
//! They enable cross-cutting concerns (authentication, result rewriting, header
//! injection) without polluting handler logic.
//!
//! # Pipeline Position
//!
//! ```text
//! matched route
//!   → PRE-DISPATCH HOOK ← (auth checks, per-request state)
//!   → route handler
//!   → FINALIZE HOOK ← (rewrite the raw route result, e.g. render symbol views)
//!   → body conversion
//!   → POST-OUTPUT HOOK ← (header injection, response rewriting)
//! ```
//!
//! # Hook Points
//!
//! - Pre-dispatch: Runs before the handler. Can abort the request.
//!
//! - Finalize: Runs after the handler, before the raw [`RouteResult`] becomes a
//!   response body. Receives read-only access to the app's [`ViewRenderer`].
//!   Finalize hooks chain: each sees the output of the one registered before it.
//!
//! - Post-output: Runs after the response is built. Can transform or abort.

use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::dispatch::DispatchError;
use crate::handler::{RequestContext, RouteResult};
use crate::message::{Request, Response};
use crate::render::ViewRenderer;

/// The phase at which a hook error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookPhase {
    /// Error occurred during pre-dispatch phase
    PreDispatch,
    /// Error occurred during finalize phase
    Finalize,
    /// Error occurred during post-output phase
    PostOutput,
}

impl fmt::Display for HookPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookPhase::PreDispatch => write!(f, "pre-dispatch"),
            HookPhase::Finalize => write!(f, "finalize"),
            HookPhase::PostOutput => write!(f, "post-output"),
        }
    }
}

/// Error returned by a hook.
#[derive(Debug, Error)]
#[error("hook error ({phase}): {message}")]
pub struct HookError {
    /// Human-readable error message
    pub message: String,
    /// The hook phase where the error occurred
    pub phase: HookPhase,
    /// The underlying error source, if any
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl HookError {
    /// Creates a new hook error for the pre-dispatch phase.
    pub fn pre_dispatch(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            phase: HookPhase::PreDispatch,
            source: None,
        }
    }

    /// Creates a new hook error for the finalize phase.
    pub fn finalize(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            phase: HookPhase::Finalize,
            source: None,
        }
    }

    /// Creates a new hook error for the post-output phase.
    pub fn post_output(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            phase: HookPhase::PostOutput,
            source: None,
        }
    }

    /// Sets the source error.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        self.source = Some(source.into());
        self
    }
}

/// Type alias for pre-dispatch hook functions.
///
/// Pre-dispatch hooks receive mutable access to [`RequestContext`], allowing them
/// to inject state into `ctx.extensions` that handlers can retrieve.
pub type PreDispatchFn =
    Arc<dyn Fn(&Request, &mut RequestContext) -> Result<(), HookError> + Send + Sync>;

/// Type alias for finalize hook functions.
///
/// Finalize hooks return [`DispatchError`] rather than [`HookError`] so that
/// renderer failures reach the caller as the renderer reported them.
pub type FinalizeFn = Arc<
    dyn Fn(&RequestContext, &dyn ViewRenderer, RouteResult) -> Result<RouteResult, DispatchError>
        + Send
        + Sync,
>;

/// Type alias for post-output hook functions.
pub type PostOutputFn =
    Arc<dyn Fn(&RequestContext, Response) -> Result<Response, HookError> + Send + Sync>;

/// App-wide hook configuration.
///
/// Hooks are executed in registration order.
#[derive(Clone, Default)]
pub struct Hooks {
    pre_dispatch: Vec<PreDispatchFn>,
    finalize: Vec<FinalizeFn>,
    post_output: Vec<PostOutputFn>,
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if no hooks are registered.
    pub fn is_empty(&self) -> bool {
        self.pre_dispatch.is_empty() && self.finalize.is_empty() && self.post_output.is_empty()
    }

    /// Number of registered finalize hooks.
    pub fn finalize_count(&self) -> usize {
        self.finalize.len()
    }

    /// Adds a pre-dispatch hook.
    ///
    /// ```rust
    /// use verso_dispatch::{Hooks, HookError};
    ///
    /// struct ApiToken(String);
    ///
    /// let hooks = Hooks::new().pre_dispatch(|req, ctx| {
    ///     let token = req
    ///         .header("authorization")
    ///         .ok_or_else(|| HookError::pre_dispatch("missing authorization header"))?;
    ///     ctx.extensions.insert(ApiToken(token.to_string()));
    ///     Ok(())
    /// });
    /// ```
    pub fn pre_dispatch<F>(mut self, f: F) -> Self
    where
        F: Fn(&Request, &mut RequestContext) -> Result<(), HookError> + Send + Sync + 'static,
    {
        self.pre_dispatch.push(Arc::new(f));
        self
    }

    /// Adds a finalize hook.
    pub fn finalize<F>(mut self, f: F) -> Self
    where
        F: Fn(&RequestContext, &dyn ViewRenderer, RouteResult) -> Result<RouteResult, DispatchError>
            + Send
            + Sync
            + 'static,
    {
        self.finalize.push(Arc::new(f));
        self
    }

    /// Adds a post-output hook.
    pub fn post_output<F>(mut self, f: F) -> Self
    where
        F: Fn(&RequestContext, Response) -> Result<Response, HookError> + Send + Sync + 'static,
    {
        self.post_output.push(Arc::new(f));
        self
    }

    /// Runs all pre-dispatch hooks. The first error stops the chain.
    pub fn run_pre_dispatch(
        &self,
        req: &Request,
        ctx: &mut RequestContext,
    ) -> Result<(), HookError> {
        for hook in &self.pre_dispatch {
            hook(req, ctx)?;
        }
        Ok(())
    }

    /// Runs all finalize hooks, chaining transformations.
    pub fn run_finalize(
        &self,
        ctx: &RequestContext,
        views: &dyn ViewRenderer,
        result: RouteResult,
    ) -> Result<RouteResult, DispatchError> {
        let mut current = result;
        for hook in &self.finalize {
            current = hook(ctx, views, current)?;
        }
        Ok(current)
    }

    /// Runs all post-output hooks, chaining transformations.
    pub fn run_post_output(
        &self,
        ctx: &RequestContext,
        response: Response,
    ) -> Result<Response, HookError> {
        let mut current = response;
        for hook in &self.post_output {
            current = hook(ctx, current)?;
        }
        Ok(current)
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("pre_dispatch_count", &self.pre_dispatch.len())
            .field("finalize_count", &self.finalize.len())
            .field("post_output_count", &self.post_output.len())
            .finish()
    }
}
