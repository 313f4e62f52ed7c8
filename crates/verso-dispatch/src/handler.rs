//! Route handler types.
//!
//! This module provides the core types for building route handlers - the
//! application layer of the dispatch pipeline.
//!
//! Handlers receive the [`Request`] and a [`RequestContext`] and produce a
//! [`RouteResult`]: the raw value the route evaluated to. They do not build
//! response bodies themselves unless they want to; turning a result into a
//! [`Response`] is the pipeline's job, and finalize hooks get to rewrite the
//! result before that happens.
//!
//! # State Management: App State vs Extensions
//!
//! | Field | Mutability | Lifetime | Purpose |
//! |-------|------------|----------|---------|
//! | `app_state` | Immutable (`&`) | App lifetime (shared via Arc) | Database, Config, API clients |
//! | `extensions` | Mutable (`&mut`) | Request lifetime | Per-request state, current user |
//!
//! # Core Types
//!
//! - [`RequestContext`]: Route and state information passed to handlers
//! - [`Extensions`]: Type-safe container for injecting custom state
//! - [`RouteResult`]: What a handler produces
//! - [`HandlerResult`]: The result type for handlers (`Result<RouteResult, Error>`)
//! - [`Handler`]: Trait for route handlers

use crate::message::{Request, Response};
use crate::symbol::Symbol;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Type-safe container for injecting custom state into handlers.
///
/// Cloning an `Extensions` yields an empty container, since the boxed values
/// cannot be cloned generically. Share state through `Arc<T>` instead.
///
/// ```rust
/// use verso_dispatch::Extensions;
///
/// struct CurrentUser { id: u64 }
///
/// let mut ext = Extensions::new();
/// ext.insert(CurrentUser { id: 7 });
/// assert_eq!(ext.get_required::<CurrentUser>()?.id, 7);
/// # Ok::<(), anyhow::Error>(())
/// ```
#[derive(Default)]
pub struct Extensions {
    map: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl Extensions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, returning the previous value of the same type.
    pub fn insert<T: Send + Sync + 'static>(&mut self, val: T) -> Option<T> {
        self.map
            .insert(TypeId::of::<T>(), Box::new(val))
            .and_then(|boxed| boxed.downcast().ok().map(|b| *b))
    }

    pub fn get<T: 'static>(&self) -> Option<&T> {
        self.map
            .get(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_ref())
    }

    pub fn get_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.map
            .get_mut(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_mut())
    }

    /// Gets a value of the specified type, or an error naming the missing type.
    pub fn get_required<T: 'static>(&self) -> Result<&T, anyhow::Error> {
        self.get::<T>().ok_or_else(|| {
            anyhow::anyhow!(
                "Extension missing: type {} not found in context",
                std::any::type_name::<T>()
            )
        })
    }

    pub fn remove<T: 'static>(&mut self) -> Option<T> {
        self.map
            .remove(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast().ok().map(|b| *b))
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.map.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl fmt::Debug for Extensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extensions")
            .field("len", &self.map.len())
            .finish_non_exhaustive()
    }
}

impl Clone for Extensions {
    fn clone(&self) -> Self {
        Self::new()
    }
}

/// Context passed to route handlers and hooks.
#[derive(Debug)]
pub struct RequestContext {
    /// The pattern of the matched route (e.g. `/users/:id`).
    pub route: String,

    /// Values captured by `:name` segments of the route pattern.
    pub params: HashMap<String, String>,

    /// Immutable app-level state shared across all requests.
    pub app_state: Arc<Extensions>,

    /// Mutable per-request state. Pre-dispatch hooks insert, handlers read.
    pub extensions: Extensions,
}

impl RequestContext {
    pub fn new(
        route: impl Into<String>,
        params: HashMap<String, String>,
        app_state: Arc<Extensions>,
    ) -> Self {
        Self {
            route: route.into(),
            params,
            app_state,
            extensions: Extensions::new(),
        }
    }

    /// Returns a captured route parameter.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Returns a captured route parameter, or an error naming it.
    pub fn param_required(&self, name: &str) -> Result<&str, anyhow::Error> {
        self.param(name)
            .ok_or_else(|| anyhow::anyhow!("route parameter `{}` not captured", name))
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new(String::new(), HashMap::new(), Arc::new(Extensions::new()))
    }
}

/// The raw value a route handler evaluated to.
///
/// Finalize hooks see this value before it becomes a response body. The
/// default conversion (see [`into_response`](crate::into_response)) is:
///
/// | Variant | Response |
/// |---------|----------|
/// | `Text` | 200, HTML content type, the text as body |
/// | `Json` | 200, JSON content type, serialized value |
/// | `Response` | unchanged |
/// | `Empty` | 404, empty body |
/// | `Symbol` | 404, empty body, unless a finalize hook converted it |
#[derive(Debug, Clone, PartialEq)]
pub enum RouteResult {
    /// A symbolic name. The pipeline does not know what it means on its own.
    Symbol(Symbol),
    /// Text to be used as the response body.
    Text(String),
    /// Structured data to be serialized as JSON.
    Json(serde_json::Value),
    /// A fully built response.
    Response(Response),
    /// The route produced nothing.
    Empty,
}

impl RouteResult {
    pub fn is_symbol(&self) -> bool {
        matches!(self, RouteResult::Symbol(_))
    }

    pub fn is_text(&self) -> bool {
        matches!(self, RouteResult::Text(_))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, RouteResult::Empty)
    }

    pub fn as_symbol(&self) -> Option<Symbol> {
        match self {
            RouteResult::Symbol(sym) => Some(*sym),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            RouteResult::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Conversion of handler return values into a [`RouteResult`].
pub trait IntoRouteResult {
    fn into_route_result(self) -> RouteResult;
}

impl IntoRouteResult for RouteResult {
    fn into_route_result(self) -> RouteResult {
        self
    }
}

impl IntoRouteResult for Symbol {
    fn into_route_result(self) -> RouteResult {
        RouteResult::Symbol(self)
    }
}

impl IntoRouteResult for String {
    fn into_route_result(self) -> RouteResult {
        RouteResult::Text(self)
    }
}

impl IntoRouteResult for &str {
    fn into_route_result(self) -> RouteResult {
        RouteResult::Text(self.to_string())
    }
}

impl IntoRouteResult for serde_json::Value {
    fn into_route_result(self) -> RouteResult {
        RouteResult::Json(self)
    }
}

impl IntoRouteResult for Response {
    fn into_route_result(self) -> RouteResult {
        RouteResult::Response(self)
    }
}

impl IntoRouteResult for () {
    fn into_route_result(self) -> RouteResult {
        RouteResult::Empty
    }
}

impl<T: IntoRouteResult> IntoRouteResult for Option<T> {
    fn into_route_result(self) -> RouteResult {
        match self {
            Some(value) => value.into_route_result(),
            None => RouteResult::Empty,
        }
    }
}

/// The result type for route handlers.
pub type HandlerResult = Result<RouteResult, anyhow::Error>;

/// Trait for types that can be converted into a [`HandlerResult`].
///
/// Handlers return `Result<T, E>` where `T` is anything that converts into a
/// [`RouteResult`] and `E` converts into [`anyhow::Error`].
///
/// ```rust
/// use verso_dispatch::{IntoHandlerResult, RouteResult, Symbol};
///
/// let result = Ok::<_, anyhow::Error>(Symbol::intern("index")).into_handler_result();
/// assert!(matches!(result, Ok(RouteResult::Symbol(_))));
///
/// let result = Ok::<_, anyhow::Error>("hello").into_handler_result();
/// assert_eq!(result.unwrap().as_text(), Some("hello"));
/// ```
pub trait IntoHandlerResult {
    fn into_handler_result(self) -> HandlerResult;
}

impl<T, E> IntoHandlerResult for Result<T, E>
where
    T: IntoRouteResult,
    E: Into<anyhow::Error>,
{
    fn into_handler_result(self) -> HandlerResult {
        self.map(IntoRouteResult::into_route_result)
            .map_err(Into::into)
    }
}

/// Trait for route handlers.
///
/// Handlers are shared across requests, so they take `&self` and must be
/// `Send + Sync`. Use interior mutability for counters and caches.
///
/// ```rust
/// use verso_dispatch::{Handler, HandlerResult, Request, RequestContext, RouteResult};
///
/// struct Greeter { greeting: String }
///
/// impl Handler for Greeter {
///     fn handle(&self, _req: &Request, ctx: &RequestContext) -> HandlerResult {
///         let name = ctx.param_required("name")?;
///         Ok(RouteResult::Text(format!("{}, {}!", self.greeting, name)))
///     }
/// }
/// ```
pub trait Handler: Send + Sync {
    fn handle(&self, req: &Request, ctx: &RequestContext) -> HandlerResult;
}

/// A [`Handler`] backed by a closure.
pub struct FnHandler<F, R> {
    f: F,
    _phantom: std::marker::PhantomData<fn() -> R>,
}

impl<F, R> FnHandler<F, R>
where
    F: Fn(&Request, &RequestContext) -> R + Send + Sync,
    R: IntoHandlerResult,
{
    pub fn new(f: F) -> Self {
        Self {
            f,
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<F, R> Handler for FnHandler<F, R>
where
    F: Fn(&Request, &RequestContext) -> R + Send + Sync,
    R: IntoHandlerResult,
{
    fn handle(&self, req: &Request, ctx: &RequestContext) -> HandlerResult {
        (self.f)(req, ctx).into_handler_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_context_default() {
        let ctx = RequestContext::default();
        assert!(ctx.route.is_empty());
        assert!(ctx.params.is_empty());
        assert!(ctx.extensions.is_empty());
        assert!(ctx.app_state.is_empty());
    }

    #[test]
    fn test_request_context_params() {
        let mut params = HashMap::new();
        params.insert("id".to_string(), "42".to_string());
        let ctx = RequestContext::new("/users/:id", params, Arc::new(Extensions::new()));

        assert_eq!(ctx.param("id"), Some("42"));
        assert_eq!(ctx.param("missing"), None);
        assert!(ctx
            .param_required("missing")
            .unwrap_err()
            .to_string()
            .contains("`missing`"));
    }

    #[test]
    fn test_request_context_with_app_state() {
        struct Database {
            url: String,
        }

        let mut app_state = Extensions::new();
        app_state.insert(Database {
            url: "sqlite::memory:".into(),
        });
        let app_state = Arc::new(app_state);

        let ctx = RequestContext::new("/", HashMap::new(), app_state.clone());
        assert_eq!(
            ctx.app_state.get::<Database>().unwrap().url,
            "sqlite::memory:"
        );
        assert_eq!(Arc::strong_count(&app_state), 2);
    }

    #[test]
    fn test_extensions_insert_replace_remove() {
        struct Value(i32);

        let mut ext = Extensions::new();
        assert!(ext.insert(Value(1)).is_none());
        assert_eq!(ext.insert(Value(2)).unwrap().0, 1);
        assert_eq!(ext.get::<Value>().unwrap().0, 2);
        assert!(ext.contains::<Value>());

        ext.get_mut::<Value>().unwrap().0 += 1;
        assert_eq!(ext.remove::<Value>().unwrap().0, 3);
        assert!(ext.is_empty());
    }

    #[test]
    fn test_extensions_get_required_missing() {
        #[derive(Debug)]
        struct Missing;
        let ext = Extensions::new();
        let err = ext.get_required::<Missing>().unwrap_err();
        assert!(err.to_string().contains("Extension missing: type"));
    }

    #[test]
    fn test_extensions_clone_is_empty() {
        struct Data;
        let mut original = Extensions::new();
        original.insert(Data);
        assert!(original.clone().is_empty());
        assert_eq!(original.len(), 1);
    }

    #[test]
    fn test_route_result_accessors() {
        let sym = RouteResult::Symbol(Symbol::intern("index"));
        assert!(sym.is_symbol());
        assert_eq!(sym.as_symbol(), Some(Symbol::intern("index")));
        assert_eq!(sym.as_text(), None);

        let text = RouteResult::Text("index".into());
        assert!(text.is_text());
        assert!(!text.is_symbol());
        assert_eq!(text.as_symbol(), None);

        assert!(RouteResult::Empty.is_empty());
    }

    #[test]
    fn test_into_route_result_conversions() {
        assert_eq!(
            Symbol::intern("s").into_route_result(),
            RouteResult::Symbol(Symbol::intern("s"))
        );
        assert_eq!(
            "s".into_route_result(),
            RouteResult::Text("s".to_string())
        );
        assert_eq!(
            json!([1, 2]).into_route_result(),
            RouteResult::Json(json!([1, 2]))
        );
        assert_eq!(().into_route_result(), RouteResult::Empty);
        assert_eq!(None::<String>.into_route_result(), RouteResult::Empty);
        assert_eq!(
            Some("x").into_route_result(),
            RouteResult::Text("x".to_string())
        );
        assert_eq!(
            Response::not_found().into_route_result(),
            RouteResult::Response(Response::not_found())
        );
    }

    #[test]
    fn test_into_handler_result_error() {
        let result: Result<String, anyhow::Error> = Err(anyhow::anyhow!("boom"));
        let err = result.into_handler_result().unwrap_err();
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn test_fn_handler_uses_params() {
        let handler = FnHandler::new(|_req: &Request, ctx: &RequestContext| {
            let id = ctx.param_required("id")?;
            Ok::<_, anyhow::Error>(format!("user {}", id))
        });

        let mut params = HashMap::new();
        params.insert("id".to_string(), "7".to_string());
        let ctx = RequestContext::new("/users/:id", params, Arc::new(Extensions::new()));

        let result = handler.handle(&Request::get("/users/7"), &ctx).unwrap();
        assert_eq!(result, RouteResult::Text("user 7".into()));
    }

    #[test]
    fn test_fn_handler_with_custom_error_type() {
        #[derive(Debug)]
        struct CustomError(String);

        impl fmt::Display for CustomError {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "CustomError: {}", self.0)
            }
        }

        impl std::error::Error for CustomError {}

        let handler = FnHandler::new(|_req: &Request, _ctx: &RequestContext| {
            Err::<String, _>(CustomError("oops".into()))
        });

        let err = handler
            .handle(&Request::get("/"), &RequestContext::default())
            .unwrap_err();
        assert!(err.to_string().contains("CustomError: oops"));
        assert!(err.downcast_ref::<CustomError>().is_some());
    }
}
