//! The built application.

use std::fmt;

use tracing::error;
use verso_dispatch::{DispatchError, Dispatcher, Request, Response};

use crate::builder::AppBuilder;

/// A configured app: routes, hooks and views, ready to answer requests.
///
/// `App` is `Send + Sync`; one instance can serve requests from any number
/// of threads.
pub struct App {
    dispatcher: Dispatcher,
}

impl App {
    pub fn builder() -> AppBuilder {
        AppBuilder::new()
    }

    pub(crate) fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// Handles a request, surfacing handler, hook and render failures.
    pub fn dispatch(&self, req: &Request) -> Result<Response, DispatchError> {
        self.dispatcher.dispatch(req)
    }

    /// Handles a request the way a server would: failures are logged and
    /// answered with an empty `500`.
    pub fn call(&self, req: &Request) -> Response {
        match self.dispatch(req) {
            Ok(response) => response,
            Err(err) => {
                error!(method = %req.method, path = req.path(), error = %err, "request failed");
                Response::internal_error()
            }
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("dispatcher", &self.dispatcher)
            .finish()
    }
}
