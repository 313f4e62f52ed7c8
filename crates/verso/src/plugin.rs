//! Plugin registration.
//!
//! A plugin is a named bundle of hooks. Installing one hands it the app's
//! [`Hooks`] and takes back the extended set; the builder remembers plugin
//! names so installing the same plugin twice is a no-op.

use verso_dispatch::Hooks;

/// An app extension that registers hooks.
///
/// ```rust
/// use verso::{Plugin, Hooks};
///
/// struct PoweredBy;
///
/// impl Plugin for PoweredBy {
///     fn name(&self) -> &'static str {
///         "powered_by"
///     }
///
///     fn install(&self, hooks: Hooks) -> Hooks {
///         hooks.post_output(|_ctx, res| Ok(res.with_header("x-powered-by", "verso")))
///     }
/// }
/// ```
pub trait Plugin: Send + Sync {
    /// Unique name, also used to enable the plugin from configuration.
    fn name(&self) -> &'static str;

    fn install(&self, hooks: Hooks) -> Hooks;
}
