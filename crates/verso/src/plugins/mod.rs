//! Built-in plugins.

pub mod symbol_views;

pub use symbol_views::SymbolViews;

use crate::plugin::Plugin;

/// Looks up a built-in plugin by its configuration name.
pub fn by_name(name: &str) -> Option<Box<dyn Plugin>> {
    match name {
        symbol_views::NAME => Some(Box::new(SymbolViews)),
        _ => None,
    }
}
