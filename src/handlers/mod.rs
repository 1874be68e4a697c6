//! HTTP handlers for the pessoas resource.

pub mod pessoa;
pub use pessoa::*;
