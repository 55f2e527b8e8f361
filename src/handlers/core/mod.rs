//! Core handler infrastructure.
//!
//! The handler context, the [`Handler`] trait and the dispatch [`Registry`].

pub mod context;
pub mod registry;

pub use context::{Context, Handler, HandlerError, HandlerResult};
pub use registry::{Registry, RouteKey};
