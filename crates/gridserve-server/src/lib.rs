//! # Gridserve Server
//!
//! HTTP server that renders grid pages through an external template.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod handlers;
pub mod server;
pub mod template;
pub mod view;

pub use server::{AppState, Server, ServerConfig};
pub use template::{GridTemplate, TemplateSource};
