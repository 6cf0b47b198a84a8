//! PDF render service library
//!
//! Renders HTML to PDF through an external `wkhtmltopdf` process, keeping the
//! intermediate artifacts in a cache directory that is swept periodically.

pub mod config;
pub mod error;
pub mod options;
pub mod render;
pub mod renderer;
pub mod server;
pub mod types;

#[cfg(test)]
mod testing;

pub use config::ServiceConfig;
pub use error::{GenerateError, Result, ServiceError};
pub use options::{Orientation, RenderOptions};
pub use render::{RenderService, RenderedPdf};
pub use renderer::{RenderError, Runner, WkhtmltopdfRunner};
pub use server::{create_router, start_server, ServerState, SharedState};
