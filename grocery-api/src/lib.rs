//! Grocery back office: catalog, a single global cart, checkout into
//! immutable transactions, and a scan-to-cart shortcut, served as JSON
//! over HTTP.

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod logging;
pub mod middleware;
pub mod response;
pub mod server;

pub use config::Config;
pub use error::{AppError, ErrorCode};
pub use server::{create_app, AppState};
