//! Web server for the browser front end.
//!
//! This module provides the JSON API used by the front end and serves its
//! static assets from a directory on disk.

mod error;
mod server;

pub use error::{JsonError, TextError, status_for};
pub use server::{AppState, StaticAssets, build_router, start_server};
