//! Configuration for the Taskboard server.
//!
//! Settings come from `taskboard.kdl` in the data directory (or the file
//! named by `--config` / `TB_CONFIG`), `TB_*` environment variables and CLI
//! flags. Use the [`resolver`] module for precedence resolution.

pub mod resolver;
pub mod schema;

pub use resolver::{
    CONFIG_FILE_NAME, ConfigOverrides, DEFAULT_PORT, Resolved, ResolvedConfig, ValueSource,
    resolve_config, resolve_config_with_env,
};
pub use schema::{Mode, TaskboardConfig};
