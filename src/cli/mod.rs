//! CLI argument definitions for Taskboard.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::{ConfigOverrides, Mode};

/// Taskboard - a personal project and task tracker.
///
/// Start the server with `tb serve`, then open the printed address in a browser.
#[derive(Parser, Debug)]
#[command(name = "tb")]
#[command(author, version, about = "A personal project and task tracker with a JSON-file backed web server", long_about = None)]
pub struct Cli {
    /// Output in human-readable format instead of JSON
    #[arg(short = 'H', long = "human", global = true)]
    pub human_readable: bool,

    /// Directory holding the store files and taskboard.kdl.
    /// Can also be set via TB_DATA_DIR.
    #[arg(long = "data-dir", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Config file to read instead of <data-dir>/taskboard.kdl.
    /// Can also be set via TB_CONFIG.
    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Route set exposed by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Accounts, login, projects and tasks
    Full,
    /// Registration and user listing only
    Minimal,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Full => Mode::Full,
            ModeArg::Minimal => Mode::Minimal,
        }
    }
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the web server
    Serve {
        /// Host address to bind to (default: 127.0.0.1, use 0.0.0.0 for network access)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (default: 3000)
        #[arg(short, long)]
        port: Option<u16>,

        /// Route set to expose
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,

        /// Directory of front-end files to serve
        #[arg(long = "static-dir")]
        static_dir: Option<PathBuf>,
    },

    /// List registered usernames
    Users,

    /// List a user's projects
    Projects {
        /// Username whose projects to show
        username: String,
    },

    /// Check that the store files parse
    Check,

    /// Configuration commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Show version and build information
    Version,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the resolved configuration and where each value came from
    Show,
}

impl Cli {
    /// Collect flag values for config resolution.
    pub fn overrides(&self) -> ConfigOverrides {
        let mut overrides = ConfigOverrides {
            data_dir: self.data_dir.clone(),
            config_path: self.config.clone(),
            ..ConfigOverrides::default()
        };
        if let Commands::Serve {
            host,
            port,
            mode,
            static_dir,
        } = &self.command
        {
            overrides.host = host.clone();
            overrides.port = *port;
            overrides.mode = mode.map(Mode::from);
            overrides.static_dir = static_dir.clone();
        }
        overrides
    }
}
