//! Taskboard CLI - run the tracker's web server and inspect its stores.

use clap::Parser;
use std::process;
use taskboard::cli::{Cli, Commands, ConfigCommands};
use taskboard::commands::{
    CheckReport, CommandResult, ConfigReport, ProjectReport, UserReport, VersionInfo,
};
use taskboard::config::{ResolvedConfig, resolve_config};
use taskboard::storage::Storage;

fn main() {
    let cli = Cli::parse();
    let human = cli.human_readable;

    if let Err(e) = run(cli) {
        if human {
            eprintln!("Error: {}", e);
        } else {
            eprintln!("{}", serde_json::json!({ "error": e.to_string() }));
        }
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), taskboard::Error> {
    let human = cli.human_readable;

    if let Commands::Version = cli.command {
        output(&VersionInfo::current(), human);
        return Ok(());
    }

    let config = resolve_config(&cli.overrides())?;
    let _log_guard = taskboard::logging::init(config.log_dir.as_ref().map(|d| d.value.as_path()));

    match cli.command {
        Commands::Serve { .. } => run_server(&config)?,
        Commands::Users => {
            let mut storage = open_storage(&config)?;
            output(&UserReport::collect(&mut storage)?, human);
        }
        Commands::Projects { username } => {
            let mut storage = open_storage(&config)?;
            output(&ProjectReport::collect(&mut storage, &username)?, human);
        }
        Commands::Check => {
            let mut storage = open_storage(&config)?;
            let report = CheckReport::collect(&mut storage)?;
            output(&report, human);
            if !report.is_healthy() {
                process::exit(1);
            }
        }
        Commands::Config {
            command: ConfigCommands::Show,
        } => output(&ConfigReport { config }, human),
        Commands::Version => unreachable!("handled before config resolution"),
    }

    Ok(())
}

/// Print output in JSON or human-readable format.
fn output<T: CommandResult>(result: &T, human: bool) {
    if human {
        println!("{}", result.to_human());
    } else {
        println!("{}", result.to_json());
    }
}

fn open_storage(config: &ResolvedConfig) -> Result<Storage, taskboard::Error> {
    Storage::open(config.data_dir(), config.storage_options())
}

/// Run the web server on a fresh tokio runtime.
fn run_server(config: &ResolvedConfig) -> Result<(), taskboard::Error> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| taskboard::Error::Other(format!("Failed to create runtime: {}", e)))?
        .block_on(async {
            taskboard::gui::start_server(config)
                .await
                .map_err(|e| taskboard::Error::Other(format!("Server error: {}", e)))
        })
}
