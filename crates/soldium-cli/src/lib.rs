#![forbid(unsafe_code)]
//! `soldium` operator CLI. This is the only channel that flips the admin flag
//! on a `users` document.

mod commands;

use clap::{error::ErrorKind, Parser, Subcommand, ValueEnum};
use soldium_core::{ExitCode, MachineError};
use soldium_query::StatusFilter;
use std::path::PathBuf;
use std::process::ExitCode as ProcessExitCode;

pub const CRATE_NAME: &str = "soldium-cli";

#[derive(Parser)]
#[command(name = "soldium")]
#[command(about = "Soldium presale operations CLI")]
#[command(
    after_help = "Environment:\n  SOLDIUM_STORE   sqlite:<path> of the durable store when --store is omitted"
)]
struct Cli {
    #[arg(long, global = true, default_value_t = false)]
    json: bool,
    /// SQLite store file.
    #[arg(long, global = true)]
    store: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Grant or revoke the admin flag of an existing account.
    Admin {
        #[command(subcommand)]
        command: AdminCommand,
    },
    Entries {
        #[command(subcommand)]
        command: EntriesCommand,
    },
    Settings {
        #[command(subcommand)]
        command: SettingsCommand,
    },
    /// Time remaining to the next burn.
    Countdown {
        /// Evaluate at this instant instead of now (RFC 3339).
        #[arg(long)]
        at: Option<String>,
    },
    Version,
}

#[derive(Subcommand)]
enum AdminCommand {
    Grant { user_id: String },
    Revoke { user_id: String },
}

#[derive(Subcommand)]
enum EntriesCommand {
    List {
        #[arg(long, value_enum, default_value_t = StatusArg::All)]
        status: StatusArg,
    },
    Stats,
}

#[derive(Subcommand)]
enum SettingsCommand {
    Show,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StatusArg {
    All,
    Pending,
    Verified,
    Rejected,
}

impl From<StatusArg> for StatusFilter {
    fn from(value: StatusArg) -> Self {
        match value {
            StatusArg::All => Self::All,
            StatusArg::Pending => Self::Pending,
            StatusArg::Verified => Self::Verified,
            StatusArg::Rejected => Self::Rejected,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct OutputMode {
    pub json: bool,
}

#[derive(Debug)]
pub(crate) struct CliError {
    pub exit_code: ExitCode,
    pub machine: MachineError,
}

impl CliError {
    pub(crate) fn usage(message: &str) -> Self {
        Self {
            exit_code: ExitCode::Usage,
            machine: MachineError::new("usage_error", message),
        }
    }

    pub(crate) fn validation(message: &str) -> Self {
        Self {
            exit_code: ExitCode::Validation,
            machine: MachineError::new("validation_error", message),
        }
    }

    pub(crate) fn internal(message: String) -> Self {
        Self {
            exit_code: ExitCode::Internal,
            machine: MachineError::new("internal_error", &message),
        }
    }

    pub(crate) fn dependency(message: String) -> Self {
        Self {
            exit_code: ExitCode::DependencyFailure,
            machine: MachineError::new("dependency_failure", &message),
        }
    }
}

pub fn main_entry() -> ProcessExitCode {
    let wants_json = std::env::args().any(|arg| arg == "--json");
    match run() {
        Ok(()) => ProcessExitCode::from(ExitCode::Success as u8),
        Err(err) => {
            emit_error(&err, wants_json);
            ProcessExitCode::from(err.exit_code as u8)
        }
    }
}

fn run() -> Result<(), CliError> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                print!("{err}");
                return Ok(());
            }
            _ => {
                return Err(CliError {
                    exit_code: ExitCode::Usage,
                    machine: MachineError::new("usage_error", "invalid command line arguments")
                        .with_detail("error", &err.to_string()),
                });
            }
        },
    };
    let output_mode = OutputMode { json: cli.json };
    let command = cli
        .command
        .ok_or_else(|| CliError::usage("missing command; see --help"))?;

    match command {
        Commands::Version => commands::version(output_mode),
        Commands::Admin { command } => {
            let store = commands::open_store(cli.store)?;
            match command {
                AdminCommand::Grant { user_id } => {
                    commands::set_admin(&store, &user_id, true, output_mode)
                }
                AdminCommand::Revoke { user_id } => {
                    commands::set_admin(&store, &user_id, false, output_mode)
                }
            }
        }
        Commands::Entries { command } => {
            let store = commands::open_store(cli.store)?;
            match command {
                EntriesCommand::List { status } => {
                    commands::list_entries(&store, status.into(), output_mode)
                }
                EntriesCommand::Stats => commands::entry_stats(&store, output_mode),
            }
        }
        Commands::Settings {
            command: SettingsCommand::Show,
        } => {
            let store = commands::open_store(cli.store)?;
            commands::show_settings(&store, output_mode)
        }
        Commands::Countdown { at } => {
            let store = commands::open_store(cli.store)?;
            commands::countdown(&store, at.as_deref(), output_mode)
        }
    }
}

fn emit_error(error: &CliError, machine_json: bool) {
    if machine_json {
        match serde_json::to_string(&error.machine) {
            Ok(payload) => eprintln!("{payload}"),
            Err(_) => eprintln!(
                "{{\"code\":\"internal_error\",\"message\":\"failed to encode structured error\",\"details\":{{}}}}"
            ),
        }
    } else {
        eprintln!("{}", error.machine.message);
    }
}
