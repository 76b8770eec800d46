//! Line-oriented shell over the income and expense ledgers.

pub mod commands;
mod context;
mod error;
pub mod output;
mod registry;
mod shell;

pub use context::{CliMode, LoopControl, ShellContext};
pub use error::{CliError, CommandError, CommandResult};
pub use registry::{CommandEntry, CommandHandler, CommandRegistry};
pub use shell::{parse_command_line, run_cli};
