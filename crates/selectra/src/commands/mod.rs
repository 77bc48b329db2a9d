//! Command handlers, one module per subcommand.

pub mod config_cmd;
pub mod replay;
pub mod resolve;
pub mod search;
pub mod util;

use crate::cli::Command;
use crate::config::Context;
use crate::error::CliError;

/// Route an engine command to its handler.
pub fn dispatch(cmd: Command, ctx: &Context) -> Result<(), CliError> {
    match cmd {
        Command::Resolve(args) => resolve::handle(args, ctx),
        Command::Search(args) => search::handle(args, ctx),
        Command::Replay(args) => replay::handle(args, ctx),
        Command::Config(_) | Command::Completions(_) => Err(CliError::Validation {
            field: "command".into(),
            reason: "handled before configuration is loaded".into(),
        }),
    }
}
