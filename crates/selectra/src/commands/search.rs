//! `selectra search`: filter an option list the way the dropdown does.

use tokio::sync::mpsc;

use selectra_core::{Action, SelectProps, SyncListController};

use crate::cli::SearchArgs;
use crate::commands::resolve::{option_row, plain_option};
use crate::commands::util;
use crate::config::Context;
use crate::error::CliError;
use crate::output;

pub fn handle(args: SearchArgs, ctx: &Context) -> Result<(), CliError> {
    let list = util::read_list(&args.list.list)?;

    let (tx, _rx) = mpsc::unbounded_channel();
    let controller =
        SyncListController::new(SelectProps::multi(), list, tx, ctx.controller_options());
    controller.dispatch(Action::InputTextChange { text: args.query });

    let matches = controller.filtered_list();
    tracing::debug!(matches = matches.len(), "search complete");

    let out = output::render_list(
        ctx.output,
        &matches[..],
        |o| option_row(o, ctx.color),
        plain_option,
    )?;
    output::print_output(&out, ctx.quiet);
    Ok(())
}
