//! `selectra replay`: feed a script of actions through a select control
//! and report what every step emitted.
//!
//! The CLI plays the owner of the control: a controlled value is echoed
//! back after each change, and deferred keyboard changes are flushed at
//! the end of every step.

use serde::Serialize;
use tabled::Tabled;
use tokio::sync::mpsc;

use selectra_core::{ChangeEvent, SelectProps, SyncListController, Value};

use crate::cli::ReplayArgs;
use crate::commands::util;
use crate::config::Context;
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct Step {
    step: usize,
    action: &'static str,
    changes: Vec<ChangeEvent>,
    value: Value,
    input_value: String,
    menu_open: bool,
}

#[derive(Tabled)]
struct StepRow {
    #[tabled(rename = "#")]
    step: usize,
    #[tabled(rename = "Action")]
    action: &'static str,
    #[tabled(rename = "Change")]
    change: String,
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Input")]
    input: String,
    #[tabled(rename = "Menu")]
    menu: &'static str,
}

fn value_json(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

fn change_summary(step: &Step) -> String {
    step.changes
        .iter()
        .map(|c| value_json(&c.value))
        .collect::<Vec<_>>()
        .join(" ")
}

fn step_row(step: &Step, color: bool) -> StepRow {
    let source = step
        .changes
        .iter()
        .map(|c| {
            if c.extra.created {
                format!("{} {}", c.extra.source, output::marker("created", color))
            } else {
                c.extra.source.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    StepRow {
        step: step.step,
        action: step.action,
        change: change_summary(step),
        source,
        input: step.input_value.clone(),
        menu: if step.menu_open { "open" } else { "closed" },
    }
}

fn plain_step(step: &Step) -> String {
    format!("{}\t{}\t{}", step.step, step.action, change_summary(step))
}

pub fn handle(args: ReplayArgs, ctx: &Context) -> Result<(), CliError> {
    let list = util::read_list(&args.list.list)?;
    let script = util::read_script(&args.script)?;

    let mut props = if args.multi {
        SelectProps::multi()
    } else {
        SelectProps::single()
    };
    if let Some(raw) = &args.value {
        props = props.with_value(util::parse_value("value", raw)?);
    }
    if let Some(name) = args.name {
        props = props.with_name(name);
    }
    if args.creatable {
        props = props.creatable();
    }
    let controlled = props.value.is_controlled();

    let (tx, mut rx) = mpsc::unbounded_channel();
    let controller = SyncListController::new(props, list, tx, ctx.controller_options());

    let mut steps = Vec::with_capacity(script.len());
    for (index, action) in script.into_iter().enumerate() {
        let name = action.name();
        controller.dispatch(action);
        controller.flush_deferred();

        let changes = util::drain(&mut rx);
        if controlled {
            if let Some(last) = changes.last() {
                controller.set_value(last.value.clone());
            }
        }

        let snapshot = controller.snapshot();
        tracing::debug!(step = index + 1, action = name, changes = changes.len(), "replayed");
        steps.push(Step {
            step: index + 1,
            action: name,
            changes,
            value: controller.value(),
            input_value: snapshot.input_value.clone(),
            menu_open: snapshot.state.is_menu_open,
        });
    }

    let out = output::render_list(ctx.output, &steps, |s| step_row(s, ctx.color), plain_step)?;
    output::print_output(&out, ctx.quiet);
    Ok(())
}
