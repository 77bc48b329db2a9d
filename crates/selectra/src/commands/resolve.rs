//! `selectra resolve`: look a value up in an option list.

use serde::Serialize;
use tabled::Tabled;
use tokio::sync::mpsc;

use selectra_core::{
    OptionValue, SelectOption, SelectProps, SelectedOptions, SyncListController, Value,
};

use crate::cli::{OutputFormat, ResolveArgs};
use crate::commands::util;
use crate::config::Context;
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct Resolution {
    value: Value,
    selected_options: Option<SelectedOptions>,
    input_value: String,
    orphans: Vec<OptionValue>,
}

#[derive(Tabled)]
pub(crate) struct OptionRow {
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Secondary")]
    secondary: String,
    #[tabled(rename = "Flags")]
    flags: String,
}

pub(crate) fn option_row(option: &SelectOption, color: bool) -> OptionRow {
    let mut flags = Vec::new();
    if option.disabled {
        flags.push("disabled");
    }
    if option.is_orphan_value {
        flags.push("orphan");
    }
    OptionRow {
        value: option.value.to_string(),
        label: option.label.clone(),
        secondary: option.secondary_label.clone().unwrap_or_default(),
        flags: output::marker(&flags.join(","), color),
    }
}

pub(crate) fn plain_option(option: &SelectOption) -> String {
    format!("{}\t{}", option.value, option.label)
}

pub fn handle(args: ResolveArgs, ctx: &Context) -> Result<(), CliError> {
    let list = util::read_list(&args.list.list)?;
    let value = util::parse_value("value", &args.value)?;
    if !args.multi && matches!(value, Value::Many(ref vs) if vs.len() > 1) {
        return Err(CliError::Validation {
            field: "value".into(),
            reason: "a single-select value cannot hold several entries (pass --multi)".into(),
        });
    }

    let props = if args.multi {
        SelectProps::multi()
    } else {
        SelectProps::single()
    }
    .with_value(value);

    // Resolution never emits changes; the receiver only keeps the channel open.
    let (tx, _rx) = mpsc::unbounded_channel();
    let controller = SyncListController::new(props, list, tx, ctx.controller_options());

    let selected = controller.selected_options();
    let options = selected
        .as_ref()
        .map(|s| s.as_slice().to_vec())
        .unwrap_or_default();
    let resolution = Resolution {
        value: controller.value(),
        orphans: options
            .iter()
            .filter(|o| o.is_orphan_value)
            .map(|o| o.value.clone())
            .collect(),
        selected_options: selected,
        input_value: controller.input_value(),
    };

    let out = match ctx.output {
        OutputFormat::Table | OutputFormat::Plain => output::render_list(
            ctx.output,
            &options,
            |o| option_row(o, ctx.color),
            plain_option,
        )?,
        format @ (OutputFormat::Json | OutputFormat::JsonCompact) => {
            output::render_single(format, &resolution, |_| Ok(String::new()))?
        }
    };
    output::print_output(&out, ctx.quiet);
    Ok(())
}
