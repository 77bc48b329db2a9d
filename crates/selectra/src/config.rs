//! CLI-side configuration resolution.
//!
//! Loads the shared config (file + `SELECTRA_` env) and layers the global
//! flags on top to produce a [`Context`] for command handlers.

use std::time::Duration;

use clap::ValueEnum;

use selectra_config::{Config, load_config, load_config_from};
use selectra_core::{ControllerOptions, SelectConfig};

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

/// Everything a command handler needs besides its own arguments.
#[derive(Debug)]
pub struct Context {
    pub config: Config,
    pub select: SelectConfig,
    pub output: OutputFormat,
    pub color: bool,
    pub quiet: bool,
}

impl Context {
    pub fn load(global: &GlobalOpts) -> Result<Self, CliError> {
        let config = match &global.config {
            Some(path) => load_config_from(path)?,
            None => load_config()?,
        };

        let output = match global.output {
            Some(format) => format,
            None => parse_setting("defaults.output", &config.defaults.output)?,
        };
        let color_mode = match global.color {
            Some(mode) => mode,
            None => parse_setting::<ColorMode>("defaults.color", &config.defaults.color)?,
        };

        // Batch commands have no keystroke timing, so every query applies
        // immediately.
        let select = SelectConfig {
            debounce: Duration::ZERO,
            ..config.select.to_select_config()
        };
        tracing::debug!(?output, ?select, "resolved CLI configuration");

        Ok(Self {
            config,
            select,
            output,
            color: output::should_color(color_mode),
            quiet: global.quiet,
        })
    }

    pub fn controller_options(&self) -> ControllerOptions {
        ControllerOptions::default().with_config(self.select.clone())
    }
}

fn parse_setting<T: ValueEnum>(field: &str, raw: &str) -> Result<T, CliError> {
    T::from_str(raw, true).map_err(|reason| CliError::Validation {
        field: field.into(),
        reason,
    })
}
