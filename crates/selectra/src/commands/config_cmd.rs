//! Config subcommand handlers.

use selectra_config::{Config, save_config, save_config_to};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::Context;
use crate::error::CliError;
use crate::output;

fn format_config(cfg: &Config) -> Result<String, CliError> {
    toml::to_string_pretty(cfg).map_err(|e| CliError::Render(e.to_string()))
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let path = global
        .config
        .clone()
        .unwrap_or_else(selectra_config::config_path);

    match args.command {
        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            output::print_output(&path.display().to_string(), global.quiet);
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let ctx = Context::load(global)?;
            let out = output::render_single(ctx.output, &ctx.config, format_config)?;
            output::print_output(&out, ctx.quiet);
            Ok(())
        }

        // ── Init ────────────────────────────────────────────────────
        ConfigCommand::Init { force } => {
            if path.exists() && !force {
                return Err(CliError::ConfigExists {
                    path: path.display().to_string(),
                });
            }
            let cfg = Config::default();
            let written = match &global.config {
                Some(explicit) => {
                    save_config_to(&cfg, explicit)?;
                    explicit.clone()
                }
                None => save_config(&cfg)?,
            };
            tracing::info!(path = %written.display(), "config written");
            if !global.quiet {
                eprintln!("Wrote {}", written.display());
            }
            Ok(())
        }
    }
}
