//! Lanes - localized URL derivation and cache revalidation for a multilingual CMS.

mod cache;
mod cli;
mod config;
mod core;
mod document;
mod engine;
mod generator;
mod link;
mod logger;
mod path;
mod ratelimit;
mod refresh;
mod revalidate;
mod server;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::{SiteConfig, init_config};

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = init_config(SiteConfig::load(&cli)?);

    match &cli.command {
        Commands::Serve { .. } => cli::serve::run_serve(&config),
        Commands::Normalize { raw, home } => cli::path::run_normalize(raw, *home),
        Commands::Expand { path } => cli::path::run_expand(path, &config),
        Commands::Resolve {
            link,
            locale,
            singletons,
        } => cli::resolve::run_resolve(link, locale.as_deref(), singletons.as_deref(), &config),
        Commands::Replay { file, bulk, pretty } => {
            cli::replay::run_replay(file, *bulk, *pretty, &config)
        }
        Commands::Payload {
            id,
            slug,
            category,
            locale,
            publish,
            rename_to,
            unpublish,
            delete,
            pretty,
        } => {
            let steps = cli::payload::Steps {
                publish: *publish,
                rename_to: rename_to.clone(),
                unpublish: *unpublish,
                delete: *delete,
            };
            let args = cli::payload::PayloadArgs {
                id,
                slug,
                category: *category,
                locale: locale.as_deref(),
                steps,
                pretty: *pretty,
            };
            cli::payload::run_payload(args, &config)
        }
        Commands::Refresh { pretty } => cli::refresh::run_refresh(&config, *pretty),
    }
}
