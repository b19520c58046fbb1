//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

use crate::core::DocumentCategory;

/// Localized URL derivation and cache revalidation engine
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: lanes.toml)
    #[arg(short = 'C', long, global = true, default_value = "lanes.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Serve the document hook, refresh endpoint and sitemap
    #[command(visible_alias = "s")]
    Serve {
        /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
        #[arg(short, long)]
        interface: Option<std::net::IpAddr>,

        /// Port number to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Normalize a raw path into canonical form
    #[command(visible_alias = "n")]
    Normalize {
        /// Raw path, e.g. `about/` or ` /services/web `
        raw: String,

        /// Normalize on behalf of the home document (allows `/`)
        #[arg(long)]
        home: bool,
    },

    /// Print every localized path of a canonical path
    #[command(visible_alias = "e")]
    Expand {
        /// Canonical path, e.g. `/blog/launch`
        path: String,
    },

    /// Resolve a JSON link descriptor to an href
    #[command(visible_alias = "r")]
    Resolve {
        /// Link descriptor, e.g. `{"type":"singleton","kind":"contact"}`
        link: String,

        /// Render locale (default: the default locale)
        #[arg(short, long)]
        locale: Option<String>,

        /// JSON file with singleton documents to resolve against
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        singletons: Option<PathBuf>,
    },

    /// Print and execute the invalidation plan of recorded hook events
    Replay {
        /// JSON file holding an array of hook payloads
        #[arg(value_hint = clap::ValueHint::FilePath)]
        file: PathBuf,

        /// Collect suppressed events into one bulk flush
        #[arg(short, long)]
        bulk: bool,

        /// Pretty-print JSON output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Build a hook payload from a slug, for use with `replay`
    Payload {
        /// Document id
        id: String,

        /// Slug or title the canonical path is derived from
        slug: String,

        /// Document category (`page`, `post`, `singleton:<kind>`)
        #[arg(short, long, default_value = "page")]
        category: DocumentCategory,

        /// Locale of the snapshot (default: the default locale)
        #[arg(short, long)]
        locale: Option<String>,

        /// Publish the draft
        #[arg(long)]
        publish: bool,

        /// Rename to a new slug, keeping the old state as `previous`
        #[arg(long, value_name = "SLUG")]
        rename_to: Option<String>,

        /// Unpublish after the other steps
        #[arg(long)]
        unpublish: bool,

        /// Emit a delete event instead of a change
        #[arg(long, conflicts_with_all = ["rename_to", "unpublish"])]
        delete: bool,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Re-touch the refresh allow-list once and print the report
    Refresh {
        /// Pretty-print JSON output
        #[arg(short, long)]
        pretty: bool,
    },
}

impl Cli {
    pub const fn is_serve(&self) -> bool {
        matches!(self.command, Commands::Serve { .. })
    }
}
