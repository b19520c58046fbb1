//! Command-line interface module.

mod args;
pub mod path;
pub mod payload;
pub mod refresh;
pub mod replay;
pub mod resolve;
pub mod serve;

pub use args::{Cli, Commands};

use anyhow::Result;
use serde::Serialize;

/// Print a value as JSON on stdout.
fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let formatted = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", formatted);
    Ok(())
}
