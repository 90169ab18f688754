//! The command line interface of chameleon
use clap::{Parser, Subcommand};

use crate::{
    commands::{Create, Variablize},
    config::Config,
};

/// A subcommand which can be run with the loaded configuration
pub trait RunCommand {
    /// # Errors
    ///
    /// If any part of the lifecycle fails
    /// * Fails to find, read, or parse any files
    /// * Fails to write or serialize the sprite
    fn run(self, config: Config) -> anyhow::Result<()>;
}

#[derive(Parser)]
#[clap(
    bin_name = "chameleon",
    name = "chameleon",
    author,
    version,
    about = "Adaptable SVG sprites, restyled with CSS variables",
    long_about = None
)]
pub struct Args {
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
/// Each subcommand of chameleon
pub enum Command {
    /// Create a sprite from a directory of SVG icons
    Create(Create),
    /// Replace the colours and stroke widths of an existing sprite with CSS variables
    #[clap(alias = "variablise")]
    Variablize(Variablize),
}
