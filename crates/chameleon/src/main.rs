//! Chameleon creates SVG sprites where the colours and stroke widths of each icon can be
//! restyled with CSS variables.

use chameleon::{
    args::{Args, Command, RunCommand},
    config::Config,
};
use clap::Parser;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = Config::load()?;

    match args.command {
        Command::Create(args) => args.run(config)?,
        Command::Variablize(args) => args.run(config)?,
    }
    Ok(())
}
