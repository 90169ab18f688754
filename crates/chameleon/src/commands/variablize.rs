use std::path::PathBuf;

use chameleon_ast::parse::parse_file;
use chameleon_sprite::{Report, Variablizer};

use crate::{
    args::RunCommand,
    config::{Config, Overrides},
    report::Console,
    walk::output,
};

#[derive(clap::Args, Debug)]
/// Replaces the colours and stroke widths of an existing sprite with CSS variables.
pub struct Variablize {
    /// The sprite to variablize
    #[clap(value_parser)]
    pub sprite: PathBuf,
    /// The file to write the result to. Defaults to overwriting the sprite.
    #[clap(long, short)]
    pub output: Option<PathBuf>,
    /// A path to the specified config.
    /// If no config is specified the current config will be printed instead.
    #[clap(long, short, num_args(0..=1))]
    pub config: Option<Vec<PathBuf>>,
    #[clap(flatten)]
    #[allow(missing_docs)]
    pub overrides: Overrides,
}

impl RunCommand for Variablize {
    fn run(self, config: Config) -> anyhow::Result<()> {
        let Some(config) = config.resolve(self.config.as_deref())? else {
            return Ok(());
        };
        let mut console = Console::stderr();
        self.variablize(&config, &mut console)?;
        Ok(())
    }
}

impl Variablize {
    /// Reads the sprite, replaces it's values with variables, and writes the result.
    ///
    /// # Errors
    ///
    /// If the sprite cannot be read or parsed, or the result cannot be written
    pub fn variablize<W: std::io::Write>(
        &self,
        config: &Config,
        console: &mut Console<W>,
    ) -> anyhow::Result<Report> {
        let options = self.overrides.apply(config.options.clone());
        let mut sprite = parse_file(&self.sprite)?;

        let report = Variablizer::new(&options).run_document(&mut sprite);
        output(&sprite, self.output.as_ref().unwrap_or(&self.sprite))?;
        console.injected(&report);
        console.complete();
        Ok(report)
    }
}
