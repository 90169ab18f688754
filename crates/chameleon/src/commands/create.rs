use std::path::{Path, PathBuf};

use anyhow::anyhow;
use chameleon_sprite::{Composer, Icon, Options, Report, Variablizer};

use crate::{
    args::RunCommand,
    config::{Config, Overrides},
    report::Console,
    walk::{output, Walk},
};

#[derive(clap::Args, Debug)]
/// Creates a sprite from the SVG documents of a directory and replaces its colours and stroke
/// widths with CSS variables.
pub struct Create {
    /// The directory containing the icons. Defaults to the configured path, or the current
    /// directory.
    #[clap(value_parser)]
    pub path: Option<PathBuf>,
    /// The directory, relative to the path, to write the sprite to
    #[clap(long, short)]
    pub subfolder: Option<String>,
    /// The file name of the sprite, without the `.svg` extension
    #[clap(long, short)]
    pub name: Option<String>,
    /// A path to the specified config.
    /// If no config is specified the current config will be printed instead.
    #[clap(long, short, num_args(0..=1))]
    pub config: Option<Vec<PathBuf>>,
    /// Whether to walk through the subdirectories of the path for more icons
    #[clap(long, short, default_value = "false")]
    pub recursive: bool,
    /// Search through hidden files and directories
    #[clap(long, short = '.', default_value = "false")]
    pub hidden: bool,
    /// Include files that would be excluded by `.gitignore` or `.ignore` files
    #[clap(long, default_value = "false")]
    pub no_ignore: bool,
    #[clap(flatten)]
    #[allow(missing_docs)]
    pub overrides: Overrides,
}

impl RunCommand for Create {
    fn run(self, config: Config) -> anyhow::Result<()> {
        let Some(config) = config.resolve(self.config.as_deref())? else {
            return Ok(());
        };
        let options = self.options(config.options);
        let mut console = Console::stderr();
        self.create(&options, &mut console)?;
        Ok(())
    }
}

impl Create {
    /// Merges the flags given to the command over the configured options
    pub fn options(&self, options: Options) -> Options {
        let mut options = self.overrides.apply(options);
        if let Some(path) = &self.path {
            options.path.clone_from(path);
        }
        if let Some(subfolder) = &self.subfolder {
            options.subfolder.clone_from(subfolder);
        }
        if let Some(name) = &self.name {
            options.name.clone_from(name);
        }
        options
    }

    /// Finds the icons, then composes, variablizes, and writes the sprite.
    ///
    /// # Errors
    ///
    /// If no icons are found, or any icon cannot be read or parsed, or the sprite cannot be
    /// written.
    pub fn create<W: std::io::Write>(
        &self,
        options: &Options,
        console: &mut Console<W>,
    ) -> anyhow::Result<Report> {
        let base_dir = std::env::current_dir()?.join(options.base_dir());
        let output_dir = base_dir.join(&options.subfolder);
        let sprite_path = output_dir.join(format!("{}.svg", options.name));
        console.progress(format_args!(
            "Creating basic sprite inside '{}' ...",
            output_dir.display()
        ));

        let walk = Walk {
            path: &base_dir,
            recursive: self.recursive,
            hidden: self.hidden,
            no_ignore: self.no_ignore,
            exclude: Some(&output_dir),
        };
        let files = walk.files();
        if files.is_empty() {
            return Err(anyhow!(
                "No SVG files found in '{}'. Make sure you are using the correct path.",
                base_dir.display()
            ));
        }
        console.found(files.len());

        let icons = files
            .iter()
            .map(|path| load_icon(path))
            .collect::<anyhow::Result<Vec<_>>>()?;
        let mut sprite = Composer::default().compose(icons)?;
        console.progress("Basic sprite created.");

        console.separator();
        console.modifying();
        console.separator();
        let report = Variablizer::new(options).run_document(&mut sprite);
        output(&sprite, &sprite_path)?;
        console.injected(&report);
        console.separator();
        console.complete();
        Ok(report)
    }
}

fn load_icon(path: &Path) -> anyhow::Result<Icon> {
    let id = Icon::id_from_path(path)
        .ok_or_else(|| anyhow!("Cannot name an icon after '{}'", path.display()))?;
    let source = std::fs::read_to_string(path)?;
    Ok(Icon::parse(id, &source)?)
}

#[cfg(test)]
mod tests {
    use std::fs::{create_dir_all, read_to_string, write};

    use clap::Parser;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::args::{Args, Command};

    fn create(args: &[&str]) -> Create {
        let args = Args::parse_from(["chameleon", "create"].into_iter().chain(args.iter().copied()));
        match args.command {
            Command::Create(create) => create,
            Command::Variablize(_) => unreachable!(),
        }
    }

    #[test]
    fn options() {
        let options = create(&["icons", "--subfolder", "dist", "--no-colors"])
            .options(Options::default());
        assert_eq!(options.path, PathBuf::from("icons"));
        assert_eq!(options.subfolder, "dist");
        assert_eq!(options.name, "chameleon-sprite");
        assert!(!options.colors.modifiable);

        let configured = Options {
            name: String::from("icons"),
            ..Options::default()
        };
        assert_eq!(create(&[]).options(configured.clone()), configured);
    }

    #[test]
    fn creates_sprite() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let root = dir.path();
        write(
            root.join("close.svg"),
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24"><path d="M0 0L24 24" stroke="#000" stroke-width="2"/><path d="M24 0L0 24" stroke="#000" stroke-width="2"/></svg>"##,
        )?;
        write(
            root.join("dot.svg"),
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 2 2"><style>circle { fill: red }</style><circle r="1"/></svg>"#,
        )?;
        create_dir_all(root.join("chameleon-sprite"))?;
        write(root.join("chameleon-sprite/chameleon-sprite.svg"), "<svg/>")?;

        let path = root.to_string_lossy();
        let command = create(&[path.as_ref(), "--no-transition"]);
        let options = command.options(Options::default());
        let mut console = Console::new(Vec::new());
        let report = command.create(&options, &mut console)?;

        assert_eq!(
            report,
            Report {
                colors: 3,
                stroke_widths: 2,
                color_variables: 2,
                stroke_width_variables: 1,
            }
        );
        insta::assert_snapshot!(
            read_to_string(root.join("chameleon-sprite/chameleon-sprite.svg"))?,
            @r##"<svg xmlns="http://www.w3.org/2000/svg" width="0" height="0" style="position:absolute"><symbol id="close" viewBox="0 0 24 24"><path d="M0 0L24 24" stroke="var(--svg-custom-color-1, var(--svg-custom-color, #000))" stroke-width="var(--svg-custom-stroke-width-1, var(--svg-custom-stroke-width, 2))" vector-effect="non-scaling-stroke"/><path d="M24 0L0 24" stroke="var(--svg-custom-color-1, var(--svg-custom-color, #000))" stroke-width="var(--svg-custom-stroke-width-1, var(--svg-custom-stroke-width, 2))" vector-effect="non-scaling-stroke"/></symbol><symbol id="dot" viewBox="0 0 2 2"><circle r="1" fill="var(--svg-custom-color-1, var(--svg-custom-color, red))"/></symbol></svg>"##
        );
        Ok(())
    }

    #[test]
    fn rejects_empty_directory() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().to_string_lossy();
        let command = create(&[path.as_ref()]);
        let options = command.options(Options::default());
        let mut console = Console::new(Vec::new());

        let err = command.create(&options, &mut console).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!(
                "No SVG files found in '{}'. Make sure you are using the correct path.",
                dir.path().display()
            )
        );
        assert!(!dir.path().join("chameleon-sprite").exists());
        Ok(())
    }

    #[test]
    fn rejects_invalid_icon() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        write(dir.path().join("broken.svg"), "<svg>")?;
        let path = dir.path().to_string_lossy();
        let command = create(&[path.as_ref()]);
        let options = command.options(Options::default());

        let err = command
            .create(&options, &mut Console::new(Vec::new()))
            .unwrap_err();
        assert!(err.to_string().contains("broken"));
        Ok(())
    }
}
