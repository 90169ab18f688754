//! Loading of the configuration file usable by chameleon, and the flags which override it
use std::{
    env::current_dir,
    fs::read_to_string,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use chameleon_sprite::options::Options;
use etcetera::{choose_base_strategy, BaseStrategy};

/// The name of the configuration file looked for in the working directory
pub const LOCAL_CONFIG: &str = "chameleonrc.json";

#[derive(Debug, Default, Clone, PartialEq)]
/// The config for the CLI usage of chameleon
pub struct Config {
    /// The options from the configuration file, with defaults for any missing fields
    pub options: Options,
    /// Where the options were loaded from, if anywhere
    pub path: Option<PathBuf>,
}

impl Config {
    fn load_local() -> std::io::Result<(String, PathBuf)> {
        let mut path = current_dir()?;
        path.push(LOCAL_CONFIG);
        Ok((read_to_string(&path)?, path))
    }

    fn load_base() -> std::io::Result<(String, PathBuf)> {
        let mut path = choose_base_strategy()
            .map_err(std::io::Error::other)?
            .config_dir();
        path.push("chameleon");
        path.push("config.json");
        Ok((read_to_string(&path)?, path))
    }

    /// Tries loading the configuration from well-known paths, falling back to the defaults
    /// when there is none.
    ///
    /// # Errors
    /// When the config exists but cannot be parsed
    pub fn load() -> anyhow::Result<Self> {
        match Self::load_local().or_else(|_| Self::load_base()) {
            Ok((file, path)) => Self::parse(&file, path),
            Err(err) => {
                log::debug!("using default config: {err}");
                Ok(Self::default())
            }
        }
    }

    /// Loads the configuration from the given file
    ///
    /// # Errors
    /// When the file cannot be read or parsed
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let file = read_to_string(path)
            .with_context(|| format!("Configuration at {} cannot be read", path.display()))?;
        Self::parse(&file, path.to_path_buf())
    }

    fn parse(file: &str, path: PathBuf) -> anyhow::Result<Self> {
        let options = serde_json::from_str(file)
            .with_context(|| format!("Configuration at {} cannot be parsed", path.display()))?;
        log::debug!("loaded config from {}", path.display());
        Ok(Self {
            options,
            path: Some(path),
        })
    }

    /// Resolves the `--config` flag of a command.
    ///
    /// When a path is given it's config is used instead. When the flag is given without a path
    /// the current config is printed instead and `None` is returned.
    ///
    /// # Errors
    /// When the specified config cannot be loaded, or the current config cannot be printed
    pub fn resolve(self, specified: Option<&[PathBuf]>) -> anyhow::Result<Option<Self>> {
        match specified {
            Some([]) => {
                log::debug!("printing config");
                serde_json::to_writer_pretty(std::io::stdout(), &self.options)?;
                println!();
                Ok(None)
            }
            Some([path, ..]) => {
                log::debug!("using specified config");
                Self::from_file(path).map(Some)
            }
            None => {
                log::debug!("using inferred config");
                Ok(Some(self))
            }
        }
    }
}

#[derive(clap::Args, Debug, Default, Clone)]
/// Flags which take precedence over the configuration file
pub struct Overrides {
    /// The base name of colour variables, e.g. `svg-custom-color`
    #[clap(long)]
    pub naming_colors: Option<String>,
    /// The base name of stroke width variables, e.g. `svg-custom-stroke-width`
    #[clap(long)]
    pub naming_stroke_widths: Option<String>,
    /// Leave `fill` and `stroke` as they are
    #[clap(long, default_value = "false")]
    pub no_colors: bool,
    /// Leave `stroke-width` as it is
    #[clap(long, default_value = "false")]
    pub no_stroke_widths: bool,
    /// Fall back to `currentColor` instead of the original colour when no variable is set
    #[clap(long, default_value = "false")]
    pub no_preserve_original: bool,
    /// Don't add `vector-effect="non-scaling-stroke"` to stroked elements
    #[clap(long, default_value = "false")]
    pub no_non_scaling: bool,
    /// The transition appended to the style of each element, e.g. `all .3s ease`
    #[clap(long, conflicts_with = "no_transition")]
    pub transition: Option<String>,
    /// Don't append a transition to the style of each element
    #[clap(long, default_value = "false")]
    pub no_transition: bool,
}

impl Overrides {
    /// Applies each given flag over the options
    pub fn apply(&self, mut options: Options) -> Options {
        if let Some(naming) = &self.naming_colors {
            options.colors.naming.clone_from(naming);
        }
        if let Some(naming) = &self.naming_stroke_widths {
            options.stroke_widths.naming.clone_from(naming);
        }
        if self.no_colors {
            options.colors.modifiable = false;
        }
        if self.no_stroke_widths {
            options.stroke_widths.modifiable = false;
        }
        if self.no_preserve_original {
            options.colors.preserve_original = false;
        }
        if self.no_non_scaling {
            options.stroke_widths.non_scaling = false;
        }
        if self.no_transition {
            options.transition = None;
        } else if let Some(transition) = &self.transition {
            options.transition = Some(transition.clone()).filter(|t| !t.is_empty());
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn from_file() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join(LOCAL_CONFIG);
        std::fs::write(
            &path,
            r#"{ "subfolder": "dist", "strokeWidths": { "nonScaling": false }, "transition": false }"#,
        )?;

        let config = Config::from_file(&path)?;
        assert_eq!(config.path.as_deref(), Some(path.as_path()));
        assert_eq!(config.options.subfolder, "dist");
        assert_eq!(config.options.name, "chameleon-sprite");
        assert!(!config.options.stroke_widths.non_scaling);
        assert!(config.options.stroke_widths.modifiable);
        assert_eq!(config.options.transition, None);
        Ok(())
    }

    #[test]
    fn from_invalid_file() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join(LOCAL_CONFIG);
        std::fs::write(&path, r#"{ "transition": 3 }"#)?;

        let err = Config::from_file(&path).unwrap_err();
        assert!(err.to_string().starts_with("Configuration at"));
        assert!(Config::from_file(&dir.path().join("missing.json")).is_err());
        Ok(())
    }

    #[test]
    fn resolve() -> anyhow::Result<()> {
        let config = Config::default();
        assert_eq!(config.clone().resolve(None)?, Some(Config::default()));
        assert_eq!(config.resolve(Some(&[]))?, None);
        Ok(())
    }

    #[test]
    fn overrides() {
        let overrides = Overrides {
            naming_colors: Some(String::from("icon-color")),
            no_stroke_widths: true,
            no_preserve_original: true,
            transition: Some(String::from("fill 1s")),
            ..Overrides::default()
        };
        let options = overrides.apply(Options::default());
        assert_eq!(options.colors.naming, "icon-color");
        assert!(!options.colors.preserve_original);
        assert!(options.colors.modifiable);
        assert!(!options.stroke_widths.modifiable);
        assert!(options.stroke_widths.non_scaling);
        assert_eq!(options.transition.as_deref(), Some("fill 1s"));

        let options = Overrides {
            no_transition: true,
            ..Overrides::default()
        }
        .apply(Options::default());
        assert_eq!(options.transition, None);
        assert_eq!(Overrides::default().apply(Options::default()), Options::default());
    }
}
