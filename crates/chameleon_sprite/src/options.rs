//! Configuration for creating and variablizing a sprite
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// The transition used when none is configured
pub const DEFAULT_TRANSITION: &str = "all .3s ease";

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
/// The options for a run, which can be given partially in a config file with the remaining
/// fields taking their default.
///
/// ```
/// use chameleon_sprite::options::Options;
///
/// let options: Options = serde_json::from_str(r#"{ "colors": { "naming": "icon-color" } }"#).unwrap();
/// assert_eq!(options.colors.naming, "icon-color");
/// assert!(options.colors.modifiable);
/// assert_eq!(options.transition.as_deref(), Some("all .3s ease"));
/// ```
pub struct Options {
    /// The directory containing the icons. Empty for the current directory.
    pub path: PathBuf,
    /// The directory, relative to `path`, the sprite is written to
    pub subfolder: String,
    /// The file name of the sprite, without the `.svg` extension
    pub name: String,
    /// How `fill` and `stroke` are variablized
    pub colors: Colors,
    /// How `stroke-width` is variablized
    pub stroke_widths: StrokeWidths,
    #[serde(deserialize_with = "deserialize_transition")]
    /// A transition to append to the style of each element, such as `all .3s ease`.
    ///
    /// Given as a string, or `false`/`null`/`""` to disable it. `true` uses
    /// [`DEFAULT_TRANSITION`].
    pub transition: Option<String>,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
/// Options for `fill` and `stroke`
pub struct Colors {
    /// Whether colors are replaced with variables
    pub modifiable: bool,
    /// The base name of each variable, e.g. `--svg-custom-color-1`
    pub naming: String,
    /// Whether the original color is used when no variable is set, instead of `currentColor`
    pub preserve_original: bool,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
/// Options for `stroke-width`
pub struct StrokeWidths {
    /// Whether stroke widths are replaced with variables
    pub modifiable: bool,
    /// The base name of each variable, e.g. `--svg-custom-stroke-width-1`
    pub naming: String,
    /// Whether stroked elements get `vector-effect="non-scaling-stroke"`
    pub non_scaling: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            path: PathBuf::new(),
            subfolder: String::from("chameleon-sprite"),
            name: String::from("chameleon-sprite"),
            colors: Colors::default(),
            stroke_widths: StrokeWidths::default(),
            transition: Some(String::from(DEFAULT_TRANSITION)),
        }
    }
}

impl Default for Colors {
    fn default() -> Self {
        Self {
            modifiable: true,
            naming: String::from("svg-custom-color"),
            preserve_original: true,
        }
    }
}

impl Default for StrokeWidths {
    fn default() -> Self {
        Self {
            modifiable: true,
            naming: String::from("svg-custom-stroke-width"),
            non_scaling: true,
        }
    }
}

impl Options {
    /// The directory the icons are read from
    pub fn base_dir(&self) -> &Path {
        &self.path
    }

    /// The directory the sprite is written to
    pub fn output_dir(&self) -> PathBuf {
        self.path.join(&self.subfolder)
    }

    /// The file the sprite is written to, i.e. `<path>/<subfolder>/<name>.svg`
    pub fn sprite_path(&self) -> PathBuf {
        self.output_dir().join(format!("{}.svg", self.name))
    }
}

fn deserialize_transition<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;

    match value {
        serde_json::Value::String(string) if string.is_empty() => Ok(None),
        serde_json::Value::String(string) => Ok(Some(string)),
        serde_json::Value::Bool(true) => Ok(Some(String::from(DEFAULT_TRANSITION))),
        serde_json::Value::Bool(false) | serde_json::Value::Null => Ok(None),
        _ => Err(serde::de::Error::custom(
            "expected a string, boolean, or null",
        )),
    }
}
