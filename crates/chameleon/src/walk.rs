//! Provides a walker for finding the icons of a sprite, and the means to write the sprite
//! once it's created.
use std::{
    ffi::OsStr,
    io::{BufWriter, Write as _},
    path::{Path, PathBuf},
};

use chameleon_ast::{
    document::Document,
    serialize::{Options, Serialize as _},
};
use ignore::{DirEntry, WalkBuilder};

/// Finds the SVG documents within a directory.
pub struct Walk<'a> {
    /// The directory to search
    pub path: &'a Path,
    /// Whether to walk through and search its subdirectories
    pub recursive: bool,
    /// Whether to search through hidden files and directories
    pub hidden: bool,
    /// Whether to disregard ignore patterns
    pub no_ignore: bool,
    /// A file or directory to leave out, such as a previously written sprite
    pub exclude: Option<&'a Path>,
}

impl Walk<'_> {
    /// Lists the `.svg` files, sorted by path so that the sprite is built in a stable order.
    pub fn files(&self) -> Vec<PathBuf> {
        let mut files: Vec<_> = WalkBuilder::new(self.path)
            .max_depth(if self.recursive { None } else { Some(1) })
            .hidden(!self.hidden)
            .git_ignore(!self.no_ignore)
            .ignore(!self.no_ignore)
            .follow_links(true)
            .build()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(err) => {
                    log::debug!("skipping entry: {err}");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_some_and(|f| f.is_file()))
            .map(DirEntry::into_path)
            .filter(|path| path.extension().and_then(OsStr::to_str) == Some("svg"))
            .filter(|path| self.exclude.is_none_or(|exclude| !path.starts_with(exclude)))
            .collect();
        files.sort();
        log::debug!("found {} files in {}", files.len(), self.path.display());
        files
    }
}

/// Serializes the document to the destination, creating any missing directories.
///
/// # Errors
///
/// If the file cannot be created or the document cannot be serialized
pub fn output(document: &Document, destination: &Path) -> anyhow::Result<()> {
    if let Some(parent) = destination.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = BufWriter::new(std::fs::File::create(destination)?);
    document
        .serialize_into(file, Options::default())?
        .flush()?;
    log::debug!("wrote {}", destination.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs::{create_dir_all, write};

    use pretty_assertions::assert_eq;

    use super::*;

    fn names(root: &Path, files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .filter_map(|path| path.strip_prefix(root).ok())
            .map(|path| path.to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn finds_svgs() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let root = dir.path();
        create_dir_all(root.join("nested"))?;
        create_dir_all(root.join("chameleon-sprite"))?;
        write(root.join("b.svg"), "<svg/>")?;
        write(root.join("a.svg"), "<svg/>")?;
        write(root.join("notes.txt"), "")?;
        write(root.join(".hidden.svg"), "<svg/>")?;
        write(root.join("nested/c.svg"), "<svg/>")?;
        write(root.join("chameleon-sprite/chameleon-sprite.svg"), "<svg/>")?;

        let exclude = root.join("chameleon-sprite");
        let mut walk = Walk {
            path: root,
            recursive: false,
            hidden: false,
            no_ignore: false,
            exclude: Some(&exclude),
        };
        assert_eq!(names(root, &walk.files()), ["a.svg", "b.svg"]);

        walk.recursive = true;
        assert_eq!(names(root, &walk.files()), ["a.svg", "b.svg", "nested/c.svg"]);

        walk.hidden = true;
        assert_eq!(
            names(root, &walk.files()),
            [".hidden.svg", "a.svg", "b.svg", "nested/c.svg"]
        );

        walk.exclude = None;
        assert_eq!(walk.files().len(), 5);
        Ok(())
    }

    #[test]
    fn outputs_into_new_directories() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let destination = dir.path().join("a/b/sprite.svg");
        let document = chameleon_ast::parse::parse(r#"<svg><path fill="red"/></svg>"#)?;

        output(&document, &destination)?;
        assert_eq!(
            std::fs::read_to_string(destination)?,
            r#"<svg><path fill="red"/></svg>"#
        );
        Ok(())
    }
}
