//! Utility functions for sortplot.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use regex::Regex;

use crate::core::error::{Result, SortplotError, SortplotErrorKind};

/// Whitespace, path separators and characters Windows refuses in file names
static UNSAFE_FILENAME_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[\s/\\:*?"<>|\x00-\x1f\x7f]"#).expect("static regex is valid")
});

/// Turn a distribution label into the chart file name, e.g. `plot_strictly_ascending.png`.
///
/// Spaces become underscores, as do any characters that would escape the
/// output directory or be rejected by common filesystems.
pub fn chart_file_name(distribution: &str) -> String {
    let label = UNSAFE_FILENAME_CHARS.replace_all(distribution, "_");
    format!("plot_{label}.png")
}

/// Check that the input exists and is a regular file
pub fn ensure_input_file(path: &Path) -> Result<()> {
    if path.is_file() {
        return Ok(());
    }

    let hint = if path.is_dir() {
        Some("The path is a directory, pass the CSV file inside it.")
    } else {
        None
    };

    Err(SortplotError::from(SortplotErrorKind::InputFileNotFound {
        path: path.to_path_buf(),
    })
    .with_hint(hint))
}

/// The directory charts land in when none is configured: the input file's own directory.
///
/// Symlinks are not followed, so charts go next to the path the user gave.
pub fn input_directory(input: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(input)?;
    Ok(absolute
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(".")))
}

pub fn ensure_output_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)?;
    Ok(())
}
