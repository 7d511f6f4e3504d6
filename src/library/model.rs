use std::path::{Path, PathBuf};

/// One entry of the track list: a file the user handed us.
///
/// Deliberately thin: no format validation, no tag data. Tags are read
/// when the track is loaded, and any format problem surfaces as a load
/// failure at that point.
#[derive(Clone, Debug, PartialEq)]
pub struct Track {
    pub path: PathBuf,
    /// File name shown in the playlist table.
    pub name: String,
}

impl Track {
    pub fn from_path(path: &Path) -> Self {
        let name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("UNKNOWN")
            .to_string();

        Self {
            path: path.to_path_buf(),
            name,
        }
    }
}
