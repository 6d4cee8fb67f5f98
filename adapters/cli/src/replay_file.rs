use std::{error::Error, fmt, fs, path::Path};

use vanguard_system_session::ReplayEntry;

/// File extensions accepted as replay logs.
const REPLAY_EXTENSIONS: [&str; 2] = ["vgr", "json"];

/// Categorized failure surfaced when a replay file cannot be loaded.
///
/// Callers receive one of two categories, never a raw parse exception:
/// the file has the wrong type, or its contents do not decode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ReplayFileError {
    /// The path does not carry a supported replay extension.
    InvalidFileType,
    /// The file could not be read or its contents did not decode.
    InvalidFile,
}

impl fmt::Display for ReplayFileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFileType => write!(f, "invalid-file-type"),
            Self::InvalidFile => write!(f, "invalid-file"),
        }
    }
}

impl Error for ReplayFileError {}

/// Loads and decodes a replay log from disk.
pub(crate) fn load_replay_entries(path: &Path) -> Result<Vec<ReplayEntry>, ReplayFileError> {
    let supported = path
        .extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| REPLAY_EXTENSIONS.contains(&extension));
    if !supported {
        return Err(ReplayFileError::InvalidFileType);
    }

    let contents = fs::read_to_string(path).map_err(|_| ReplayFileError::InvalidFile)?;
    serde_json::from_str(&contents).map_err(|_| ReplayFileError::InvalidFile)
}
