use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error(
        "Chrome bookmarks file not found at: {}\nTry --profile <ProfileName> if you use a non-default Chrome profile.",
        .path.display()
    )]
    BookmarksNotFound { path: PathBuf },

    #[error("Failed to parse bookmarks JSON: {0}")]
    BookmarksParse(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
