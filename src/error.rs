use thiserror::Error;

/// Errors surfaced by the habit engine. All are local and synchronous;
/// the shell shows them to the user and carries on.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HabitError {
    #[error("habit name cannot be empty")]
    EmptyName,
    #[error("'{0}' is a reserved name")]
    ReservedName(String),
    #[error("habit '{0}' already exists")]
    Duplicate(String),
    #[error("habit '{0}' not found")]
    NotFound(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not locate a platform data directory")]
    NoDataDir,
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not serialize habit data: {0}")]
    Serialize(#[from] serde_json::Error),
}
