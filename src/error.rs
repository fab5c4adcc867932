use thiserror::Error as ThisError;

/// Errors produced while loading, querying or editing a project.
#[derive(Debug, ThisError)]
pub enum Error {
    // Project file
    #[error("Failed to parse project: {0}")]
    Parse(String),
    #[error("Invalid project: {0}")]
    InvalidProject(String),
    #[error("No file path set")]
    NoFilePath,

    // Lookup
    #[error("Project has no targets")]
    NoTargets,
    #[error("Target not found: {0}")]
    TargetNotFound(String),
    #[error("Target {0} has no build configuration list")]
    MissingConfigurationList(String),
    #[error("No build configuration named \"{name}\" in configuration list {list}")]
    ConfigurationNotFound { list: String, name: String },

    // Info.plist
    #[error("INFOPLIST_FILE is not set for the selected configuration")]
    MissingInfoPlistPath,
    #[error("Invalid Info.plist: {0}")]
    InvalidPlist(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Plist error: {0}")]
    Plist(#[from] plist::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
