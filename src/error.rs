use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Project ID required! Use --project or set GITLAB_PROJECT_ID")]
    MissingProject,

    #[error("Compile regex {pattern} error: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Can't parse the duration string: {0:?}")]
    InvalidDuration(String),

    #[error("Unsupported duration unit: {0}")]
    UnsupportedDurationUnit(String),

    #[error("Invalid GitLab base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("GitLab token contains characters not allowed in an HTTP header")]
    InvalidToken,

    #[error("There is no registry repository found")]
    NoRepositoryMatched,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}
