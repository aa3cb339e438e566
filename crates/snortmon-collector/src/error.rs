use std::path::PathBuf;

/// Errors rejecting a metric or instance configuration block.
///
/// Each error is terminal for the block being built; sibling blocks are
/// unaffected.
///
/// # Examples
///
/// ```rust
/// use snortmon_collector::error::ConfigError;
///
/// let err = ConfigError::DuplicateMetric("dropped".to_string());
/// assert!(err.to_string().contains("dropped"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required option is absent from the block.
    #[error("{block} '{name}': option `{option}` must be set")]
    MissingField {
        block: &'static str,
        name: String,
        option: &'static str,
    },

    /// `data_source_type` matched none of the four recognized kinds.
    #[error("metric '{name}': unrecognized value for `data_source_type`: '{value}'")]
    UnknownDataSourceType { name: String, value: String },

    /// Column indices are 1-based and must be positive.
    #[error("metric '{name}': `index` must be higher than 0 (got {index})")]
    InvalidIndex { name: String, index: i64 },

    /// A metric with this name is already defined.
    #[error("metric '{0}' is already defined")]
    DuplicateMetric(String),

    /// An instance `collect` entry names a metric that was never defined.
    #[error("instance '{instance}': `collect` argument not found: '{metric}'")]
    UnknownMetric { instance: String, metric: String },

    /// `interval_secs` must be a positive number of seconds.
    #[error("instance '{0}': `interval_secs` must be higher than 0")]
    InvalidInterval(String),
}

/// Errors aborting a single poll tick. Always transient: the instance
/// stays scheduled and the next tick starts fresh.
#[derive(Debug, thiserror::Error)]
pub enum PollError {
    /// The perfmon file could not be opened or read.
    #[error("unable to read `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configured path exists but is not a regular file.
    #[error("`{0}` is not a regular file")]
    NotAFile(PathBuf),

    /// The file holds no bytes to scan for a data row.
    #[error("perfmon file `{0}` is empty")]
    Empty(PathBuf),

    /// The most recent line is a `#` comment, so there is no active row.
    #[error("last line of perfmon file `{0}` is a comment")]
    CommentLastRow(PathBuf),

    /// Field 0 of the active row did not parse as a Unix timestamp.
    #[error("invalid timestamp field '{0}'")]
    InvalidTimestamp(String),
}
