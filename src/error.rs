use thiserror::Error;

/// Everything an OS query or action can fail with.
///
/// None of these are fatal: queries degrade to a sentinel, per-process
/// actions skip the process, and external commands print a message.
#[derive(Debug, Error)]
pub enum OptimizerError {
    #[error("{what} query returned no data")]
    NoData { what: &'static str },

    #[error("{what} query failed: {reason}")]
    Query { what: &'static str, reason: String },

    #[error("process {pid}: {reason}")]
    ProcessAccess { pid: u32, reason: String },

    #[error("could not start {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}")]
    CommandFailed { program: String, status: String },

    #[error("{0} is not supported on this platform")]
    Unsupported(&'static str),
}

pub type Result<T> = std::result::Result<T, OptimizerError>;
