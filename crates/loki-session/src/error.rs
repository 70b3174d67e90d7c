//! Error kinds (§7 Error handling design): "constructors that allocate
//! return a handle or a sentinel (absent). Mutators that can fail signal
//! failure via a discriminated result carrying one of the kinds below."

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LokiError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("out of memory")]
    OutOfMemory,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("protocol error: {0}")]
    Protocol(String),
    #[error("queue full")]
    QueueFull,
    #[error("binary file")]
    BinaryFile,
    #[error("no grammar for extension")]
    NoLanguage,
    #[error("script error: {0}")]
    ScriptError(String),
}

impl LokiError {
    /// Short machine-readable tag, used by the JSON-RPC harness and any
    /// other host that needs to report the error kind without the full
    /// formatted message.
    pub fn kind(&self) -> &'static str {
        match self {
            LokiError::InvalidArgument(_) => "invalid-argument",
            LokiError::NotFound(_) => "not-found",
            LokiError::OutOfMemory => "out-of-memory",
            LokiError::Io(_) => "io",
            LokiError::Protocol(_) => "protocol",
            LokiError::QueueFull => "queue-full",
            LokiError::BinaryFile => "binary-file",
            LokiError::NoLanguage => "no-language",
            LokiError::ScriptError(_) => "script-error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_reports_the_stable_tag() {
        assert_eq!(LokiError::QueueFull.kind(), "queue-full");
        assert_eq!(LokiError::InvalidArgument("x".into()).kind(), "invalid-argument");
    }

    #[test]
    fn io_error_converts_via_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: LokiError = io_err.into();
        assert_eq!(err.kind(), "io");
    }
}
