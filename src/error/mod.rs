// Error types for the heart-rate pipeline crate
//
// The sample pipeline itself has no recoverable-error paths: all numeric
// operations clamp instead of failing, and every worn/reset combination has
// a defined outcome. The only errors live at the trace-replay boundary used
// by tests and the CLI harness.

use log::error;
use std::fmt;

/// Error codes for structured error reporting
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}

/// Trace error code constants
///
/// Error code range: 2001-2003
pub struct TraceErrorCodes {}

impl TraceErrorCodes {
    /// Trace file could not be read
    pub const READ_FAILED: i32 = 2001;

    /// Trace file contents are not valid JSON
    pub const PARSE_FAILED: i32 = 2002;

    /// Trace contains no steps
    pub const EMPTY: i32 = 2003;
}

/// Errors raised while loading or replaying sample traces
#[derive(Debug, Clone, PartialEq)]
pub enum TraceError {
    /// Trace file could not be read
    ReadFailed { path: String, reason: String },

    /// Trace file contents are not valid JSON
    ParseFailed { reason: String },

    /// Trace contains no steps
    Empty,
}

impl ErrorCode for TraceError {
    fn code(&self) -> i32 {
        match self {
            TraceError::ReadFailed { .. } => TraceErrorCodes::READ_FAILED,
            TraceError::ParseFailed { .. } => TraceErrorCodes::PARSE_FAILED,
            TraceError::Empty => TraceErrorCodes::EMPTY,
        }
    }

    fn message(&self) -> String {
        match self {
            TraceError::ReadFailed { path, reason } => {
                format!("Failed to read trace file {}: {}", path, reason)
            }
            TraceError::ParseFailed { reason } => {
                format!("Failed to parse trace JSON: {}", reason)
            }
            TraceError::Empty => "Trace contains no steps".to_string(),
        }
    }
}

impl fmt::Display for TraceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TraceError (code {}): {}", self.code(), self.message())
    }
}

impl std::error::Error for TraceError {}

/// Log a trace error with structured context
pub fn log_trace_error(err: &TraceError, context: &str) {
    error!(
        "Trace error in {}: code={}, message={}",
        context,
        err.code(),
        err.message()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_error_codes() {
        assert_eq!(
            TraceError::ReadFailed {
                path: "a.json".to_string(),
                reason: "gone".to_string()
            }
            .code(),
            TraceErrorCodes::READ_FAILED
        );
        assert_eq!(
            TraceError::ParseFailed {
                reason: "bad".to_string()
            }
            .code(),
            TraceErrorCodes::PARSE_FAILED
        );
        assert_eq!(TraceError::Empty.code(), TraceErrorCodes::EMPTY);
    }

    #[test]
    fn test_trace_error_messages() {
        let err = TraceError::ReadFailed {
            path: "trace.json".to_string(),
            reason: "no such file".to_string(),
        };
        assert!(err.message().contains("trace.json"));
        assert!(err.message().contains("no such file"));

        let err = TraceError::Empty;
        assert!(err.message().contains("no steps"));
    }

    #[test]
    fn test_trace_error_display_includes_code() {
        let err = TraceError::Empty;
        let display = format!("{}", err);
        assert!(display.contains("2003"));
    }
}
