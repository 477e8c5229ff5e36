// ABOUTME: Error types for CDOM construction and featurization including ErrorCode enum and CdomError struct.
// ABOUTME: Provides categorized errors with convenience constructors and boolean helpers.

use std::fmt;

/// Error codes representing the categories of CDOM failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// The root selector matched no node.
    NodeNotFound,
    /// The root selector matched more than one node.
    MultipleRootsFound,
    /// The root selector could not be parsed.
    InvalidSelector,
    /// A pair member does not refer to a text element of the tree.
    NullPair,
    /// A pair member carries no feature vector.
    InvalidPairArgument,
    /// Reading the source document failed.
    Io,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::NodeNotFound => "root node not found",
            ErrorCode::MultipleRootsFound => "more than one root found",
            ErrorCode::InvalidSelector => "invalid root selector",
            ErrorCode::NullPair => "pair element is missing",
            ErrorCode::InvalidPairArgument => "pair element is not significant",
            ErrorCode::Io => "i/o error",
        };
        write!(f, "{}", s)
    }
}

/// The error type for every fallible CDOM operation.
#[derive(Debug, thiserror::Error)]
pub struct CdomError {
    pub code: ErrorCode,
    pub op: String,
    #[source]
    pub source: Option<anyhow::Error>,
}

impl fmt::Display for CdomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cdom: {}: {}", self.op, self.code)?;
        if let Some(ref src) = self.source {
            write!(f, ": {}", src)?;
        }
        Ok(())
    }
}

impl CdomError {
    fn with_code(code: ErrorCode, op: impl Into<String>, source: Option<anyhow::Error>) -> Self {
        Self {
            code,
            op: op.into(),
            source,
        }
    }

    /// Create a NodeNotFound error.
    pub fn node_not_found(op: impl Into<String>, source: Option<anyhow::Error>) -> Self {
        Self::with_code(ErrorCode::NodeNotFound, op, source)
    }

    /// Create a MultipleRootsFound error.
    pub fn multiple_roots(op: impl Into<String>, source: Option<anyhow::Error>) -> Self {
        Self::with_code(ErrorCode::MultipleRootsFound, op, source)
    }

    /// Create an InvalidSelector error.
    pub fn invalid_selector(op: impl Into<String>, source: Option<anyhow::Error>) -> Self {
        Self::with_code(ErrorCode::InvalidSelector, op, source)
    }

    /// Create a NullPair error.
    pub fn null_pair(op: impl Into<String>, source: Option<anyhow::Error>) -> Self {
        Self::with_code(ErrorCode::NullPair, op, source)
    }

    /// Create an InvalidPairArgument error.
    pub fn invalid_pair_argument(op: impl Into<String>, source: Option<anyhow::Error>) -> Self {
        Self::with_code(ErrorCode::InvalidPairArgument, op, source)
    }

    /// Create an Io error.
    pub fn io(op: impl Into<String>, source: Option<anyhow::Error>) -> Self {
        Self::with_code(ErrorCode::Io, op, source)
    }

    /// Returns true if this is a NodeNotFound error.
    pub fn is_node_not_found(&self) -> bool {
        self.code == ErrorCode::NodeNotFound
    }

    /// Returns true if this is a MultipleRootsFound error.
    pub fn is_multiple_roots(&self) -> bool {
        self.code == ErrorCode::MultipleRootsFound
    }

    /// Returns true if this is an InvalidSelector error.
    pub fn is_invalid_selector(&self) -> bool {
        self.code == ErrorCode::InvalidSelector
    }

    /// Returns true if this is a NullPair error.
    pub fn is_null_pair(&self) -> bool {
        self.code == ErrorCode::NullPair
    }

    /// Returns true if this is an InvalidPairArgument error.
    pub fn is_invalid_pair_argument(&self) -> bool {
        self.code == ErrorCode::InvalidPairArgument
    }

    /// Returns true if this is an Io error.
    pub fn is_io(&self) -> bool {
        self.code == ErrorCode::Io
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CdomError>;
