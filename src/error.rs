//! Error types for plexus.
//!
//! This module defines all error types used throughout the library.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`GraphError`].
pub type Result<T> = std::result::Result<T, GraphError>;

/// Errors that can occur while building graphs or enumerating faces.
#[derive(Error, Debug)]
pub enum GraphError {
    /// The input has no points or no edges where some are required.
    #[error("input is empty")]
    EmptyInput,

    /// An edge references a node outside of the position array.
    #[error("edge {edge} references invalid node index {node}")]
    InvalidNodeIndex {
        /// The edge index in the input list.
        edge: usize,
        /// The invalid node index.
        node: usize,
    },

    /// An edge connects a node to itself.
    #[error("edge connects node {node} to itself")]
    SelfLoop {
        /// The node index.
        node: usize,
    },

    /// A per-point array does not match the number of points.
    #[error("{what} has {actual} entries, expected {expected}")]
    LengthMismatch {
        /// Name of the mismatched array.
        what: &'static str,
        /// Expected number of entries.
        expected: usize,
        /// Actual number of entries.
        actual: usize,
    },

    /// A probe requires an attribute accessor that was not supplied.
    #[error("{probe} probe requires a `{attribute}` attribute")]
    MissingAttribute {
        /// The probe name.
        probe: &'static str,
        /// The missing attribute.
        attribute: &'static str,
    },

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error loading points or graphs from file.
    #[error("failed to load {path}: {message}")]
    LoadError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Error saving a graph to file.
    #[error("failed to save {path}: {message}")]
    SaveError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Unsupported file format.
    #[error("unsupported file format: {extension}")]
    UnsupportedFormat {
        /// The file extension.
        extension: String,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl GraphError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        GraphError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    /// Check that a per-point array has one entry per point.
    pub(crate) fn check_len(what: &'static str, expected: usize, actual: usize) -> Result<()> {
        if expected == actual {
            Ok(())
        } else {
            Err(GraphError::LengthMismatch {
                what,
                expected,
                actual,
            })
        }
    }
}
