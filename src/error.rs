//! Error types for the degradation toolkit.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the degrade library.
#[derive(Error, Debug)]
pub enum Error {
    /// A positional parameter list is shorter than the kind requires.
    #[error("{kind} expects at least {expected} parameter(s), got {actual}")]
    InvalidParameterArity {
        kind: String,
        expected: usize,
        actual: usize,
    },

    /// A policy, noise model or interpolation tag was not recognized.
    #[error("unknown {family} kind '{kind}'")]
    UnknownKind { family: &'static str, kind: String },

    /// Downsampling would produce an empty image.
    #[error("downsampling {height}x{width} by {factor} yields a zero-sized image")]
    DegenerateShape {
        height: usize,
        width: usize,
        factor: usize,
    },

    /// Parameter value the operator cannot work with at all.
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    /// Shape mismatch in tensor operations.
    #[error("tensor shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    /// Failed to load an image file.
    #[error("failed to load image from {path}: {source}")]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Failed to save an image file.
    #[error("failed to save image to {path}: {source}")]
    ImageSave {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Checkpoint file is unreadable or malformed.
    #[error("bad checkpoint {path}: {reason}")]
    Checkpoint { path: PathBuf, reason: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for degrade operations.
pub type Result<T> = std::result::Result<T, Error>;
