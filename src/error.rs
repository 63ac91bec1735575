//! Errors reported by the drawing entry points.
//!
//! Every error is raised during validation, before the destination buffer is
//! touched; a call that returns `Err` leaves the buffer unchanged.

use thiserror::Error;

use crate::pixel_buffer::Region;

/// Errors that can occur while filling or stroking.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DrawError {
    /// The path or stroke style is malformed.
    #[error("invalid geometry: {reason}")]
    InvalidGeometry { reason: String },
    /// The target region is not contained in the destination buffer.
    #[error("target region {region:?} is outside the {width}x{height} buffer")]
    OutOfBounds {
        region: Region,
        width: u32,
        height: u32,
    },
    /// The graphics options hold a value the pipeline can't use.
    #[error("invalid graphics options: {reason}")]
    InvalidOptions { reason: String },
}

impl DrawError {
    pub(crate) fn geometry(reason: impl Into<String>) -> Self {
        DrawError::InvalidGeometry {
            reason: reason.into(),
        }
    }

    pub(crate) fn options(reason: impl Into<String>) -> Self {
        DrawError::InvalidOptions {
            reason: reason.into(),
        }
    }
}

/// Shorthand for results produced by this crate.
pub type Result<T> = core::result::Result<T, DrawError>;
