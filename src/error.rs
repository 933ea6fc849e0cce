//! Error types for loading volume data.

use std::path::PathBuf;

use thiserror::Error;

/// Failures while reading a raw volume file.
#[derive(Error, Debug)]
pub enum VolumeError {
    /// The file could not be read.
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file holds no samples.
    #[error("'{0}' is empty")]
    Empty(PathBuf),

    /// The file size is not a whole number of elements.
    #[error("file size {size} is not a multiple of the {element_size}-byte element size")]
    TruncatedElement { size: usize, element_size: usize },

    /// The element count disagrees with the requested dimensions.
    #[error("dimensions {dims:?} need {expected} samples, file holds {actual}")]
    DimensionMismatch {
        dims: [u32; 3],
        expected: usize,
        actual: usize,
    },

    /// No dimensions were given and none could be inferred.
    #[error("cannot infer dimensions for {0} samples; pass --dims x y z")]
    UnknownDimensions(usize),

    /// The voxel count of the dimensions does not fit in memory addressing.
    #[error("dimensions {0:?} hold more samples than can be addressed")]
    TooLarge([u32; 3]),

    /// A dimension is zero.
    #[error("dimensions {0:?} must all be positive")]
    ZeroDimension([u32; 3]),
}

/// A specialized Result type for volume loading.
pub type Result<T> = std::result::Result<T, VolumeError>;
