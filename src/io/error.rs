//! Error types for dataset generation operations

use std::fmt;
use std::path::PathBuf;

/// Main error type for all dataset operations
#[derive(Debug)]
pub enum DatasetError {
    /// Failed to load a mosaic image from the filesystem
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Failed to save a generated tile or preview to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// A label file row could not be parsed
    LabelParse {
        /// Path to the label file
        path: PathBuf,
        /// One-based line number of the offending row
        line: usize,
        /// Explanation of what was malformed
        reason: String,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The output directory already holds files and overwriting was not allowed
    TargetDirectoryNotEmpty {
        /// Path of the non-empty directory
        path: PathBuf,
    },

    /// Sampler or dataset parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// The sampling region cannot fit a single tile
    RegionTooSmall {
        /// Sampling region width in pixels
        region_width: i64,
        /// Sampling region height in pixels
        region_height: i64,
        /// Requested tile width in pixels
        tile_width: usize,
        /// Requested tile height in pixels
        tile_height: usize,
    },

    /// Every drawn rectangle clipped a label while partial rejection was active
    ///
    /// Raised when the redraw budget runs out, which means the region is so
    /// dense with labels that no tile placement avoids cutting one.
    PartialSearchExhausted {
        /// Number of rectangles drawn before giving up
        attempts: usize,
    },
}

impl fmt::Display for DatasetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::LabelParse { path, line, reason } => {
                write!(
                    f,
                    "Malformed label in '{}' line {line}: {reason}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::TargetDirectoryNotEmpty { path } => {
                write!(
                    f,
                    "Target directory '{}' is not empty (pass --overwrite to reuse it)",
                    path.display()
                )
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::RegionTooSmall {
                region_width,
                region_height,
                tile_width,
                tile_height,
            } => {
                write!(
                    f,
                    "Sampling region of {region_width}x{region_height} px cannot fit a \
                     {tile_width}x{tile_height} tile"
                )
            }
            Self::PartialSearchExhausted { attempts } => {
                write!(
                    f,
                    "No tile placement without a partially cut label found after {attempts} \
                     attempts"
                )
            }
        }
    }
}

impl std::error::Error for DatasetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for dataset results
pub type Result<T> = std::result::Result<T, DatasetError>;

impl From<image::ImageError> for DatasetError {
    fn from(err: image::ImageError) -> Self {
        Self::ImageLoad {
            path: PathBuf::from("<unknown>"),
            source: err,
        }
    }
}

impl From<std::io::Error> for DatasetError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> DatasetError {
    DatasetError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a file system error bound to a path and operation
pub fn file_system_error(
    path: &std::path::Path,
    operation: &'static str,
    source: std::io::Error,
) -> DatasetError {
    DatasetError::FileSystem {
        path: path.to_path_buf(),
        operation,
        source,
    }
}
