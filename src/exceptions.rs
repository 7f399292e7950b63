//! Error types for makeip

use crate::exit_codes::{
    EXIT_ERROR, EXIT_FIELD_ERROR, EXIT_IMAGE_ERROR, EXIT_IO_ERROR, EXIT_TEMPLATE_ERROR,
};
use std::fmt;
use std::path::PathBuf;

/// Main error type for makeip operations
#[derive(Debug)]
pub enum MakeipError {
    /// Value is longer than the fixed width of its field
    TooLong { field: &'static str, max: usize },

    /// Field validator rejected the value
    InvalidValue { field: &'static str, reason: String },

    /// Text template names a field that does not exist
    UnknownField { name: String, line: usize },

    /// Non-empty text template line without a `:` separator
    MissingColon { line: usize },

    /// Source raster uses more distinct colors than the MR palette holds
    PaletteOverflow { limit: usize },

    /// Logo input produced no data
    EmptyImage,

    /// Raster is larger than the boot screen can show
    LogoTooLarge {
        width: u32,
        height: u32,
        max_width: u32,
        max_height: u32,
    },

    /// Input bytes are not a format we can read
    Unsupported(String),

    /// Input is recognised but structurally broken
    InvalidFormat(String),

    /// Image decoder/encoder failure
    ImageError(String),

    /// One or more field assignments failed
    FieldErrors(Vec<MakeipError>),

    /// Output already exists and overwriting was not requested
    OutputExists(PathBuf),

    /// IO error on a named path
    FileError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Generic error with message
    Generic(String),
}

impl MakeipError {
    /// Attach a path to an IO error
    pub fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MakeipError::FileError {
            path: path.into(),
            source,
        }
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            MakeipError::TooLong { .. }
            | MakeipError::InvalidValue { .. }
            | MakeipError::FieldErrors(_) => EXIT_FIELD_ERROR,
            MakeipError::UnknownField { .. } | MakeipError::MissingColon { .. } => {
                EXIT_TEMPLATE_ERROR
            }
            MakeipError::PaletteOverflow { .. }
            | MakeipError::EmptyImage
            | MakeipError::LogoTooLarge { .. }
            | MakeipError::Unsupported(_)
            | MakeipError::ImageError(_) => EXIT_IMAGE_ERROR,
            MakeipError::InvalidFormat(_) => EXIT_TEMPLATE_ERROR,
            MakeipError::OutputExists(_)
            | MakeipError::FileError { .. } => EXIT_IO_ERROR,
            MakeipError::Generic(_) => EXIT_ERROR,
        }
    }
}

impl fmt::Display for MakeipError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MakeipError::TooLong { field, max } => {
                write!(f, "data for field \"{field}\" is too long (max {max} chars)")
            }
            MakeipError::InvalidValue { field, reason } => {
                write!(f, "field \"{field}\" {reason}")
            }
            MakeipError::UnknownField { name, line } => {
                write!(f, "unknown field \"{name}\" on line {line}")
            }
            MakeipError::MissingColon { line } => {
                write!(f, "missing colon (\":\") on line {line}")
            }
            MakeipError::PaletteOverflow { limit } => {
                write!(f, "image has more than {limit} colors")
            }
            MakeipError::EmptyImage => write!(f, "image is empty"),
            MakeipError::LogoTooLarge {
                width,
                height,
                max_width,
                max_height,
            } => write!(
                f,
                "image is {width}x{height}, it should be {max_width}x{max_height} or smaller"
            ),
            MakeipError::Unsupported(msg) => write!(f, "Unsupported format: {msg}"),
            MakeipError::InvalidFormat(msg) => write!(f, "Invalid format: {msg}"),
            MakeipError::ImageError(msg) => write!(f, "Image error: {msg}"),
            MakeipError::FieldErrors(errors) => {
                write!(f, "field error; fix incorrect value(s) and try again")?;
                for err in errors {
                    write!(f, "\n  {err}")?;
                }
                Ok(())
            }
            MakeipError::OutputExists(path) => {
                write!(f, "output file \"{}\" already exists", path.display())
            }
            MakeipError::FileError { path, source } => {
                write!(f, "IO error on \"{}\": {source}", path.display())
            }
            MakeipError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for MakeipError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MakeipError::FileError { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<image::ImageError> for MakeipError {
    fn from(err: image::ImageError) -> Self {
        MakeipError::ImageError(err.to_string())
    }
}

/// Result type for makeip operations
pub type Result<T> = std::result::Result<T, MakeipError>;
