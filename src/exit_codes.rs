//! Standard exit codes for makeip binaries
//!
//! Shared by `makeip` and `ipinfo` so scripts can tell failure classes apart.

/// Successful execution
pub const EXIT_SUCCESS: i32 = 0;

/// Generic failure; `ipinfo` also uses it for a checksum mismatch
pub const EXIT_ERROR: i32 = 1;

/// Panic or unrecoverable error
pub const EXIT_PANIC: i32 = 101;

/// Invalid command-line arguments
pub const EXIT_INVALID_ARGS: i32 = 105;

/// I/O error (file not found, permission denied, output exists)
pub const EXIT_IO_ERROR: i32 = 106;

/// One or more field values were rejected
pub const EXIT_FIELD_ERROR: i32 = 111;

/// Text template or base template could not be parsed
pub const EXIT_TEMPLATE_ERROR: i32 = 112;

/// Logo could not be read, converted or decoded
pub const EXIT_IMAGE_ERROR: i32 = 113;

/// Exit code for an error surfaced at a binary's boundary.
///
/// Context added with `anyhow` is looked through to the underlying
/// `MakeipError`; anything else is a generic failure.
pub fn for_error(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<crate::exceptions::MakeipError>()
        .map_or(EXIT_ERROR, crate::exceptions::MakeipError::exit_code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exceptions::MakeipError;
    use anyhow::Context;

    #[test]
    fn test_for_error_sees_through_context() {
        let err = Err::<(), _>(MakeipError::EmptyImage)
            .context("loading logo \"logo.png\"")
            .unwrap_err();
        assert_eq!(for_error(&err), EXIT_IMAGE_ERROR);
        assert!(format!("{err:#}").contains("image is empty"));
    }

    #[test]
    fn test_for_error_plain_and_foreign() {
        let err = anyhow::Error::new(MakeipError::MissingColon { line: 2 });
        assert_eq!(for_error(&err), EXIT_TEMPLATE_ERROR);
        assert_eq!(for_error(&anyhow::anyhow!("something else")), EXIT_ERROR);
    }
}
