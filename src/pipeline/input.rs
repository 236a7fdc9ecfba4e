//! Input validation: confirm a user-supplied path is a readable PDF.
//!
//! pdfium reports most open failures as an undifferentiated load error, so
//! we pre-check the cheap cases — existence, read permission, `%PDF` magic
//! bytes — to hand callers a precise [`ExtractError`] instead of a generic
//! "corrupt document" message.

use crate::error::ExtractError;
use std::path::Path;
use tracing::debug;

/// Validate that `path` exists, is readable, and starts with the PDF magic
/// bytes.
pub fn validate_pdf_path(path: &Path) -> Result<(), ExtractError> {
    if !path.exists() {
        return Err(ExtractError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    match std::fs::File::open(path) {
        Ok(mut f) => {
            use std::io::Read;
            let mut magic = [0u8; 4];
            if f.read_exact(&mut magic).is_ok() && &magic != b"%PDF" {
                return Err(ExtractError::NotAPdf {
                    path: path.to_path_buf(),
                    magic,
                });
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(ExtractError::PermissionDenied {
                path: path.to_path_buf(),
            });
        }
        Err(_) => {
            return Err(ExtractError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
    }

    debug!("Validated PDF input: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_is_not_found() {
        let err = validate_pdf_path(Path::new("/definitely/not/a/real/file.pdf")).unwrap_err();
        assert!(matches!(err, ExtractError::FileNotFound { .. }));
    }

    #[test]
    fn wrong_magic_is_not_a_pdf() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"PK\x03\x04 zip, not pdf").unwrap();
        let err = validate_pdf_path(f.path()).unwrap_err();
        assert!(matches!(err, ExtractError::NotAPdf { .. }));
    }

    #[test]
    fn pdf_magic_passes() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"%PDF-1.7\n%fake body").unwrap();
        assert!(validate_pdf_path(f.path()).is_ok());
    }

    #[test]
    fn short_file_passes_magic_check() {
        // A file shorter than 4 bytes cannot fail the magic check here;
        // pdfium rejects it later as corrupt.
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"%P").unwrap();
        assert!(validate_pdf_path(f.path()).is_ok());
    }
}
