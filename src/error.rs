//! Error types for the pdf2slides library.
//!
//! The extraction core distinguishes two failure classes, but only one of
//! them is an error:
//!
//! * [`ExtractError`] — **Fatal**: the document cannot be opened or read at
//!   all (missing file, bad magic bytes, corrupt xref, wrong password,
//!   pdfium binding failure). Returned as `Err(ExtractError)` from the
//!   top-level `extract*` functions.
//!
//! * Quality degradation is **not** an error. A sparse or badly structured
//!   markdown extraction is absorbed by the strategy selector, which falls
//!   back to font-geometry extraction and still returns `Ok`. Likewise a
//!   page with no usable text yields a default `"Slide N"` record rather
//!   than failing. Callers that care can read the selection reason from
//!   [`crate::output::ExtractionOutput`].

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdf2slides library.
///
/// Content-quality conditions never appear here; they degrade gracefully to
/// a best-effort `(title, body)` pair via the fallback strategy.
#[derive(Debug, Error)]
pub enum ExtractError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}\nTry repairing with: qpdf --decrypt input.pdf output.pdf")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output slides file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Set PDFIUM_LIB_PATH=/path/to/libpdfium to use an existing copy,\n\
or install pdfium where the system loader can find it.\n"
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}
