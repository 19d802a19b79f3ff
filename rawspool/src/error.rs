//! Error types for raw print jobs

use thiserror::Error;

/// Failure of a single print job
///
/// Input errors are raised before any spooler resource is touched. Device
/// errors are raised mid-handshake, after every resource acquired so far
/// has been released again, and carry the OS diagnostic code.
#[derive(Debug, Error)]
pub enum PrintError {
    /// Nothing to print
    #[error("No data to print")]
    EmptyPayload,

    /// Payload text is not valid hex or base64
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// Printer name does not resolve to a usable device
    #[error("Printer unavailable: {printer} (error {code}: {message})")]
    DeviceUnavailable {
        printer: String,
        code: u32,
        message: String,
    },

    /// Spooler refused to start the document
    #[error("StartDocPrinter failed (error {code}: {message})")]
    DocumentOpenFailed { code: u32, message: String },

    /// Spooler refused to start the page
    #[error("StartPagePrinter failed (error {code}: {message})")]
    PageOpenFailed { code: u32, message: String },

    /// Write failed or was incomplete
    #[error("WritePrinter failed: wrote {written} of {expected} bytes (error {code}: {message})")]
    WriteFailed {
        written: usize,
        expected: usize,
        code: u32,
        message: String,
    },

    /// Printer enumeration failed
    #[error("Printer enumeration failed: {0}")]
    Catalog(String),

    /// Blocking spooler task did not complete
    #[error("Task join failed: {0}")]
    Task(String),
}

/// Coarse classification of a [`PrintError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    EmptyPayload,
    MalformedInput,
    DeviceUnavailable,
    DocumentOpenFailed,
    PageOpenFailed,
    WriteFailed,
    Catalog,
    Task,
}

impl PrintError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PrintError::EmptyPayload => ErrorKind::EmptyPayload,
            PrintError::MalformedInput(_) => ErrorKind::MalformedInput,
            PrintError::DeviceUnavailable { .. } => ErrorKind::DeviceUnavailable,
            PrintError::DocumentOpenFailed { .. } => ErrorKind::DocumentOpenFailed,
            PrintError::PageOpenFailed { .. } => ErrorKind::PageOpenFailed,
            PrintError::WriteFailed { .. } => ErrorKind::WriteFailed,
            PrintError::Catalog(_) => ErrorKind::Catalog,
            PrintError::Task(_) => ErrorKind::Task,
        }
    }

    /// OS error code reported by the spooler, if any
    pub fn os_code(&self) -> Option<u32> {
        match self {
            PrintError::DeviceUnavailable { code, .. }
            | PrintError::DocumentOpenFailed { code, .. }
            | PrintError::PageOpenFailed { code, .. }
            | PrintError::WriteFailed { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// True for errors detected before any device resource was acquired
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            PrintError::EmptyPayload | PrintError::MalformedInput(_)
        )
    }
}

/// Result type for print operations
pub type PrintResult<T> = Result<T, PrintError>;
