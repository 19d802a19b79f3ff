//! # rawspool
//!
//! Raw print jobs through the operating system's print spooler.
//!
//! ## Scope
//!
//! This crate handles HOW bytes reach a printer:
//! - Decoding hex / base64 payload text into raw bytes
//! - The spool handshake (open printer, start doc, start page, write,
//!   then close everything in reverse) with rollback on every failure
//! - Listing installed printers
//! - Windows driver printing (winspool)
//!
//! It never looks inside the payload. What the bytes mean (ESC/POS, ZPL,
//! PCL, ...) is the printer's business.
//!
//! ## Example
//!
//! ```ignore
//! use rawspool::{PayloadEncoding, PrintJob, system_backend};
//!
//! let job = PrintJob::decode("Kitchen", "1B 40 48 69 0A", PayloadEncoding::Hex)?;
//! let backend = system_backend();
//! rawspool::print_job(backend, job).await?;
//! ```

mod backend;
mod encoding;
mod error;
mod job;
mod spooler;
mod transaction;

#[cfg(windows)]
mod win32;

// Re-exports
pub use backend::{NoSpooler, list_printers, print_job, system_backend};
pub use encoding::{PayloadEncoding, decode_base64, decode_hex};
pub use error::{ErrorKind, PrintError, PrintResult};
pub use job::{DocumentDescriptor, PrintJob, RAW_DATA_TYPE, RAW_DOCUMENT_NAME};
pub use spooler::{
    PrinterCatalog, PrinterInfo, RawPrinter, Spooler, SpoolerFault, SpoolerResult,
    describe_status, is_virtual_port,
};
pub use transaction::{SpoolTransaction, TransactionState};

#[cfg(windows)]
pub use win32::WinSpooler;
