//! Spooler seam
//!
//! The OS print subsystem is reached through two traits:
//! - [`Spooler`]: the open/write/close primitives of one job handshake
//! - [`PrinterCatalog`]: enumeration of installed printers
//!
//! [`RawPrinter`] is the object-safe facade built on top of both, which is
//! what an application holds on to.

use serde::{Deserialize, Serialize};

use crate::error::PrintResult;
use crate::job::DocumentDescriptor;
use crate::transaction::SpoolTransaction;

/// Failure of a single spooler primitive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpoolerFault {
    /// OS error code (`GetLastError` on Windows)
    pub code: u32,
    pub message: String,
}

impl SpoolerFault {
    pub fn new(code: u32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for SpoolerFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "error {}: {}", self.code, self.message)
    }
}

impl std::error::Error for SpoolerFault {}

/// Result type for spooler primitives
pub type SpoolerResult<T> = Result<T, SpoolerFault>;

/// Handshake primitives of the OS print spooler
///
/// Every call is blocking. Implementations must not cache handles: each
/// `open_printer` yields a fresh handle that the caller releases with
/// `close_printer`.
pub trait Spooler {
    /// Opaque handle to an open printer connection
    type Handle: Copy + std::fmt::Debug;

    fn open_printer(&self, name: &str) -> SpoolerResult<Self::Handle>;

    fn start_doc(&self, handle: Self::Handle, doc: &DocumentDescriptor) -> SpoolerResult<()>;

    fn start_page(&self, handle: Self::Handle) -> SpoolerResult<()>;

    /// Write `data` in a single call, returning the byte count the OS accepted
    fn write(&self, handle: Self::Handle, data: &[u8]) -> SpoolerResult<usize>;

    fn end_page(&self, handle: Self::Handle) -> SpoolerResult<()>;

    fn end_doc(&self, handle: Self::Handle) -> SpoolerResult<()>;

    fn close_printer(&self, handle: Self::Handle) -> SpoolerResult<()>;
}

/// An installed printer as reported by the spooler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrinterInfo {
    pub name: String,
    pub status: String,
    pub is_offline: bool,
    pub is_busy: bool,
    pub location: String,
    pub port: String,
    pub is_default: bool,
    pub is_virtual: bool,
}

/// Enumeration of installed printers
pub trait PrinterCatalog {
    fn printers(&self) -> PrintResult<Vec<PrinterInfo>>;
}

/// Object-safe print backend
///
/// Blanket-implemented for every `Spooler + PrinterCatalog`, so the
/// application can hold an `Arc<dyn RawPrinter>` without knowing the
/// platform handle type.
pub trait RawPrinter: Send + Sync {
    /// Send `data` to `printer` in one spool transaction (blocking)
    fn print_raw(&self, printer: &str, data: &[u8]) -> PrintResult<()>;

    /// List installed printers (blocking)
    fn printers(&self) -> PrintResult<Vec<PrinterInfo>>;
}

impl<S> RawPrinter for S
where
    S: Spooler + PrinterCatalog + Send + Sync,
{
    fn print_raw(&self, printer: &str, data: &[u8]) -> PrintResult<()> {
        SpoolTransaction::new(self).submit(printer, data)
    }

    fn printers(&self) -> PrintResult<Vec<PrinterInfo>> {
        PrinterCatalog::printers(self)
    }
}

// Spooler status bits (winspool.h PRINTER_STATUS_*)
const STATUS_NAMES: &[(u32, &str)] = &[
    (0x0000_0001, "Paused"),
    (0x0000_0002, "Error"),
    (0x0000_0004, "PendingDeletion"),
    (0x0000_0008, "PaperJam"),
    (0x0000_0010, "PaperOut"),
    (0x0000_0020, "ManualFeed"),
    (0x0000_0040, "PaperProblem"),
    (0x0000_0080, "Offline"),
    (0x0000_0100, "IOActive"),
    (0x0000_0200, "Busy"),
    (0x0000_0400, "Printing"),
    (0x0000_0800, "OutputBinFull"),
    (0x0000_1000, "NotAvailable"),
    (0x0000_2000, "Waiting"),
    (0x0000_4000, "Processing"),
    (0x0000_8000, "Initializing"),
    (0x0001_0000, "WarmingUp"),
    (0x0002_0000, "TonerLow"),
    (0x0004_0000, "NoToner"),
    (0x0008_0000, "PagePunt"),
    (0x0010_0000, "UserIntervention"),
    (0x0020_0000, "OutOfMemory"),
    (0x0040_0000, "DoorOpen"),
    (0x0080_0000, "ServerUnknown"),
    (0x0100_0000, "PowerSave"),
];

/// Human-readable form of a spooler status bitmask
///
/// `0` is `"Normal"`; otherwise the set flag names joined by `", "`.
pub fn describe_status(status: u32) -> String {
    if status == 0 {
        return "Normal".to_string();
    }

    let names: Vec<&str> = STATUS_NAMES
        .iter()
        .filter(|(bit, _)| status & bit != 0)
        .map(|(_, name)| *name)
        .collect();

    if names.is_empty() {
        format!("Unknown(0x{:08X})", status)
    } else {
        names.join(", ")
    }
}

/// Check if a port is a virtual printer port (file, XPS, OneNote, ...)
pub fn is_virtual_port(port: &str) -> bool {
    let p = port.to_lowercase();
    p == "file:"
        || p == "portprompt:"
        || p == "xpsport:"
        || p.starts_with("onenote")
        || p == "nul:"
        || p.starts_with("wfsport:")
}
