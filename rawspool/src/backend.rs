//! Platform backend selection and async bridge
//!
//! Spooler calls block, so async callers go through [`print_job`] and
//! [`list_printers`], which run the work on tokio's blocking pool. A job
//! started this way always runs to completion, even if the awaiting future
//! is dropped.

use std::sync::Arc;

use tracing::instrument;

use crate::error::{PrintError, PrintResult};
use crate::job::{DocumentDescriptor, PrintJob};
use crate::spooler::{PrinterCatalog, PrinterInfo, RawPrinter, Spooler, SpoolerFault, SpoolerResult};

/// Win32 ERROR_NOT_SUPPORTED
const NOT_SUPPORTED: u32 = 50;

/// Backend for platforms without a supported spooler
///
/// Every printer is unavailable and the catalog is empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSpooler;

impl Spooler for NoSpooler {
    type Handle = ();

    fn open_printer(&self, _name: &str) -> SpoolerResult<()> {
        Err(SpoolerFault::new(
            NOT_SUPPORTED,
            "Driver printing not supported on this platform",
        ))
    }

    fn start_doc(&self, _handle: (), _doc: &DocumentDescriptor) -> SpoolerResult<()> {
        Err(SpoolerFault::new(NOT_SUPPORTED, "No open printer"))
    }

    fn start_page(&self, _handle: ()) -> SpoolerResult<()> {
        Err(SpoolerFault::new(NOT_SUPPORTED, "No open printer"))
    }

    fn write(&self, _handle: (), _data: &[u8]) -> SpoolerResult<usize> {
        Err(SpoolerFault::new(NOT_SUPPORTED, "No open printer"))
    }

    fn end_page(&self, _handle: ()) -> SpoolerResult<()> {
        Ok(())
    }

    fn end_doc(&self, _handle: ()) -> SpoolerResult<()> {
        Ok(())
    }

    fn close_printer(&self, _handle: ()) -> SpoolerResult<()> {
        Ok(())
    }
}

impl PrinterCatalog for NoSpooler {
    fn printers(&self) -> PrintResult<Vec<PrinterInfo>> {
        Ok(Vec::new())
    }
}

/// The spooler backend for the current platform
#[cfg(windows)]
pub fn system_backend() -> Arc<dyn RawPrinter> {
    Arc::new(crate::win32::WinSpooler::new())
}

/// The spooler backend for the current platform
#[cfg(not(windows))]
pub fn system_backend() -> Arc<dyn RawPrinter> {
    tracing::warn!("No print spooler backend for this platform, all printers unavailable");
    Arc::new(NoSpooler)
}

/// Run one job on the blocking pool
#[instrument(skip_all, fields(printer = %job.printer_name, bytes = job.len()))]
pub async fn print_job(backend: Arc<dyn RawPrinter>, job: PrintJob) -> PrintResult<()> {
    tokio::task::spawn_blocking(move || backend.print_raw(&job.printer_name, &job.payload))
        .await
        .map_err(|e| PrintError::Task(e.to_string()))?
}

/// List printers on the blocking pool
pub async fn list_printers(backend: Arc<dyn RawPrinter>) -> PrintResult<Vec<PrinterInfo>> {
    tokio::task::spawn_blocking(move || backend.printers())
        .await
        .map_err(|e| PrintError::Task(e.to_string()))?
}
