//! Raw spool transaction
//!
//! One job is one handshake with the spooler:
//!
//! ```text
//! Idle -> HandleOpen -> DocOpen -> PageOpen -> Written
//!      -> PageClosed -> DocClosed -> HandleClosed
//! ```
//!
//! Every acquired layer (printer handle, document, page) is owned by a guard.
//! If a step fails, returning early drops the guards acquired so far in
//! reverse order, which releases exactly those layers. On the success path
//! the guards are released explicitly and release failures are only logged,
//! since the spooler already holds the payload at that point.

use tracing::{debug, info, instrument, warn};

use crate::error::{PrintError, PrintResult};
use crate::job::DocumentDescriptor;
use crate::spooler::{Spooler, SpoolerFault, SpoolerResult};

/// Win32 ERROR_INVALID_PRINTER_NAME
const INVALID_PRINTER_NAME: u32 = 1801;

/// Step reached by a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TransactionState {
    Idle,
    HandleOpen,
    DocOpen,
    PageOpen,
    Written,
    PageClosed,
    DocClosed,
    HandleClosed,
}

/// A resource layer held during the handshake
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layer {
    Printer,
    Document,
    Page,
}

impl Layer {
    fn release<S: Spooler>(self, spooler: &S, handle: S::Handle) -> SpoolerResult<()> {
        match self {
            Layer::Printer => spooler.close_printer(handle),
            Layer::Document => spooler.end_doc(handle),
            Layer::Page => spooler.end_page(handle),
        }
    }
}

/// Guard that releases one layer when dropped
struct Acquired<'a, S: Spooler> {
    spooler: &'a S,
    handle: S::Handle,
    layer: Layer,
    released: bool,
}

impl<'a, S: Spooler> Acquired<'a, S> {
    fn new(spooler: &'a S, handle: S::Handle, layer: Layer) -> Self {
        Self {
            spooler,
            handle,
            layer,
            released: false,
        }
    }

    /// Release on the success path, handing the outcome to the caller
    fn release(mut self) -> SpoolerResult<()> {
        self.released = true;
        self.layer.release(self.spooler, self.handle)
    }
}

impl<S: Spooler> Drop for Acquired<'_, S> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        // Rollback: a failed release is logged, outer layers still unwind
        match self.layer.release(self.spooler, self.handle) {
            Ok(()) => debug!(layer = ?self.layer, "Rolled back"),
            Err(fault) => warn!(
                layer = ?self.layer,
                code = fault.code,
                error = %fault.message,
                "Rollback release failed"
            ),
        }
    }
}

/// Executes raw print jobs against a [`Spooler`]
///
/// Holds no per-job state: every [`submit`](Self::submit) performs its own
/// open/close handshake, so one transaction value can be reused and shared.
pub struct SpoolTransaction<'a, S: Spooler> {
    spooler: &'a S,
    document: DocumentDescriptor,
}

impl<'a, S: Spooler> SpoolTransaction<'a, S> {
    pub fn new(spooler: &'a S) -> Self {
        Self {
            spooler,
            document: DocumentDescriptor::RAW,
        }
    }

    /// Send `data` to `printer` as a RAW document
    ///
    /// Blocks until the spooler has accepted or rejected the job.
    #[instrument(skip_all, fields(printer = %printer, bytes = data.len()))]
    pub fn submit(&self, printer: &str, data: &[u8]) -> PrintResult<()> {
        if data.is_empty() {
            return Err(PrintError::EmptyPayload);
        }
        if printer.trim().is_empty() {
            return Err(PrintError::DeviceUnavailable {
                printer: printer.to_string(),
                code: INVALID_PRINTER_NAME,
                message: "Printer name is empty".to_string(),
            });
        }

        let mut state = TransactionState::Idle;
        let spooler = self.spooler;

        let handle = spooler
            .open_printer(printer)
            .map_err(|fault| {
                failed(
                    state,
                    PrintError::DeviceUnavailable {
                        printer: printer.to_string(),
                        code: fault.code,
                        message: fault.message,
                    },
                )
            })?;
        let printer_guard = Acquired::new(spooler, handle, Layer::Printer);
        state = TransactionState::HandleOpen;
        debug!(?handle, "Printer opened");

        spooler.start_doc(handle, &self.document).map_err(|fault| {
            failed(
                state,
                PrintError::DocumentOpenFailed {
                    code: fault.code,
                    message: fault.message,
                },
            )
        })?;
        let doc_guard = Acquired::new(spooler, handle, Layer::Document);
        state = TransactionState::DocOpen;

        spooler.start_page(handle).map_err(|fault| {
            failed(
                state,
                PrintError::PageOpenFailed {
                    code: fault.code,
                    message: fault.message,
                },
            )
        })?;
        let page_guard = Acquired::new(spooler, handle, Layer::Page);
        state = TransactionState::PageOpen;

        let written = spooler.write(handle, data).map_err(|fault| {
            failed(
                state,
                PrintError::WriteFailed {
                    written: 0,
                    expected: data.len(),
                    code: fault.code,
                    message: fault.message,
                },
            )
        })?;
        if written != data.len() {
            return Err(failed(
                state,
                PrintError::WriteFailed {
                    written,
                    expected: data.len(),
                    code: 0,
                    message: "Incomplete write".to_string(),
                },
            ));
        }
        state = TransactionState::Written;

        // Payload accepted; teardown failures no longer affect the outcome
        teardown(page_guard, &mut state, TransactionState::PageClosed);
        teardown(doc_guard, &mut state, TransactionState::DocClosed);
        teardown(printer_guard, &mut state, TransactionState::HandleClosed);

        info!(?state, "Print job sent successfully");
        Ok(())
    }
}

fn failed(state: TransactionState, err: PrintError) -> PrintError {
    warn!(?state, error = %err, "Spool transaction failed, rolling back");
    err
}

fn teardown<S: Spooler>(
    guard: Acquired<'_, S>,
    state: &mut TransactionState,
    next: TransactionState,
) {
    let layer = guard.layer;
    if let Err(SpoolerFault { code, message }) = guard.release() {
        warn!(?layer, code, error = %message, "Teardown failed after successful write, ignoring");
    }
    *state = next;
}
