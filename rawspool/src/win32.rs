//! Windows print spooler backend
//!
//! Thin wrappers over the winspool primitives. All sequencing and rollback
//! lives in [`SpoolTransaction`](crate::SpoolTransaction); this module only
//! maps each Win32 call to a [`SpoolerResult`].

use core::ffi::c_void;

use tracing::debug;
use windows::Win32::Foundation::GetLastError;
use windows::Win32::Graphics::Printing::{
    ClosePrinter, DOC_INFO_1W, EndDocPrinter, EndPagePrinter, EnumPrintersW, GetDefaultPrinterW,
    OpenPrinterW, PRINTER_ENUM_CONNECTIONS, PRINTER_ENUM_LOCAL, PRINTER_HANDLE, PRINTER_INFO_2W,
    StartDocPrinterW, StartPagePrinter, WritePrinter,
};
use windows::core::{PCWSTR, PWSTR};

use crate::error::{PrintError, PrintResult};
use crate::job::DocumentDescriptor;
use crate::spooler::{
    PrinterCatalog, PrinterInfo, Spooler, SpoolerFault, SpoolerResult, describe_status,
    is_virtual_port,
};

/// PRINTER_STATUS_OFFLINE
const STATUS_OFFLINE: u32 = 0x0000_0080;
/// PRINTER_STATUS_BUSY | PRINTER_STATUS_PRINTING | PRINTER_STATUS_PROCESSING
const STATUS_BUSY_MASK: u32 = 0x0000_0200 | 0x0000_0400 | 0x0000_4000;

/// PRINTER_ATTRIBUTE_WORK_OFFLINE
const ATTRIBUTE_WORK_OFFLINE: u32 = 0x0000_0400;

fn to_wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

/// Fault from the calling thread's last Win32 error
fn last_fault(call: &str) -> SpoolerFault {
    let err = unsafe { GetLastError() };
    SpoolerFault::new(
        err.0,
        format!("{} failed: {}", call, err.to_hresult().message()),
    )
}

fn fault_from(call: &str, e: windows::core::Error) -> SpoolerFault {
    // HRESULT_FROM_WIN32 carries the Win32 code in the low word
    let hr = e.code().0 as u32;
    let code = if hr & 0xFFFF_0000 == 0x8007_0000 {
        hr & 0xFFFF
    } else {
        hr
    };
    SpoolerFault::new(code, format!("{} failed: {}", call, e.message()))
}

unsafe fn pwstr_to_string(p: PWSTR) -> String {
    if p.is_null() {
        String::new()
    } else {
        unsafe { p.to_string().unwrap_or_default() }
    }
}

/// Installed-driver printing through winspool
#[derive(Debug, Clone, Copy, Default)]
pub struct WinSpooler;

impl WinSpooler {
    pub fn new() -> Self {
        Self
    }

    /// Get the default printer name
    pub fn default_printer() -> PrintResult<Option<String>> {
        unsafe {
            let mut needed: u32 = 0;
            let _ = GetDefaultPrinterW(None, &mut needed);

            if needed == 0 {
                return Ok(None);
            }

            let mut buf: Vec<u16> = vec![0; needed as usize];
            let ok = GetDefaultPrinterW(Some(PWSTR(buf.as_mut_ptr())), &mut needed);

            if !ok.as_bool() {
                return Ok(None);
            }

            let name = PWSTR(buf.as_mut_ptr())
                .to_string()
                .map_err(|e| PrintError::Catalog(format!("UTF-16 decode failed: {}", e)))?;

            Ok(Some(name))
        }
    }
}

impl Spooler for WinSpooler {
    type Handle = PRINTER_HANDLE;

    fn open_printer(&self, name: &str) -> SpoolerResult<PRINTER_HANDLE> {
        let name_w = to_wide(name);
        let mut handle = PRINTER_HANDLE::default();

        unsafe { OpenPrinterW(PCWSTR::from_raw(name_w.as_ptr()), &mut handle, None) }
            .map_err(|e| fault_from("OpenPrinterW", e))?;

        Ok(handle)
    }

    fn start_doc(&self, handle: PRINTER_HANDLE, doc: &DocumentDescriptor) -> SpoolerResult<()> {
        let doc_name_w = to_wide(doc.name);
        let datatype_w = to_wide(doc.data_type);
        let doc_info = DOC_INFO_1W {
            pDocName: PWSTR(doc_name_w.as_ptr() as *mut _),
            pOutputFile: PWSTR::null(),
            pDatatype: PWSTR(datatype_w.as_ptr() as *mut _),
        };

        let job_id = unsafe { StartDocPrinterW(handle, 1, &doc_info as *const DOC_INFO_1W) };
        if job_id == 0 {
            return Err(last_fault("StartDocPrinterW"));
        }

        debug!(job_id, "Spool job started");
        Ok(())
    }

    fn start_page(&self, handle: PRINTER_HANDLE) -> SpoolerResult<()> {
        if unsafe { StartPagePrinter(handle) }.as_bool() {
            Ok(())
        } else {
            Err(last_fault("StartPagePrinter"))
        }
    }

    fn write(&self, handle: PRINTER_HANDLE, data: &[u8]) -> SpoolerResult<usize> {
        let len = u32::try_from(data.len())
            .map_err(|_| SpoolerFault::new(0, "Payload exceeds 4 GiB"))?;

        let mut written: u32 = 0;
        let ok = unsafe {
            WritePrinter(handle, data.as_ptr() as *const c_void, len, &mut written)
        };

        if !ok.as_bool() {
            return Err(last_fault("WritePrinter"));
        }

        Ok(written as usize)
    }

    fn end_page(&self, handle: PRINTER_HANDLE) -> SpoolerResult<()> {
        if unsafe { EndPagePrinter(handle) }.as_bool() {
            Ok(())
        } else {
            Err(last_fault("EndPagePrinter"))
        }
    }

    fn end_doc(&self, handle: PRINTER_HANDLE) -> SpoolerResult<()> {
        if unsafe { EndDocPrinter(handle) }.as_bool() {
            Ok(())
        } else {
            Err(last_fault("EndDocPrinter"))
        }
    }

    fn close_printer(&self, handle: PRINTER_HANDLE) -> SpoolerResult<()> {
        unsafe { ClosePrinter(handle) }.map_err(|e| fault_from("ClosePrinter", e))
    }
}

impl PrinterCatalog for WinSpooler {
    /// List local and connected printers (PRINTER_INFO_2)
    fn printers(&self) -> PrintResult<Vec<PrinterInfo>> {
        let default = Self::default_printer().unwrap_or(None);

        unsafe {
            let flags = PRINTER_ENUM_LOCAL | PRINTER_ENUM_CONNECTIONS;
            let mut needed: u32 = 0;
            let mut returned: u32 = 0;

            let _ = EnumPrintersW(flags, None, 2, None, &mut needed, &mut returned);

            if needed == 0 {
                return Ok(Vec::new());
            }

            let mut buf: Vec<u8> = vec![0; needed as usize];
            EnumPrintersW(
                flags,
                None,
                2,
                Some(buf.as_mut_slice()),
                &mut needed,
                &mut returned,
            )
            .map_err(|e| PrintError::Catalog(format!("EnumPrintersW failed: {}", e.message())))?;

            let ptr = buf.as_ptr() as *const PRINTER_INFO_2W;
            let slice = std::slice::from_raw_parts(ptr, returned as usize);

            let mut result = Vec::with_capacity(slice.len());
            for info in slice.iter() {
                if info.pPrinterName.is_null() {
                    continue;
                }
                let name = pwstr_to_string(info.pPrinterName);
                let port = pwstr_to_string(info.pPortName);
                let location = pwstr_to_string(info.pLocation);

                result.push(PrinterInfo {
                    status: describe_status(info.Status),
                    is_offline: info.Status & STATUS_OFFLINE != 0
                        || info.Attributes & ATTRIBUTE_WORK_OFFLINE != 0,
                    is_busy: info.Status & STATUS_BUSY_MASK != 0,
                    location,
                    is_default: default.as_deref() == Some(name.as_str()),
                    is_virtual: is_virtual_port(&port),
                    port,
                    name,
                });
            }

            Ok(result)
        }
    }
}
