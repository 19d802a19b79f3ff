//! Print job and document descriptor types

use crate::encoding::PayloadEncoding;
use crate::error::PrintResult;

/// Spooler data type that disables any driver-side reinterpretation
pub const RAW_DATA_TYPE: &str = "RAW";

/// Document name shown in the spooler queue
pub const RAW_DOCUMENT_NAME: &str = "Raw Print Job";

/// One raw print job: a target printer and the bytes to send it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintJob {
    pub printer_name: String,
    pub payload: Vec<u8>,
}

impl PrintJob {
    pub fn new(printer_name: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            printer_name: printer_name.into(),
            payload,
        }
    }

    /// Build a job from encoded payload text
    pub fn decode(
        printer_name: impl Into<String>,
        text: &str,
        encoding: PayloadEncoding,
    ) -> PrintResult<Self> {
        let payload = encoding.decode(text)?;
        Ok(Self::new(printer_name, payload))
    }

    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

/// Document declared when starting a spool job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentDescriptor {
    pub name: &'static str,
    pub data_type: &'static str,
}

impl DocumentDescriptor {
    /// The only descriptor the transaction ever uses
    pub const RAW: DocumentDescriptor = DocumentDescriptor {
        name: RAW_DOCUMENT_NAME,
        data_type: RAW_DATA_TYPE,
    };
}

impl Default for DocumentDescriptor {
    fn default() -> Self {
        Self::RAW
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_job() {
        let job = PrintJob::decode("Kitchen", "1B 40", PayloadEncoding::Hex).unwrap();
        assert_eq!(job.printer_name, "Kitchen");
        assert_eq!(job.payload, vec![0x1B, 0x40]);
        assert_eq!(job.len(), 2);
        assert!(!job.is_empty());
    }

    #[test]
    fn test_decode_job_malformed() {
        assert!(PrintJob::decode("Kitchen", "@@@", PayloadEncoding::Base64).is_err());
    }

    #[test]
    fn test_raw_descriptor() {
        let doc = DocumentDescriptor::default();
        assert_eq!(doc.name, "Raw Print Job");
        assert_eq!(doc.data_type, "RAW");
    }
}
