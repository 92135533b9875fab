//! Fake converter and printer capabilities for integration tests.

use async_trait::async_trait;
use printer_bot::{ConvertError, Converter, PrintError, Printer, PrinterStatus};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Converter that copies the input to `<input stem>.pdf`, or fails when told to.
pub struct FakeConverter {
    fail: bool,
    pages: u32,
    calls: AtomicUsize,
}

impl FakeConverter {
    pub fn ok(pages: u32) -> Self {
        Self {
            fail: false,
            pages,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            pages: 0,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Converter for FakeConverter {
    async fn convert_to_pdf(&self, input: &Path) -> Result<PathBuf, ConvertError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ConvertError::Failed {
                status: 1,
                stderr: "synthetic conversion failure".to_string(),
            });
        }
        let out = input.with_extension("pdf");
        if out != input {
            tokio::fs::copy(input, &out).await?;
        }
        Ok(out)
    }

    async fn page_count(&self, _pdf: &Path) -> Result<u32, ConvertError> {
        Ok(self.pages)
    }
}

/// Printer that records printed paths; can be told to fail with stderr text.
pub struct FakePrinter {
    fail: Option<String>,
    printed: Mutex<Vec<PathBuf>>,
}

impl FakePrinter {
    pub fn ok() -> Self {
        Self {
            fail: None,
            printed: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(stderr: &str) -> Self {
        Self {
            fail: Some(stderr.to_string()),
            printed: Mutex::new(Vec::new()),
        }
    }

    pub fn printed(&self) -> Vec<PathBuf> {
        self.printed.lock().unwrap().clone()
    }
}

#[async_trait]
impl Printer for FakePrinter {
    async fn print(&self, file: &Path) -> Result<(), PrintError> {
        if let Some(stderr) = &self.fail {
            return Err(PrintError::Failed {
                status: 1,
                stderr: stderr.clone(),
            });
        }
        self.printed.lock().unwrap().push(file.to_path_buf());
        Ok(())
    }

    async fn status(&self) -> Result<PrinterStatus, PrintError> {
        Ok(PrinterStatus {
            printers: "printer Fake is idle".to_string(),
            queue: "no entries".to_string(),
        })
    }
}
