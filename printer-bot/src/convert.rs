//! Converter adapter: wraps the external document-to-PDF tool as a scoped subprocess.
//!
//! The child is spawned with kill_on_drop so a timed-out conversion never outlives
//! its bounded wait; partial output is removed on every failure path.

use async_trait::async_trait;
use printbot_core::ConvertError;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{info, instrument, warn};

/// Extensions the conversion tool is known to accept.
const SUPPORTED_EXTENSIONS: &[&str] = &[
    "pdf", "doc", "docx", "odt", "rtf", "txt", "xls", "xlsx", "ods", "csv", "ppt", "pptx", "odp",
    "jpg", "jpeg", "png", "gif", "bmp", "tiff",
];

/// Turns an uploaded file into a printable PDF. Tests substitute a fake.
#[async_trait]
pub trait Converter: Send + Sync {
    /// Converts `input` to a PDF and returns its path. A PDF input is returned unchanged.
    async fn convert_to_pdf(&self, input: &Path) -> Result<PathBuf, ConvertError>;
    /// Number of pages in a PDF.
    async fn page_count(&self, pdf: &Path) -> Result<u32, ConvertError>;
}

/// LibreOffice-backed [`Converter`]:
/// `<command> --headless --convert-to pdf <input> --outdir <out_dir>`, bounded by a timeout.
pub struct LibreOfficeConverter {
    command: String,
    pdfinfo_command: String,
    out_dir: PathBuf,
    timeout: Duration,
}

impl LibreOfficeConverter {
    pub fn new(command: impl Into<String>, out_dir: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            command: command.into(),
            pdfinfo_command: "pdfinfo".to_string(),
            out_dir: out_dir.into(),
            timeout,
        }
    }

    /// Overrides the pdfinfo command (tests).
    pub fn with_pdfinfo_command(mut self, command: impl Into<String>) -> Self {
        self.pdfinfo_command = command.into();
        self
    }

    /// Path the tool will produce for `input`: `<out_dir>/<stem>.pdf`.
    fn output_path(&self, input: &Path) -> PathBuf {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        self.out_dir.join(format!("{}.pdf", stem))
    }
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
}

/// Parses the page count out of `pdfinfo` output (`Pages:          5`).
fn parse_page_count(output: &str) -> Option<u32> {
    output
        .lines()
        .find(|l| l.starts_with("Pages:"))
        .and_then(|l| l.split_whitespace().nth(1))
        .and_then(|n| n.parse().ok())
}

#[async_trait]
impl Converter for LibreOfficeConverter {
    #[instrument(skip(self))]
    async fn convert_to_pdf(&self, input: &Path) -> Result<PathBuf, ConvertError> {
        let ext = extension_of(input)
            .ok_or_else(|| ConvertError::UnsupportedFormat("<none>".to_string()))?;
        if !SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
            return Err(ConvertError::UnsupportedFormat(ext));
        }
        if ext == "pdf" {
            return Ok(input.to_path_buf());
        }

        let child = Command::new(&self.command)
            .arg("--headless")
            .arg("--convert-to")
            .arg("pdf")
            .arg(input)
            .arg("--outdir")
            .arg(&self.out_dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        // wait_with_output owns the child; when the timeout wins, dropping the
        // branch kills the process (kill_on_drop).
        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result?,
            Err(_) => {
                let _ = tokio::fs::remove_file(self.output_path(input)).await;
                warn!(input = %input.display(), timeout_secs = self.timeout.as_secs(), "Conversion timed out");
                return Err(ConvertError::Timeout(self.timeout.as_secs()));
            }
        };

        if !output.status.success() {
            let _ = tokio::fs::remove_file(self.output_path(input)).await;
            return Err(ConvertError::Failed {
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let produced = self.output_path(input);
        if !produced.exists() {
            return Err(ConvertError::Failed {
                status: 0,
                stderr: format!("converter produced no output at {}", produced.display()),
            });
        }
        info!(input = %input.display(), output = %produced.display(), "Converted to pdf");
        Ok(produced)
    }

    async fn page_count(&self, pdf: &Path) -> Result<u32, ConvertError> {
        let output = Command::new(&self.pdfinfo_command).arg(pdf).output().await?;
        if !output.status.success() {
            return Err(ConvertError::Failed {
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_page_count(&stdout).ok_or_else(|| ConvertError::Failed {
            status: 0,
            stderr: "no Pages line in pdfinfo output".to_string(),
        })
    }
}
