//! Print dispatcher: wraps the OS spooler commands and drives job state transitions.
//!
//! Exit code and captured stderr are the whole contract with the spooler; a failed
//! job is never re-queued, the user resubmits the upload.

use async_trait::async_trait;
use printbot_core::{PrintBotError, PrintError, PrintJob};
use std::path::Path;
use std::sync::Arc;
use tokio::process::Command;
use tracing::{error, info, instrument};

use crate::jobs::JobStore;

/// Spooler state shown by `/start`: configured printers and current queue.
#[derive(Debug, Clone, Default)]
pub struct PrinterStatus {
    pub printers: String,
    pub queue: String,
}

/// Submits documents to the printer. Tests substitute a fake.
#[async_trait]
pub trait Printer: Send + Sync {
    /// Sends the file to the spooler.
    async fn print(&self, file: &Path) -> Result<(), PrintError>;
    /// Current printer and queue state.
    async fn status(&self) -> Result<PrinterStatus, PrintError>;
}

/// lpr/lpstat/lpq backed [`Printer`].
pub struct LprPrinter {
    print_command: String,
    status_command: String,
    queue_command: String,
}

impl LprPrinter {
    pub fn new(
        print_command: impl Into<String>,
        status_command: impl Into<String>,
        queue_command: impl Into<String>,
    ) -> Self {
        Self {
            print_command: print_command.into(),
            status_command: status_command.into(),
            queue_command: queue_command.into(),
        }
    }
}

#[async_trait]
impl Printer for LprPrinter {
    #[instrument(skip(self))]
    async fn print(&self, file: &Path) -> Result<(), PrintError> {
        info!(file = %file.display(), command = %self.print_command, "Submitting file to spooler");
        let output = Command::new(&self.print_command).arg(file).output().await?;
        if output.status.success() {
            Ok(())
        } else {
            Err(PrintError::Failed {
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }

    async fn status(&self) -> Result<PrinterStatus, PrintError> {
        let printers = Command::new(&self.status_command)
            .arg("-p")
            .output()
            .await?;
        let queue = Command::new(&self.queue_command).output().await?;
        Ok(PrinterStatus {
            printers: String::from_utf8_lossy(&printers.stdout).trim().to_string(),
            queue: String::from_utf8_lossy(&queue.stdout).trim().to_string(),
        })
    }
}

/// Executes one job against the spooler and records the outcome in the store.
pub struct PrintDispatcher {
    jobs: Arc<JobStore>,
    printer: Arc<dyn Printer>,
}

impl PrintDispatcher {
    pub fn new(jobs: Arc<JobStore>, printer: Arc<dyn Printer>) -> Self {
        Self { jobs, printer }
    }

    /// Takes a pending job to `printing`, submits the artifact, and records
    /// `completed` or `failed`. A job cancelled while pending is observed at
    /// `begin_printing` and never reaches the spooler.
    #[instrument(skip(self, artifact))]
    pub async fn dispatch(&self, job_id: u64, artifact: &Path) -> Result<PrintJob, PrintBotError> {
        self.jobs.begin_printing(job_id).await?;
        match self.printer.print(artifact).await {
            Ok(()) => {
                let job = self.jobs.complete(job_id).await?;
                info!(job_id, "Job completed");
                Ok(job)
            }
            Err(e) => {
                error!(job_id, error = %e, "Print command failed");
                let job = self.jobs.fail(job_id, &e.to_string()).await?;
                Ok(job)
            }
        }
    }
}
