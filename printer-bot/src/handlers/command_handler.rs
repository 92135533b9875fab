//! Command router: maps chat input to auth guard, job store, converter, and dispatcher calls.
//!
//! Every failure is recovered here and turned into a reply; nothing in this
//! handler is fatal to the process. Uploads run inline in the per-update task
//! (the REPL spawns one task per update), with a send-then-edit status message.

use async_trait::async_trait;
use printbot_core::{
    AuthError, Bot, Chat, ConvertError, Document, Handler, HandlerResponse, JobError, JobState,
    Message, PrintBotError, Result,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::auth::AuthGuard;
use crate::commands::{Command, USAGE};
use crate::convert::Converter;
use crate::jobs::JobStore;
use crate::print::{PrintDispatcher, Printer};

const REQUEST_AUTH: &str = "Please authorize by \"/auth <password>\".";

/// Routes every update: commands, file uploads, and plain text.
pub struct CommandHandler {
    bot: Arc<dyn Bot>,
    auth: Arc<AuthGuard>,
    jobs: Arc<JobStore>,
    converter: Arc<dyn Converter>,
    printer: Arc<dyn Printer>,
    dispatcher: PrintDispatcher,
    spool_dir: PathBuf,
    file_size_limit: u64,
    max_pages: Option<u32>,
}

impl CommandHandler {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        bot: Arc<dyn Bot>,
        auth: Arc<AuthGuard>,
        jobs: Arc<JobStore>,
        converter: Arc<dyn Converter>,
        printer: Arc<dyn Printer>,
        dispatcher: PrintDispatcher,
        spool_dir: PathBuf,
        file_size_limit: u64,
        max_pages: Option<u32>,
    ) -> Self {
        Self {
            bot,
            auth,
            jobs,
            converter,
            printer,
            dispatcher,
            spool_dir,
            file_size_limit,
            max_pages,
        }
    }

    /// Unique spool path for an upload, keeping the original extension.
    fn spool_path(&self, file_name: &str) -> PathBuf {
        let unique = match Path::new(file_name).extension() {
            Some(ext) => format!("{}.{}", Uuid::new_v4(), ext.to_string_lossy()),
            None => Uuid::new_v4().to_string(),
        };
        self.spool_dir.join(unique)
    }

    async fn remove_spool_file(&self, path: &Path) {
        if let Err(e) = tokio::fs::remove_file(path).await {
            warn!(path = %path.display(), error = %e, "Failed to remove spool file");
        }
    }

    /// Removes the upload and, when different, the converted artifact.
    async fn cleanup(&self, upload: &Path, artifact: &Path) {
        self.remove_spool_file(upload).await;
        if artifact != upload {
            self.remove_spool_file(artifact).await;
        }
    }

    async fn handle_start(&self, chat_id: i64) -> Result<String> {
        if !self.auth.is_authorized(chat_id).await {
            return Ok(format!("You are not authorized yet. {}\n{}", REQUEST_AUTH, USAGE));
        }
        let mut msg = format!("You are authorized to print, just send a file here.\n{}", USAGE);
        match self.printer.status().await {
            Ok(status) => {
                msg.push_str(&format!(
                    "\nCurrent state:\n{}\nPrinter queue:\n{}",
                    status.printers, status.queue
                ));
            }
            Err(e) => {
                warn!(chat_id, error = %e, "Printer status unavailable");
                msg.push_str("\nPrinter status unavailable.");
            }
        }
        Ok(msg)
    }

    async fn handle_auth(&self, chat_id: i64, password: &str) -> Result<String> {
        if password.is_empty() {
            return Ok("Please provide password: /auth <password>".to_string());
        }
        Ok(match self.auth.authenticate(chat_id, password).await {
            Ok(()) => "Now you can print files via sending.".to_string(),
            Err(AuthError::AlreadyAuthorized) => "You already authorized!".to_string(),
            Err(_) => "Wrong password!".to_string(),
        })
    }

    async fn handle_pending(&self) -> String {
        format_jobs(&self.jobs.list(JobState::Pending).await)
    }

    async fn handle_completed(&self) -> String {
        format_jobs(&self.jobs.list_completed().await)
    }

    async fn handle_cancel(&self, chat_id: i64, job_id: u64) -> String {
        match self.jobs.cancel(job_id, chat_id).await {
            Ok(job) => format!("Job #{} cancelled", job.id),
            Err(JobError::NotFound(id)) => format!("Job #{} not found", id),
            Err(JobError::Forbidden(id)) => format!("Job #{} belongs to another chat", id),
            Err(JobError::InvalidState { id, state }) => {
                format!("Job #{} is {}, only pending jobs can be cancelled", id, state)
            }
        }
    }

    /// Upload pipeline: size check → status message → download → submit →
    /// convert → page limit → dispatch → cleanup. Sends its own replies.
    #[instrument(skip(self, message, doc), fields(chat_id = message.chat.id, file = %doc.file_name))]
    async fn handle_upload(&self, message: &Message, doc: &Document) -> Result<String> {
        let chat_id = message.chat.id;
        if !self.auth.is_authorized(chat_id).await {
            info!(chat_id, "Unauthorized upload rejected");
            self.bot.reply_to(message, REQUEST_AUTH).await?;
            return Ok(REQUEST_AUTH.to_string());
        }

        if doc.file_size > self.file_size_limit {
            let reply = format!(
                "File is too big ({} > {})!",
                doc.file_size, self.file_size_limit
            );
            self.bot.reply_to(message, &reply).await?;
            return Ok(reply);
        }

        let status_id = self
            .bot
            .send_message_and_return_id(&message.chat, "Downloading file...")
            .await?;

        let upload_path = self.spool_path(&doc.file_name);
        info!(chat_id, file = %doc.file_name, path = %upload_path.display(), "Downloading file");
        if let Err(e) = self.bot.download_file(&doc.file_id, &upload_path).await {
            error!(chat_id, error = %e, "Download failed");
            let reply = format!("Failed to download {}", doc.file_name);
            self.bot
                .edit_message(&message.chat, &status_id, &reply)
                .await?;
            return Ok(reply);
        }

        let job = self.jobs.submit(chat_id, &doc.file_name).await;
        self.bot
            .edit_message(
                &message.chat,
                &status_id,
                &format!(
                    "Job #{} accepted ({}), converting {}...",
                    job.id, job.state, doc.file_name
                ),
            )
            .await?;

        let reply = self
            .run_job(&message.chat, job.id, &upload_path, &doc.file_name, &status_id)
            .await?;
        Ok(reply)
    }

    async fn run_job(
        &self,
        chat: &Chat,
        job_id: u64,
        upload_path: &Path,
        file_name: &str,
        status_id: &str,
    ) -> Result<String> {
        let artifact = match self.converter.convert_to_pdf(upload_path).await {
            Ok(path) => path,
            Err(e) => {
                let job = self.jobs.fail(job_id, &e.to_string()).await?;
                self.remove_spool_file(upload_path).await;
                let reply = match e {
                    ConvertError::UnsupportedFormat(ext) => {
                        format!("Job #{} failed: unsupported file type .{}", job.id, ext)
                    }
                    ConvertError::Timeout(secs) => {
                        format!("Job #{} failed: conversion timed out after {}s", job.id, secs)
                    }
                    _ => format!("Job #{} failed: could not convert {} to pdf", job.id, file_name),
                };
                self.bot.edit_message(chat, status_id, &reply).await?;
                return Ok(reply);
            }
        };

        let pages = match self.converter.page_count(&artifact).await {
            Ok(n) => Some(n),
            Err(e) => {
                warn!(job_id, error = %e, "Page count unavailable");
                None
            }
        };
        if let (Some(limit), Some(n)) = (self.max_pages, pages) {
            if n > limit {
                let reply = format!("Job #{} failed: too many pages ({} > {})", job_id, n, limit);
                self.jobs.fail(job_id, &reply).await?;
                self.cleanup(upload_path, &artifact).await;
                self.bot.edit_message(chat, status_id, &reply).await?;
                return Ok(reply);
            }
        }

        let dispatched = self.dispatcher.dispatch(job_id, &artifact).await;
        self.cleanup(upload_path, &artifact).await;

        let reply = match dispatched {
            Ok(job) => match job.state {
                JobState::Completed => match pages {
                    Some(n) => format!(
                        "Job #{} completed: {} sent for printing ({} pages)",
                        job.id, file_name, n
                    ),
                    None => format!("Job #{} completed: {} sent for printing", job.id, file_name),
                },
                JobState::Failed => format!(
                    "Job #{} failed: {}",
                    job.id,
                    job.error.as_deref().unwrap_or("print command failed")
                ),
                state => format!("Job #{} is {}", job.id, state),
            },
            Err(PrintBotError::Job(JobError::InvalidState {
                id,
                state: JobState::Cancelled,
            })) => {
                info!(job_id = id, "Job cancelled before printing");
                format!("Job #{} was cancelled before printing", id)
            }
            Err(e) => return Err(e),
        };
        self.bot.edit_message(chat, status_id, &reply).await?;
        Ok(reply)
    }
}

/// One line per job: `#id file [state]`, or the empty marker.
fn format_jobs(jobs: &[printbot_core::PrintJob]) -> String {
    if jobs.is_empty() {
        return "No jobs found".to_string();
    }
    jobs.iter()
        .map(|j| format!("#{} {} [{}]", j.id, j.file_name, j.state))
        .collect::<Vec<_>>()
        .join("\n")
}

#[async_trait]
impl Handler for CommandHandler {
    #[instrument(skip(self, message))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        let chat_id = message.chat.id;
        self.auth.touch(chat_id).await;

        if let Some(doc) = &message.attachment {
            let reply = self.handle_upload(message, doc).await?;
            return Ok(HandlerResponse::Reply(reply));
        }

        let Some(command) = Command::parse(&message.content) else {
            self.bot.reply_to(message, USAGE).await?;
            return Ok(HandlerResponse::Reply(USAGE.to_string()));
        };

        let reply = match command {
            Command::Start => self.handle_start(chat_id).await?,
            Command::Auth { password } => self.handle_auth(chat_id, &password).await?,
            Command::Pending => {
                if !self.auth.is_authorized(chat_id).await {
                    REQUEST_AUTH.to_string()
                } else {
                    self.handle_pending().await
                }
            }
            Command::Completed => {
                if !self.auth.is_authorized(chat_id).await {
                    REQUEST_AUTH.to_string()
                } else {
                    self.handle_completed().await
                }
            }
            Command::Cancel { job_id } => {
                if !self.auth.is_authorized(chat_id).await {
                    REQUEST_AUTH.to_string()
                } else {
                    self.handle_cancel(chat_id, job_id).await
                }
            }
            Command::Unknown { input } => {
                info!(chat_id, input = %input, "Unknown command");
                format!("Unknown command. {}", USAGE)
            }
        };
        self.bot.reply_to(message, &reply).await?;
        Ok(HandlerResponse::Reply(reply))
    }
}
