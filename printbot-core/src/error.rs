use crate::types::JobState;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrintBotError {
    #[error("Bot error: {0}")]
    Bot(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("Job error: {0}")]
    Job(#[from] JobError),

    #[error("Conversion error: {0}")]
    Convert(#[from] ConvertError),

    #[error("Print error: {0}")]
    Print(#[from] PrintError),
}

/// Authentication outcomes reported back to the user; never fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("wrong password")]
    WrongPassword,

    #[error("already authorized")]
    AlreadyAuthorized,

    #[error("not authorized")]
    NotAuthorized,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JobError {
    #[error("job {0} not found")]
    NotFound(u64),

    #[error("job {0} belongs to another chat")]
    Forbidden(u64),

    #[error("job {id} is {state}")]
    InvalidState { id: u64, state: JobState },
}

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("conversion tool exited with status {status}: {stderr}")]
    Failed { status: i32, stderr: String },

    #[error("conversion timed out after {0}s")]
    Timeout(u64),

    #[error("conversion io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum PrintError {
    #[error("print command exited with status {status}: {stderr}")]
    Failed { status: i32, stderr: String },

    #[error("print io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PrintBotError>;
