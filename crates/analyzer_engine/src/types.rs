use std::fmt;
use std::path::PathBuf;

use analyzer_core::{Dataset, FetchStep, Generation, ValidationReport};

use crate::export::ExportError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ServiceError {
    pub kind: FailureKind,
    /// Response body for HTTP failures, otherwise a transport description.
    pub message: String,
}

impl ServiceError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn http_status(&self) -> Option<u16> {
        match self.kind {
            FailureKind::HttpStatus(code) => Some(code),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Decode,
    Io,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Decode => write!(f, "unexpected response body"),
            FailureKind::Io => write!(f, "io error"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

/// Which dataset read failed, and why.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{step} read failed: {error}")]
pub struct DatasetError {
    pub step: FetchStep,
    pub error: ServiceError,
}

#[derive(Debug)]
pub enum EngineEvent {
    UploadCompleted {
        generation: Generation,
        result: Result<String, ServiceError>,
    },
    DatasetFetched {
        generation: Generation,
        result: Result<Dataset, DatasetError>,
    },
    ValidationCompleted {
        generation: Generation,
        result: Result<ValidationReport, ServiceError>,
    },
    JsonExported(Result<PathBuf, ExportError>),
    CsvDownloaded(Result<PathBuf, ExportError>),
}
