use std::fmt;

/// Which of the two dataset reads failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStep {
    Counts,
    Resources,
}

impl fmt::Display for FetchStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchStep::Counts => write!(f, "counts"),
            FetchStep::Resources => write!(f, "resources"),
        }
    }
}

/// User actions that need a loaded dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetAction {
    Validate,
    Export,
}

impl fmt::Display for DatasetAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetAction::Validate => write!(f, "validate"),
            DatasetAction::Export => write!(f, "export"),
        }
    }
}

/// Every failure the orchestrator reports to the user.
///
/// None of these escape `update`; each one ends up as the status message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalyzerError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    Upload(String),
    #[error("failed to load {step}: {message}")]
    Fetch { step: FetchStep, message: String },
    #[error("URL validation failed: {0}")]
    Validation(String),
    #[error("nothing to {action}: no resources loaded")]
    EmptyDataset { action: DatasetAction },
    #[error("export failed: {0}")]
    Export(String),
}

/// The single status slot shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusMessage {
    Success(String),
    Error(AnalyzerError),
}

impl StatusMessage {
    pub fn is_error(&self) -> bool {
        matches!(self, StatusMessage::Error(_))
    }

    pub fn error(&self) -> Option<&AnalyzerError> {
        match self {
            StatusMessage::Error(err) => Some(err),
            StatusMessage::Success(_) => None,
        }
    }

    pub fn text(&self) -> String {
        match self {
            StatusMessage::Success(text) => text.clone(),
            StatusMessage::Error(err) => err.to_string(),
        }
    }
}
