use std::path::PathBuf;

use crate::{Dataset, FetchStep, Generation, PackageFile, TypeFilter, ValidationReport};

/// A failed remote call as the orchestrator sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFailure {
    /// HTTP status when the service answered; `None` for transport failures.
    pub status: Option<u16>,
    /// Response body, or a transport error description.
    pub message: String,
}

impl RemoteFailure {
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub step: FetchStep,
    pub failure: RemoteFailure,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User dropped or picked files for upload.
    FilesDropped(Vec<PackageFile>),
    /// Engine finished submitting the package.
    UploadFinished {
        generation: Generation,
        result: Result<String, RemoteFailure>,
    },
    /// User asked to re-read the dataset from the service.
    RefreshClicked,
    /// Engine finished the counts + resources reads.
    DatasetFetched {
        generation: Generation,
        result: Result<Dataset, FetchFailure>,
    },
    /// User picked a resource type in the type picker.
    TypeSelected(TypeFilter),
    /// User edited the search box.
    SearchChanged(String),
    /// User selected a resource (by `type/id`) for detail, or cleared it.
    ResourceSelected(Option<String>),
    /// User clicked Validate URLs.
    ValidateClicked,
    /// Engine finished the URL validation call.
    ValidationFinished {
        generation: Generation,
        result: Result<ValidationReport, RemoteFailure>,
    },
    /// User closed the validation result modal.
    ValidationModalClosed,
    /// User clicked Export JSON.
    ExportJsonClicked,
    /// Engine wrote (or failed to write) the local export.
    ExportFinished(Result<PathBuf, String>),
    /// User asked to save the remote CSV export to a local file.
    CsvDownloadRequested(PathBuf),
    /// Engine finished the CSV download.
    CsvDownloadFinished(Result<PathBuf, String>),
    /// User dismissed the status message.
    StatusDismissed,
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
