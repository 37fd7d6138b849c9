use std::path::{Path, PathBuf};

use analyzer_core::Resource;
use analyzer_logging::analyzer_info;

use crate::persist::{AtomicFileWriter, PersistError};
use crate::ServiceError;

/// Fixed name of the local JSON snapshot.
pub const EXPORT_FILENAME: &str = "fhir_resources.json";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("no resources to export")]
    Empty,
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error(transparent)]
    Persist(#[from] PersistError),
    #[error("export task stopped: {0}")]
    Interrupted(String),
    #[error("destination {0} has no file name")]
    InvalidDestination(PathBuf),
    #[error("download failed: {0}")]
    Service(#[from] ServiceError),
}

/// Writes the full dataset as a pretty-printed JSON array to
/// `{output_dir}/fhir_resources.json`.
pub fn export_resources_json(
    output_dir: &Path,
    resources: &[Resource],
) -> Result<PathBuf, ExportError> {
    if resources.is_empty() {
        return Err(ExportError::Empty);
    }
    let content = serde_json::to_string_pretty(resources)?;
    let writer = AtomicFileWriter::new(output_dir.to_path_buf());
    let path = writer.write(EXPORT_FILENAME, content)?;
    analyzer_info!("exported {} resources to {:?}", resources.len(), path);
    Ok(path)
}

/// Saves a downloaded file at `destination`, creating parent directories.
pub fn save_download(destination: &Path, bytes: &[u8]) -> Result<PathBuf, ExportError> {
    let filename = destination
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| ExportError::InvalidDestination(destination.to_path_buf()))?;
    let dir = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let path = AtomicFileWriter::new(dir).write(filename, bytes)?;
    analyzer_info!("saved {} bytes to {:?}", bytes.len(), path);
    Ok(path)
}
