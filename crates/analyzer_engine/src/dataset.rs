use analyzer_core::{Dataset, FetchStep};
use analyzer_logging::analyzer_info;

use crate::{AnalyzerService, DatasetError};

/// Reads counts, then the resource list, and returns both or neither.
///
/// The list is only requested once the counts read has succeeded.
pub async fn fetch_dataset(service: &dyn AnalyzerService) -> Result<Dataset, DatasetError> {
    let counts = service
        .resource_counts()
        .await
        .map_err(|error| DatasetError {
            step: FetchStep::Counts,
            error,
        })?;
    let resources = service.resources().await.map_err(|error| DatasetError {
        step: FetchStep::Resources,
        error,
    })?;
    analyzer_info!(
        "dataset loaded: {} resources, counts total {}",
        resources.len(),
        counts.total()
    );
    Ok(Dataset::new(counts, resources))
}
