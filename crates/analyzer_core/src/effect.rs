use std::path::PathBuf;

use crate::{Generation, PackageFile, Resource};

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    UploadPackage {
        generation: Generation,
        file: PackageFile,
    },
    /// Counts first, then the resource list; never concurrently.
    FetchDataset { generation: Generation },
    ValidateUrls { generation: Generation },
    /// Snapshot of the full, unfiltered dataset.
    ExportJson { resources: Vec<Resource> },
    DownloadCsv { destination: PathBuf },
}
