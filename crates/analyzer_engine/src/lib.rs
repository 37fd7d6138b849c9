//! Analyzer engine: remote service client, dataset pipeline and file output.
mod client;
mod dataset;
mod endpoints;
mod engine;
mod export;
mod persist;
mod types;

pub use client::{AnalyzerService, ReqwestService, ServiceSettings};
pub use dataset::fetch_dataset;
pub use endpoints::{
    ServiceEndpoints, COUNTS_PATH, CSV_EXPORT_PATH, EXTRACT_PATH, RESOURCES_PATH,
    VALIDATE_URLS_PATH,
};
pub use engine::{ChannelEventSink, EngineConfig, EngineError, EngineHandle, EventSink};
pub use export::{export_resources_json, save_download, ExportError, EXPORT_FILENAME};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use types::{DatasetError, EngineEvent, FailureKind, ServiceError};
