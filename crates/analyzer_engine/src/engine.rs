use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;

use analyzer_core::{Generation, Resource};
use analyzer_logging::{analyzer_info, analyzer_warn};

use crate::client::{AnalyzerService, ReqwestService, ServiceSettings};
use crate::dataset::fetch_dataset;
use crate::export::{export_resources_json, save_download, ExportError};
use crate::{EngineEvent, ServiceEndpoints, ServiceError};

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub service: ServiceSettings,
    /// Directory receiving the local JSON export.
    pub output_dir: PathBuf,
}

impl EngineConfig {
    pub fn default_with_output(output_dir: PathBuf) -> Self {
        Self {
            service: ServiceSettings::default(),
            output_dir,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

/// Receives engine events; called from runtime worker threads.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

enum EngineCommand {
    Upload {
        generation: Generation,
        path: PathBuf,
        file_name: String,
    },
    FetchDataset {
        generation: Generation,
    },
    ValidateUrls {
        generation: Generation,
    },
    ExportJson {
        resources: Vec<Resource>,
    },
    DownloadCsv {
        destination: PathBuf,
    },
}

/// Runs remote calls and file writes off the caller's thread.
///
/// Commands are accepted in order and each runs as its own task; results come
/// back through the [`EventSink`]. Dropping the handle stops the worker.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    endpoints: ServiceEndpoints,
}

impl EngineHandle {
    pub fn new(config: EngineConfig, sink: Arc<dyn EventSink>) -> Result<Self, EngineError> {
        let service = ReqwestService::new(config.service)?;
        let endpoints = service.endpoints().clone();
        Self::with_service(Arc::new(service), endpoints, config.output_dir, sink)
    }

    /// Builds a handle around any service implementation.
    pub fn with_service(
        service: Arc<dyn AnalyzerService>,
        endpoints: ServiceEndpoints,
        output_dir: PathBuf,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let service = service.clone();
                let sink = sink.clone();
                let output_dir = output_dir.clone();
                runtime.spawn(async move {
                    handle_command(service.as_ref(), &output_dir, command, sink.as_ref()).await;
                });
            }
            analyzer_info!("engine command channel closed");
        });

        Ok(Self { cmd_tx, endpoints })
    }

    pub fn endpoints(&self) -> &ServiceEndpoints {
        &self.endpoints
    }

    pub fn upload(&self, generation: Generation, path: PathBuf, file_name: impl Into<String>) {
        self.send(EngineCommand::Upload {
            generation,
            path,
            file_name: file_name.into(),
        });
    }

    pub fn fetch_dataset(&self, generation: Generation) {
        self.send(EngineCommand::FetchDataset { generation });
    }

    pub fn validate_urls(&self, generation: Generation) {
        self.send(EngineCommand::ValidateUrls { generation });
    }

    pub fn export_json(&self, resources: Vec<Resource>) {
        self.send(EngineCommand::ExportJson { resources });
    }

    pub fn download_csv(&self, destination: PathBuf) {
        self.send(EngineCommand::DownloadCsv { destination });
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            analyzer_warn!("engine worker is gone; command dropped");
        }
    }
}

async fn handle_command(
    service: &dyn AnalyzerService,
    output_dir: &std::path::Path,
    command: EngineCommand,
    sink: &dyn EventSink,
) {
    match command {
        EngineCommand::Upload {
            generation,
            path,
            file_name,
        } => {
            analyzer_info!("uploading {:?} (generation {})", path, generation);
            let result = match tokio::fs::read(&path).await {
                Ok(bytes) => service.upload_package(&file_name, bytes).await,
                Err(err) => Err(ServiceError::new(
                    crate::FailureKind::Io,
                    format!("cannot read {}: {err}", path.display()),
                )),
            };
            sink.emit(EngineEvent::UploadCompleted { generation, result });
        }
        EngineCommand::FetchDataset { generation } => {
            let result = fetch_dataset(service).await;
            sink.emit(EngineEvent::DatasetFetched { generation, result });
        }
        EngineCommand::ValidateUrls { generation } => {
            let result = service.validate_urls().await;
            sink.emit(EngineEvent::ValidationCompleted { generation, result });
        }
        EngineCommand::ExportJson { resources } => {
            let dir = output_dir.to_path_buf();
            let result = tokio::task::spawn_blocking(move || export_resources_json(&dir, &resources))
                .await
                .unwrap_or_else(|err| Err(ExportError::Interrupted(err.to_string())));
            sink.emit(EngineEvent::JsonExported(result));
        }
        EngineCommand::DownloadCsv { destination } => {
            let result = match service.export_csv().await {
                Ok(bytes) => save_download(&destination, &bytes),
                Err(err) => Err(ExportError::Service(err)),
            };
            sink.emit(EngineEvent::CsvDownloaded(result));
        }
    }
}
