use std::sync::{mpsc, Arc};

use analyzer_core::{Effect, FetchFailure, Msg, RemoteFailure};
use analyzer_engine::{
    EngineConfig, EngineError, EngineEvent, EngineHandle, EventSink, FailureKind, ServiceError,
};
use analyzer_logging::{analyzer_info, analyzer_warn};

use super::app::AppEvent;

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(config: EngineConfig, tx: mpsc::Sender<AppEvent>) -> Result<Self, EngineError> {
        let engine = EngineHandle::new(config, Arc::new(MsgSink { tx }))?;
        Ok(Self { engine })
    }

    pub fn csv_link(&self) -> String {
        self.engine.endpoints().csv_export().to_string()
    }

    /// Hands effects to the engine; returns how many results to expect back.
    pub fn enqueue(&self, effects: Vec<Effect>) -> usize {
        let count = effects.len();
        for effect in effects {
            match effect {
                Effect::UploadPackage { generation, file } => {
                    analyzer_info!(
                        "UploadPackage generation={} name={} path={:?}",
                        generation,
                        file.name,
                        file.path
                    );
                    self.engine.upload(generation, file.path, file.name);
                }
                Effect::FetchDataset { generation } => {
                    analyzer_info!("FetchDataset generation={}", generation);
                    self.engine.fetch_dataset(generation);
                }
                Effect::ValidateUrls { generation } => {
                    analyzer_info!("ValidateUrls generation={}", generation);
                    self.engine.validate_urls(generation);
                }
                Effect::ExportJson { resources } => {
                    analyzer_info!("ExportJson resources={}", resources.len());
                    self.engine.export_json(resources);
                }
                Effect::DownloadCsv { destination } => {
                    analyzer_info!("DownloadCsv destination={:?}", destination);
                    self.engine.download_csv(destination);
                }
            }
        }
        count
    }
}

struct MsgSink {
    tx: mpsc::Sender<AppEvent>,
}

impl EventSink for MsgSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(AppEvent::Engine(map_event(event)));
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::UploadCompleted { generation, result } => Msg::UploadFinished {
            generation,
            result: result.map_err(|err| {
                analyzer_warn!("Upload {} failed: {}", generation, err);
                remote_failure(err)
            }),
        },
        EngineEvent::DatasetFetched { generation, result } => Msg::DatasetFetched {
            generation,
            result: result.map_err(|err| {
                analyzer_warn!("Dataset fetch {} failed: {}", generation, err);
                FetchFailure {
                    step: err.step,
                    failure: remote_failure(err.error),
                }
            }),
        },
        EngineEvent::ValidationCompleted { generation, result } => Msg::ValidationFinished {
            generation,
            result: result.map_err(|err| {
                analyzer_warn!("Validation {} failed: {}", generation, err);
                remote_failure(err)
            }),
        },
        EngineEvent::JsonExported(result) => Msg::ExportFinished(result.map_err(|err| {
            analyzer_warn!("JSON export failed: {}", err);
            err.to_string()
        })),
        EngineEvent::CsvDownloaded(result) => Msg::CsvDownloadFinished(result.map_err(|err| {
            analyzer_warn!("CSV download failed: {}", err);
            err.to_string()
        })),
    }
}

/// HTTP failures keep the raw body so the user sees what the service said.
fn remote_failure(err: ServiceError) -> RemoteFailure {
    match err.kind {
        FailureKind::HttpStatus(code) => RemoteFailure::new(Some(code), err.message),
        _ => RemoteFailure::new(None, err.to_string()),
    }
}
