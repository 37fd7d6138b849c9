use analyzer_logging::analyzer_debug;

use crate::{
    AnalyzerError, AppState, DatasetAction, Effect, FetchFailure, FilterCriteria, Generation,
    Msg, PackageFile, Phase, RemoteFailure, StatusMessage,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FilesDropped(files) => files_dropped(&mut state, files),
        Msg::UploadFinished { generation, result } => {
            if !accept_result(&state, generation, "upload") || state.phase() != Phase::Uploading {
                return (state, Vec::new());
            }
            match result {
                Ok(body) => {
                    state.set_status(Some(StatusMessage::Success(body)));
                    state.set_phase(Phase::FetchingDataset { after_upload: true });
                    vec![Effect::FetchDataset { generation }]
                }
                Err(failure) => {
                    state.clear_dataset();
                    state.set_status(Some(StatusMessage::Error(AnalyzerError::Upload(
                        upload_failure_text(&failure),
                    ))));
                    state.set_phase(Phase::Error);
                    Vec::new()
                }
            }
        }
        Msg::RefreshClicked => {
            if state.phase().is_busy() {
                analyzer_debug!("refresh ignored while {:?}", state.phase());
                return (state, Vec::new());
            }
            let generation = state.next_generation();
            state.set_status(None);
            state.set_phase(Phase::FetchingDataset {
                after_upload: false,
            });
            vec![Effect::FetchDataset { generation }]
        }
        Msg::DatasetFetched { generation, result } => {
            let Phase::FetchingDataset { after_upload } = state.phase() else {
                analyzer_debug!("dataset result ignored in phase {:?}", state.phase());
                return (state, Vec::new());
            };
            if !accept_result(&state, generation, "dataset") {
                return (state, Vec::new());
            }
            match result {
                Ok(dataset) => {
                    if !after_upload {
                        state.set_status(Some(StatusMessage::Success(format!(
                            "loaded {} resources",
                            dataset.len()
                        ))));
                    }
                    state.install_dataset(dataset);
                    state.set_phase(Phase::Ready);
                }
                Err(FetchFailure { step, failure }) => {
                    state.clear_dataset();
                    state.set_status(Some(StatusMessage::Error(AnalyzerError::Fetch {
                        step,
                        message: failure_text(&failure),
                    })));
                    state.set_phase(Phase::Error);
                }
            }
            Vec::new()
        }
        Msg::TypeSelected(resource_type) => {
            let filter = FilterCriteria {
                resource_type,
                ..state.filter().clone()
            };
            state.set_filter(filter);
            Vec::new()
        }
        Msg::SearchChanged(search) => {
            let filter = FilterCriteria {
                search,
                ..state.filter().clone()
            };
            state.set_filter(filter);
            Vec::new()
        }
        Msg::ResourceSelected(key) => {
            state.select(key);
            Vec::new()
        }
        Msg::ValidateClicked => {
            if !state.has_resources() {
                state.set_status(Some(StatusMessage::Error(AnalyzerError::EmptyDataset {
                    action: DatasetAction::Validate,
                })));
                return (state, Vec::new());
            }
            if state.phase() != Phase::Ready {
                analyzer_debug!("validate ignored while {:?}", state.phase());
                return (state, Vec::new());
            }
            state.set_status(None);
            state.set_phase(Phase::Validating);
            vec![Effect::ValidateUrls {
                generation: state.generation(),
            }]
        }
        Msg::ValidationFinished { generation, result } => {
            if !accept_result(&state, generation, "validation") || state.phase() != Phase::Validating
            {
                return (state, Vec::new());
            }
            state.set_phase(Phase::Ready);
            match result {
                Ok(report) => state.set_validation(Some(report)),
                Err(failure) => state.set_status(Some(StatusMessage::Error(
                    AnalyzerError::Validation(failure_text(&failure)),
                ))),
            }
            Vec::new()
        }
        Msg::ValidationModalClosed => {
            if state.validation().is_some() {
                state.set_validation(None);
            }
            Vec::new()
        }
        Msg::ExportJsonClicked => match state.dataset() {
            Some(dataset) if !dataset.is_empty() => {
                let resources = dataset.resources.clone();
                state.set_status(None);
                vec![Effect::ExportJson { resources }]
            }
            _ => {
                state.set_status(Some(StatusMessage::Error(AnalyzerError::EmptyDataset {
                    action: DatasetAction::Export,
                })));
                Vec::new()
            }
        },
        Msg::ExportFinished(result) => {
            let status = match result {
                Ok(path) => StatusMessage::Success(format!("exported to {}", path.display())),
                Err(message) => StatusMessage::Error(AnalyzerError::Export(message)),
            };
            state.set_status(Some(status));
            Vec::new()
        }
        Msg::CsvDownloadRequested(destination) => {
            state.set_status(None);
            vec![Effect::DownloadCsv { destination }]
        }
        Msg::CsvDownloadFinished(result) => {
            let status = match result {
                Ok(path) => StatusMessage::Success(format!("CSV saved to {}", path.display())),
                Err(message) => StatusMessage::Error(AnalyzerError::Export(message)),
            };
            state.set_status(Some(status));
            Vec::new()
        }
        Msg::StatusDismissed => {
            if state.status().is_some() {
                state.set_status(None);
            }
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn files_dropped(state: &mut AppState, mut files: Vec<PackageFile>) -> Vec<Effect> {
    if files.len() != 1 {
        state.set_status(Some(StatusMessage::Error(AnalyzerError::InvalidInput(
            format!("expected exactly one package file, got {}", files.len()),
        ))));
        return Vec::new();
    }
    let file = files.remove(0);
    if !file.is_package() {
        state.set_status(Some(StatusMessage::Error(AnalyzerError::InvalidInput(
            format!(
                "{} is not a .tgz package (content type: {})",
                file.name,
                file.content_type.as_deref().unwrap_or("unknown")
            ),
        ))));
        return Vec::new();
    }

    state.reset_for_upload();
    let generation = state.next_generation();
    state.set_phase(Phase::Uploading);
    vec![Effect::UploadPackage { generation, file }]
}

fn accept_result(state: &AppState, generation: Generation, what: &str) -> bool {
    if state.is_current(generation) {
        return true;
    }
    analyzer_debug!(
        "discarding stale {} result: generation {} superseded by {}",
        what,
        generation,
        state.generation()
    );
    false
}

fn upload_failure_text(failure: &RemoteFailure) -> String {
    if !failure.message.trim().is_empty() {
        return failure.message.clone();
    }
    match failure.status {
        Some(code) => format!("upload failed (HTTP {code})"),
        None => "upload failed".to_string(),
    }
}

fn failure_text(failure: &RemoteFailure) -> String {
    match (failure.status, failure.message.trim().is_empty()) {
        (Some(code), true) => format!("HTTP {code}"),
        (Some(code), false) => format!("HTTP {code}: {}", failure.message.trim()),
        (None, _) => failure.message.clone(),
    }
}
