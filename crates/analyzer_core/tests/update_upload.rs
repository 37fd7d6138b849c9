use std::collections::BTreeMap;
use std::sync::Once;

use analyzer_core::{
    update, AnalyzerError, AppState, Dataset, Effect, FetchFailure, FetchStep, Msg, PackageFile,
    Phase, RemoteFailure, Resource, ResourceCounts, StatusMessage,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(analyzer_logging::initialize_for_tests);
}

fn package() -> PackageFile {
    PackageFile::new("/tmp/ig.tgz", Some("application/gzip".to_string()))
}

fn dataset() -> Dataset {
    let counts: BTreeMap<String, u64> = [
        ("Patient".to_string(), 2),
        ("Observation".to_string(), 3),
        ("total".to_string(), 5),
    ]
    .into();
    let resources = [
        ("Patient", "p1"),
        ("Observation", "o1"),
        ("Patient", "p2"),
        ("Observation", "o2"),
        ("Observation", "o3"),
    ]
    .into_iter()
    .map(|(resource_type, id)| {
        serde_json::from_value::<Resource>(json!({"resourceType": resource_type, "id": id}))
            .unwrap()
    })
    .collect();
    Dataset::new(ResourceCounts::from_wire(counts).unwrap(), resources)
}

fn drop_package(state: AppState) -> (AppState, u64) {
    let (state, effects) = update(state, Msg::FilesDropped(vec![package()]));
    let generation = match effects.as_slice() {
        [Effect::UploadPackage { generation, .. }] => *generation,
        other => panic!("unexpected effects {other:?}"),
    };
    (state, generation)
}

fn loaded_state() -> AppState {
    let (state, generation) = drop_package(AppState::new());
    let (state, _) = update(
        state,
        Msg::UploadFinished {
            generation,
            result: Ok("extracted".to_string()),
        },
    );
    let (state, _) = update(
        state,
        Msg::DatasetFetched {
            generation,
            result: Ok(dataset()),
        },
    );
    state
}

#[test]
fn rejects_wrong_file_count_without_effects() {
    init_logging();
    for files in [vec![], vec![package(), package()]] {
        let count = files.len();
        let (state, effects) = update(AppState::new(), Msg::FilesDropped(files));

        assert!(effects.is_empty());
        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(
            state.status(),
            Some(&StatusMessage::Error(AnalyzerError::InvalidInput(format!(
                "expected exactly one package file, got {count}"
            ))))
        );
    }
}

#[test]
fn rejects_wrong_content_type_without_effects() {
    init_logging();
    for content_type in [None, Some("application/zip".to_string())] {
        let file = PackageFile::new("/tmp/ig.zip", content_type);
        let (state, effects) = update(AppState::new(), Msg::FilesDropped(vec![file]));

        assert!(effects.is_empty());
        assert!(matches!(
            state.status(),
            Some(StatusMessage::Error(AnalyzerError::InvalidInput(_)))
        ));
    }
}

#[test]
fn invalid_drop_keeps_loaded_dataset() {
    init_logging();
    let state = loaded_state();
    let (state, effects) = update(state, Msg::FilesDropped(vec![package(), package()]));

    assert!(effects.is_empty());
    assert_eq!(state.phase(), Phase::Ready);
    assert_eq!(state.view().loaded_count, 5);
}

#[test]
fn upload_resets_state_and_emits_upload_effect() {
    init_logging();
    let state = loaded_state();
    let (state, _) = update(state, Msg::ResourceSelected(Some("Patient/p1".into())));
    let (mut state, effects) = update(state, Msg::FilesDropped(vec![package()]));

    assert_eq!(
        effects,
        vec![Effect::UploadPackage {
            generation: 2,
            file: package(),
        }]
    );
    assert!(state.consume_dirty());
    let view = state.view();
    assert_eq!(view.phase, Phase::Uploading);
    assert!(view.upload_in_progress);
    assert_eq!(view.status, None);
    assert_eq!(view.loaded_count, 0);
    assert!(view.rows.is_empty());
    assert!(view.selected.is_none());
}

#[test]
fn upload_success_chains_into_fetch_and_stays_in_progress() {
    init_logging();
    let (state, generation) = drop_package(AppState::new());
    let (state, effects) = update(
        state,
        Msg::UploadFinished {
            generation,
            result: Ok("Arquivo extraído".to_string()),
        },
    );

    assert_eq!(effects, vec![Effect::FetchDataset { generation }]);
    let view = state.view();
    assert_eq!(view.phase, Phase::FetchingDataset { after_upload: true });
    assert!(view.upload_in_progress);
    assert_eq!(
        view.status,
        Some(StatusMessage::Success("Arquivo extraído".to_string()))
    );
}

#[test]
fn upload_failure_uses_body_or_generic_text() {
    init_logging();
    let cases = [
        (RemoteFailure::new(Some(500), "disk full"), "disk full"),
        (RemoteFailure::new(Some(502), "  "), "upload failed (HTTP 502)"),
        (RemoteFailure::new(None, ""), "upload failed"),
    ];
    for (failure, expected) in cases {
        let (state, generation) = drop_package(AppState::new());
        let (state, effects) = update(
            state,
            Msg::UploadFinished {
                generation,
                result: Err(failure),
            },
        );

        assert!(effects.is_empty());
        assert_eq!(state.phase(), Phase::Error);
        assert!(state.dataset().is_none());
        assert!(!state.view().upload_in_progress);
        assert_eq!(
            state.status(),
            Some(&StatusMessage::Error(AnalyzerError::Upload(
                expected.to_string()
            )))
        );
    }
}

#[test]
fn scenario_upload_then_filter_by_patient() {
    init_logging();
    let state = loaded_state();
    let view = state.view();
    assert_eq!(view.phase, Phase::Ready);
    assert!(!view.upload_in_progress);
    assert_eq!(view.total, 5);
    assert_eq!(
        view.counts.iter().map(|row| row.count).sum::<u64>(),
        view.total
    );
    assert_eq!(view.status, Some(StatusMessage::Success("extracted".into())));

    let (state, _) = update(
        state,
        Msg::TypeSelected(analyzer_core::TypeFilter::Only("Patient".into())),
    );
    let ids: Vec<_> = state.view().rows.into_iter().map(|row| row.id).collect();
    assert_eq!(ids, vec!["p1", "p2"]);
}

#[test]
fn counts_failure_clears_dataset_and_reports_step() {
    init_logging();
    let (state, generation) = drop_package(AppState::new());
    let (state, _) = update(
        state,
        Msg::UploadFinished {
            generation,
            result: Ok("ok".to_string()),
        },
    );
    let (state, effects) = update(
        state,
        Msg::DatasetFetched {
            generation,
            result: Err(FetchFailure {
                step: FetchStep::Counts,
                failure: RemoteFailure::new(Some(500), "boom"),
            }),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state.phase(), Phase::Error);
    assert!(state.dataset().is_none());
    let status = state.status().unwrap();
    assert!(status.is_error());
    assert_eq!(status.text(), "failed to load counts: HTTP 500: boom");
}

#[test]
fn stale_results_are_discarded() {
    init_logging();
    let (state, first) = drop_package(AppState::new());
    let (state, second) = drop_package(state);
    assert!(second > first);

    let (state, effects) = update(
        state,
        Msg::UploadFinished {
            generation: first,
            result: Ok("old".to_string()),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.phase(), Phase::Uploading);
    assert_eq!(state.status(), None);

    let (state, effects) = update(
        state,
        Msg::UploadFinished {
            generation: second,
            result: Ok("new".to_string()),
        },
    );
    assert_eq!(effects, vec![Effect::FetchDataset { generation: second }]);

    let (state, _) = update(
        state,
        Msg::DatasetFetched {
            generation: first,
            result: Ok(dataset()),
        },
    );
    assert!(state.dataset().is_none());
    assert!(state.view().upload_in_progress);
}

#[test]
fn refresh_replaces_dataset_and_reports_count() {
    init_logging();
    let state = loaded_state();
    let (state, effects) = update(state, Msg::RefreshClicked);
    assert_eq!(effects, vec![Effect::FetchDataset { generation: 2 }]);
    assert_eq!(state.status(), None);
    assert!(!state.view().upload_in_progress);
    // Old data stays visible until the new read lands.
    assert_eq!(state.view().loaded_count, 5);

    let (state, _) = update(
        state,
        Msg::DatasetFetched {
            generation: 2,
            result: Ok(Dataset::default()),
        },
    );
    assert_eq!(state.phase(), Phase::Ready);
    assert_eq!(state.view().loaded_count, 0);
    assert_eq!(
        state.status(),
        Some(&StatusMessage::Success("loaded 0 resources".into()))
    );
}

#[test]
fn refresh_ignored_while_busy() {
    init_logging();
    let (state, _) = drop_package(AppState::new());
    let (state, effects) = update(state, Msg::RefreshClicked);

    assert!(effects.is_empty());
    assert_eq!(state.phase(), Phase::Uploading);
}

#[test]
fn refresh_failure_on_resources_step_clears_everything() {
    init_logging();
    let state = loaded_state();
    let (state, _) = update(state, Msg::ResourceSelected(Some("Patient/p2".into())));
    let (state, _) = update(state, Msg::RefreshClicked);
    let (state, _) = update(
        state,
        Msg::DatasetFetched {
            generation: 2,
            result: Err(FetchFailure {
                step: FetchStep::Resources,
                failure: RemoteFailure::new(None, "timeout"),
            }),
        },
    );

    let view = state.view();
    assert_eq!(view.phase, Phase::Error);
    assert_eq!(view.loaded_count, 0);
    assert_eq!(view.total, 0);
    assert!(view.counts.is_empty());
    assert!(view.selected.is_none());
    assert_eq!(
        view.status.unwrap().text(),
        "failed to load resources: timeout"
    );
}

#[test]
fn error_state_accepts_new_upload() {
    init_logging();
    let (state, generation) = drop_package(AppState::new());
    let (state, _) = update(
        state,
        Msg::UploadFinished {
            generation,
            result: Err(RemoteFailure::new(Some(400), "bad archive")),
        },
    );
    assert_eq!(state.phase(), Phase::Error);

    let (state, effects) = update(state, Msg::FilesDropped(vec![package()]));
    assert_eq!(effects.len(), 1);
    assert_eq!(state.phase(), Phase::Uploading);
    assert_eq!(state.status(), None);
}
