use crate::filter::filter_resources;
use crate::view_model::{
    AppViewModel, CountRowView, ResourceDetailView, ResourceRowView, ValidationRowView,
};
use crate::{Dataset, FilterCriteria, StatusMessage, ValidationReport};

/// Identifies the operation that produced (or is producing) the dataset.
/// Remote results tagged with an older generation are discarded.
pub type Generation = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Uploading,
    FetchingDataset {
        after_upload: bool,
    },
    Ready,
    Validating,
    Error,
}

impl Phase {
    /// Upload submitted and its chained fetch not yet resolved.
    pub fn upload_in_progress(self) -> bool {
        matches!(
            self,
            Phase::Uploading | Phase::FetchingDataset { after_upload: true }
        )
    }

    pub fn is_busy(self) -> bool {
        matches!(self, Phase::Uploading | Phase::FetchingDataset { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    phase: Phase,
    generation: Generation,
    dataset: Option<Dataset>,
    status: Option<StatusMessage>,
    filter: FilterCriteria,
    validation: Option<ValidationReport>,
    selected: Option<String>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn filter(&self) -> &FilterCriteria {
        &self.filter
    }

    pub fn validation(&self) -> Option<&ValidationReport> {
        self.validation.as_ref()
    }

    pub fn has_resources(&self) -> bool {
        self.dataset.as_ref().is_some_and(|dataset| !dataset.is_empty())
    }

    /// Returns whether a render is pending and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn view(&self) -> AppViewModel {
        let (counts, total, type_options, rows, loaded_count) = match &self.dataset {
            Some(dataset) => {
                let counts = dataset
                    .counts
                    .iter()
                    .map(|(resource_type, count)| CountRowView {
                        resource_type: resource_type.to_string(),
                        count,
                    })
                    .collect();
                let rows = filter_resources(&dataset.resources, &self.filter)
                    .into_iter()
                    .map(ResourceRowView::from_resource)
                    .collect();
                (
                    counts,
                    dataset.counts.total(),
                    dataset.counts.types(),
                    rows,
                    dataset.len(),
                )
            }
            None => (Vec::new(), 0, Vec::new(), Vec::new(), 0),
        };

        let validation = self.validation.as_ref().map(|report| {
            report
                .iter()
                .map(|(key, label)| ValidationRowView {
                    key: key.clone(),
                    label: label.clone(),
                })
                .collect()
        });

        let selected = self.selected.as_deref().and_then(|key| {
            let resource = self.dataset.as_ref()?.find(key)?;
            Some(ResourceDetailView {
                key: key.to_string(),
                display_name: resource.display_name(),
                json: resource.to_pretty_json(),
            })
        });

        AppViewModel {
            phase: self.phase,
            generation: self.generation,
            upload_in_progress: self.phase.upload_in_progress(),
            validating: self.phase == Phase::Validating,
            status: self.status.clone(),
            counts,
            total,
            type_options,
            filter: self.filter.clone(),
            loaded_count,
            rows,
            validation,
            selected,
            can_validate: self.phase == Phase::Ready && self.has_resources(),
            can_export: self.has_resources(),
            dirty: self.dirty,
        }
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_status(&mut self, status: Option<StatusMessage>) {
        self.status = status;
        self.mark_dirty();
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
        self.mark_dirty();
    }

    /// Starts a new dataset-producing operation and returns its generation.
    pub(crate) fn next_generation(&mut self) -> Generation {
        self.generation += 1;
        self.generation
    }

    pub(crate) fn is_current(&self, generation: Generation) -> bool {
        generation == self.generation
    }

    /// Optimistic reset before an upload: nothing stale stays visible.
    pub(crate) fn reset_for_upload(&mut self) {
        self.dataset = None;
        self.status = None;
        self.validation = None;
        self.selected = None;
        self.mark_dirty();
    }

    pub(crate) fn install_dataset(&mut self, dataset: Dataset) {
        self.dataset = Some(dataset);
        self.retain_selection();
        self.mark_dirty();
    }

    pub(crate) fn clear_dataset(&mut self) {
        self.dataset = None;
        self.selected = None;
        self.mark_dirty();
    }

    pub(crate) fn set_filter(&mut self, filter: FilterCriteria) {
        if self.filter != filter {
            self.filter = filter;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_validation(&mut self, report: Option<ValidationReport>) {
        self.validation = report;
        self.mark_dirty();
    }

    pub(crate) fn select(&mut self, key: Option<String>) {
        self.selected = key;
        self.retain_selection();
        self.mark_dirty();
    }

    fn retain_selection(&mut self) {
        let known = match (&self.selected, &self.dataset) {
            (Some(key), Some(dataset)) => dataset.find(key).is_some(),
            (Some(_), None) => false,
            (None, _) => return,
        };
        if !known {
            self.selected = None;
        }
    }
}
