use crate::{FilterCriteria, Generation, Phase, Resource, StatusMessage};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub phase: Phase,
    pub generation: Generation,
    pub upload_in_progress: bool,
    pub validating: bool,
    pub status: Option<StatusMessage>,
    pub counts: Vec<CountRowView>,
    pub total: u64,
    /// Resource types offered by the type picker, besides "all".
    pub type_options: Vec<String>,
    pub filter: FilterCriteria,
    pub loaded_count: usize,
    /// Resources passing the current filter, in dataset order.
    pub rows: Vec<ResourceRowView>,
    /// Present while the validation modal is open.
    pub validation: Option<Vec<ValidationRowView>>,
    pub selected: Option<ResourceDetailView>,
    pub can_validate: bool,
    pub can_export: bool,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountRowView {
    pub resource_type: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRowView {
    pub key: String,
    pub resource_type: String,
    pub id: String,
    pub display_name: String,
    pub url: Option<String>,
}

impl ResourceRowView {
    pub(crate) fn from_resource(resource: &Resource) -> Self {
        Self {
            key: resource.key(),
            resource_type: resource.resource_type.clone(),
            id: resource.id.clone(),
            display_name: resource.display_name(),
            url: resource.url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationRowView {
    pub key: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDetailView {
    pub key: String,
    pub display_name: String,
    pub json: String,
}
