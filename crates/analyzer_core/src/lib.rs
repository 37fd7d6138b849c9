//! Analyzer core: pure browse-and-ingest state machine and view-model helpers.
mod effect;
mod filter;
mod msg;
mod package;
mod resource;
mod state;
mod status;
mod update;
mod view_model;

pub use effect::Effect;
pub use filter::{filter_resources, FilterCriteria, TypeFilter};
pub use msg::{FetchFailure, Msg, RemoteFailure};
pub use package::{PackageFile, PACKAGE_CONTENT_TYPE};
pub use resource::{
    CountsError, Dataset, NameFragment, Resource, ResourceCounts, ResourceKey, ResourceName,
    ValidationReport,
};
pub use state::{AppState, Generation, Phase};
pub use status::{AnalyzerError, DatasetAction, FetchStep, StatusMessage};
pub use update::update;
pub use view_model::{
    AppViewModel, CountRowView, ResourceDetailView, ResourceRowView, ValidationRowView,
};
