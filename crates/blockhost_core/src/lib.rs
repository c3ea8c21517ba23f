//! BlockHost core: source registry, pure state machine and view-model helpers.
mod effect;
mod msg;
mod registry;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use registry::{display_host, Source, SourceRegistry};
pub use state::{AppState, JobSeq, JobState, Page, Toast, ToastSeverity};
pub use update::{update, HIDE_PROGRESS_DELAY};
pub use view_model::{AppViewModel, SourceRowView};
