use crate::{JobState, Page};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub page: Page,
    pub user_label: String,
    pub sources: Vec<SourceRowView>,
    pub enabled_count: usize,
    pub job: JobState,
    /// The Apply trigger is disabled while a job is in flight.
    pub apply_enabled: bool,
    pub progress: f64,
    pub progress_visible: bool,
    pub last_applied_utc: Option<String>,
    pub last_destination: Option<String>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRowView {
    pub id: String,
    pub label: String,
    pub host: String,
    pub enabled: bool,
}
