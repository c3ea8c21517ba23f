use std::collections::BTreeMap;

use crate::registry::{display_host, SourceRegistry};
use crate::view_model::{AppViewModel, SourceRowView};

pub type JobSeq = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobState {
    #[default]
    Idle,
    Running,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Page {
    #[default]
    Home,
    Hosts,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastSeverity {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub severity: ToastSeverity,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    registry: SourceRegistry,
    job: JobState,
    job_seq: JobSeq,
    progress: f64,
    progress_visible: bool,
    page: Page,
    user_name: String,
    last_applied_utc: Option<String>,
    last_destination: Option<String>,
    toasts: Vec<Toast>,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::with_registry(SourceRegistry::builtin())
    }

    pub fn with_registry(registry: SourceRegistry) -> Self {
        Self {
            registry,
            job: JobState::Idle,
            job_seq: 0,
            progress: 0.0,
            progress_visible: false,
            page: Page::Home,
            user_name: String::new(),
            last_applied_utc: None,
            last_destination: None,
            toasts: Vec::new(),
            dirty: false,
        }
    }

    pub fn with_user_name(mut self, user_name: impl Into<String>) -> Self {
        self.user_name = user_name.into();
        self
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    pub fn job(&self) -> JobState {
        self.job
    }

    pub fn view(&self) -> AppViewModel {
        let user = if self.user_name.is_empty() {
            "unknown user"
        } else {
            self.user_name.as_str()
        };
        AppViewModel {
            page: self.page,
            user_label: format!("User: {user}"),
            sources: self
                .registry
                .sources()
                .iter()
                .map(|source| SourceRowView {
                    id: source.id.clone(),
                    label: source.label.clone(),
                    host: display_host(&source.url),
                    enabled: source.enabled,
                })
                .collect(),
            enabled_count: self.registry.enabled_count(),
            job: self.job,
            apply_enabled: self.job == JobState::Idle,
            progress: self.progress,
            progress_visible: self.progress_visible,
            last_applied_utc: self.last_applied_utc.clone(),
            last_destination: self.last_destination.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Drains toasts queued since the last call, oldest first.
    pub fn take_toasts(&mut self) -> Vec<Toast> {
        std::mem::take(&mut self.toasts)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn push_toast(&mut self, severity: ToastSeverity, message: impl Into<String>) {
        self.toasts.push(Toast {
            severity,
            message: message.into(),
        });
        self.mark_dirty();
    }

    pub(crate) fn restore_settings(
        &mut self,
        enabled: &BTreeMap<String, bool>,
        last_applied_utc: Option<String>,
    ) {
        self.registry.apply_enabled(enabled);
        self.last_applied_utc = last_applied_utc;
        self.mark_dirty();
    }

    pub(crate) fn toggle_source(&mut self, id: &str) -> Option<bool> {
        let enabled = self.registry.toggle(id)?;
        self.mark_dirty();
        Some(enabled)
    }

    pub(crate) fn last_applied_utc(&self) -> Option<String> {
        self.last_applied_utc.clone()
    }

    pub(crate) fn current_job_seq(&self) -> JobSeq {
        self.job_seq
    }

    pub(crate) fn start_job(&mut self) -> JobSeq {
        self.job = JobState::Running;
        self.job_seq += 1;
        self.progress = 0.0;
        self.progress_visible = true;
        self.mark_dirty();
        self.job_seq
    }

    /// Progress never moves backwards and never exceeds 1.0.
    pub(crate) fn apply_progress(&mut self, fraction: f64) {
        if self.job != JobState::Running || fraction.is_nan() {
            return;
        }
        let next = fraction.min(1.0).max(self.progress);
        if next != self.progress {
            self.progress = next;
            self.mark_dirty();
        }
    }

    pub(crate) fn complete_job(&mut self, destination: String, finished_utc: String) {
        self.job = JobState::Idle;
        self.progress = 1.0;
        self.last_destination = Some(destination);
        self.last_applied_utc = Some(finished_utc);
        self.mark_dirty();
    }

    pub(crate) fn fail_job(&mut self) {
        self.job = JobState::Idle;
        self.progress_visible = false;
        self.mark_dirty();
    }

    pub(crate) fn hide_progress(&mut self) {
        if self.progress_visible {
            self.progress_visible = false;
            self.mark_dirty();
        }
    }

    pub(crate) fn navigate(&mut self, page: Page) {
        if self.page != page {
            self.page = page;
            self.mark_dirty();
        }
    }
}
