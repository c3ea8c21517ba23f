use std::collections::BTreeMap;

use crate::{JobSeq, Page};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Persisted settings loaded at startup.
    SettingsRestored {
        enabled: BTreeMap<String, bool>,
        last_applied_utc: Option<String>,
    },
    /// User flipped the switch of one source.
    SourceToggled { id: String },
    /// User clicked Apply.
    ApplyClicked,
    /// Engine progress for the running job, overall fraction in [0, 1].
    JobProgress(f64),
    /// Engine wrote the destination file.
    JobCompleted {
        destination: String,
        finished_utc: String,
    },
    /// Engine aborted the job.
    JobFailed { message: String },
    /// Delayed request to hide the progress indicator of a finished job.
    HideProgress { job_seq: JobSeq },
    /// User switched between the home and hosts pages.
    Navigate(Page),
}
