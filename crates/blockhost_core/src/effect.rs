use std::collections::BTreeMap;
use std::time::Duration;

use crate::JobSeq;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Run one fetch-merge job over a snapshot of the enabled source URLs.
    StartJob { job_seq: JobSeq, urls: Vec<String> },
    /// Write the settings store; one boolean per source id.
    PersistSettings {
        enabled: BTreeMap<String, bool>,
        last_applied_utc: Option<String>,
    },
    /// Deliver `Msg::HideProgress { job_seq }` after `after` has elapsed.
    ScheduleHideProgress { job_seq: JobSeq, after: Duration },
}
