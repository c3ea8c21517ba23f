use std::time::Duration;

use crate::{AppState, Effect, JobState, Msg, ToastSeverity};

/// How long the progress indicator stays at 100% after a successful job.
pub const HIDE_PROGRESS_DELAY: Duration = Duration::from_secs(2);

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::SettingsRestored {
            enabled,
            last_applied_utc,
        } => {
            state.restore_settings(&enabled, last_applied_utc);
            Vec::new()
        }
        Msg::SourceToggled { id } => match state.toggle_source(&id) {
            Some(_) => vec![persist_effect(&state)],
            None => {
                state.push_toast(ToastSeverity::Error, format!("Unknown source: {id}"));
                Vec::new()
            }
        },
        Msg::ApplyClicked => {
            // The trigger stays disabled until the running job resolves.
            if state.job() == JobState::Running {
                return (state, Vec::new());
            }
            let urls = state.registry().enabled_urls();
            if urls.is_empty() {
                state.push_toast(
                    ToastSeverity::Error,
                    "No sources selected: enable at least one source before applying",
                );
                return (state, Vec::new());
            }
            let job_seq = state.start_job();
            vec![Effect::StartJob { job_seq, urls }]
        }
        Msg::JobProgress(fraction) => {
            state.apply_progress(fraction);
            Vec::new()
        }
        Msg::JobCompleted {
            destination,
            finished_utc,
        } => {
            if state.job() != JobState::Running {
                return (state, Vec::new());
            }
            state.push_toast(
                ToastSeverity::Info,
                format!("Hosts file written to: {destination}"),
            );
            state.complete_job(destination, finished_utc);
            vec![
                persist_effect(&state),
                Effect::ScheduleHideProgress {
                    job_seq: state.current_job_seq(),
                    after: HIDE_PROGRESS_DELAY,
                },
            ]
        }
        Msg::JobFailed { message } => {
            if state.job() != JobState::Running {
                return (state, Vec::new());
            }
            state.push_toast(ToastSeverity::Error, format!("Error: {message}"));
            state.fail_job();
            Vec::new()
        }
        Msg::HideProgress { job_seq } => {
            // A newer job owns the indicator now.
            if job_seq == state.current_job_seq() && state.job() == JobState::Idle {
                state.hide_progress();
            }
            Vec::new()
        }
        Msg::Navigate(page) => {
            state.navigate(page);
            Vec::new()
        }
    };

    (state, effects)
}

fn persist_effect(state: &AppState) -> Effect {
    Effect::PersistSettings {
        enabled: state.registry().enabled_map(),
        last_applied_utc: state.last_applied_utc(),
    }
}
