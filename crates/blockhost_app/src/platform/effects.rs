use std::sync::{mpsc, Arc};
use std::thread;

use blockhost_core::{Effect, Msg};
use blockhost_engine::{EngineEvent, EngineHandle, FetchSettings, ProgressSink};
use blockhost_logging::{bh_debug, bh_info, bh_warn};
use chrono::Utc;

use super::app::LoopEvent;
use super::paths::AppPaths;
use super::persistence::{save_settings, Settings};

/// Forwards engine events to the interactive thread as core messages.
struct MsgSink {
    tx: mpsc::Sender<LoopEvent>,
}

impl ProgressSink for MsgSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(LoopEvent::Msg(map_event(event)));
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::Progress(fraction) => Msg::JobProgress(fraction),
        EngineEvent::Completed { destination } => Msg::JobCompleted {
            destination: destination.display().to_string(),
            finished_utc: Utc::now().to_rfc3339(),
        },
        EngineEvent::Failed { message } => Msg::JobFailed { message },
    }
}

pub struct EffectRunner {
    engine: EngineHandle,
    paths: AppPaths,
    tx: mpsc::Sender<LoopEvent>,
}

impl EffectRunner {
    pub fn new(tx: mpsc::Sender<LoopEvent>, paths: AppPaths) -> Self {
        let sink = Arc::new(MsgSink { tx: tx.clone() });
        let engine = EngineHandle::new(FetchSettings::default(), sink);
        Self { engine, paths, tx }
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartJob { job_seq, urls } => {
                    bh_info!(
                        "StartJob job_seq={} sources={} destination={:?}",
                        job_seq,
                        urls.len(),
                        self.paths.destination
                    );
                    if let Err(err) = self.engine.start(urls, self.paths.destination.clone()) {
                        bh_warn!("Job {} could not start: {}", job_seq, err);
                        let _ = self.tx.send(LoopEvent::Msg(Msg::JobFailed {
                            message: err.to_string(),
                        }));
                    }
                }
                Effect::PersistSettings {
                    enabled,
                    last_applied_utc,
                } => {
                    bh_debug!("PersistSettings {:?}", enabled);
                    save_settings(
                        &self.paths.settings_file,
                        &Settings {
                            sources: enabled,
                            last_applied_utc,
                        },
                    );
                }
                Effect::ScheduleHideProgress { job_seq, after } => {
                    let tx = self.tx.clone();
                    thread::spawn(move || {
                        thread::sleep(after);
                        let _ = tx.send(LoopEvent::Msg(Msg::HideProgress { job_seq }));
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn engine_events_map_to_core_messages() {
        assert_eq!(map_event(EngineEvent::Progress(0.5)), Msg::JobProgress(0.5));
        assert_eq!(
            map_event(EngineEvent::Failed {
                message: "boom".to_string()
            }),
            Msg::JobFailed {
                message: "boom".to_string()
            }
        );
        match map_event(EngineEvent::Completed {
            destination: PathBuf::from("/home/ana/hosts"),
        }) {
            Msg::JobCompleted {
                destination,
                finished_utc,
            } => {
                assert_eq!(destination, "/home/ana/hosts");
                assert!(chrono::DateTime::parse_from_rfc3339(&finished_utc).is_ok());
            }
            other => panic!("unexpected message {other:?}"),
        }
    }
}
