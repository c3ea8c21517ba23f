use std::io::{self, BufRead};
use std::sync::mpsc;
use std::thread;

use anyhow::{bail, Context};
use blockhost_core::{update, AppState, JobState, Msg};
use blockhost_logging::{bh_debug, bh_info, LogDestination};
use log::LevelFilter;

use super::effects::EffectRunner;
use super::input::{parse_command, Command, HELP_TEXT};
use super::paths::{current_user_name, AppPaths};
use super::persistence::load_settings;
use super::ui::render::Renderer;

#[derive(Debug, Clone)]
pub struct AppOptions {
    pub apply_once: bool,
    pub enable: Vec<String>,
    pub log_destination: LogDestination,
    pub verbose: bool,
}

/// Everything the interactive thread reacts to, from any producer.
#[derive(Debug)]
pub enum LoopEvent {
    Msg(Msg),
    Command(Command),
    InputError(String),
    InputClosed,
}

pub fn run_app(options: AppOptions) -> anyhow::Result<()> {
    let paths = AppPaths::resolve()?;
    let level = if options.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    blockhost_logging::initialize(options.log_destination, level, &paths.log_file);
    bh_info!("blockhost starting; destination {:?}", paths.destination);

    let (tx, rx) = mpsc::channel::<LoopEvent>();
    let settings = load_settings(&paths.settings_file);
    let mut app = App {
        state: AppState::new().with_user_name(current_user_name()),
        runner: EffectRunner::new(tx.clone(), paths),
        renderer: Renderer::new(),
    };

    app.dispatch(Msg::SettingsRestored {
        enabled: settings.sources,
        last_applied_utc: settings.last_applied_utc,
    });
    for id in &options.enable {
        let already_enabled = app
            .state
            .registry()
            .get(id)
            .is_some_and(|source| source.enabled);
        if !already_enabled {
            app.dispatch(Msg::SourceToggled { id: id.clone() });
        }
    }

    if options.apply_once {
        app.apply_once(&rx)
    } else {
        spawn_input_reader(tx);
        app.interactive(&rx);
        Ok(())
    }
}

struct App {
    state: AppState,
    runner: EffectRunner,
    renderer: Renderer,
}

impl App {
    fn dispatch(&mut self, msg: Msg) {
        bh_debug!("dispatch {:?}", msg);
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let toasts = state.take_toasts();
        let was_dirty = state.consume_dirty();
        let view = state.view();
        self.state = state;

        for toast in &toasts {
            self.renderer.toast(toast);
        }
        if was_dirty {
            self.renderer.render(&view);
        }
        self.runner.run(effects);
    }

    fn interactive(&mut self, rx: &mpsc::Receiver<LoopEvent>) {
        self.renderer.render_page(&self.state.view());
        self.renderer.print("Type 'help' for commands.");

        let mut quit_requested = false;
        while let Ok(event) = rx.recv() {
            match event {
                LoopEvent::Msg(msg) => self.dispatch(msg),
                LoopEvent::Command(Command::Dispatch(msg)) => self.dispatch(msg),
                LoopEvent::Command(Command::Apply) => {
                    if self.state.view().apply_enabled {
                        self.dispatch(Msg::ApplyClicked);
                    } else {
                        self.renderer
                            .print("Apply is disabled while a download is running.");
                    }
                }
                LoopEvent::Command(Command::List) => {
                    self.renderer.render_page(&self.state.view());
                }
                LoopEvent::Command(Command::Help) => self.renderer.print(HELP_TEXT),
                LoopEvent::Command(Command::Quit) | LoopEvent::InputClosed => {
                    quit_requested = true;
                    if self.state.job() == JobState::Running {
                        self.renderer
                            .print("Waiting for the running download to finish...");
                    }
                }
                LoopEvent::InputError(message) => self.renderer.print(&message),
            }
            // Jobs cannot be cancelled; their temp files go away when they resolve.
            if quit_requested && self.state.job() == JobState::Idle {
                break;
            }
        }
        bh_info!("blockhost exiting");
    }

    /// Runs one job over the current selection and blocks until it resolves.
    fn apply_once(&mut self, rx: &mpsc::Receiver<LoopEvent>) -> anyhow::Result<()> {
        self.dispatch(Msg::ApplyClicked);
        if self.state.job() != JobState::Running {
            bail!("no sources selected; enable one with --enable <ID>");
        }

        loop {
            let event = rx.recv().context("engine stopped before the job finished")?;
            let LoopEvent::Msg(msg) = event else {
                continue;
            };
            let outcome = match &msg {
                Msg::JobCompleted { .. } => Some(Ok(())),
                Msg::JobFailed { message } => Some(Err(anyhow::anyhow!(message.clone()))),
                _ => None,
            };
            self.dispatch(msg);
            if let Some(outcome) = outcome {
                return outcome;
            }
        }
    }
}

fn spawn_input_reader(tx: mpsc::Sender<LoopEvent>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let event = match line {
                Ok(line) => match parse_command(&line) {
                    Ok(Some(command)) => LoopEvent::Command(command),
                    Ok(None) => continue,
                    Err(message) => LoopEvent::InputError(message),
                },
                Err(_) => break,
            };
            if tx.send(event).is_err() {
                return;
            }
        }
        let _ = tx.send(LoopEvent::InputClosed);
    });
}
