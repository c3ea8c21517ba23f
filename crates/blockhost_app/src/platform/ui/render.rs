use blockhost_core::{AppViewModel, Page, SourceRowView, Toast, ToastSeverity};
use indicatif::{ProgressBar, ProgressStyle};

const BAR_LENGTH: u64 = 1000;
const BAR_TEMPLATE: &str = "{spinner} [{bar:40}] {percent:>3}% {msg}";

/// Terminal stand-in for the window: a listing per page, toasts as lines
/// and an indicatif bar while a job's progress is visible.
#[derive(Default)]
pub struct Renderer {
    bar: Option<ProgressBar>,
    shown_page: Option<Page>,
    shown_sources: Vec<SourceRowView>,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, view: &AppViewModel) {
        let page_changed = self.shown_page != Some(view.page);
        let sources_changed = view.page == Page::Hosts && self.shown_sources != view.sources;
        if page_changed || sources_changed {
            for line in page_lines(view) {
                self.print(&line);
            }
            self.shown_page = Some(view.page);
            self.shown_sources = view.sources.clone();
        }
        self.render_progress(view);
    }

    /// Prints the current page regardless of what was shown before.
    pub fn render_page(&mut self, view: &AppViewModel) {
        self.shown_page = None;
        self.render(view);
    }

    pub fn toast(&self, toast: &Toast) {
        self.print(&toast_line(toast));
    }

    pub fn print(&self, line: &str) {
        match &self.bar {
            Some(bar) => bar.println(line),
            None => println!("{line}"),
        }
    }

    fn render_progress(&mut self, view: &AppViewModel) {
        if !view.progress_visible {
            if let Some(bar) = self.bar.take() {
                bar.finish_and_clear();
            }
            return;
        }
        let bar = self.bar.get_or_insert_with(new_bar);
        bar.set_position(progress_position(view.progress));
        if view.apply_enabled {
            bar.set_message("done");
        } else {
            bar.set_message("downloading");
        }
    }
}

fn new_bar() -> ProgressBar {
    let style = ProgressStyle::with_template(BAR_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ");
    ProgressBar::new(BAR_LENGTH).with_style(style)
}

pub fn progress_position(progress: f64) -> u64 {
    (progress.clamp(0.0, 1.0) * BAR_LENGTH as f64).round() as u64
}

pub fn toast_line(toast: &Toast) -> String {
    match toast.severity {
        ToastSeverity::Info => format!("* {}", toast.message),
        ToastSeverity::Error => format!("! {}", toast.message),
    }
}

pub fn page_lines(view: &AppViewModel) -> Vec<String> {
    match view.page {
        Page::Home => home_lines(view),
        Page::Hosts => hosts_lines(view),
    }
}

fn home_lines(view: &AppViewModel) -> Vec<String> {
    let mut lines = vec!["== Home ==".to_string(), view.user_label.clone()];
    lines.push(match &view.last_applied_utc {
        Some(when) => format!("Last applied: {when}"),
        None => "Last applied: never".to_string(),
    });
    if let Some(destination) = &view.last_destination {
        lines.push(format!("Hosts file: {destination}"));
    }
    lines.push(format!(
        "{} of {} sources enabled. Type 'hosts' to choose sources.",
        view.enabled_count,
        view.sources.len()
    ));
    lines
}

fn hosts_lines(view: &AppViewModel) -> Vec<String> {
    let mut lines = vec!["== Hosts ==".to_string()];
    let id_width = view
        .sources
        .iter()
        .map(|source| source.id.len())
        .max()
        .unwrap_or(0);
    for source in &view.sources {
        let mark = if source.enabled { "x" } else { " " };
        lines.push(format!(
            "[{mark}] {id:<id_width$}  {label} ({host})",
            id = source.id,
            label = source.label,
            host = source.host,
        ));
    }
    lines.push(if view.apply_enabled {
        "Type 'apply' to download the enabled sources.".to_string()
    } else {
        "Apply is disabled while a download is running.".to_string()
    });
    lines
}

#[cfg(test)]
mod tests {
    use blockhost_core::{update, AppState, Msg};
    use pretty_assertions::assert_eq;

    use super::*;

    fn hosts_view() -> AppViewModel {
        let (state, _) = update(AppState::new(), Msg::Navigate(Page::Hosts));
        let (state, _) = update(
            state,
            Msg::SourceToggled {
                id: "steven".to_string(),
            },
        );
        state.view()
    }

    #[test]
    fn hosts_page_marks_enabled_sources() {
        let lines = page_lines(&hosts_view());

        assert_eq!(lines[0], "== Hosts ==");
        assert!(lines[1].starts_with("[x] steven "));
        assert!(lines[1].ends_with("(raw.githubusercontent.com)"));
        assert!(lines[2].starts_with("[ ] facebook"));
        assert_eq!(
            lines.last().unwrap(),
            "Type 'apply' to download the enabled sources."
        );
    }

    #[test]
    fn home_page_shows_user_and_counts() {
        let view = AppState::new().with_user_name("ana").view();
        let lines = page_lines(&view);

        assert_eq!(
            lines,
            vec![
                "== Home ==".to_string(),
                "User: ana".to_string(),
                "Last applied: never".to_string(),
                "0 of 4 sources enabled. Type 'hosts' to choose sources.".to_string(),
            ]
        );
    }

    #[test]
    fn progress_position_is_clamped() {
        assert_eq!(progress_position(-1.0), 0);
        assert_eq!(progress_position(0.5), 500);
        assert_eq!(progress_position(3.0), BAR_LENGTH);
    }

    #[test]
    fn toast_lines_show_severity() {
        let toast = Toast {
            severity: ToastSeverity::Error,
            message: "Error: boom".to_string(),
        };
        assert_eq!(toast_line(&toast), "! Error: boom");
    }
}
