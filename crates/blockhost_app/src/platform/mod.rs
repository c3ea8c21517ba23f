mod app;
mod effects;
mod input;
mod paths;
mod persistence;
mod ui;

pub use app::{run_app, AppOptions};
