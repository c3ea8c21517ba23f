use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use blockhost_engine::AtomicFileWriter;
use blockhost_logging::{bh_error, bh_info, bh_warn};
use serde::{Deserialize, Serialize};

/// Settings store: one enabled flag per source id plus the time of the
/// last successful apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub(crate) struct Settings {
    #[serde(default)]
    pub sources: BTreeMap<String, bool>,
    #[serde(default)]
    pub last_applied_utc: Option<String>,
}

/// Missing or unreadable settings fall back to defaults.
pub(crate) fn load_settings(path: &Path) -> Settings {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Settings::default();
        }
        Err(err) => {
            bh_warn!("Failed to read settings from {:?}: {}", path, err);
            return Settings::default();
        }
    };

    match ron::from_str(&content) {
        Ok(settings) => {
            bh_info!("Loaded settings from {:?}", path);
            settings
        }
        Err(err) => {
            bh_warn!("Failed to parse settings from {:?}: {}", path, err);
            Settings::default()
        }
    }
}

pub(crate) fn save_settings(path: &Path, settings: &Settings) {
    let pretty = ron::ser::PrettyConfig::new();
    let content = match ron::ser::to_string_pretty(settings, pretty) {
        Ok(text) => text,
        Err(err) => {
            bh_error!("Failed to serialize settings: {}", err);
            return;
        }
    };

    let writer = AtomicFileWriter::new(path.to_path_buf());
    if let Err(err) = writer.write(&content) {
        bh_error!("Failed to write settings to {:?}: {}", path, err);
    }
}
