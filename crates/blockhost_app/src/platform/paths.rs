use std::path::PathBuf;

use anyhow::Context;

/// File name of the merged output inside the home directory.
pub const HOSTS_FILENAME: &str = "hosts";
const APP_DIR: &str = "blockhost";
const SETTINGS_FILENAME: &str = "settings.ron";
const LOG_FILENAME: &str = "blockhost.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub destination: PathBuf,
    pub settings_file: PathBuf,
    pub log_file: PathBuf,
}

impl AppPaths {
    pub fn resolve() -> anyhow::Result<Self> {
        let home = dirs::home_dir().context("could not determine the home directory")?;
        let config = dirs::config_dir().unwrap_or_else(|| home.join(".config"));
        let data = dirs::data_local_dir().unwrap_or_else(|| home.join(".local").join("share"));
        Ok(Self::from_dirs(home, config, data))
    }

    pub fn from_dirs(home: PathBuf, config: PathBuf, data: PathBuf) -> Self {
        Self {
            destination: home.join(HOSTS_FILENAME),
            settings_file: config.join(APP_DIR).join(SETTINGS_FILENAME),
            log_file: data.join(APP_DIR).join(LOG_FILENAME),
        }
    }
}

/// Login name shown on the home page; empty when it cannot be determined.
pub fn current_user_name() -> String {
    ["USER", "USERNAME", "LOGNAME"]
        .iter()
        .find_map(|key| std::env::var(key).ok().filter(|value| !value.is_empty()))
        .or_else(|| {
            dirs::home_dir()
                .and_then(|home| home.file_name().map(|name| name.to_string_lossy().into_owned()))
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn destination_is_fixed_name_in_home() {
        let paths = AppPaths::from_dirs(
            PathBuf::from("/home/ana"),
            PathBuf::from("/home/ana/.config"),
            PathBuf::from("/home/ana/.local/share"),
        );
        assert_eq!(paths.destination, PathBuf::from("/home/ana/hosts"));
        assert_eq!(
            paths.settings_file,
            PathBuf::from("/home/ana/.config/blockhost/settings.ron")
        );
        assert_eq!(
            paths.log_file,
            PathBuf::from("/home/ana/.local/share/blockhost/blockhost.log")
        );
    }
}
