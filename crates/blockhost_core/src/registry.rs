use std::collections::BTreeMap;

/// Identifier, label and feed URL of every built-in source, in display order.
const BUILTIN_SOURCES: &[(&str, &str, &str)] = &[
    (
        "steven",
        "StevenBlack unified hosts",
        "https://raw.githubusercontent.com/StevenBlack/hosts/master/hosts",
    ),
    (
        "facebook",
        "Facebook domains",
        "https://raw.githubusercontent.com/jmdugan/blocklists/master/corporations/facebook/all",
    ),
    ("adaway", "AdAway default blocklist", "https://adaway.org/hosts.txt"),
    (
        "someonewhocares",
        "Dan Pollock's hosts file",
        "https://someonewhocares.org/hosts/zero/hosts",
    ),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub id: String,
    pub label: String,
    pub url: String,
    pub enabled: bool,
}

/// Fixed, ordered set of blocklist sources with their enabled flags.
///
/// Sources are never added or removed after construction; only the enabled
/// flag changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRegistry {
    sources: Vec<Source>,
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SourceRegistry {
    pub fn builtin() -> Self {
        Self::from_sources(
            BUILTIN_SOURCES
                .iter()
                .map(|(id, label, url)| Source {
                    id: (*id).to_string(),
                    label: (*label).to_string(),
                    url: (*url).to_string(),
                    enabled: false,
                })
                .collect(),
        )
    }

    /// Build a registry from an explicit list; definition order is kept.
    pub fn from_sources(sources: Vec<Source>) -> Self {
        Self { sources }
    }

    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    pub fn get(&self, id: &str) -> Option<&Source> {
        self.sources.iter().find(|source| source.id == id)
    }

    /// URLs of enabled sources, in definition order (not toggle order).
    pub fn enabled_urls(&self) -> Vec<String> {
        self.sources
            .iter()
            .filter(|source| source.enabled)
            .map(|source| source.url.clone())
            .collect()
    }

    pub fn enabled_count(&self) -> usize {
        self.sources.iter().filter(|source| source.enabled).count()
    }

    /// Returns `false` when `id` names no source.
    pub fn set_enabled(&mut self, id: &str, enabled: bool) -> bool {
        match self.sources.iter_mut().find(|source| source.id == id) {
            Some(source) => {
                source.enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// Flips one flag and returns its new value, or `None` for an unknown id.
    pub fn toggle(&mut self, id: &str) -> Option<bool> {
        let source = self.sources.iter_mut().find(|source| source.id == id)?;
        source.enabled = !source.enabled;
        Some(source.enabled)
    }

    /// Key-value form used by the settings store, one entry per source.
    pub fn enabled_map(&self) -> BTreeMap<String, bool> {
        self.sources
            .iter()
            .map(|source| (source.id.clone(), source.enabled))
            .collect()
    }

    /// Import persisted flags. Unknown keys are ignored and sources missing
    /// from `flags` keep their current value.
    pub fn apply_enabled(&mut self, flags: &BTreeMap<String, bool>) {
        for source in &mut self.sources {
            if let Some(enabled) = flags.get(&source.id) {
                source.enabled = *enabled;
            }
        }
    }
}

/// Host part of a source URL for compact display; falls back to the raw URL.
pub fn display_host(url: &str) -> String {
    url::Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_string))
        .unwrap_or_else(|| url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_urls_are_valid_https() {
        for source in SourceRegistry::builtin().sources() {
            let parsed = url::Url::parse(&source.url).unwrap();
            assert_eq!(parsed.scheme(), "https", "{}", source.id);
        }
    }

    #[test]
    fn builtin_ids_are_unique() {
        let registry = SourceRegistry::builtin();
        assert_eq!(registry.enabled_map().len(), registry.sources().len());
    }

    #[test]
    fn set_enabled_rejects_unknown_ids() {
        let mut registry = SourceRegistry::builtin();
        assert!(registry.set_enabled("adaway", true));
        assert!(!registry.set_enabled("missing", true));
        assert_eq!(registry.enabled_urls(), vec!["https://adaway.org/hosts.txt"]);
        assert_eq!(registry.toggle("missing"), None);
    }

    #[test]
    fn display_host_falls_back_to_raw_input() {
        assert_eq!(display_host("https://adaway.org/hosts.txt"), "adaway.org");
        assert_eq!(display_host("not a url"), "not a url");
    }
}
