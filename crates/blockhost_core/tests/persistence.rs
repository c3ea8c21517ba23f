use std::collections::BTreeMap;

use blockhost_core::{update, AppState, Effect, Msg};

fn init_logging() {
    blockhost_logging::initialize_for_tests();
}

fn restore(pairs: &[(&str, bool)], last_applied_utc: Option<&str>) -> AppState {
    let enabled: BTreeMap<String, bool> = pairs
        .iter()
        .map(|(id, enabled)| (id.to_string(), *enabled))
        .collect();
    let (state, effects) = update(
        AppState::new(),
        Msg::SettingsRestored {
            enabled,
            last_applied_utc: last_applied_utc.map(str::to_string),
        },
    );
    assert!(effects.is_empty());
    state
}

#[test]
fn restored_flags_drive_enabled_urls() {
    init_logging();
    let state = restore(&[("facebook", true), ("steven", true)], None);

    let urls = state.registry().enabled_urls();
    assert_eq!(urls.len(), 2);
    assert!(urls[0].contains("StevenBlack"));
    assert!(urls[1].contains("facebook"));
}

#[test]
fn unknown_keys_are_ignored_and_missing_keys_keep_defaults() {
    init_logging();
    let state = restore(&[("retired_feed", true), ("adaway", true)], None);

    let map = state.registry().enabled_map();
    assert!(!map.contains_key("retired_feed"));
    assert_eq!(map.get("adaway"), Some(&true));
    assert_eq!(map.get("steven"), Some(&false));
}

#[test]
fn last_applied_survives_toggle_persistence() {
    init_logging();
    let state = restore(&[], Some("2026-02-03T04:05:06+00:00"));

    let (_, effects) = update(
        state,
        Msg::SourceToggled {
            id: "steven".to_string(),
        },
    );

    match &effects[..] {
        [Effect::PersistSettings {
            enabled,
            last_applied_utc,
        }] => {
            assert_eq!(enabled.get("steven"), Some(&true));
            assert_eq!(last_applied_utc.as_deref(), Some("2026-02-03T04:05:06+00:00"));
        }
        other => panic!("unexpected effects {other:?}"),
    }
}
