//! Integration tests for server configuration and default slot handling.

use std::collections::HashMap;
use wnf_selection_web::{SelectionError, ServerConfig, SlotConfig};

fn config_from(pairs: &[(&str, &str)]) -> Result<ServerConfig, SelectionError> {
    let env: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    ServerConfig::from_lookup(|key| env.get(key).cloned())
}

#[test]
fn defaults_when_unset() {
    let c = config_from(&[]).unwrap();
    assert_eq!(c.host, "0.0.0.0");
    assert_eq!(c.port, 8080);
    assert_eq!(c.default_slots, SlotConfig { merit_slots: 16, random_slots: 2 });
}

#[test]
fn reads_overrides() {
    let c = config_from(&[
        ("HOST", "127.0.0.1"),
        ("PORT", "9000"),
        ("DEFAULT_MERIT_SLOTS", "12"),
        ("DEFAULT_RANDOM_SLOTS", " 4 "),
    ])
    .unwrap();
    assert_eq!(c.host, "127.0.0.1");
    assert_eq!(c.port, 9000);
    assert_eq!(c.default_slots, SlotConfig { merit_slots: 12, random_slots: 4 });
}

#[test]
fn negative_default_slots_are_rejected() {
    assert_eq!(
        config_from(&[("DEFAULT_MERIT_SLOTS", "-3")]),
        Err(SelectionError::NegativeMeritSlots(-3))
    );
    assert_eq!(
        config_from(&[("DEFAULT_RANDOM_SLOTS", "-1")]),
        Err(SelectionError::NegativeRandomSlots(-1))
    );
}

#[test]
fn out_of_range_default_falls_back_instead_of_wrapping() {
    let c = config_from(&[("DEFAULT_MERIT_SLOTS", "99999999999999999999"), ("PORT", "70000")]).unwrap();
    assert_eq!(c.default_slots.merit_slots, 16);
    assert_eq!(c.port, 8080);
}

#[test]
fn overrides_replace_only_given_counts() {
    let defaults = SlotConfig { merit_slots: 16, random_slots: 2 };
    assert_eq!(defaults.with_overrides(None, None), Ok(defaults));
    assert_eq!(
        defaults.with_overrides(Some(10), None),
        Ok(SlotConfig { merit_slots: 10, random_slots: 2 })
    );
    assert_eq!(
        defaults.with_overrides(None, Some(0)),
        Ok(SlotConfig { merit_slots: 16, random_slots: 0 })
    );
    assert_eq!(
        defaults.with_overrides(Some(5), Some(-2)),
        Err(SelectionError::NegativeRandomSlots(-2))
    );
}
