//! Integration tests for Slice 4 - Dial geometry and static configuration
//!
//! Tests the catalog, symbol resolution, stroke plans and config loading.

use std::fs;
use std::time::Duration;

use midnight_dial::config::{DialConfig, StrokeTiming};
use midnight_dial::core::{rotation_to_stop, slot_angle, StrokePlan};
use midnight_dial::error::DialError;
use midnight_dial::types::{MoodCategory, Symbol, CATALOG};
use midnight_dial::{STOP_ANGLE_DEG, STROKE_FORWARD_MS};
use pretty_assertions::assert_eq;

#[test]
fn test_catalog_shape() {
    assert_eq!(CATALOG.len(), 9);

    let count = |category: MoodCategory| CATALOG.iter().filter(|s| s.category == category).count();
    assert_eq!(count(MoodCategory::Positive), 3);
    assert_eq!(count(MoodCategory::Negative), 3);
    assert_eq!(count(MoodCategory::Neutral), 2);
    assert_eq!(count(MoodCategory::Chaotic), 1);
}

#[test]
fn test_every_symbol_resolves_three_ways() {
    for symbol in CATALOG.iter() {
        assert_eq!(Symbol::resolve(symbol.glyph), Some(symbol));
        assert_eq!(Symbol::resolve(&symbol.slot.to_string()), Some(symbol));
        assert_eq!(Symbol::resolve(&symbol.label.to_uppercase()), Some(symbol));
    }
}

#[test]
fn test_every_slot_lands_on_the_stop() {
    let timing = StrokeTiming::default();
    for symbol in CATALOG.iter() {
        let plan = StrokePlan::for_symbol(symbol, &timing);
        let landed = slot_angle(symbol.index()) + plan.angle_at(plan.time_to_stop());
        assert!((landed - STOP_ANGLE_DEG).abs() < 1e-9, "slot {}", symbol.slot);
        assert_eq!(plan.time_to_stop(), Duration::from_millis(STROKE_FORWARD_MS));
        assert!(plan.spring_back > Duration::ZERO);
    }
}

#[test]
fn test_rotation_grows_along_the_dial() {
    let rotations: Vec<f64> = (0..CATALOG.len()).map(rotation_to_stop).collect();
    assert!(rotations.windows(2).all(|w| w[1] > w[0]));
    assert!(rotations.iter().all(|r| *r > 0.0 && *r < 360.0));
}

#[test]
fn test_forward_motion_is_monotonic() {
    let plan = StrokePlan::for_index(5, &StrokeTiming::default());
    let mut last = 0.0;
    for ms in (0..=plan.forward.as_millis() as u64).step_by(20) {
        let angle = plan.angle_at(Duration::from_millis(ms));
        assert!(angle >= last);
        last = angle;
    }
}

#[test]
fn test_config_file_round() {
    let dir = std::env::temp_dir().join(format!("midnight_dial_slice4_{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();

    let good = dir.join("good.toml");
    fs::write(&good, "max_entries = 4\n[stroke]\nhold_ms = 0\n").unwrap();
    let config = DialConfig::load(&good).unwrap();
    assert_eq!(config.max_entries, 4);
    assert_eq!(config.stroke.hold_ms, 0);
    assert_eq!(config.min_early_finalize, 3);

    let invalid = dir.join("invalid.toml");
    fs::write(&invalid, "early_finalize_probability = -0.1\n").unwrap();
    assert!(matches!(
        DialConfig::load(&invalid),
        Err(DialError::InvalidConfig(_))
    ));

    let garbled = dir.join("garbled.toml");
    fs::write(&garbled, "max_entries = \"five\"\n").unwrap();
    assert!(matches!(
        DialConfig::load(&garbled),
        Err(DialError::ConfigParse { .. })
    ));

    fs::remove_dir_all(&dir).unwrap();
}
