// Host-side tests for endpoint derivation and query-string overrides.

#![allow(dead_code)]
mod constants {
    include!("../src/core/constants.rs");
}
mod glyphs {
    include!("../src/core/glyphs.rs");
}
mod shapes {
    include!("../src/core/shapes.rs");
}
mod connection {
    include!("../src/core/connection.rs");
}
mod config {
    include!("../src/core/config.rs");
}

use config::*;
use constants::*;
use shapes::Mode;

#[test]
fn endpoints_follow_the_page_origin() {
    let plain = AppConfig::from_location("http:", "localhost:8000", "");
    assert_eq!(plain.ws_url, "ws://localhost:8000/ws");
    assert_eq!(plain.transcribe_url, TRANSCRIBE_PATH);
    assert_eq!(plain.engine, EngineOptions::default());

    let secure = AppConfig::from_location("https:", "viz.example.org", "");
    assert_eq!(secure.ws_url, "wss://viz.example.org/ws");
}

#[test]
fn numeric_overrides_are_clamped() {
    let cfg = AppConfig::from_location(
        "http:",
        "h",
        "?particles=999999&speed=5&reconnects=0&reconnect_delay=250&seed=9",
    );
    assert_eq!(cfg.engine.particle_count, MAX_PARTICLE_COUNT);
    assert_eq!(cfg.engine.transition_speed, MAX_TRANSITION_SPEED);
    assert_eq!(cfg.reconnect.max_attempts, 1);
    assert_eq!(cfg.reconnect.base_delay_ms, 250);
    assert_eq!(cfg.engine.seed, Some(9));

    let low = AppConfig::from_location("http:", "h", "particles=10&speed=0");
    assert_eq!(low.engine.particle_count, MIN_PARTICLE_COUNT);
    assert_eq!(low.engine.transition_speed, MIN_TRANSITION_SPEED);
}

#[test]
fn invalid_overrides_are_skipped() {
    let cfg = AppConfig::from_location(
        "http:",
        "h",
        "?particles=lots&speed=NaN&mode=cube&colour=red&seed=",
    );
    assert_eq!(cfg.engine, EngineOptions::default());
}

#[test]
fn ws_override_accepts_url_or_host() {
    let full = AppConfig::from_location("http:", "h", "?ws=wss://backend:9000/socket");
    assert_eq!(full.ws_url, "wss://backend:9000/socket");
    let host = AppConfig::from_location("https:", "h", "?ws=backend:9000");
    assert_eq!(host.ws_url, "wss://backend:9000/ws");
}

#[test]
fn mode_list_restricts_and_fixes_the_initial_mode() {
    let cfg = AppConfig::from_location("http:", "h", "?modes=galaxy,dna");
    assert_eq!(cfg.engine.enabled_modes, vec![Mode::Galaxy, Mode::Helix]);
    // sphere is the default start but is no longer enabled
    assert_eq!(cfg.engine.initial_mode, Mode::Galaxy);
    assert!(!cfg.engine.is_enabled(Mode::Sphere));

    let chosen = AppConfig::from_location("http:", "h", "?modes=galaxy,dna&mode=helix");
    assert_eq!(chosen.engine.initial_mode, Mode::Helix);

    let bad = AppConfig::from_location("http:", "h", "?modes=galaxy,cube");
    assert_eq!(bad.engine.enabled_modes, Mode::ALL.to_vec());
}

#[test]
fn glyph_text_override() {
    let cfg = AppConfig::from_location("http:", "h", "?text=HI");
    assert_eq!(cfg.engine.glyph_text, "HI");
    let blank = AppConfig::from_location("http:", "h", "?text=");
    assert_eq!(blank.engine.glyph_text, GLYPH_TEXT);
}

#[test]
fn query_values_are_percent_decoded() {
    let cfg = AppConfig::from_location(
        "https:",
        "h.example",
        "?text=HI%20YOU&modes=sphere%2Cgalaxy&ws=wss%3A%2F%2Fb.example%2Fws",
    );
    assert_eq!(cfg.engine.glyph_text, "HI YOU");
    assert_eq!(cfg.engine.enabled_modes, vec![Mode::Sphere, Mode::Galaxy]);
    assert_eq!(cfg.ws_url, "wss://b.example/ws");

    let plus = AppConfig::from_location("http:", "h", "?text=HELLO+WORLD&m%6Fde=atom");
    assert_eq!(plus.engine.glyph_text, "HELLO WORLD");
    assert_eq!(plus.engine.initial_mode, Mode::Atom);
}

#[test]
fn malformed_escapes_stay_literal() {
    assert_eq!(decode_component("100%"), "100%");
    assert_eq!(decode_component("%zz%4"), "%zz%4");
    assert_eq!(decode_component("%C3%A9t%C3%A9"), "été");
}
