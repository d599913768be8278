// Host-side tests for the engine aggregate and inbound dispatch.

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
mod transition {
    include!("../src/core/transition.rs");
}
mod voice {
    include!("../src/core/voice.rs");
}
mod reactor {
    include!("../src/core/reactor.rs");
}
mod protocol {
    include!("../src/core/protocol.rs");
}
mod connection {
    include!("../src/core/connection.rs");
}
mod config {
    include!("../src/core/config.rs");
}
mod engine {
    include!("../src/core/engine.rs");
}
mod dispatch {
    include!("../src/core/dispatch.rs");
}

use config::EngineOptions;
use constants::*;
use dispatch::{dispatch, UiEffect};
use engine::ParticleEngine;
use protocol::{decode, Inbound, StateData};
use reactor::{profile, CognitiveState, Effect};
use shapes::Mode;
use transition::Phase;

fn engine_with(count: usize) -> ParticleEngine {
    ParticleEngine::new(EngineOptions {
        particle_count: count,
        seed: Some(11),
        ..EngineOptions::default()
    })
}

fn feed(engine: &mut ParticleEngine, text: &str) -> dispatch::UiEffects {
    dispatch(engine, decode(text).unwrap())
}

#[test]
fn seeded_engines_are_reproducible() {
    let a = engine_with(800);
    let b = engine_with(800);
    assert_eq!(a.positions(), b.positions());
    assert_eq!(a.colors(), b.colors());
    assert_eq!(a.sizes(), b.sizes());
    assert_eq!(a.particle_count(), 800);
    assert!(a
        .sizes()
        .iter()
        .all(|s| *s >= PARTICLE_SIZE_BASE && *s <= PARTICLE_SIZE_BASE + PARTICLE_SIZE_JITTER));
}

#[test]
fn dirty_flags_drive_uploads() {
    let mut e = engine_with(500);
    assert!(e.take_positions_dirty());
    assert!(e.take_colors_dirty());
    assert!(!e.take_positions_dirty());
    assert!(e.request_mode(Mode::Wave));
    assert!(e.take_positions_dirty());
    assert!(!e.take_colors_dirty());
}

#[test]
fn disabled_modes_are_refused() {
    let mut e = ParticleEngine::new(EngineOptions {
        particle_count: 500,
        enabled_modes: vec![Mode::Sphere, Mode::Wave],
        seed: Some(1),
        ..EngineOptions::default()
    });
    assert!(!e.request_mode(Mode::Galaxy));
    assert!(!e.request_mode_named("nonsense"));
    assert_eq!(e.mode(), Mode::Sphere);
    assert!(e.request_mode_named("wave"));
    assert_eq!(e.phase(), Phase::Morphing);
}

#[test]
fn latest_state_wins_before_the_next_tick() {
    let mut e = engine_with(500);
    feed(
        &mut e,
        r#"{"type":"state","state":"listening","data":{"volume":0.5}}"#,
    );
    feed(&mut e, r#"{"type":"state","state":"thinking"}"#);

    let dt = 0.05;
    let frame = e.tick(dt);
    let thinking = profile(CognitiveState::Thinking);
    assert_eq!(e.state(), CognitiveState::Thinking);
    // thinking closes the speaking gate, so only the profile spin applies
    assert!((frame.rotation - thinking.rotation_speed * dt).abs() < 1e-6);
    assert!((frame.expansion - thinking.expansion).abs() < 1e-6);
    assert!(!e.voice().is_speaking());
    let (a, b) = (thinking.primary, thinking.secondary);
    assert!(e.colors().iter().all(|c| {
        let t = ((*c - a).dot(b - a) / (b - a).length_squared()).clamp(0.0, 1.0);
        (a + (b - a) * t - *c).length() < 1e-4
    }));
}

#[test]
fn explicit_speaking_flag_overrides_the_state_default() {
    let mut e = engine_with(500);
    e.apply_state(
        CognitiveState::Thinking,
        &StateData {
            speaking: Some(true),
            volume: Some(1.0),
            particle_mode: None,
        },
    );
    e.tick(0.016);
    assert!(e.voice().is_speaking());
    assert!(e.voice().smoothed() > 0.0);
}

#[test]
fn audio_level_feeds_the_voice_only_while_speaking() {
    let mut e = engine_with(500);
    feed(&mut e, r#"{"type":"audio_level","level":0.9}"#);
    e.tick(0.016);
    assert_eq!(e.voice().smoothed(), 0.0);

    feed(&mut e, r#"{"type":"state","state":"speaking"}"#);
    feed(&mut e, r#"{"type":"audio_level","level":0.9}"#);
    let quiet = profile(CognitiveState::Speaking).expansion;
    let frame = e.tick(0.016);
    assert!(e.voice().smoothed() > 0.0);
    assert!(frame.expansion > quiet);
}

#[test]
fn assistant_message_fires_a_revertible_explosion() {
    let mut e = engine_with(500);
    let effects = feed(&mut e, r#"{"type":"message","content":"Hello"}"#);
    let ticket = match effects.as_slice() {
        [UiEffect::ScheduleRevert(t), UiEffect::Chat { role, content }] => {
            assert_eq!(role, "assistant");
            assert_eq!(content, "Hello");
            *t
        }
        other => panic!("unexpected effects: {other:?}"),
    };
    assert_eq!(ticket.effect, Effect::Explosion);
    assert_eq!(ticket.revert_after_ms, EXPLOSION_MS);
    assert!((e.tick(0.016).expansion - EXPLOSION_EXPANSION).abs() < 1e-6);
    assert!(e.revert_effect(ticket));
    assert!((e.tick(0.016).expansion - 1.0).abs() < 1e-6);
}

#[test]
fn user_message_only_reaches_the_chat() {
    let mut e = engine_with(500);
    let effects = feed(&mut e, r#"{"type":"message","content":"hi","role":"user"}"#);
    assert_eq!(
        effects.as_slice(),
        &[UiEffect::Chat {
            role: "user".to_string(),
            content: "hi".to_string()
        }]
    );
    assert_eq!(e.reactor().active_effect(), None);
}

#[test]
fn state_can_carry_a_mode_switch() {
    let mut e = engine_with(500);
    let effects = feed(
        &mut e,
        r#"{"type":"state","state":"thinking","data":{"particle_mode":"spiral"}}"#,
    );
    assert_eq!(effects.as_slice(), &[UiEffect::ModeChanged(Mode::Galaxy)]);
    assert_eq!(e.mode(), Mode::Galaxy);
    assert_eq!(e.phase(), Phase::Morphing);
}

#[test]
fn particle_mode_echo_does_not_restart_the_morph() {
    let mut e = engine_with(500);
    e.request_mode(Mode::Helix);
    for _ in 0..5 {
        e.tick(0.016);
    }
    let progress = e.progress();
    let effects = feed(&mut e, r#"{"type":"particle_mode","mode":"helix"}"#);
    assert!(effects.is_empty());
    assert_eq!(e.progress(), progress);

    let effects = feed(&mut e, r#"{"type":"particle_mode","mode":"atom"}"#);
    assert_eq!(effects.as_slice(), &[UiEffect::ModeChanged(Mode::Atom)]);
    assert!(feed(&mut e, r#"{"type":"particle_mode","mode":"cube"}"#).is_empty());
    assert_eq!(e.mode(), Mode::Atom);
}

#[test]
fn state_mode_request_for_the_current_mode_restarts_the_morph() {
    let mut e = engine_with(500);
    e.request_mode(Mode::Helix);
    for _ in 0..5 {
        e.tick(0.016);
    }
    assert!(e.progress() > 0.0);
    let effects = feed(
        &mut e,
        r#"{"type":"state","state":"speaking","data":{"particle_mode":"dna"}}"#,
    );
    assert_eq!(effects.as_slice(), &[UiEffect::ModeChanged(Mode::Helix)]);
    assert_eq!(e.progress(), 0.0);
    assert_eq!(e.phase(), Phase::Morphing);
}

#[test]
fn notices_pass_through_to_the_page() {
    let mut e = engine_with(500);
    assert_eq!(
        feed(&mut e, r#"{"type":"error","message":"mic busy"}"#).as_slice(),
        &[UiEffect::Error("mic busy".to_string())]
    );
    assert_eq!(
        feed(&mut e, r#"{"type":"system","message":"ready"}"#).as_slice(),
        &[UiEffect::System("ready".to_string())]
    );
    assert_eq!(
        dispatch(
            &mut e,
            Inbound::SystemInfo {
                data: serde_json::json!({"cpu": 3})
            }
        )
        .as_slice(),
        &[UiEffect::System(r#"{"cpu":3}"#.to_string())]
    );
}

#[test]
fn tick_clamps_long_and_invalid_frames() {
    let mut e = engine_with(500);
    let f = e.tick(5.0);
    assert!((f.time - 0.1).abs() < 1e-6);
    let g = e.tick(f32::NAN);
    assert_eq!(g.time, f.time);
    for _ in 0..200 {
        let p = e.tick(0.016).pulse;
        assert!(p >= 1.0 - PULSE_DEPTH - 1e-6 && p <= 1.0 + PULSE_DEPTH + 1e-6);
    }
}
