// Host-side tests for voice smoothing and the speaking gate.

#![allow(dead_code)]
mod constants {
    include!("../src/core/constants.rs");
}
mod voice {
    include!("../src/core/voice.rs");
}

use constants::*;
use voice::VoiceReactivity;

#[test]
fn closed_gate_ignores_input() {
    let mut v = VoiceReactivity::default();
    v.push_sample(1.0);
    for _ in 0..10 {
        v.tick();
    }
    assert_eq!(v.smoothed(), 0.0);
    assert_eq!(v.rotation_boost(), 0.0);
    assert_eq!(v.expansion_boost(), 0.0);
    assert_eq!(v.motion_boost(), 0.0);
}

#[test]
fn open_gate_approaches_the_sample_exponentially() {
    let mut v = VoiceReactivity::default();
    v.set_speaking(true);
    v.push_sample(1.0);
    v.tick();
    assert!((v.smoothed() - VOICE_SMOOTHING).abs() < 1e-6);
    let mut last = v.smoothed();
    for _ in 0..50 {
        v.tick();
        assert!(v.smoothed() > last && v.smoothed() <= 1.0);
        last = v.smoothed();
    }
    assert!((v.rotation_boost() - v.smoothed() * VOICE_ROTATION_GAIN).abs() < 1e-6);
    assert!((v.expansion_boost() - v.smoothed() * VOICE_EXPANSION_GAIN).abs() < 1e-6);
}

#[test]
fn closing_the_gate_decays_strictly() {
    let mut v = VoiceReactivity::default();
    v.set_speaking(true);
    v.push_sample(0.8);
    for _ in 0..30 {
        v.tick();
    }
    v.set_speaking(false);
    let mut last = v.smoothed();
    assert!(last > 0.0);
    for _ in 0..20 {
        v.tick();
        assert!(v.smoothed() < last);
        last = v.smoothed();
    }
    assert!(!v.is_speaking());
}

#[test]
fn samples_are_clamped_and_non_finite_dropped() {
    let mut v = VoiceReactivity::new(1.0);
    v.set_speaking(true);
    v.push_sample(3.0);
    v.tick();
    assert_eq!(v.smoothed(), 1.0);
    v.push_sample(f32::NAN);
    v.tick();
    assert_eq!(v.smoothed(), 1.0);
    v.push_sample(-2.0);
    v.tick();
    assert_eq!(v.smoothed(), 0.0);
}
