// Host-side tests for the morph state machine.

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

use rand::rngs::StdRng;
use rand::SeedableRng;
use shapes::{Mode, ShapeGenerator};
use transition::*;

fn setup(speed: f32) -> (ShapeGenerator, StdRng, TransitionController) {
    let gen = ShapeGenerator::default();
    let mut rng = StdRng::seed_from_u64(42);
    let tc = TransitionController::new(&gen, Mode::Sphere, 1000, speed, &mut rng);
    (gen, rng, tc)
}

#[test]
fn easing_endpoints_and_clamping() {
    assert_eq!(ease_out_cubic(0.0), 0.0);
    assert_eq!(ease_out_cubic(1.0), 1.0);
    assert!((ease_out_cubic(0.5) - 0.875).abs() < 1e-6);
    assert_eq!(ease_out_cubic(-3.0), 0.0);
    assert_eq!(ease_out_cubic(7.0), 1.0);
}

#[test]
fn starts_settled_with_matching_buffers() {
    let (_, _, mut tc) = setup(0.02);
    assert_eq!(tc.phase(), Phase::Settled);
    assert_eq!(tc.mode(), Mode::Sphere);
    assert_eq!(tc.positions(), tc.targets());
    assert_eq!(tc.len(), 1000);
    assert!(tc.take_dirty());
    assert!(!tc.take_dirty());
}

#[test]
fn requesting_the_settled_mode_is_a_no_op() {
    let (gen, mut rng, mut tc) = setup(0.02);
    tc.take_dirty();
    let before = tc.targets().to_vec();
    assert!(!tc.request_mode(&gen, Mode::Sphere, &mut rng));
    assert_eq!(tc.phase(), Phase::Settled);
    assert_eq!(tc.targets(), &before[..]);
    assert!(!tc.take_dirty());
}

#[test]
fn new_mode_starts_from_previous_layout() {
    let (gen, mut rng, mut tc) = setup(0.02);
    let sphere = tc.targets().to_vec();
    assert!(tc.request_mode(&gen, Mode::Wave, &mut rng));
    assert_eq!(tc.phase(), Phase::Morphing);
    assert_eq!(tc.mode(), Mode::Wave);
    assert_eq!(tc.progress(), 0.0);
    assert_eq!(tc.factor(), 0.0);
    assert_eq!(tc.positions(), &sphere[..]);
    assert_ne!(tc.targets(), &sphere[..]);
    assert!(tc.take_dirty());
}

#[test]
fn progress_is_monotonic_and_settles_in_bounded_ticks() {
    let speed = 0.02;
    let (gen, mut rng, mut tc) = setup(speed);
    tc.request_mode(&gen, Mode::Helix, &mut rng);
    let limit = (1.0 / speed).ceil() as usize + 1;
    let mut last = tc.factor();
    let mut ticks = 0;
    while tc.phase() == Phase::Morphing {
        let f = tc.tick();
        assert!(f >= last);
        last = f;
        ticks += 1;
        assert!(ticks <= limit, "still morphing after {ticks} ticks");
    }
    assert_eq!(tc.progress(), 1.0);
    assert_eq!(tc.tick(), 1.0);
    assert_eq!(tc.phase(), Phase::Settled);
}

#[test]
fn interrupting_a_morph_snaps_to_the_old_targets() {
    let (gen, mut rng, mut tc) = setup(0.05);
    tc.request_mode(&gen, Mode::Atom, &mut rng);
    for _ in 0..5 {
        tc.tick();
    }
    let atom_targets = tc.targets().to_vec();
    assert!(tc.request_mode(&gen, Mode::Fireworks, &mut rng));
    assert_eq!(tc.positions(), &atom_targets[..]);
    assert_eq!(tc.progress(), 0.0);
    assert_eq!(tc.mode(), Mode::Fireworks);
}

#[test]
fn same_mode_mid_morph_restarts_with_fresh_targets() {
    let (gen, mut rng, mut tc) = setup(0.05);
    tc.request_mode(&gen, Mode::Galaxy, &mut rng);
    tc.tick();
    let first = tc.targets().to_vec();
    assert!(tc.request_mode(&gen, Mode::Galaxy, &mut rng));
    assert_eq!(tc.len(), first.len());
    assert_ne!(tc.targets(), &first[..]);
}

#[test]
fn galaxy_revisits_are_re_randomized() {
    let (gen, mut rng, mut tc) = setup(1.0);
    tc.request_mode(&gen, Mode::Galaxy, &mut rng);
    tc.tick();
    let first = tc.targets().to_vec();
    tc.request_mode(&gen, Mode::Sphere, &mut rng);
    tc.tick();
    tc.request_mode(&gen, Mode::Galaxy, &mut rng);
    assert_eq!(tc.len(), 1000);
    assert_ne!(tc.targets(), &first[..]);
}

#[test]
fn zero_speed_is_clamped_to_make_progress() {
    let (_, _, tc) = setup(0.0);
    assert!(tc.speed() > 0.0);
}
