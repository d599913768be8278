use std::f32::consts::TAU;

use glam::{Mat4, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::config::EngineOptions;
use super::constants::{NOISE_AMPLITUDE, PARTICLE_SIZE_BASE, PARTICLE_SIZE_JITTER, PULSE_DEPTH};
use super::protocol::StateData;
use super::reactor::{CognitiveState, Effect, EffectTicket, StateReactor};
use super::shapes::{Mode, ShapeGenerator};
use super::transition::{Phase, TransitionController};
use super::voice::VoiceReactivity;

// Longest frame step fed into motion integration (tab switches, stalls).
const MAX_FRAME_DT: f32 = 0.1;

/// Per-frame values the renderer turns into uniforms.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameParams {
    /// Eased start→target blend factor.
    pub mix: f32,
    pub time: f32,
    pub rotation: f32,
    pub expansion: f32,
    pub pulse: f32,
    pub noise_amplitude: f32,
}

impl FrameParams {
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_rotation_y(self.rotation) * Mat4::from_scale(Vec3::splat(self.expansion))
    }
}

/// The particle set plus every controller allowed to touch it.
///
/// Nothing outside this type writes particle buffers; callers go through
/// mode requests, state application, voice samples and effects.
pub struct ParticleEngine {
    options: EngineOptions,
    generator: ShapeGenerator,
    transition: TransitionController,
    reactor: StateReactor,
    voice: VoiceReactivity,
    sizes: Vec<f32>,
    rng: StdRng,
    time: f32,
    rotation: f32,
    pulse_phase: f32,
}

impl ParticleEngine {
    pub fn new(options: EngineOptions) -> Self {
        let mut rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let count = options.particle_count.max(1);
        let generator = ShapeGenerator::new(&options.glyph_text);
        let transition = TransitionController::new(
            &generator,
            options.initial_mode,
            count,
            options.transition_speed,
            &mut rng,
        );
        let reactor = StateReactor::new(count, CognitiveState::Idle, &mut rng);
        let sizes = (0..count)
            .map(|_| PARTICLE_SIZE_BASE + rng.gen_range(0.0..=PARTICLE_SIZE_JITTER))
            .collect();
        log::info!(
            "[engine] particles={} mode={} glyph_points={}",
            count,
            options.initial_mode,
            generator.glyphs().len()
        );
        Self {
            options,
            generator,
            transition,
            reactor,
            voice: VoiceReactivity::default(),
            sizes,
            rng,
            time: 0.0,
            rotation: 0.0,
            pulse_phase: 0.0,
        }
    }

    /// Morph toward `mode`. Returns whether a transition started.
    pub fn request_mode(&mut self, mode: Mode) -> bool {
        if !self.options.is_enabled(mode) {
            log::warn!("[engine] mode `{mode}` is disabled");
            return false;
        }
        self.transition
            .request_mode(&self.generator, mode, &mut self.rng)
    }

    pub fn request_mode_named(&mut self, name: &str) -> bool {
        match name.parse::<Mode>() {
            Ok(mode) => self.request_mode(mode),
            Err(e) => {
                log::warn!("[engine] {e}");
                false
            }
        }
    }

    /// Apply a `state` envelope. Returns whether it also switched mode.
    /// A `particle_mode` naming the current mode mid-morph restarts the morph,
    /// like any other mode request.
    pub fn apply_state(&mut self, state: CognitiveState, data: &StateData) -> bool {
        self.reactor.apply(state, &mut self.rng);
        let speaking = data.speaking.unwrap_or(matches!(
            state,
            CognitiveState::Listening | CognitiveState::Speaking
        ));
        self.voice.set_speaking(speaking);
        if let Some(volume) = data.volume {
            self.voice.push_sample(volume);
        }
        match &data.particle_mode {
            Some(name) => self.request_mode_named(name),
            None => false,
        }
    }

    pub fn push_volume(&mut self, level: f32) {
        self.voice.push_sample(level);
    }

    pub fn set_speaking(&mut self, speaking: bool) {
        self.voice.set_speaking(speaking);
    }

    pub fn trigger_effect(&mut self, effect: Effect) -> EffectTicket {
        self.reactor.trigger(effect)
    }

    pub fn revert_effect(&mut self, ticket: EffectTicket) -> bool {
        self.reactor.revert(ticket, &mut self.rng)
    }

    /// Advance one rendered frame.
    pub fn tick(&mut self, dt_sec: f32) -> FrameParams {
        let dt = if dt_sec.is_finite() {
            dt_sec.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };
        let mix = self.transition.tick();
        self.voice.tick();
        self.time += dt;

        let profile = *self.reactor.profile();
        let spin = profile.rotation_speed + self.voice.rotation_boost();
        self.rotation = (self.rotation + spin * dt) % TAU;
        self.pulse_phase = (self.pulse_phase + profile.pulse_speed * dt) % TAU;

        FrameParams {
            mix,
            time: self.time,
            rotation: self.rotation,
            expansion: self.reactor.expansion() * (1.0 + self.voice.expansion_boost()),
            pulse: 1.0 + PULSE_DEPTH * self.pulse_phase.sin(),
            noise_amplitude: NOISE_AMPLITUDE + self.voice.motion_boost(),
        }
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    pub fn particle_count(&self) -> usize {
        self.transition.len()
    }

    pub fn mode(&self) -> Mode {
        self.transition.mode()
    }

    pub fn phase(&self) -> Phase {
        self.transition.phase()
    }

    pub fn progress(&self) -> f32 {
        self.transition.progress()
    }

    pub fn state(&self) -> CognitiveState {
        self.reactor.state()
    }

    pub fn reactor(&self) -> &StateReactor {
        &self.reactor
    }

    pub fn voice(&self) -> &VoiceReactivity {
        &self.voice
    }

    pub fn positions(&self) -> &[Vec3] {
        self.transition.positions()
    }

    pub fn targets(&self) -> &[Vec3] {
        self.transition.targets()
    }

    pub fn colors(&self) -> &[Vec3] {
        self.reactor.colors()
    }

    pub fn sizes(&self) -> &[f32] {
        &self.sizes
    }

    pub fn take_positions_dirty(&mut self) -> bool {
        self.transition.take_dirty()
    }

    pub fn take_colors_dirty(&mut self) -> bool {
        self.reactor.take_dirty()
    }
}
