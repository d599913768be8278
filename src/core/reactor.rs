use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::constants::{
    COLOR_FLASH_MS, EXPLOSION_EXPANSION, EXPLOSION_MS, FLASH_COLOR, IMPLOSION_EXPANSION,
    IMPLOSION_MS,
};

/// What the remote assistant is doing right now.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CognitiveState {
    #[default]
    Idle,
    Listening,
    Thinking,
    Speaking,
}

impl CognitiveState {
    pub fn name(self) -> &'static str {
        match self {
            CognitiveState::Idle => "idle",
            CognitiveState::Listening => "listening",
            CognitiveState::Thinking => "thinking",
            CognitiveState::Speaking => "speaking",
        }
    }
}

/// Colour pair and motion constants for one cognitive state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StateProfile {
    pub primary: Vec3,
    pub secondary: Vec3,
    pub rotation_speed: f32, // radians per second
    pub pulse_speed: f32,    // radians per second of the size breathing
    pub expansion: f32,
}

pub fn profile(state: CognitiveState) -> StateProfile {
    match state {
        CognitiveState::Idle => StateProfile {
            primary: Vec3::new(0.0, 0.55, 1.0),
            secondary: Vec3::new(0.35, 0.1, 0.9),
            rotation_speed: 0.12,
            pulse_speed: 1.0,
            expansion: 1.0,
        },
        CognitiveState::Listening => StateProfile {
            primary: Vec3::new(0.0, 1.0, 0.55),
            secondary: Vec3::new(0.0, 0.6, 1.0),
            rotation_speed: 0.25,
            pulse_speed: 2.0,
            expansion: 1.1,
        },
        CognitiveState::Thinking => StateProfile {
            primary: Vec3::new(1.0, 0.55, 0.0),
            secondary: Vec3::new(1.0, 0.15, 0.45),
            rotation_speed: 0.9,
            pulse_speed: 4.0,
            expansion: 0.9,
        },
        CognitiveState::Speaking => StateProfile {
            primary: Vec3::new(0.85, 0.2, 1.0),
            secondary: Vec3::new(0.0, 0.9, 1.0),
            rotation_speed: 0.45,
            pulse_speed: 3.0,
            expansion: 1.2,
        },
    }
}

/// One-shot overlays on top of the current state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    Explosion,
    Implosion,
    ColorFlash,
}

impl Effect {
    pub fn duration_ms(self) -> u32 {
        match self {
            Effect::Explosion => EXPLOSION_MS,
            Effect::Implosion => IMPLOSION_MS,
            Effect::ColorFlash => COLOR_FLASH_MS,
        }
    }
}

/// Handed to whoever schedules the deferred revert.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EffectTicket {
    pub effect: Effect,
    pub revert_after_ms: u32,
    generation: u64,
}

/// Maps cognitive states onto per-particle colours and motion constants.
pub struct StateReactor {
    state: CognitiveState,
    profile: StateProfile,
    colors: Vec<Vec3>,
    overlay: Option<(Effect, u64)>,
    generation: u64,
    dirty: bool,
}

impl StateReactor {
    pub fn new(count: usize, state: CognitiveState, rng: &mut dyn rand::RngCore) -> Self {
        let mut reactor = Self {
            state,
            profile: profile(state),
            colors: vec![Vec3::ZERO; count],
            overlay: None,
            generation: 0,
            dirty: true,
        };
        reactor.recolor(rng);
        reactor
    }

    /// Switch state and recolour every particle immediately. Applying the
    /// current state again redraws the blend weights.
    pub fn apply(&mut self, state: CognitiveState, rng: &mut dyn rand::RngCore) {
        self.state = state;
        self.profile = profile(state);
        if !matches!(self.overlay, Some((Effect::ColorFlash, _))) {
            self.recolor(rng);
        }
    }

    /// Start a transient effect. The caller owns the timer and must hand the
    /// ticket back to [`StateReactor::revert`] once it fires.
    pub fn trigger(&mut self, effect: Effect) -> EffectTicket {
        self.generation += 1;
        self.overlay = Some((effect, self.generation));
        if effect == Effect::ColorFlash {
            let flash = Vec3::from_array(FLASH_COLOR);
            self.colors.iter_mut().for_each(|c| *c = flash);
            self.dirty = true;
        }
        EffectTicket {
            effect,
            revert_after_ms: effect.duration_ms(),
            generation: self.generation,
        }
    }

    /// Undo an effect. Stale tickets (superseded by a newer effect) are
    /// ignored; returns whether anything reverted.
    pub fn revert(&mut self, ticket: EffectTicket, rng: &mut dyn rand::RngCore) -> bool {
        match self.overlay {
            Some((effect, generation)) if generation == ticket.generation => {
                self.overlay = None;
                if effect == Effect::ColorFlash {
                    self.recolor(rng);
                }
                true
            }
            Some((Effect::ColorFlash, _)) => false,
            _ => {
                // a flash cut short by another effect still owes its recolour
                if ticket.effect == Effect::ColorFlash {
                    self.recolor(rng);
                }
                false
            }
        }
    }

    fn recolor(&mut self, rng: &mut dyn rand::RngCore) {
        let StateProfile {
            primary, secondary, ..
        } = self.profile;
        for c in self.colors.iter_mut() {
            let w: f32 = rng.gen_range(0.0..=1.0);
            *c = primary.lerp(secondary, w);
        }
        self.dirty = true;
    }

    /// Expansion factor including any explosion/implosion overlay.
    pub fn expansion(&self) -> f32 {
        match self.overlay {
            Some((Effect::Explosion, _)) => self.profile.expansion * EXPLOSION_EXPANSION,
            Some((Effect::Implosion, _)) => self.profile.expansion * IMPLOSION_EXPANSION,
            _ => self.profile.expansion,
        }
    }

    #[inline]
    pub fn state(&self) -> CognitiveState {
        self.state
    }

    #[inline]
    pub fn profile(&self) -> &StateProfile {
        &self.profile
    }

    pub fn active_effect(&self) -> Option<Effect> {
        self.overlay.map(|(e, _)| e)
    }

    pub fn colors(&self) -> &[Vec3] {
        &self.colors
    }

    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}
