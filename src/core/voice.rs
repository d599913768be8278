use super::constants::{
    VOICE_EXPANSION_GAIN, VOICE_MOTION_GAIN, VOICE_ROTATION_GAIN, VOICE_SMOOTHING,
};

/// Smoothed voice level and the motion boosts derived from it.
///
/// The level is smoothed every tick whether or not the speaking gate is open,
/// so it never steps. With the gate closed the raw input counts as silence
/// and the level decays toward zero.
#[derive(Clone, Debug)]
pub struct VoiceReactivity {
    raw: f32,
    smoothed: f32,
    speaking: bool,
    k: f32,
}

impl Default for VoiceReactivity {
    fn default() -> Self {
        Self::new(VOICE_SMOOTHING)
    }
}

impl VoiceReactivity {
    pub fn new(k: f32) -> Self {
        Self {
            raw: 0.0,
            smoothed: 0.0,
            speaking: false,
            k: k.clamp(0.0, 1.0),
        }
    }

    /// Record the latest normalized sample. Non-finite samples are dropped.
    pub fn push_sample(&mut self, level: f32) {
        if level.is_finite() {
            self.raw = level.clamp(0.0, 1.0);
        }
    }

    pub fn set_speaking(&mut self, speaking: bool) {
        self.speaking = speaking;
    }

    #[inline]
    pub fn is_speaking(&self) -> bool {
        self.speaking
    }

    pub fn tick(&mut self) {
        let input = if self.speaking { self.raw } else { 0.0 };
        self.smoothed += (input - self.smoothed) * self.k;
    }

    #[inline]
    pub fn smoothed(&self) -> f32 {
        self.smoothed
    }

    #[inline]
    pub fn rotation_boost(&self) -> f32 {
        self.gated(VOICE_ROTATION_GAIN)
    }

    #[inline]
    pub fn expansion_boost(&self) -> f32 {
        self.gated(VOICE_EXPANSION_GAIN)
    }

    #[inline]
    pub fn motion_boost(&self) -> f32 {
        self.gated(VOICE_MOTION_GAIN)
    }

    fn gated(&self, gain: f32) -> f32 {
        if self.speaking {
            self.smoothed * gain
        } else {
            0.0
        }
    }
}
