use glam::Vec3;

use super::shapes::{Mode, ShapeGenerator};

/// Ease-out cubic: fast start, gentle landing.
#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    let inv = 1.0 - t.clamp(0.0, 1.0);
    1.0 - inv * inv * inv
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Settled,
    Morphing,
}

/// Owns the start/target position buffers of the particle set and the morph
/// progress between them.
///
/// The renderer blends `positions` toward `targets` on the GPU using
/// [`TransitionController::factor`]; the CPU never writes interpolated values.
pub struct TransitionController {
    mode: Mode,
    positions: Vec<Vec3>,
    targets: Vec<Vec3>,
    progress: f32,
    speed: f32,
    dirty: bool,
}

impl TransitionController {
    /// Start settled on `mode` with both buffers holding the same layout.
    pub fn new(
        generator: &ShapeGenerator,
        mode: Mode,
        count: usize,
        speed: f32,
        rng: &mut dyn rand::RngCore,
    ) -> Self {
        let mut targets = vec![Vec3::ZERO; count];
        generator.fill(mode, &mut targets, rng);
        Self {
            mode,
            positions: targets.clone(),
            targets,
            progress: 1.0,
            speed: speed.max(f32::EPSILON),
            dirty: true,
        }
    }

    /// Switch to `mode`. Returns false when nothing changed (already settled
    /// on the same mode).
    ///
    /// An in-flight morph is resolved by snapping `positions` to the previous
    /// targets before the new targets are generated; the field never blends
    /// three layouts at once.
    pub fn request_mode(
        &mut self,
        generator: &ShapeGenerator,
        mode: Mode,
        rng: &mut dyn rand::RngCore,
    ) -> bool {
        if self.phase() == Phase::Settled && mode == self.mode {
            return false;
        }
        self.positions.copy_from_slice(&self.targets);
        generator.fill(mode, &mut self.targets, rng);
        self.mode = mode;
        self.progress = 0.0;
        self.dirty = true;
        true
    }

    /// Advance one frame and return the eased interpolation factor.
    pub fn tick(&mut self) -> f32 {
        if self.progress < 1.0 {
            self.progress = (self.progress + self.speed).min(1.0);
        }
        self.factor()
    }

    #[inline]
    pub fn factor(&self) -> f32 {
        ease_out_cubic(self.progress)
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        if self.progress >= 1.0 {
            Phase::Settled
        } else {
            Phase::Morphing
        }
    }

    #[inline]
    pub fn progress(&self) -> f32 {
        self.progress
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn targets(&self) -> &[Vec3] {
        &self.targets
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// True once after any buffer change; the renderer re-uploads on true.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}
