use std::f32::consts::{PI, TAU};
use std::fmt;
use std::str::FromStr;

use glam::{EulerRot, Quat, Vec3};
use rand::Rng;

use super::constants::*;
use super::glyphs::GlyphTable;

/// Procedural shape the particle field morphs toward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mode {
    Sphere,
    Atom,
    Fireworks,
    Wave,
    Helix,
    Galaxy,
    Glyph,
}

/// Raised for mode names that are not in the shape table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown particle mode `{0}`")]
pub struct UnknownMode(pub String);

type ShapeFn = fn(&ShapeGenerator, usize, usize, &mut dyn rand::RngCore) -> Vec3;

// Wire name, aliases and generator per mode. Order is the keyboard order.
const SHAPES: [(Mode, &str, &[&str], ShapeFn); 7] = [
    (Mode::Sphere, "sphere", &[], sphere),
    (Mode::Atom, "atom", &[], atom),
    (Mode::Fireworks, "fireworks", &[], fireworks),
    (Mode::Wave, "wave", &[], wave),
    (Mode::Helix, "helix", &["dna"], helix),
    (Mode::Galaxy, "galaxy", &["spiral"], galaxy),
    (Mode::Glyph, "text", &["glyph", "glyph-field"], glyph),
];

impl Mode {
    pub const ALL: [Mode; 7] = [
        Mode::Sphere,
        Mode::Atom,
        Mode::Fireworks,
        Mode::Wave,
        Mode::Helix,
        Mode::Galaxy,
        Mode::Glyph,
    ];

    fn entry(self) -> &'static (Mode, &'static str, &'static [&'static str], ShapeFn) {
        // SHAPES is indexed in the same order as Mode::ALL
        &SHAPES[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.entry().1
    }

    /// Position of this mode in the keyboard/button order.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        SHAPES
            .iter()
            .find(|(_, name, aliases, _)| *name == wanted || aliases.contains(&wanted.as_str()))
            .map(|(mode, ..)| *mode)
            .ok_or_else(|| UnknownMode(s.to_string()))
    }
}

/// Stateless per-call shape sampler. Holds only the cached glyph table.
#[derive(Clone, Debug)]
pub struct ShapeGenerator {
    glyphs: GlyphTable,
}

impl Default for ShapeGenerator {
    fn default() -> Self {
        Self::new(GLYPH_TEXT)
    }
}

impl ShapeGenerator {
    pub fn new(glyph_text: &str) -> Self {
        Self {
            glyphs: GlyphTable::new(glyph_text),
        }
    }

    pub fn glyphs(&self) -> &GlyphTable {
        &self.glyphs
    }

    /// Sample the point for particle `i` of `n` in `mode`.
    #[inline]
    pub fn point(&self, mode: Mode, i: usize, n: usize, rng: &mut dyn rand::RngCore) -> Vec3 {
        let n = n.max(1);
        (mode.entry().3)(self, i, n, rng)
    }

    /// Repopulate every slot of `out` for `mode`.
    pub fn fill(&self, mode: Mode, out: &mut [Vec3], rng: &mut dyn rand::RngCore) {
        let n = out.len();
        for (i, p) in out.iter_mut().enumerate() {
            *p = self.point(mode, i, n, rng);
        }
    }
}

// Area-uniform direction: uniform cos(polar) and uniform azimuth.
fn unit_direction(rng: &mut dyn rand::RngCore) -> Vec3 {
    let cos_theta: f32 = rng.gen_range(-1.0..=1.0);
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
    let phi: f32 = rng.gen_range(0.0..TAU);
    Vec3::new(sin_theta * phi.cos(), cos_theta, sin_theta * phi.sin())
}

fn jitter(rng: &mut dyn rand::RngCore, amount: f32) -> Vec3 {
    Vec3::new(
        rng.gen_range(-amount..=amount),
        rng.gen_range(-amount..=amount),
        rng.gen_range(-amount..=amount),
    )
}

fn sphere(_: &ShapeGenerator, _i: usize, _n: usize, rng: &mut dyn rand::RngCore) -> Vec3 {
    let r = SPHERE_RADIUS + rng.gen_range(0.0..=SPHERE_SHELL);
    unit_direction(rng) * r
}

fn atom(_: &ShapeGenerator, i: usize, n: usize, rng: &mut dyn rand::RngCore) -> Vec3 {
    let shell = i % ATOM_SHELLS;
    let radius = ATOM_BASE_RADIUS + shell as f32 * ATOM_SHELL_STEP;
    let angle = (i as f32 / n as f32) * ATOM_ORBIT_TURNS * TAU;
    let [tilt_x, tilt_z] = ATOM_SHELL_TILTS[shell];
    let tilt = Quat::from_euler(EulerRot::XYZ, tilt_x, 0.0, tilt_z);
    let orbit = Vec3::new(radius * angle.cos(), 0.0, radius * angle.sin());
    tilt * orbit + jitter(rng, ATOM_JITTER)
}

fn fireworks(_: &ShapeGenerator, _i: usize, _n: usize, rng: &mut dyn rand::RngCore) -> Vec3 {
    let r = rng.gen_range(0.0..=FIREWORKS_MAX_RADIUS);
    unit_direction(rng) * r - Vec3::Y * FIREWORKS_DROP
}

fn wave(_: &ShapeGenerator, i: usize, n: usize, _rng: &mut dyn rand::RngCore) -> Vec3 {
    let cols = WAVE_COLUMNS;
    let rows = n.div_ceil(cols);
    let col = i % cols;
    let row = i / cols;
    let x = (col as f32 - (cols - 1) as f32 * 0.5) * WAVE_SPACING;
    let z = (row as f32 - (rows.max(1) - 1) as f32 * 0.5) * WAVE_SPACING;
    let y = WAVE_AMPLITUDE * (x * WAVE_FREQ_X).sin() + WAVE_AMPLITUDE * (z * WAVE_FREQ_Z).sin();
    Vec3::new(x, y, z)
}

fn helix(_: &ShapeGenerator, i: usize, n: usize, rng: &mut dyn rand::RngCore) -> Vec3 {
    let t = i as f32 / n as f32;
    // Odd particles ride the second strand, half a turn out of phase.
    let strand = if i % 2 == 0 { 0.0 } else { PI };
    let angle = t * HELIX_TURNS * TAU + strand;
    let y = (t - 0.5) * HELIX_HEIGHT;
    Vec3::new(HELIX_RADIUS * angle.cos(), y, HELIX_RADIUS * angle.sin()) + jitter(rng, HELIX_JITTER)
}

fn galaxy(_: &ShapeGenerator, i: usize, _n: usize, rng: &mut dyn rand::RngCore) -> Vec3 {
    let arm = i % GALAXY_ARMS;
    let u: f32 = rng.gen_range(0.0..=1.0);
    let r = u.sqrt() * GALAXY_RADIUS;
    let arm_offset = arm as f32 * TAU / GALAXY_ARMS as f32;
    let angle = arm_offset + r * GALAXY_TWIST + rng.gen_range(-GALAXY_JITTER..=GALAXY_JITTER);
    let falloff = (1.0 - r / GALAXY_RADIUS).max(GALAXY_EDGE_THICKNESS);
    let y = rng.gen_range(-1.0f32..=1.0) * GALAXY_THICKNESS * falloff;
    Vec3::new(r * angle.cos(), y, r * angle.sin())
}

fn glyph(g: &ShapeGenerator, i: usize, n: usize, rng: &mut dyn rand::RngCore) -> Vec3 {
    let points = g.glyphs.points();
    if points.is_empty() {
        return halo(rng);
    }
    let per_point = (n / points.len()).clamp(1, GLYPH_DENSITY);
    let slot = i / per_point;
    match points.get(slot) {
        Some(p) => {
            let j = jitter(rng, GLYPH_JITTER);
            *p + Vec3::new(j.x, j.y, j.z * GLYPH_DEPTH_JITTER / GLYPH_JITTER)
        }
        None => halo(rng),
    }
}

fn halo(rng: &mut dyn rand::RngCore) -> Vec3 {
    let angle: f32 = rng.gen_range(0.0..TAU);
    let r = GLYPH_HALO_RADIUS + rng.gen_range(-GLYPH_HALO_SPREAD..=GLYPH_HALO_SPREAD);
    let z = rng.gen_range(-GLYPH_HALO_SPREAD..=GLYPH_HALO_SPREAD);
    Vec3::new(r * angle.cos(), r * angle.sin(), z)
}
