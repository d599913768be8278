// Shape, motion and connection tuning constants shared by the core modules.
//
// These are presentation parameters rather than invariants; they live here so
// generators and controllers stay free of magic numbers.

// Particle field defaults
pub const DEFAULT_PARTICLE_COUNT: usize = 10_000;
pub const MIN_PARTICLE_COUNT: usize = 500;
pub const MAX_PARTICLE_COUNT: usize = 50_000;
pub const DEFAULT_TRANSITION_SPEED: f32 = 0.02; // progress per tick
pub const MIN_TRANSITION_SPEED: f32 = 0.001;
pub const MAX_TRANSITION_SPEED: f32 = 1.0;

// Per-particle sprite size (world units) and cosmetic jitter
pub const PARTICLE_SIZE_BASE: f32 = 0.018;
pub const PARTICLE_SIZE_JITTER: f32 = 0.012;

// Sphere
pub const SPHERE_RADIUS: f32 = 1.5;
pub const SPHERE_SHELL: f32 = 0.25; // radius spread above SPHERE_RADIUS

// Atom
pub const ATOM_SHELLS: usize = 3;
pub const ATOM_BASE_RADIUS: f32 = 0.7;
pub const ATOM_SHELL_STEP: f32 = 0.55;
pub const ATOM_ORBIT_TURNS: f32 = 40.0; // full turns swept over i/N
pub const ATOM_JITTER: f32 = 0.04;
pub const ATOM_SHELL_TILTS: [[f32; 2]; ATOM_SHELLS] = [[0.0, 0.0], [1.05, 0.35], [-1.05, -0.35]];

// Fireworks
pub const FIREWORKS_MAX_RADIUS: f32 = 2.2;
pub const FIREWORKS_DROP: f32 = 0.4; // downward offset of the cluster centre

// Wave
pub const WAVE_COLUMNS: usize = 100;
pub const WAVE_SPACING: f32 = 0.045;
pub const WAVE_AMPLITUDE: f32 = 0.25;
pub const WAVE_FREQ_X: f32 = 2.2;
pub const WAVE_FREQ_Z: f32 = 1.6;

// Helix
pub const HELIX_TURNS: f32 = 6.0;
pub const HELIX_RADIUS: f32 = 0.9;
pub const HELIX_HEIGHT: f32 = 3.2;
pub const HELIX_JITTER: f32 = 0.05;

// Galaxy
pub const GALAXY_ARMS: usize = 4;
pub const GALAXY_RADIUS: f32 = 2.4;
pub const GALAXY_TWIST: f32 = 2.6; // radians of twist per unit radius
pub const GALAXY_JITTER: f32 = 0.35; // radians
pub const GALAXY_THICKNESS: f32 = 0.35;
pub const GALAXY_EDGE_THICKNESS: f32 = 0.04; // fraction of thickness kept at the rim

// Glyph field
pub const GLYPH_TEXT: &str = "SKYNET";
pub const GLYPH_CELL: f32 = 0.12; // world size of one glyph grid cell
pub const GLYPH_DENSITY: usize = 60; // particles per glyph point
pub const GLYPH_JITTER: f32 = 0.035;
pub const GLYPH_DEPTH_JITTER: f32 = 0.08;
pub const GLYPH_HALO_RADIUS: f32 = 2.8;
pub const GLYPH_HALO_SPREAD: f32 = 0.35;

// Voice reactivity
pub const VOICE_SMOOTHING: f32 = 0.1;
pub const VOICE_ROTATION_GAIN: f32 = 1.5;
pub const VOICE_EXPANSION_GAIN: f32 = 0.35;
pub const VOICE_MOTION_GAIN: f32 = 0.08;

// Visual noise
pub const NOISE_AMPLITUDE: f32 = 0.015;

// Transient effects
pub const EXPLOSION_EXPANSION: f32 = 1.8;
pub const EXPLOSION_MS: u32 = 400;
pub const IMPLOSION_EXPANSION: f32 = 0.4;
pub const IMPLOSION_MS: u32 = 300;
pub const COLOR_FLASH_MS: u32 = 200;
pub const FLASH_COLOR: [f32; 3] = [1.0, 1.0, 1.0];

// Pulse (sprite size breathing)
pub const PULSE_DEPTH: f32 = 0.15;

// Connection
pub const DEFAULT_RECONNECT_ATTEMPTS: u32 = 5;
pub const DEFAULT_RECONNECT_DELAY_MS: u32 = 2_000;
pub const WS_PATH: &str = "/ws";
pub const TRANSCRIBE_PATH: &str = "/api/transcribe";

// Camera
pub const CAMERA_Z: f32 = 6.0;
pub const CAMERA_FOVY: f32 = std::f32::consts::FRAC_PI_4;
