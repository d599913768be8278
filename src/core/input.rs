use super::reactor::Effect;
use super::shapes::Mode;

/// What a key press asks the application to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    SelectMode(Mode),
    Trigger(Effect),
    ToggleMicrophone,
    ToggleListening,
}

#[inline]
pub fn mode_for_digit(key: &str) -> Option<Mode> {
    match key {
        "1" => Some(Mode::Sphere),
        "2" => Some(Mode::Atom),
        "3" => Some(Mode::Fireworks),
        "4" => Some(Mode::Wave),
        "5" => Some(Mode::Helix),
        "6" => Some(Mode::Galaxy),
        "7" => Some(Mode::Glyph),
        _ => None,
    }
}

pub fn action_for_key(key: &str) -> Option<KeyAction> {
    if let Some(mode) = mode_for_digit(key) {
        return Some(KeyAction::SelectMode(mode));
    }
    match key {
        "e" | "E" => Some(KeyAction::Trigger(Effect::Explosion)),
        "i" | "I" => Some(KeyAction::Trigger(Effect::Implosion)),
        "f" | "F" => Some(KeyAction::Trigger(Effect::ColorFlash)),
        "m" | "M" => Some(KeyAction::ToggleMicrophone),
        "l" | "L" => Some(KeyAction::ToggleListening),
        _ => None,
    }
}

/// Root-mean-square of one analyser frame, scaled into `[0, 1]`.
pub fn rms_level(samples: &[f32], gain: f32) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f32 = samples.iter().map(|s| s * s).sum();
    ((sum / samples.len() as f32).sqrt() * gain).clamp(0.0, 1.0)
}
