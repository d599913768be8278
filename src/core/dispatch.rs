use smallvec::SmallVec;

use super::engine::ParticleEngine;
use super::protocol::Inbound;
use super::reactor::{Effect, EffectTicket};
use super::shapes::Mode;

/// Side effects the page shell carries out after an envelope was applied.
#[derive(Clone, Debug, PartialEq)]
pub enum UiEffect {
    Chat { role: String, content: String },
    Error(String),
    System(String),
    ModeChanged(Mode),
    /// Arm a timer and hand the ticket back to the engine when it fires.
    ScheduleRevert(EffectTicket),
}

pub type UiEffects = SmallVec<[UiEffect; 2]>;

/// Route one decoded envelope into the engine. Runs to completion; the next
/// render tick sees its result.
pub fn dispatch(engine: &mut ParticleEngine, msg: Inbound) -> UiEffects {
    let mut out = UiEffects::new();
    match msg {
        Inbound::State { state, data } => {
            if engine.apply_state(state, &data) {
                out.push(UiEffect::ModeChanged(engine.mode()));
            }
        }
        Inbound::Message { content, role } => {
            if role == "assistant" {
                out.push(UiEffect::ScheduleRevert(engine.trigger_effect(Effect::Explosion)));
            }
            out.push(UiEffect::Chat { role, content });
        }
        Inbound::AudioLevel { level } => engine.push_volume(level),
        Inbound::Error { message } => out.push(UiEffect::Error(message)),
        Inbound::System { message } => out.push(UiEffect::System(message)),
        Inbound::ParticleMode { mode } => match mode.parse::<Mode>() {
            // An acknowledgement of a switch already requested (usually our own
            // `particle` echoed back), so the current mode is already applied.
            // `data.particle_mode` on a state envelope is a fresh request instead.
            Ok(m) if m == engine.mode() => {}
            Ok(m) => {
                if engine.request_mode(m) {
                    out.push(UiEffect::ModeChanged(m));
                }
            }
            Err(e) => log::warn!("[ws] {e}"),
        },
        Inbound::SystemInfo { data } => out.push(UiEffect::System(data.to_string())),
    }
    out
}
