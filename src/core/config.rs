use super::connection::ReconnectPolicy;
use super::constants::*;
use super::shapes::Mode;

/// Everything the particle engine needs at construction.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineOptions {
    pub particle_count: usize,
    pub transition_speed: f32,
    pub initial_mode: Mode,
    pub enabled_modes: Vec<Mode>,
    pub glyph_text: String,
    /// Fixed seed for reproducible layouts; entropy-seeded when `None`.
    pub seed: Option<u64>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            particle_count: DEFAULT_PARTICLE_COUNT,
            transition_speed: DEFAULT_TRANSITION_SPEED,
            initial_mode: Mode::Sphere,
            enabled_modes: Mode::ALL.to_vec(),
            glyph_text: GLYPH_TEXT.to_string(),
            seed: None,
        }
    }
}

impl EngineOptions {
    #[inline]
    pub fn is_enabled(&self, mode: Mode) -> bool {
        self.enabled_modes.contains(&mode)
    }
}

/// Runtime configuration of the web front-end.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub ws_url: String,
    pub transcribe_url: String,
    pub reconnect: ReconnectPolicy,
    pub engine: EngineOptions,
}

impl AppConfig {
    /// Derive endpoints from the page origin, then apply `?key=value`
    /// overrides from `search`. Bad overrides are logged and skipped.
    pub fn from_location(protocol: &str, host: &str, search: &str) -> Self {
        let scheme = if protocol.trim_end_matches(':') == "https" {
            "wss"
        } else {
            "ws"
        };
        let mut cfg = AppConfig {
            ws_url: format!("{scheme}://{host}{WS_PATH}"),
            transcribe_url: TRANSCRIBE_PATH.to_string(),
            reconnect: ReconnectPolicy::default(),
            engine: EngineOptions::default(),
        };

        for (key, value) in query_pairs(search) {
            if let Err(reason) = cfg.apply_override(&key, &value) {
                log::warn!("[config] ignoring {key}={value}: {reason}");
            }
        }
        if !cfg.engine.is_enabled(cfg.engine.initial_mode) {
            if let Some(first) = cfg.engine.enabled_modes.first() {
                cfg.engine.initial_mode = *first;
            }
        }
        cfg
    }

    fn apply_override(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "ws" => {
                self.ws_url = if value.contains("://") {
                    value.to_string()
                } else {
                    let scheme = self.ws_url.split("://").next().unwrap_or("ws").to_string();
                    format!("{scheme}://{value}{WS_PATH}")
                };
            }
            "particles" => {
                let n = value.parse::<usize>().map_err(|e| format!("{e}"))?;
                self.engine.particle_count = n.clamp(MIN_PARTICLE_COUNT, MAX_PARTICLE_COUNT);
            }
            "speed" => {
                let s = value.parse::<f32>().map_err(|e| format!("{e}"))?;
                if !s.is_finite() {
                    return Err("not finite".to_string());
                }
                self.engine.transition_speed = s.clamp(MIN_TRANSITION_SPEED, MAX_TRANSITION_SPEED);
            }
            "reconnects" => {
                let n = value.parse::<u32>().map_err(|e| format!("{e}"))?;
                self.reconnect.max_attempts = n.max(1);
            }
            "reconnect_delay" => {
                self.reconnect.base_delay_ms = value.parse::<u32>().map_err(|e| format!("{e}"))?;
            }
            "modes" => {
                let modes = value
                    .split(',')
                    .filter(|s| !s.trim().is_empty())
                    .map(|s| s.parse::<Mode>().map_err(|e| e.to_string()))
                    .collect::<Result<Vec<_>, _>>()?;
                if modes.is_empty() {
                    return Err("no modes listed".to_string());
                }
                self.engine.enabled_modes = modes;
            }
            "mode" => {
                self.engine.initial_mode = value.parse::<Mode>().map_err(|e| e.to_string())?;
            }
            "text" => {
                if value.trim().is_empty() {
                    return Err("empty text".to_string());
                }
                self.engine.glyph_text = value.to_string();
            }
            "seed" => {
                self.engine.seed = Some(value.parse::<u64>().map_err(|e| format!("{e}"))?);
            }
            _ => return Err("unknown key".to_string()),
        }
        Ok(())
    }
}

fn query_pairs(search: &str) -> impl Iterator<Item = (String, String)> + '_ {
    search
        .trim_start_matches('?')
        .split('&')
        .filter(|kv| !kv.is_empty())
        .map(|kv| kv.split_once('=').unwrap_or((kv, "")))
        .map(|(k, v)| (decode_component(k), decode_component(v)))
}

/// Decode one `application/x-www-form-urlencoded` component: `+` is a space
/// and `%XX` a byte. Malformed escapes are kept literally.
pub fn decode_component(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' => match (
                bytes.get(i + 1).and_then(|&b| hex_value(b)),
                bytes.get(i + 2).and_then(|&b| hex_value(b)),
            ) {
                (Some(hi), Some(lo)) => {
                    out.push((hi << 4) | lo);
                    i += 2;
                }
                _ => out.push(b'%'),
            },
            b => out.push(b),
        }
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

#[inline]
fn hex_value(b: u8) -> Option<u8> {
    (b as char).to_digit(16).map(|d| d as u8)
}
