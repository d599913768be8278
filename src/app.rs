use crate::audio::{self, MicCapture};
use crate::client::{ClientError, ProtocolClient};
use crate::core::{AppConfig, Command, Effect, Mode, Outbound, ParticleEngine, UiEffect, UiEffects};
use crate::{dom, overlay};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

/// Shared handles the DOM callbacks and the frame loop act on.
pub struct App {
    pub config: AppConfig,
    pub engine: Rc<RefCell<ParticleEngine>>,
    pub client: ProtocolClient,
    pub document: web::Document,
    pub capture: Rc<RefCell<Option<MicCapture>>>,
    audio_ctx: Option<web::AudioContext>,
    mic_pending: Cell<bool>,
    listening: Cell<bool>,
}

/// Carry out what the dispatcher asked for after an inbound envelope.
pub fn apply_ui_effects(
    engine: &Rc<RefCell<ParticleEngine>>,
    document: &web::Document,
    effects: UiEffects,
) {
    for effect in effects {
        match effect {
            UiEffect::Chat { role, content } => overlay::append_chat(document, &role, &content),
            UiEffect::Error(message) => overlay::show_error(document, &message),
            UiEffect::System(message) => overlay::append_chat(document, "system", &message),
            UiEffect::ModeChanged(mode) => overlay::highlight_mode(document, mode),
            UiEffect::ScheduleRevert(ticket) => {
                let engine = engine.clone();
                dom::set_timeout(ticket.revert_after_ms, move || {
                    engine.borrow_mut().revert_effect(ticket);
                });
            }
        }
    }
}

impl App {
    pub fn new(
        config: AppConfig,
        engine: Rc<RefCell<ParticleEngine>>,
        client: ProtocolClient,
        document: web::Document,
    ) -> Self {
        let audio_ctx = match web::AudioContext::new() {
            Ok(ctx) => Some(ctx),
            Err(e) => {
                log::warn!("[mic] no AudioContext: {:?}", e);
                None
            }
        };
        Self {
            config,
            engine,
            client,
            document,
            capture: Rc::new(RefCell::new(None)),
            audio_ctx,
            mic_pending: Cell::new(false),
            listening: Cell::new(false),
        }
    }

    fn send(&self, msg: &Outbound) -> Result<(), ClientError> {
        let res = self.client.send(msg);
        if let Err(e) = &res {
            log::warn!("[ws] could not send {:?}: {e}", msg);
        }
        res
    }

    /// Local mode selection from a key or a `data-mode` button.
    pub fn select_mode(&self, mode: Mode) {
        if !self.engine.borrow_mut().request_mode(mode) {
            return;
        }
        overlay::highlight_mode(&self.document, mode);
        _ = self.send(&Outbound::Particle {
            mode: mode.name().to_string(),
        });
    }

    pub fn trigger(&self, effect: Effect) {
        let ticket = self.engine.borrow_mut().trigger_effect(effect);
        apply_ui_effects(
            &self.engine,
            &self.document,
            UiEffects::from_elem(UiEffect::ScheduleRevert(ticket), 1),
        );
    }

    /// Ask the backend to start or stop listening.
    pub fn toggle_listening(&self) {
        let next = !self.listening.get();
        let action = if next {
            Command::StartListening
        } else {
            Command::StopListening
        };
        if self.send(&Outbound::Command { action }).is_ok() {
            self.listening.set(next);
            overlay::set_button_active(&self.document, "listen-btn", next);
        }
    }

    pub fn request_system_info(&self) {
        _ = self.send(&Outbound::Command {
            action: Command::SystemInfo,
        });
    }

    /// Send a typed chat line and echo it as a user bubble.
    pub fn send_chat(&self, text: &str) -> bool {
        let content = text.trim();
        if content.is_empty() {
            return false;
        }
        match self.send(&Outbound::Message {
            content: content.to_string(),
        }) {
            Ok(()) => {
                overlay::append_chat(&self.document, "user", content);
                true
            }
            Err(e) => {
                overlay::show_error(&self.document, &format!("Message not sent: {e}"));
                false
            }
        }
    }

    /// Start browser microphone capture, or stop it and upload the clip.
    pub fn toggle_microphone(self: &Rc<Self>) {
        if self.mic_pending.get() {
            return;
        }
        let running = self.capture.borrow_mut().take();
        if let Some(capture) = running {
            capture.stop();
            self.engine.borrow_mut().set_speaking(false);
            overlay::set_button_active(&self.document, "mic-btn", false);
            return;
        }
        let Some(audio_ctx) = self.audio_ctx.clone() else {
            overlay::show_error(&self.document, "Microphone unavailable");
            return;
        };
        self.mic_pending.set(true);
        let app = self.clone();
        spawn_local(async move {
            let on_clip = {
                let app = app.clone();
                Rc::new(move |clip: web::Blob| app.transcribe(clip)) as audio::ClipHandler
            };
            match MicCapture::start(&audio_ctx, on_clip).await {
                Ok(capture) => {
                    *app.capture.borrow_mut() = Some(capture);
                    overlay::set_button_active(&app.document, "mic-btn", true);
                }
                Err(e) => {
                    log::warn!("[mic] capture failed: {e}");
                    overlay::show_error(&app.document, "Microphone access denied");
                }
            }
            app.mic_pending.set(false);
        });
    }

    fn transcribe(self: &Rc<Self>, clip: web::Blob) {
        let app = self.clone();
        spawn_local(async move {
            match audio::upload_clip(&app.config.transcribe_url, &clip).await {
                Ok(text) => {
                    log::info!("[upload] transcript received ({} chars)", text.len());
                    app.send_chat(&text);
                }
                Err(e) => log::warn!("[upload] {e}"),
            }
        });
    }
}
