use crate::app::App;
use crate::core::input::{action_for_key, KeyAction};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

// Typing into the chat box must not fire shortcuts.
fn is_text_entry(ev: &web::KeyboardEvent) -> bool {
    ev.target()
        .and_then(|t| t.dyn_into::<web::Element>().ok())
        .map(|el| matches!(el.tag_name().as_str(), "INPUT" | "TEXTAREA"))
        .unwrap_or(false)
}

pub fn handle_global_keydown(ev: &web::KeyboardEvent, app: &Rc<App>) {
    if ev.ctrl_key() || ev.meta_key() || ev.alt_key() || is_text_entry(ev) {
        return;
    }
    let key = ev.key();
    let Some(action) = action_for_key(&key) else {
        return;
    };
    log::info!("[keys] {key} -> {:?}", action);
    match action {
        KeyAction::SelectMode(mode) => app.select_mode(mode),
        KeyAction::Trigger(effect) => app.trigger(effect),
        KeyAction::ToggleMicrophone => app.toggle_microphone(),
        KeyAction::ToggleListening => app.toggle_listening(),
    }
    ev.prevent_default();
}

pub fn wire_global_keydown(app: Rc<App>) {
    if let Some(window) = web::window() {
        let closure =
            wasm_bindgen::closure::Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
                handle_global_keydown(&ev, &app);
            }) as Box<dyn FnMut(_)>);
        _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}
