use crate::core::{ConnectionState, Mode};
use web_sys as web;

/// Reflect connection state on the `#status` line.
pub fn set_status(document: &web::Document, state: ConnectionState, label: &str) {
    if let Some(el) = document.get_element_by_id("status") {
        el.set_text_content(Some(label));
        let cl = el.class_list();
        _ = cl.remove_3("connected", "connecting", "disconnected");
        _ = cl.add_1(match state {
            ConnectionState::Connected => "connected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Disconnected => "disconnected",
        });
    }
}

/// Append one bubble to `#chat-log` and keep it scrolled to the bottom.
pub fn append_chat(document: &web::Document, role: &str, content: &str) {
    let Some(log_el) = document.get_element_by_id("chat-log") else {
        log::info!("[chat] {role}: {content}");
        return;
    };
    let Ok(bubble) = document.create_element("div") else {
        return;
    };
    bubble.set_class_name(&format!("bubble {role}"));
    // text content only; message bodies are never parsed as HTML
    bubble.set_text_content(Some(content));
    _ = log_el.append_child(&bubble);
    log_el.set_scroll_top(log_el.scroll_height());
}

pub fn show_error(document: &web::Document, message: &str) {
    append_chat(document, "error", message);
}

/// Mark the button whose `data-mode` matches `mode` as active.
pub fn highlight_mode(document: &web::Document, mode: Mode) {
    let Ok(buttons) = document.query_selector_all("[data-mode]") else {
        return;
    };
    for i in 0..buttons.length() {
        let Some(el) = buttons
            .item(i)
            .and_then(|n| wasm_bindgen::JsCast::dyn_into::<web::Element>(n).ok())
        else {
            continue;
        };
        let is_active = el
            .get_attribute("data-mode")
            .and_then(|m| m.parse::<Mode>().ok())
            == Some(mode);
        _ = el.class_list().toggle_with_force("active", is_active);
    }
}

/// Toggle the `active` class on a control button.
pub fn set_button_active(document: &web::Document, id: &str, active: bool) {
    if let Some(el) = document.get_element_by_id(id) {
        _ = el.class_list().toggle_with_force("active", active);
    }
}
