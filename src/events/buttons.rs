use crate::app::App;
use crate::core::Mode;
use crate::dom;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

fn wire_mode_buttons(document: &web::Document, app: &Rc<App>) {
    let Ok(buttons) = document.query_selector_all("[data-mode]") else {
        return;
    };
    for i in 0..buttons.length() {
        let Some(el) = buttons.item(i).and_then(|n| n.dyn_into::<web::Element>().ok()) else {
            continue;
        };
        let Some(name) = el.get_attribute("data-mode") else {
            continue;
        };
        let mode = match name.parse::<Mode>() {
            Ok(mode) => mode,
            Err(e) => {
                log::warn!("[keys] button: {e}");
                continue;
            }
        };
        let app = app.clone();
        let closure = Closure::wrap(Box::new(move || app.select_mode(mode)) as Box<dyn FnMut()>);
        _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

fn wire_chat_form(document: &web::Document, app: &Rc<App>) {
    let Some(form) = document.get_element_by_id("chat-form") else {
        return;
    };
    let input = document
        .get_element_by_id("chat-input")
        .and_then(|el| el.dyn_into::<web::HtmlInputElement>().ok());
    let app = app.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::Event| {
        ev.prevent_default();
        if let Some(input) = &input {
            if app.send_chat(&input.value()) {
                input.set_value("");
            }
        }
    }) as Box<dyn FnMut(web::Event)>);
    _ = form.add_event_listener_with_callback("submit", closure.as_ref().unchecked_ref());
    closure.forget();
}

/// Hook up the control panel. Missing elements are skipped.
pub fn wire_buttons(app: &Rc<App>) {
    let document = app.document.clone();
    wire_mode_buttons(&document, app);

    let mic = app.clone();
    dom::add_click_listener(&document, "mic-btn", move || mic.toggle_microphone());
    let listen = app.clone();
    dom::add_click_listener(&document, "listen-btn", move || listen.toggle_listening());
    let info = app.clone();
    dom::add_click_listener(&document, "info-btn", move || info.request_system_info());

    wire_chat_form(&document, app);
}
