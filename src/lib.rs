#![cfg(target_arch = "wasm32")]
use crate::app::App;
use crate::client::ProtocolClient;
use crate::core::{AppConfig, ConnectionState, Inbound, ParticleEngine};
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod app;
mod audio;
mod client;
mod core;
mod dom;
mod events;
mod frame;
mod overlay;
mod render;

fn read_config(window: &web::Window) -> AppConfig {
    let location = window.location();
    let protocol = location.protocol().unwrap_or_default();
    let host = location.host().unwrap_or_default();
    let search = location.search().unwrap_or_default();
    AppConfig::from_location(&protocol, &host, &search)
}

fn build_client(
    config: &AppConfig,
    engine: &Rc<RefCell<ParticleEngine>>,
    document: &web::Document,
) -> ProtocolClient {
    let on_inbound = {
        let engine = engine.clone();
        let document = document.clone();
        Rc::new(move |msg: Inbound| {
            let effects = crate::core::dispatch(&mut engine.borrow_mut(), msg);
            app::apply_ui_effects(&engine, &document, effects);
        }) as client::InboundHandler
    };
    let on_status = {
        let document = document.clone();
        Rc::new(move |state: ConnectionState, label: String| {
            overlay::set_status(&document, state, &label);
        }) as client::StatusHandler
    };
    ProtocolClient::new(
        config.ws_url.clone(),
        config.reconnect,
        on_inbound,
        on_status,
    )
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("skynet-viz starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    static STARTED: AtomicBool = AtomicBool::new(false);
    if STARTED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }

    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let canvas: web::HtmlCanvasElement = document
        .get_element_by_id("app-canvas")
        .ok_or_else(|| anyhow::anyhow!("missing #app-canvas"))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

    // Maintain canvas internal pixel size to match CSS size * devicePixelRatio
    dom::wire_canvas_resize(&canvas);

    let config = read_config(&window);
    log::info!("[ws] endpoint {}", config.ws_url);
    let engine = Rc::new(RefCell::new(ParticleEngine::new(config.engine.clone())));
    let client = build_client(&config, &engine, &document);
    let initial_mode = engine.borrow().mode();
    overlay::highlight_mode(&document, initial_mode);

    let app = Rc::new(App::new(config, engine.clone(), client.clone(), document));
    events::wire_global_keydown(app.clone());
    events::wire_buttons(&app);

    // The render loop starts regardless of the backend; the socket catches up.
    client.connect();

    // copied out so no engine borrow is held across the await
    let sizes = engine.borrow().sizes().to_vec();
    let gpu = frame::init_gpu(&canvas, &sizes).await;
    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        engine,
        capture: app.capture.clone(),
        canvas,
        gpu,
        last_instant: Instant::now(),
    }));
    frame::start_loop(frame_ctx);
    Ok(())
}
