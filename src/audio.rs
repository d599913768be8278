use crate::core::input::rms_level;
use crate::core::protocol::TranscribeResponse;
use crate::dom;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

// Microphone RMS rarely exceeds ~0.3; scale it into a usable 0..1 range.
const MIC_LEVEL_GAIN: f32 = 3.5;
const CLIP_FIELD: &str = "audio";
const CLIP_FILENAME: &str = "recording.webm";

fn js_err(e: JsValue) -> anyhow::Error {
    anyhow::anyhow!("{:?}", e)
}

/// Called with the finished clip once the recorder has flushed.
pub type ClipHandler = Rc<dyn Fn(web::Blob)>;

/// Live microphone session: recorder for upload plus an analyser for level.
pub struct MicCapture {
    stream: web::MediaStream,
    recorder: web::MediaRecorder,
    analyser: web::AnalyserNode,
    _source: web::MediaStreamAudioSourceNode,
    buf: Vec<f32>,
    handlers: HandlerSlot,
}

type RecorderHandlers = (
    Closure<dyn FnMut(web::BlobEvent)>,
    Closure<dyn FnMut(web::Event)>,
);
/// Owns the recorder callbacks until the final `stop` event has run.
type HandlerSlot = Rc<RefCell<Option<RecorderHandlers>>>;

fn release_handlers(recorder: &web::MediaRecorder, handlers: &HandlerSlot) {
    recorder.set_ondataavailable(None);
    recorder.set_onstop(None);
    // a closure must not be dropped while it is running; free it on the next turn
    let handlers = handlers.clone();
    dom::set_timeout(0, move || {
        handlers.borrow_mut().take();
    });
}

// Create analyser and an appropriately sized buffer
fn create_analyser(audio_ctx: &web::AudioContext) -> anyhow::Result<(web::AnalyserNode, Vec<f32>)> {
    let analyser = web::AnalyserNode::new(audio_ctx).map_err(js_err)?;
    analyser.set_fft_size(512);
    let bins = analyser.fft_size() as usize;
    Ok((analyser, vec![0.0; bins]))
}

impl MicCapture {
    /// Ask for the microphone and start recording. Fails when permission is
    /// denied or no device exists.
    pub async fn start(audio_ctx: &web::AudioContext, on_clip: ClipHandler) -> anyhow::Result<Self> {
        let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
        let devices = window.navigator().media_devices().map_err(js_err)?;
        let constraints = web::MediaStreamConstraints::new();
        constraints.set_audio(&JsValue::TRUE);
        let promise = devices
            .get_user_media_with_constraints(&constraints)
            .map_err(js_err)?;
        let stream: web::MediaStream = JsFuture::from(promise)
            .await
            .map_err(js_err)?
            .dyn_into()
            .map_err(js_err)?;

        _ = audio_ctx.resume();
        let source = audio_ctx.create_media_stream_source(&stream).map_err(js_err)?;
        let (analyser, buf) = create_analyser(audio_ctx)?;
        source
            .connect_with_audio_node(&analyser)
            .map_err(js_err)?;

        let recorder = web::MediaRecorder::new_with_media_stream(&stream).map_err(js_err)?;
        let chunks: Rc<RefCell<Vec<web::Blob>>> = Rc::new(RefCell::new(Vec::new()));

        let on_data = {
            let chunks = chunks.clone();
            Closure::wrap(Box::new(move |ev: web::BlobEvent| {
                if let Some(blob) = ev.data() {
                    if blob.size() > 0.0 {
                        chunks.borrow_mut().push(blob);
                    }
                }
            }) as Box<dyn FnMut(web::BlobEvent)>)
        };
        let handlers: HandlerSlot = Rc::new(RefCell::new(None));
        let on_stop = {
            let chunks = chunks.clone();
            let recorder_type = recorder.mime_type();
            let recorder = recorder.clone();
            let handlers = handlers.clone();
            Closure::wrap(Box::new(move |_: web::Event| {
                let parts = js_sys::Array::new();
                for blob in chunks.borrow_mut().drain(..) {
                    parts.push(&blob);
                }
                if parts.length() == 0 {
                    log::info!("[mic] stopped with no audio");
                } else {
                    let opts = web::BlobPropertyBag::new();
                    opts.set_type(&recorder_type);
                    match web::Blob::new_with_blob_sequence_and_options(&parts, &opts) {
                        Ok(clip) => on_clip(clip),
                        Err(e) => log::warn!("[mic] could not assemble clip: {:?}", e),
                    }
                }
                release_handlers(&recorder, &handlers);
            }) as Box<dyn FnMut(web::Event)>)
        };
        recorder.set_ondataavailable(Some(on_data.as_ref().unchecked_ref()));
        recorder.set_onstop(Some(on_stop.as_ref().unchecked_ref()));
        *handlers.borrow_mut() = Some((on_data, on_stop));
        if let Err(e) = recorder.start() {
            release_handlers(&recorder, &handlers);
            return Err(js_err(e));
        }
        log::info!("[mic] capture started");

        Ok(Self {
            stream,
            recorder,
            analyser,
            _source: source,
            buf,
            handlers,
        })
    }

    /// Current input level in `[0, 1]`.
    pub fn level(&mut self) -> f32 {
        self.analyser.get_float_time_domain_data(&mut self.buf);
        rms_level(&self.buf, MIC_LEVEL_GAIN)
    }

    /// Stop the device. The recorder flushes its buffered audio to the clip
    /// handler from its `stop` event, which then releases the callbacks.
    pub fn stop(self) {
        let stopping = self.recorder.state() != web::RecordingState::Inactive
            && self.recorder.stop().is_ok();
        if !stopping {
            // no stop event is coming to release the callbacks
            release_handlers(&self.recorder, &self.handlers);
        }
        let tracks = self.stream.get_tracks();
        for i in 0..tracks.length() {
            if let Ok(track) = tracks.get(i).dyn_into::<web::MediaStreamTrack>() {
                track.stop();
            }
        }
        _ = self.analyser.disconnect();
        log::info!("[mic] capture stopped");
    }
}

/// POST a clip to the transcription endpoint and return the transcript.
pub async fn upload_clip(url: &str, clip: &web::Blob) -> anyhow::Result<String> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let form = web::FormData::new().map_err(js_err)?;
    form.append_with_blob_and_filename(CLIP_FIELD, clip, CLIP_FILENAME)
        .map_err(js_err)?;

    let init = web::RequestInit::new();
    init.set_method("POST");
    init.set_body(&form);
    let request = web::Request::new_with_str_and_init(url, &init).map_err(js_err)?;

    let response: web::Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(js_err)?
        .dyn_into()
        .map_err(js_err)?;
    if !response.ok() {
        anyhow::bail!("transcription endpoint returned {}", response.status());
    }
    let body = JsFuture::from(response.text().map_err(js_err)?)
        .await
        .map_err(js_err)?
        .as_string()
        .unwrap_or_default();
    Ok(TranscribeResponse::parse(&body)?.into_text()?)
}
