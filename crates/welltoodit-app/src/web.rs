//! WebAssembly entry point and browser bindings.
//!
//! DOM events, `setTimeout` callbacks and `matchMedia` changes are all turned
//! into [`AppEvent`]s and dispatched into the one [`App`] held for the page.

use std::cell::RefCell;
use std::time::Duration;

use chrono::{DateTime, Utc};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, EventTarget, HtmlAnchorElement, HtmlTextAreaElement,
    KeyboardEvent, MediaQueryListEvent, Window,
};
use welltoodit_core::storage::create_default_store;
use welltoodit_core::{
    ExportArtifact, KeyValueStore, MemoryStore, NotepadConfig, Scheduler, Theme, Timer, TimerHandle,
};

use crate::event_handler::{AppEvent, EventOutcome};
use crate::host::{Host, HostError};
use crate::shortcuts::KeyChord;
use crate::App;

const DARK_SCHEME_QUERY: &str = "(prefers-color-scheme: dark)";
const CONFIG_ELEMENT_ID: &str = "welltoodit-config";

type WebApp = App<Box<dyn KeyValueStore>, BrowserScheduler, DomHost>;

thread_local! {
    static APP: RefCell<Option<WebApp>> = const { RefCell::new(None) };
}

/// Dispatch an event into the page's application, if it is running.
fn dispatch(event: AppEvent) -> EventOutcome {
    APP.with(|cell| match cell.try_borrow_mut() {
        Ok(mut slot) => match slot.as_mut() {
            Some(app) => app.handle(event),
            None => EventOutcome::Ignored,
        },
        Err(_) => {
            log::warn!("Dropped {:?}: application busy", event);
            EventOutcome::Ignored
        }
    })
}

/// `setTimeout`-backed scheduler.
pub struct BrowserScheduler {
    window: Window,
}

impl Scheduler for BrowserScheduler {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn schedule(&mut self, delay: Duration, timer: Timer) -> TimerHandle {
        let callback = Closure::once_into_js(move || {
            dispatch(AppEvent::Timer(timer));
        });
        let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);

        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), millis)
        {
            Ok(id) => TimerHandle::new(id as u64),
            Err(e) => {
                log::error!("Failed to schedule {:?}: {:?}", timer, e);
                // Browsers never hand out 0, so clearing it is harmless.
                TimerHandle::new(0)
            }
        }
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.window.clear_timeout_with_handle(handle.raw() as i32);
    }
}

/// The page's DOM as the application's host surface.
pub struct DomHost {
    window: Window,
    document: Document,
    notepad: HtmlTextAreaElement,
    save_indicator: Option<Element>,
    word_count: Option<Element>,
    char_count: Option<Element>,
    last_save: Option<Element>,
    status: Option<Element>,
}

impl DomHost {
    fn new(window: Window, document: Document) -> Result<Self, JsValue> {
        let notepad = document
            .get_element_by_id("notepad")
            .ok_or("Missing #notepad element")?
            .dyn_into::<HtmlTextAreaElement>()
            .map_err(|_| "#notepad is not a textarea")?;

        Ok(Self {
            save_indicator: document.query_selector(".save-indicator")?,
            word_count: document.get_element_by_id("word-count"),
            char_count: document.get_element_by_id("char-count"),
            last_save: document.get_element_by_id("last-save"),
            status: document.get_element_by_id("status-message"),
            window,
            document,
            notepad,
        })
    }

    fn trigger_download(&self, artifact: &ExportArtifact) -> Result<(), JsValue> {
        let uint8_array = js_sys::Uint8Array::from(artifact.bytes.as_slice());
        let blob_parts = js_sys::Array::new();
        blob_parts.push(&uint8_array);

        let options = web_sys::BlobPropertyBag::new();
        options.set_type(artifact.mime);
        let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&blob_parts, &options)?;

        let url = web_sys::Url::create_object_url_with_blob(&blob)?;

        let a = self
            .document
            .create_element("a")?
            .dyn_into::<HtmlAnchorElement>()
            .map_err(|_| "Failed to cast to anchor")?;
        a.set_href(&url);
        a.set_download(&artifact.filename);
        a.style().set_property("display", "none")?;

        // Firefox only follows links that are attached to the document.
        if let Some(body) = self.document.body() {
            body.append_child(&a)?;
            a.click();
            a.remove();
        } else {
            a.click();
        }

        web_sys::Url::revoke_object_url(&url).ok();
        Ok(())
    }
}

fn set_text(element: &Option<Element>, text: &str) {
    if let Some(element) = element {
        element.set_text_content(Some(text));
    }
}

impl Host for DomHost {
    fn input_text(&self) -> String {
        self.notepad.value()
    }

    fn set_input_text(&mut self, text: &str) {
        self.notepad.set_value(text);
    }

    fn focus_input(&mut self) {
        self.notepad.focus().ok();
    }

    fn render_counts(&mut self, words: &str, chars: &str) {
        set_text(&self.word_count, words);
        set_text(&self.char_count, chars);
    }

    fn render_last_save(&mut self, label: &str) {
        set_text(&self.last_save, label);
    }

    fn set_save_indicator(&mut self, visible: bool) {
        if let Some(indicator) = &self.save_indicator {
            let classes = indicator.class_list();
            let result = if visible {
                classes.add_1("visible")
            } else {
                classes.remove_1("visible")
            };
            result.ok();
        }
    }

    fn apply_theme(&mut self, theme: Theme) {
        if let Some(root) = self.document.document_element() {
            if let Err(e) = root.set_attribute("data-theme", theme.as_str()) {
                log::error!("Failed to set theme attribute: {:?}", e);
            }
        }
    }

    fn system_prefers_dark(&self) -> bool {
        matches!(self.window.match_media(DARK_SCHEME_QUERY), Ok(Some(query)) if query.matches())
    }

    fn confirm(&mut self, message: &str) -> bool {
        self.window.confirm_with_message(message).unwrap_or(false)
    }

    fn alert(&mut self, message: &str) {
        self.window.alert_with_message(message).ok();
    }

    fn notify_error(&mut self, message: &str) {
        web_sys::console::error_1(&JsValue::from_str(message));
        set_text(&self.status, message);
    }

    fn download(&mut self, artifact: &ExportArtifact) -> Result<(), HostError> {
        self.trigger_download(artifact)
            .map_err(|e| HostError::Download(format!("{:?}", e)))
    }
}

/// Attach `handler` to `event` on `target` for the lifetime of the page.
fn listen<E, F>(target: &EventTarget, event: &str, mut handler: F) -> Result<(), JsValue>
where
    E: JsCast + 'static,
    F: FnMut(E) + 'static,
{
    let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
        if let Ok(event) = event.dyn_into::<E>() {
            handler(event);
        }
    });
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn click_target(document: &Document, id: &str) -> Option<EventTarget> {
    document.get_element_by_id(id).map(Into::into)
}

fn bind_events(window: &Window, document: &Document) -> Result<(), JsValue> {
    let notepad: EventTarget = document
        .get_element_by_id("notepad")
        .ok_or("Missing #notepad element")?
        .into();

    let input = notepad.clone();
    listen(&notepad, "input", move |_: web_sys::Event| {
        if let Some(area) = input.dyn_ref::<HtmlTextAreaElement>() {
            dispatch(AppEvent::TextChanged(area.value()));
        }
    })?;
    listen(&notepad, "paste", |_: web_sys::Event| {
        dispatch(AppEvent::Paste);
    })?;

    let buttons = [
        ("clear-btn", AppEvent::ClearRequested),
        ("download-btn", AppEvent::DownloadRequested),
        ("theme-toggle", AppEvent::ThemeToggleRequested),
    ];
    for (id, event) in buttons {
        match click_target(document, id) {
            Some(button) => listen(&button, "click", move |_: web_sys::Event| {
                dispatch(event.clone());
            })?,
            None => log::warn!("Missing #{} control", id),
        }
    }

    listen(window, "beforeunload", |_: web_sys::Event| {
        dispatch(AppEvent::Unload);
    })?;

    let visibility_doc = document.clone();
    listen(document, "visibilitychange", move |_: web_sys::Event| {
        dispatch(AppEvent::VisibilityChanged {
            visible: !visibility_doc.hidden(),
        });
    })?;

    listen(document, "keydown", |e: KeyboardEvent| {
        let chord = KeyChord {
            key: e.key(),
            ctrl: e.ctrl_key(),
            meta: e.meta_key(),
            shift: e.shift_key(),
            alt: e.alt_key(),
        };
        if dispatch(AppEvent::KeyDown(chord)).prevent_default() {
            e.prevent_default();
        }
    })?;

    // The listener stays registered; the app ignores changes once the user
    // has chosen a theme explicitly.
    if let Some(query) = window.match_media(DARK_SCHEME_QUERY)? {
        listen(&query, "change", |e: MediaQueryListEvent| {
            dispatch(AppEvent::SystemThemeChanged {
                prefers_dark: e.matches(),
            });
        })?;
    }

    Ok(())
}

/// Configuration from an inline `<script id="welltoodit-config"
/// type="application/json">` block, or defaults.
fn read_config(document: &Document) -> NotepadConfig {
    let Some(json) = document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|el| el.text_content())
    else {
        return NotepadConfig::default();
    };

    NotepadConfig::from_json(&json).unwrap_or_else(|e| {
        log::warn!("Ignoring invalid #{}: {}", CONFIG_ELEMENT_ID, e);
        NotepadConfig::default()
    })
}

fn start() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or("No window")?;
    let document = window.document().ok_or("No document")?;

    let mut host = DomHost::new(window.clone(), document.clone())?;
    let store: Box<dyn KeyValueStore> = match create_default_store() {
        Ok(store) => Box::new(store),
        Err(e) => {
            log::error!("{}; notes will not persist this session", e);
            host.notify_error("Local storage is unavailable. Your note will not be saved.");
            Box::new(MemoryStore::new())
        }
    };
    let scheduler = BrowserScheduler {
        window: window.clone(),
    };

    let mut app = App::new(read_config(&document), store, scheduler, host);
    app.start();
    APP.with(|cell| *cell.borrow_mut() = Some(app));

    bind_events(&window, &document)
}

/// Initialize and run the WASM application.
#[wasm_bindgen(start)]
pub fn run_wasm() {
    // Set up panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&JsValue::from_str(&format!("Logger not initialized: {}", e)));
    }

    log::info!("Starting Welltoodit (WASM)");

    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        log::error!("No document to attach to");
        return;
    };

    if document.ready_state() == "loading" {
        let run = || {
            if let Err(e) = start() {
                log::error!("Failed to start Welltoodit: {:?}", e);
            }
        };
        let mut run = Some(run);
        if let Err(e) = listen(&document, "DOMContentLoaded", move |_: web_sys::Event| {
            if let Some(run) = run.take() {
                run();
            }
        }) {
            log::error!("Failed to wait for DOMContentLoaded: {:?}", e);
        }
    } else if let Err(e) = start() {
        log::error!("Failed to start Welltoodit: {:?}", e);
    }
}
