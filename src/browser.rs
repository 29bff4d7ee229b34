use std::{io, rc::Rc};

use tracing::{error, level_filters::LevelFilter, Level, Metadata};
use tracing_subscriber::{fmt::MakeWriter, layer::SubscriberExt as _, util::SubscriberInitExt as _};
use url::Url;
use wasm_bindgen::{prelude::*, JsCast as _};
use wasm_bindgen_futures::spawn_local;
use web_sys::{console, Document, Event, HtmlInputElement, Window};

use crate::{
    api::HttpLinkApi,
    handler::SubmissionHandler,
    page::{Page, SubmitEvent, FORM_ID},
};

/// Form attribute that turns on the in-flight guard.
pub const IGNORE_DUPLICATES_ATTRIBUTE: &str = "data-ignore-duplicate-submissions";

pub struct DomPage {
    window: Window,
    document: Document,
}

impl Page for DomPage {
    fn input_value(&self, id: &str) -> Option<String> {
        self.document
            .get_element_by_id(id)?
            .dyn_into::<HtmlInputElement>()
            .ok()
            .map(|input| input.value())
    }

    fn alert(&self, message: &str) {
        if let Err(err) = self.window.alert_with_message(message) {
            error!(error = ?err, "failed to show alert");
        }
    }

    fn reload(&self) {
        if let Err(err) = self.window.location().reload() {
            error!(error = ?err, "failed to reload the page");
        }
    }
}

impl SubmitEvent for Event {
    fn prevent_default(&self) {
        Event::prevent_default(self);
    }
}

#[cfg_attr(not(test), wasm_bindgen(start))]
pub fn start() -> Result<(), JsValue> {
    init_tracing().map_err(|err| JsValue::from_str(&err.to_string()))?;

    bind_shorten_form().inspect_err(|err| error!(error = ?err, "failed to bind the shorten form"))
}

/// Attaches the submission handler to the page's shorten form.
///
/// The listener lives until the page is unloaded.
pub fn bind_shorten_form() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global `window`"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("window has no document"))?;

    let origin = window.location().origin()?;
    let base_url = Url::parse(&origin).map_err(|err| JsValue::from_str(&err.to_string()))?;
    let api = HttpLinkApi::new(reqwest::Client::new(), &base_url)
        .map_err(|err| JsValue::from_str(&err.to_string()))?;

    let form = document
        .get_element_by_id(FORM_ID)
        .ok_or_else(|| JsValue::from_str(&format!("no element with id `{FORM_ID}`")))?;

    let handler = Rc::new(
        SubmissionHandler::new(DomPage { window, document }, api)
            .ignore_duplicate_submissions(form.has_attribute(IGNORE_DUPLICATES_ATTRIBUTE)),
    );

    let on_submit = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        // default action has to be suppressed before the callback returns
        if let Ok(submission) = handler.submit(&event) {
            let handler = handler.clone();
            spawn_local(async move {
                handler.send(submission).await;
            });
        }
    });

    form.add_event_listener_with_callback("submit", on_submit.as_ref().unchecked_ref())?;
    on_submit.forget();

    Ok(())
}

fn init_tracing() -> Result<(), tracing_subscriber::util::TryInitError> {
    tracing_subscriber::Registry::default()
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_ansi(false)
                .with_writer(Console),
        )
        .with(LevelFilter::INFO)
        .try_init()
}

/// Sends each formatted tracing event to the browser console at a matching level.
struct Console;

impl<'a> MakeWriter<'a> for Console {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter::new(ConsoleMethod::Info)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter::new(ConsoleMethod::for_level(*meta.level()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConsoleMethod {
    Error,
    Warn,
    Info,
    Debug,
}

impl ConsoleMethod {
    fn for_level(level: Level) -> Self {
        match level {
            Level::ERROR => ConsoleMethod::Error,
            Level::WARN => ConsoleMethod::Warn,
            Level::INFO => ConsoleMethod::Info,
            _ => ConsoleMethod::Debug,
        }
    }

    fn log(self, line: &JsValue) {
        match self {
            ConsoleMethod::Error => console::error_1(line),
            ConsoleMethod::Warn => console::warn_1(line),
            ConsoleMethod::Info => console::info_1(line),
            ConsoleMethod::Debug => console::debug_1(line),
        }
    }
}

struct ConsoleWriter {
    method: ConsoleMethod,
    buffer: Vec<u8>,
}

impl ConsoleWriter {
    fn new(method: ConsoleMethod) -> Self {
        Self {
            method,
            buffer: Vec::new(),
        }
    }

    /// The buffered event without its trailing newline, `None` if nothing was written.
    fn line(&self) -> Option<String> {
        (!self.buffer.is_empty())
            .then(|| String::from_utf8_lossy(&self.buffer).trim_end().to_string())
    }
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        if let Some(line) = self.line() {
            self.method.log(&JsValue::from_str(&line));
        }
    }
}
