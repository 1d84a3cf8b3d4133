//! Small utilities shared by the editor's update and view code.
//!
//! - **Index conversion**: the document counts offsets in characters, the
//!   browser's `Range`/`Selection` APIs count UTF-16 code units.
//! - **User feedback**: temporary toast notifications, the host side of the
//!   tool's notice channel.
//! - **Rendering**: markdown rendering of annotation descriptions and the
//!   dataset link of an annotation.

use pulldown_cmark::{html, Parser};
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

/// Converts a character index into the UTF-16 code unit index the browser
/// uses for the same position. Indices past the end clamp to the end.
pub fn char_to_utf16_idx(s: &str, char_idx: usize) -> u32 {
    s.chars().take(char_idx).map(char::len_utf16).sum::<usize>() as u32
}

/// Displays a temporary notification at the bottom of the screen.
///
/// Errors get a red background. The toast removes itself after three
/// seconds.
pub fn show_toast(message: &str, error: bool) {
    if let Some(window) = web_sys::window() {
        if let Some(document) = window.document() {
            if let (Ok(toast), Some(body)) = (document.create_element("div"), document.body()) {
                toast.set_text_content(Some(message));
                let html_toast: HtmlElement = toast.unchecked_into();
                let background = if error {
                    "rgba(183, 28, 28, 0.9)"
                } else {
                    "rgba(0, 0, 0, 0.8)"
                };
                let style = html_toast.style();
                style.set_property("position", "fixed").ok();
                style.set_property("bottom", "20px").ok();
                style.set_property("left", "50%").ok();
                style.set_property("transform", "translateX(-50%)").ok();
                style.set_property("background", background).ok();
                style.set_property("color", "#fff").ok();
                style.set_property("padding", "10px 20px").ok();
                style.set_property("border-radius", "4px").ok();
                style.set_property("z-index", "10000").ok();
                style.set_property("font-family", "Arial, sans-serif").ok();

                if body.append_child(&html_toast).is_ok() {
                    wasm_bindgen_futures::spawn_local(async move {
                        gloo_timers::future::TimeoutFuture::new(3000).await;
                        if let Some(parent) = html_toast.parent_node() {
                            parent.remove_child(&html_toast).ok();
                        }
                    });
                }
            }
        }
    }
}

/// Renders an annotation description. Raw HTML in the source is escaped
/// rather than passed through.
pub fn markdown_to_html(input: &str) -> String {
    let parser = Parser::new(input).map(|event| match event {
        pulldown_cmark::Event::Html(raw) | pulldown_cmark::Event::InlineHtml(raw) => {
            pulldown_cmark::Event::Text(raw)
        }
        other => other,
    });
    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);
    html_output
}

/// The dataset link of an annotation, when it is safe to put in an `href`.
/// Only site paths and http(s) URLs qualify; the attribute comes from saved
/// content and may hold anything.
pub fn source_link(path: Option<&str>) -> Option<&str> {
    let path = path?.trim();
    let allowed = (path.starts_with('/') && !path.starts_with("//"))
        || path.starts_with("https://")
        || path.starts_with("http://");
    allowed.then_some(path)
}
