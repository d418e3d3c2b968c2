//! Small browser utilities shared by the screens.
//!
//! - **Feedback**: transient toasts for success and failure messages.
//! - **Downloads**: turning PDF bytes into a file the browser saves.
//! - **Formatting**: dates and counts as shown in tables.

use chrono::{DateTime, Utc};
use gloo_file::{Blob, ObjectUrl};
use num_format::{Locale, ToFormattedString};
use wasm_bindgen::JsCast;
use web_sys::{HtmlAnchorElement, HtmlElement};

/// Shows a notification at the bottom of the screen for a few seconds.
///
/// Errors use a red background so they stand out from confirmations.
pub fn show_toast(message: &str) {
    toast(message, "rgba(0, 0, 0, 0.85)");
}

pub fn show_error(message: &str) {
    toast(message, "#b71c1c");
}

fn toast(message: &str, background: &str) {
    if let Some(window) = web_sys::window() {
        if let Some(document) = window.document() {
            if let (Ok(toast), Some(body)) = (document.create_element("div"), document.body()) {
                toast.set_text_content(Some(message));
                let html_toast: HtmlElement = toast.unchecked_into();
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
                        gloo_timers::future::TimeoutFuture::new(3500).await;
                        if let Some(parent) = html_toast.parent_node() {
                            parent.remove_child(&html_toast).ok();
                        }
                    });
                }
            }
        }
    }
}

/// Saves `bytes` as `filename` through a temporary object URL.
pub fn download_pdf(bytes: &[u8], filename: &str) {
    let blob = Blob::new_with_options(bytes, Some("application/pdf"));
    let url = ObjectUrl::from(blob);

    let anchor = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.create_element("a").ok())
        .and_then(|e| e.dyn_into::<HtmlAnchorElement>().ok());
    let Some(anchor) = anchor else {
        log::error!("could not create download link for {}", filename);
        return;
    };
    anchor.set_href(&url);
    anchor.set_download(filename);
    anchor.click();

    // Revoking immediately can cancel the download in some browsers.
    wasm_bindgen_futures::spawn_local(async move {
        gloo_timers::future::TimeoutFuture::new(1000).await;
        drop(url);
    });
}

pub fn format_date(at: Option<DateTime<Utc>>) -> String {
    at.map(|at| at.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub fn format_count(count: usize) -> String {
    count.to_formatted_string(&Locale::en)
}
