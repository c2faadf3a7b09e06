//! DOM element bindings.
//!
//! All fields are resolved once at startup. The page must provide
//! `#whitelistCount`, `#thanksMessage` and `#actionButton`.

use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlButtonElement, HtmlElement, Window};

// ── Helpers ──

pub fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))
}

pub fn document() -> Result<Document, JsValue> {
    window()?
        .document()
        .ok_or_else(|| JsValue::from_str("window has no document"))
}

pub fn body() -> Option<HtmlElement> {
    document().ok()?.body()
}

fn require<T: JsCast>(doc: &Document, id: &str) -> Result<T, JsValue> {
    doc.get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing element #{id}")))?
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("element #{id} has the wrong type")))
}

pub fn set_text(el: &Element, text: &str) {
    el.set_text_content(Some(text));
}

pub fn set_visible(el: &HtmlElement, visible: bool) {
    let display = if visible { "" } else { "none" };
    let _ = el.style().set_property("display", display);
}

pub fn toggle_class(el: &Element, cls: &str, force: bool) {
    let _ = el.class_list().toggle_with_force(cls, force);
}

// ── Elements struct ──

/// Clone-friendly (all inner types are reference-counted via JS GC).
#[derive(Clone)]
pub struct Elements {
    pub whitelist_count: Element,
    pub thanks_message: HtmlElement,
    pub action_button: HtmlButtonElement,
}

impl Elements {
    pub fn bind() -> Result<Self, JsValue> {
        let doc = document()?;
        Ok(Self {
            whitelist_count: require(&doc, "whitelistCount")?,
            thanks_message: require(&doc, "thanksMessage")?,
            action_button: require(&doc, "actionButton")?,
        })
    }
}
