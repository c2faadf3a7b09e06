//! Event binding.
//!
//! The page has one button; its handler runs whatever the current view
//! offers, so nothing is rebound on re-render.

use std::rc::Rc;
use tracing::debug;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::PageController;
use crate::dom::Elements;

pub fn bind_events(els: &Elements, controller: &Rc<PageController>) -> Result<(), JsValue> {
    let controller = Rc::clone(controller);
    let cb = Closure::wrap(Box::new(move |_: web_sys::MouseEvent| {
        let controller = Rc::clone(&controller);
        wasm_bindgen_futures::spawn_local(async move {
            let outcome = controller.activate().await;
            debug!(?outcome, "action button handled");
        });
    }) as Box<dyn FnMut(_)>);

    els.action_button
        .add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())?;
    cb.forget();
    Ok(())
}
