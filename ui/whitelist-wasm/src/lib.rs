//! Crypto Devs whitelist page.
//!
//! Rust + WASM front-end over an injected browser wallet. The controller in
//! `wl-whitelist-core` owns the session; this crate binds it to the DOM.

pub mod config;
pub mod dom;
pub mod eip1193;
pub mod events;
pub mod render;

use std::rc::Rc;
use tracing::{error, info};
use wasm_bindgen::prelude::*;
use wl_whitelist_core::WhitelistController;

use crate::eip1193::{BrowserAlerter, InjectedConnector};

pub type PageController = WhitelistController<InjectedConnector, BrowserAlerter>;

/// WASM entry point – called automatically when the module is instantiated.
#[wasm_bindgen(start)]
pub async fn start() -> Result<(), JsValue> {
    // Improve panic messages in the browser console
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();

    init().await
}

async fn init() -> Result<(), JsValue> {
    let els = dom::Elements::bind()?;

    let config = config::load().map_err(|e| {
        error!(error = %e, "whitelist page is not configured");
        JsValue::from_str(&e.to_string())
    })?;
    info!(
        contract = %wl_abi::to_checksum_address(&config.contract_address),
        chain_id = config.required_chain_id,
        "whitelist page starting"
    );

    let controller = Rc::new(PageController::new(
        config,
        InjectedConnector,
        BrowserAlerter,
    ));

    {
        let els = els.clone();
        controller.subscribe(move |state| render::render(&els, state));
    }
    render::render(&els, &controller.state());

    events::bind_events(&els, &controller)?;

    // Connect once on mount
    if !controller.has_connection() {
        let controller = Rc::clone(&controller);
        wasm_bindgen_futures::spawn_local(async move {
            controller.connect_wallet().await;
        });
    }

    Ok(())
}
