use wl_whitelist_core::{SessionState, View, count_text};

use crate::dom::{self, Elements};

/// Redraws the count line and the action area from a state snapshot.
pub fn render(els: &Elements, state: &SessionState) {
    dom::set_text(&els.whitelist_count, &count_text(state.whitelisted_count));

    let view = View::for_state(state);
    dom::set_text(&els.thanks_message, View::Thanks.label());
    dom::set_visible(&els.thanks_message, !view.is_button());
    dom::set_visible(&els.action_button, view.is_button());

    if view.is_button() {
        dom::set_text(&els.action_button, view.label());
        dom::toggle_class(&els.action_button, "loading", view == View::Loading);
    }
}
