/// Observable state of one page session. Nothing here is persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionState {
    pub wallet_connected: bool,
    pub joined_whitelist: bool,
    pub loading: bool,
    /// Last value read from the contract counter.
    pub whitelisted_count: u64,
}

/// What the page shows in place of the action button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Thanks,
    Loading,
    JoinButton,
    ConnectButton,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Join,
    Connect,
}

impl View {
    /// First matching branch wins.
    pub fn for_state(state: &SessionState) -> Self {
        match (state.wallet_connected, state.joined_whitelist, state.loading) {
            (true, true, _) => View::Thanks,
            (true, false, true) => View::Loading,
            (true, false, false) => View::JoinButton,
            (false, _, _) => View::ConnectButton,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            View::Thanks => "Thanks for joining the Whitelist!",
            View::Loading => "Loading...",
            View::JoinButton => "Join the Whitelist",
            View::ConnectButton => "Connect your Wallet",
        }
    }

    pub fn action(self) -> Option<Action> {
        match self {
            View::JoinButton => Some(Action::Join),
            View::ConnectButton => Some(Action::Connect),
            View::Thanks | View::Loading => None,
        }
    }

    pub fn is_button(self) -> bool {
        !matches!(self, View::Thanks)
    }
}

pub fn count_text(count: u64) -> String {
    format!("{count} have already joined the Whitelist list")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(wallet_connected: bool, joined_whitelist: bool, loading: bool) -> SessionState {
        SessionState {
            wallet_connected,
            joined_whitelist,
            loading,
            whitelisted_count: 0,
        }
    }

    #[test]
    fn initial_state_asks_to_connect() {
        let view = View::for_state(&SessionState::default());
        assert_eq!(view, View::ConnectButton);
        assert_eq!(view.label(), "Connect your Wallet");
        assert_eq!(view.action(), Some(Action::Connect));
    }

    #[test]
    fn joined_wins_over_loading() {
        assert_eq!(View::for_state(&state(true, true, true)), View::Thanks);
        assert_eq!(View::for_state(&state(true, true, false)), View::Thanks);
        assert!(!View::Thanks.is_button());
    }

    #[test]
    fn loading_button_is_inert() {
        let view = View::for_state(&state(true, false, true));
        assert_eq!(view, View::Loading);
        assert_eq!(view.label(), "Loading...");
        assert_eq!(view.action(), None);
    }

    #[test]
    fn connected_non_member_can_join() {
        let view = View::for_state(&state(true, false, false));
        assert_eq!(view.label(), "Join the Whitelist");
        assert_eq!(view.action(), Some(Action::Join));
    }

    #[test]
    fn disconnected_ignores_other_flags() {
        assert_eq!(View::for_state(&state(false, true, true)), View::ConnectButton);
    }

    #[test]
    fn count_line_text() {
        assert_eq!(count_text(5), "5 have already joined the Whitelist list");
        assert_eq!(count_text(0), "0 have already joined the Whitelist list");
    }
}
