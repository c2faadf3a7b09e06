//! Whitelist view-controller.
//!
//! Owns the session state of the whitelist page and orchestrates the wallet
//! connection and the three contract calls. Everything here runs on a single
//! thread: state lives in `RefCell`/`Cell` and is never borrowed across an
//! `.await`.

pub mod contract;
pub mod controller;
pub mod guard;
pub mod state;

#[cfg(test)]
mod mock;

pub use contract::{AccessMode, Accessor, ContractReader, ContractSigner, PendingTransaction};
pub use controller::{Outcome, WhitelistController};
pub use guard::{InFlight, InFlightGuard};
pub use state::{Action, SessionState, View, count_text};
