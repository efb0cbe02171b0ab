use payloads::responses::Session;
use serde::{Deserialize, Serialize};
use yewdux::prelude::*;

/// Global app state. The session survives reloads through local storage.
#[derive(Default, Clone, PartialEq, Serialize, Deserialize, Store)]
#[store(storage = "local")]
pub struct State {
    pub session: Option<Session>,
}

impl State {
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn sign_in(&mut self, session: Session) {
        self.session = Some(session);
    }

    /// Drop the session, e.g. after the server rejected its token.
    pub fn sign_out(&mut self) {
        self.session = None;
    }
}
