//! Data hooks.
//!
//! The query state machines live in `payloads::query`; these hooks keep
//! that state in yew and drive the requests with `spawn_local`.

use futures::future::{Either, LocalBoxFuture, select};
use payloads::{CancelHandle, ClientError};
use std::rc::Rc;
use std::time::Duration;
use yew::prelude::*;
use yewdux::prelude::*;

use crate::State;

pub mod use_mutation;
pub mod use_paginated_query;
pub mod use_push_route;
pub mod use_single_query;
pub mod use_title;

pub use use_mutation::{MutationHandle, use_mutation};
pub use use_paginated_query::{PaginatedQueryHandle, use_paginated_query};
pub use use_push_route::use_push_route;
pub use use_single_query::{SingleQueryHandle, use_single_query};
pub use use_title::use_title;

/// Await `request`, cancelling it if `timeout` elapses first.
///
/// Browsers give reqwest no transport timeout, so the hooks enforce the
/// client's own here.
pub(crate) async fn settle_with_timeout<R>(
    request: LocalBoxFuture<'static, Result<R, ClientError>>,
    cancel: &CancelHandle,
    timeout: Option<Duration>,
) -> Result<R, ClientError> {
    let Some(timeout) = timeout else {
        return request.await;
    };
    let millis = u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX);
    let timer = gloo_timers::future::TimeoutFuture::new(millis);

    match select(request, timer).await {
        Either::Left((result, _)) => result,
        Either::Right(((), _)) => {
            cancel.cancel();
            tracing::warn!(?timeout, "request timed out");
            Err(ClientError::Timeout)
        }
    }
}

/// Monotonic counter used as effect dependency. Every bump restarts the
/// query, even when nothing else changed.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub(crate) struct Revision(pub u64);

impl Reducible for Revision {
    type Action = ();

    fn reduce(self: Rc<Self>, _: ()) -> Rc<Self> {
        Rc::new(Self(self.0 + 1))
    }
}

/// Sign out once the server stops accepting the session's token.
#[hook]
pub(crate) fn use_session_guard(authenticated: bool) {
    let dispatch = use_dispatch::<State>();
    use_effect_with(authenticated, move |authenticated| {
        if !*authenticated {
            tracing::info!("session rejected, signing out");
            dispatch.reduce_mut(State::sign_out);
        }
    });
}

/// Sign-out callback for buttons.
#[hook]
pub fn use_sign_out() -> Callback<MouseEvent> {
    let dispatch = use_dispatch::<State>();
    let push_route = use_push_route();
    Callback::from(move |_| {
        dispatch.reduce_mut(State::sign_out);
        push_route.emit(crate::Route::SignIn);
    })
}
