use payloads::ClientError;
use std::future::Future;
use yew::prelude::*;
use yewdux::prelude::*;

use crate::State;
use crate::contexts::toast::{ToastHandle, use_toast};

/// Progress and error of create/update/delete calls made from a dialog.
#[derive(Clone)]
pub struct MutationHandle {
    is_saving: UseStateHandle<bool>,
    error: UseStateHandle<Option<String>>,
    toasts: ToastHandle,
    dispatch: Dispatch<State>,
}

impl MutationHandle {
    pub fn is_saving(&self) -> bool {
        *self.is_saving
    }

    pub fn error(&self) -> Option<AttrValue> {
        self.error.as_ref().map(|e| AttrValue::from(e.clone()))
    }

    pub fn reset(&self) {
        self.error.set(None);
    }

    /// Show a validation message without calling the server.
    pub fn reject(&self, message: impl Into<String>) {
        self.error.set(Some(message.into()));
    }

    /// Await `request`; on success toast `success` and emit `on_done`.
    /// Failures stay in the dialog.
    pub fn run<R: 'static>(
        &self,
        request: impl Future<Output = Result<R, ClientError>> + 'static,
        success: String,
        on_done: Callback<()>,
    ) {
        let handle = self.clone();
        yew::platform::spawn_local(async move {
            handle.is_saving.set(true);
            handle.error.set(None);

            match request.await {
                Ok(_) => {
                    handle.toasts.success(success);
                    on_done.emit(());
                }
                Err(e) => {
                    if e.is_unauthorized() {
                        handle.dispatch.reduce_mut(State::sign_out);
                    }
                    handle.error.set(Some(e.to_string()));
                }
            }

            handle.is_saving.set(false);
        });
    }
}

#[hook]
pub fn use_mutation() -> MutationHandle {
    MutationHandle {
        is_saving: use_state(|| false),
        error: use_state(|| None),
        toasts: use_toast(),
        dispatch: use_dispatch::<State>(),
    }
}
