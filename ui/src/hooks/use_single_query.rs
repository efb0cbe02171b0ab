use payloads::{
    ClientError, ItemState, PendingRequest, RequestSlot, Single,
};
use std::rc::Rc;
use yew::prelude::*;

use super::{Revision, settle_with_timeout, use_session_guard};

pub struct SingleQueryHandle<T> {
    pub data: Option<T>,
    pub error: Option<String>,
    pub is_loading: bool,
    pub authenticated: bool,
    pub refetch: Callback<()>,
}

impl<T> SingleQueryHandle<T> {
    /// Render `render_fn` once data is available; before that, a loading
    /// or error message mentioning `context`. A failed refetch keeps the
    /// previous data and passes the error along.
    pub fn render<F>(&self, context: &str, render_fn: F) -> Html
    where
        F: Fn(&T, bool, Option<&String>) -> Html,
    {
        match &self.data {
            Some(data) => render_fn(data, self.is_loading, self.error.as_ref()),
            None => match &self.error {
                Some(error) => html! {
                    <div class="p-4 rounded-md bg-red-50 dark:bg-red-900/20 \
                                border border-red-200 dark:border-red-800">
                        <p class="text-sm text-red-700 dark:text-red-400">
                            {format!("Error loading {context}: {error}")}
                        </p>
                    </div>
                },
                None => html! {
                    <div class="text-center py-12">
                        <p class="text-neutral-600 dark:text-neutral-400">
                            {format!("Loading {context}...")}
                        </p>
                    </div>
                },
            },
        }
    }
}

struct ItemStore<T>(ItemState<T>);

enum ItemAction<T> {
    Begin,
    Settle(Result<Single<T>, ClientError>),
}

impl<T: Clone + 'static> Reducible for ItemStore<T> {
    type Action = ItemAction<T>;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut state = self.0.clone();
        let changed = match action {
            ItemAction::Begin => {
                state.begin();
                true
            }
            ItemAction::Settle(result) => state.apply(result),
        };
        if changed { Rc::new(Self(state)) } else { self }
    }
}

/// One non-paginated payload, fetched once on mount and again on every
/// `refetch`.
///
/// `fetch_fn` starts the request; it usually wraps [`Resource::show`] or
/// [`Resource::fetch`].
///
/// [`Resource::show`]: payloads::Resource::show
/// [`Resource::fetch`]: payloads::Resource::fetch
#[hook]
pub fn use_single_query<T, F>(fetch_fn: F) -> SingleQueryHandle<T>
where
    T: Clone + 'static,
    F: Fn() -> PendingRequest<Single<T>> + 'static,
{
    let state = use_reducer(|| ItemStore(ItemState::loading()));
    let revision = use_reducer(Revision::default);
    let slot = use_mut_ref(RequestSlot::default);

    {
        let dispatcher = state.dispatcher();
        let slot = slot.clone();

        use_effect_with(revision.0, move |_| {
            let PendingRequest { request, cancel } = fetch_fn();
            let generation = slot.borrow_mut().begin(cancel.clone());
            dispatcher.dispatch(ItemAction::Begin);

            let timeout = crate::client_config().timeout;
            let active = slot.clone();
            yew::platform::spawn_local(async move {
                let result =
                    settle_with_timeout(request, &cancel, timeout).await;
                if active.borrow_mut().finish(generation) {
                    dispatcher.dispatch(ItemAction::Settle(result));
                }
            });

            move || slot.borrow_mut().cancel()
        });
    }

    use_session_guard(state.0.authenticated);

    let refetch = {
        let dispatcher = revision.dispatcher();
        let slot = slot.clone();
        Callback::from(move |_| {
            slot.borrow_mut().cancel();
            dispatcher.dispatch(());
        })
    };

    SingleQueryHandle {
        data: state.0.data.clone(),
        error: state.0.error.clone(),
        is_loading: state.0.is_loading,
        authenticated: state.0.authenticated,
        refetch,
    }
}
