use payloads::{
    ClientError, ListParams, PageState, Paginated, PaginationUpdate,
    PendingRequest, RequestSlot, Resource,
};
use serde::de::DeserializeOwned;
use std::rc::Rc;
use yew::prelude::*;

use super::{settle_with_timeout, use_session_guard};

pub struct PaginatedQueryHandle<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub error: Option<String>,
    pub is_loading: bool,
    pub pagination: ListParams,
    /// The only way to change pagination, search or filters. Every call
    /// restarts the query.
    pub set_pagination: Callback<PaginationUpdate>,
    pub authenticated: bool,
    pub refetch: Callback<()>,
}

struct PageStore<T>(PageState<T>);

enum PageAction<T> {
    Begin,
    Settle {
        result: Result<Paginated<T>, ClientError>,
        per_page: u32,
    },
}

impl<T: Clone + 'static> Reducible for PageStore<T> {
    type Action = PageAction<T>;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut state = self.0.clone();
        let changed = match action {
            PageAction::Begin => {
                state.begin();
                true
            }
            PageAction::Settle { result, per_page } => {
                state.apply(result, per_page)
            }
        };
        if changed { Rc::new(Self(state)) } else { self }
    }
}

#[derive(Clone, PartialEq)]
struct PaginationStore {
    params: ListParams,
    revision: u64,
}

enum PaginationAction {
    Merge(PaginationUpdate),
    Refetch,
}

impl Reducible for PaginationStore {
    type Action = PaginationAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        if let PaginationAction::Merge(update) = action {
            next.params.merge(update);
        }
        next.revision += 1;
        Rc::new(next)
    }
}

/// Paginated list of `resource`, starting from `defaults`.
///
/// The first page is requested on mount. Changing pagination cancels the
/// request in flight, and a result that arrives for a superseded request
/// is dropped, so the list always shows the latest request's answer.
///
/// # Example
///
/// ```rust,ignore
/// let categories = use_paginated_query(
///     crate::resource::<Category>("/categories"),
///     ListParams::default(),
/// );
/// let next_page = {
///     let set_pagination = categories.set_pagination.clone();
///     let page = categories.pagination.page;
///     Callback::from(move |_| set_pagination.emit(PaginationUpdate::page(page + 1)))
/// };
/// ```
#[hook]
pub fn use_paginated_query<T>(
    resource: Resource<T>,
    defaults: ListParams,
) -> PaginatedQueryHandle<T>
where
    T: Clone + DeserializeOwned + 'static,
{
    let state = use_reducer(|| PageStore(PageState::loading()));
    let pagination = use_reducer(move || PaginationStore {
        params: defaults,
        revision: 0,
    });
    let slot = use_mut_ref(RequestSlot::default);

    {
        let dispatcher = state.dispatcher();
        let pagination_dispatcher = pagination.dispatcher();
        let params = pagination.params.clone();
        let slot = slot.clone();

        use_effect_with(pagination.revision, move |_| {
            let PendingRequest { request, cancel } = resource.list(&params, "");
            let generation = slot.borrow_mut().begin(cancel.clone());
            dispatcher.dispatch(PageAction::Begin);

            let timeout = resource.client().request_timeout();
            let per_page = params.per_page;
            let active = slot.clone();
            yew::platform::spawn_local(async move {
                let result =
                    settle_with_timeout(request, &cancel, timeout).await;
                if active.borrow_mut().finish(generation) {
                    let past_end = match &result {
                        Ok(page) if page.data.is_empty() => {
                            params.past_end(page.total)
                        }
                        _ => None,
                    };
                    dispatcher.dispatch(PageAction::Settle { result, per_page });
                    if let Some(update) = past_end {
                        tracing::debug!(page = params.page, "page past the end, stepping back");
                        pagination_dispatcher
                            .dispatch(PaginationAction::Merge(update));
                    }
                } else {
                    tracing::debug!(generation, "dropping superseded list result");
                }
            });

            move || slot.borrow_mut().cancel()
        });
    }

    use_session_guard(state.0.authenticated);

    // The request in flight is cancelled before the re-render, so a result
    // settling in between is already stale.
    let set_pagination = {
        let dispatcher = pagination.dispatcher();
        let slot = slot.clone();
        Callback::from(move |update: PaginationUpdate| {
            slot.borrow_mut().cancel();
            dispatcher.dispatch(PaginationAction::Merge(update));
        })
    };
    let refetch = {
        let dispatcher = pagination.dispatcher();
        let slot = slot.clone();
        Callback::from(move |_| {
            slot.borrow_mut().cancel();
            dispatcher.dispatch(PaginationAction::Refetch);
        })
    };

    PaginatedQueryHandle {
        data: state.0.data.clone(),
        total: state.0.total,
        error: state.0.error.clone(),
        is_loading: state.0.is_loading,
        pagination: pagination.params.clone(),
        set_pagination,
        authenticated: state.0.authenticated,
        refetch,
    }
}
