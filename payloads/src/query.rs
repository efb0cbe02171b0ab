//! Query state for lists and single payloads.
//!
//! The state here is framework agnostic: the browser hooks in `ui` keep it
//! in yew state, while [`PaginatedQuery`] and [`SingleQuery`] drive it
//! directly for native callers and tests.
//!
//! A superseded request must never overwrite a newer result. Two things
//! enforce that: restarting cancels the previous request through its
//! [`CancelHandle`], and [`RequestSlot`] hands out a generation number so a
//! result that still slips through is recognised as stale and dropped.

use futures::future::LocalBoxFuture;
use serde::de::DeserializeOwned;

use crate::api_client::ClientError;
use crate::requests::{ListParams, PaginationUpdate};
use crate::resource::{CancelHandle, PendingRequest, Resource};
use crate::responses::{Paginated, Single};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryStatus {
    /// No request has been issued yet.
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// Visible state of a paginated list.
#[derive(Debug, Clone, PartialEq)]
pub struct PageState<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub error: Option<String>,
    pub is_loading: bool,
    /// Assumed true until the server answers 401.
    pub authenticated: bool,
    pub status: QueryStatus,
}

impl<T> Default for PageState<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            total: 0,
            error: None,
            is_loading: false,
            authenticated: true,
            status: QueryStatus::Idle,
        }
    }
}

impl<T> PageState<T> {
    /// The state a list starts in: its first request is already underway.
    pub fn loading() -> Self {
        let mut state = Self::default();
        state.begin();
        state
    }

    pub fn begin(&mut self) {
        self.is_loading = true;
        self.error = None;
        self.status = QueryStatus::Loading;
    }

    /// Apply the result of the current request. Returns false when nothing
    /// changed, which is always the case for a cancelled request.
    ///
    /// On failure `data` and `total` keep their last good values.
    pub fn apply(
        &mut self,
        result: Result<Paginated<T>, ClientError>,
        per_page: u32,
    ) -> bool {
        match result {
            Ok(page) => {
                let Paginated {
                    mut data, total, ..
                } = page;
                let per_page = per_page as usize;
                if data.len() > per_page {
                    tracing::warn!(
                        received = data.len(),
                        per_page,
                        "server returned more rows than requested"
                    );
                    data.truncate(per_page);
                }
                self.total = total.max(data.len() as u64);
                self.data = data;
                self.error = None;
                self.authenticated = true;
                self.is_loading = false;
                self.status = QueryStatus::Success;
                true
            }
            Err(e) => apply_failure(
                e,
                &mut self.error,
                &mut self.authenticated,
                &mut self.is_loading,
                &mut self.status,
            ),
        }
    }
}

/// Visible state of a single-payload query.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemState<T> {
    pub data: Option<T>,
    pub error: Option<String>,
    pub is_loading: bool,
    pub authenticated: bool,
    pub status: QueryStatus,
}

impl<T> Default for ItemState<T> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            is_loading: false,
            authenticated: true,
            status: QueryStatus::Idle,
        }
    }
}

impl<T> ItemState<T> {
    pub fn loading() -> Self {
        let mut state = Self::default();
        state.begin();
        state
    }

    pub fn begin(&mut self) {
        self.is_loading = true;
        self.error = None;
        self.status = QueryStatus::Loading;
    }

    pub fn apply(&mut self, result: Result<Single<T>, ClientError>) -> bool {
        match result {
            Ok(single) => {
                self.data = Some(single.data);
                self.error = None;
                self.authenticated = true;
                self.is_loading = false;
                self.status = QueryStatus::Success;
                true
            }
            Err(e) => apply_failure(
                e,
                &mut self.error,
                &mut self.authenticated,
                &mut self.is_loading,
                &mut self.status,
            ),
        }
    }
}

fn apply_failure(
    e: ClientError,
    error: &mut Option<String>,
    authenticated: &mut bool,
    is_loading: &mut bool,
    status: &mut QueryStatus,
) -> bool {
    if e.is_canceled() {
        return false;
    }
    if e.is_unauthorized() {
        *authenticated = false;
    }
    *error = Some(e.to_string());
    *is_loading = false;
    *status = QueryStatus::Error;
    true
}

/// Tracks the single request a query may have in flight.
#[derive(Debug, Default)]
pub struct RequestSlot {
    generation: u64,
    active: Option<CancelHandle>,
}

impl RequestSlot {
    /// Register a new request, cancelling whatever was in flight. Returns
    /// the generation to hand back to [`RequestSlot::finish`].
    pub fn begin(&mut self, cancel: CancelHandle) -> u64 {
        self.cancel();
        self.generation += 1;
        self.active = Some(cancel);
        self.generation
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation && self.active.is_some()
    }

    /// Mark `generation` as complete. Returns false if it was superseded or
    /// torn down, in which case its result must be dropped.
    pub fn finish(&mut self, generation: u64) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        self.active = None;
        true
    }

    pub fn cancel(&mut self) {
        if let Some(active) = self.active.take() {
            active.cancel();
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }
}

/// The future of one issued request, tagged with its generation.
pub struct QueryTicket<R> {
    generation: u64,
    request: LocalBoxFuture<'static, Result<R, ClientError>>,
}

impl<R> QueryTicket<R> {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub async fn settle(self) -> QueryOutcome<R> {
        QueryOutcome {
            generation: self.generation,
            result: self.request.await,
        }
    }
}

pub struct QueryOutcome<R> {
    pub generation: u64,
    pub result: Result<R, ClientError>,
}

/// Paginated list query for callers without a UI framework.
///
/// Mutations return a [`QueryTicket`]; await it and pass the outcome to
/// [`PaginatedQuery::resolve`]. Dropping the query cancels its request.
pub struct PaginatedQuery<T> {
    resource: Resource<T>,
    extended_path: String,
    pagination: ListParams,
    state: PageState<T>,
    slot: RequestSlot,
}

impl<T: DeserializeOwned + 'static> PaginatedQuery<T> {
    pub fn start(
        resource: Resource<T>,
        defaults: ListParams,
    ) -> (Self, QueryTicket<Paginated<T>>) {
        Self::start_at(resource, "", defaults)
    }

    pub fn start_at(
        resource: Resource<T>,
        extended_path: impl Into<String>,
        defaults: ListParams,
    ) -> (Self, QueryTicket<Paginated<T>>) {
        let mut query = Self {
            resource,
            extended_path: extended_path.into(),
            pagination: defaults,
            state: PageState::default(),
            slot: RequestSlot::default(),
        };
        let ticket = query.restart();
        (query, ticket)
    }

    pub fn pagination(&self) -> &ListParams {
        &self.pagination
    }

    pub fn state(&self) -> &PageState<T> {
        &self.state
    }

    /// Merge `update` into the pagination and restart the query.
    pub fn set_pagination(
        &mut self,
        update: PaginationUpdate,
    ) -> QueryTicket<Paginated<T>> {
        self.pagination.merge(update);
        self.restart()
    }

    pub fn refetch(&mut self) -> QueryTicket<Paginated<T>> {
        self.restart()
    }

    fn restart(&mut self) -> QueryTicket<Paginated<T>> {
        let PendingRequest { request, cancel } =
            self.resource.list(&self.pagination, &self.extended_path);
        let generation = self.slot.begin(cancel);
        self.state.begin();
        QueryTicket {
            generation,
            request,
        }
    }

    /// Apply an outcome if it belongs to the current request.
    pub fn resolve(&mut self, outcome: QueryOutcome<Paginated<T>>) -> bool {
        if !self.slot.finish(outcome.generation) {
            tracing::debug!(
                generation = outcome.generation,
                current = self.slot.generation(),
                "dropping superseded list result"
            );
            return false;
        }
        self.state.apply(outcome.result, self.pagination.per_page)
    }

    /// After a successful load that landed past the last page, restart on
    /// the last page. `None` when the current page is in range.
    pub fn clamp_to_last_page(&mut self) -> Option<QueryTicket<Paginated<T>>> {
        if self.state.status != QueryStatus::Success {
            return None;
        }
        let update = self.pagination.past_end(self.state.total)?;
        Some(self.set_pagination(update))
    }

    pub fn teardown(&mut self) {
        self.slot.cancel();
    }
}

impl<T> Drop for PaginatedQuery<T> {
    fn drop(&mut self) {
        self.slot.cancel();
    }
}

/// Single-payload query for callers without a UI framework.
pub struct SingleQuery<T> {
    state: ItemState<T>,
    slot: RequestSlot,
}

impl<T: 'static> SingleQuery<T> {
    pub fn start(
        pending: PendingRequest<Single<T>>,
    ) -> (Self, QueryTicket<Single<T>>) {
        let mut query = Self {
            state: ItemState::default(),
            slot: RequestSlot::default(),
        };
        let ticket = query.restart(pending);
        (query, ticket)
    }

    pub fn restart(
        &mut self,
        pending: PendingRequest<Single<T>>,
    ) -> QueryTicket<Single<T>> {
        let PendingRequest { request, cancel } = pending;
        let generation = self.slot.begin(cancel);
        self.state.begin();
        QueryTicket {
            generation,
            request,
        }
    }

    pub fn state(&self) -> &ItemState<T> {
        &self.state
    }

    pub fn resolve(&mut self, outcome: QueryOutcome<Single<T>>) -> bool {
        if !self.slot.finish(outcome.generation) {
            return false;
        }
        self.state.apply(outcome.result)
    }

    pub fn teardown(&mut self) {
        self.slot.cancel();
    }
}

impl<T> Drop for SingleQuery<T> {
    fn drop(&mut self) {
        self.slot.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    fn page(data: Vec<u32>, total: u64) -> Paginated<u32> {
        Paginated {
            data,
            total,
            page: 1,
            per_page: 10,
        }
    }

    fn unauthorized() -> ClientError {
        ClientError::APIError(StatusCode::UNAUTHORIZED, "Unauthorized".into())
    }

    fn handle() -> CancelHandle {
        PendingRequest::new(async { Ok::<(), ClientError>(()) }).cancel
    }

    #[test]
    fn starts_loading_and_authenticated() {
        let state = PageState::<u32>::loading();

        assert!(state.is_loading);
        assert!(state.authenticated);
        assert!(state.data.is_empty());
        assert_eq!(state.status, QueryStatus::Loading);
    }

    #[test]
    fn success_replaces_data_wholesale() {
        let mut state = PageState::loading();
        state.apply(Ok(page(vec![1, 2, 3], 3)), 10);
        state.begin();
        assert!(state.apply(Ok(page(vec![9], 1)), 10));

        assert_eq!(state.data, vec![9]);
        assert_eq!(state.total, 1);
        assert!(!state.is_loading);
        assert_eq!(state.error, None);
        assert_eq!(state.status, QueryStatus::Success);
    }

    #[test]
    fn oversized_page_is_truncated() {
        let mut state = PageState::loading();
        state.apply(Ok(page((0..15).collect(), 4)), 10);

        assert_eq!(state.data.len(), 10);
        assert!(state.total >= state.data.len() as u64);
    }

    #[test]
    fn unauthorized_keeps_last_good_data() {
        let mut state = PageState::loading();
        state.apply(Ok(page(vec![1, 2], 2)), 10);
        state.begin();
        state.apply(Err(unauthorized()), 10);

        assert!(!state.authenticated);
        assert_eq!(state.data, vec![1, 2]);
        assert_eq!(state.total, 2);
        assert_eq!(state.error.as_deref(), Some("Unauthorized"));
        assert!(!state.is_loading);
    }

    #[test]
    fn other_errors_leave_authentication_alone() {
        let mut state = PageState::<u32>::loading();
        state.apply(Err(unauthorized()), 10);
        state.begin();
        state.apply(
            Err(ClientError::APIError(
                StatusCode::INTERNAL_SERVER_ERROR,
                "boom".into(),
            )),
            10,
        );

        assert!(!state.authenticated);
        assert_eq!(state.error.as_deref(), Some("boom"));

        state.begin();
        state.apply(Ok(page(vec![], 0)), 10);
        assert!(state.authenticated);
    }

    #[test]
    fn cancellation_changes_nothing() {
        let mut state = PageState::<u32>::loading();
        let before = state.clone();

        assert!(!state.apply(Err(ClientError::Canceled), 10));
        assert_eq!(state, before);
    }

    #[test]
    fn item_state_follows_the_same_rules() {
        let mut state = ItemState::loading();
        state.apply(Ok(Single {
            data: "report",
            success: true,
        }));
        assert_eq!(state.data, Some("report"));

        state.begin();
        assert!(!state.apply(Err(ClientError::Canceled)));
        assert!(state.is_loading);

        state.apply(Err(unauthorized()));
        assert!(!state.authenticated);
        assert_eq!(state.data, Some("report"));
    }

    #[test]
    fn slot_cancels_the_previous_request() {
        let mut slot = RequestSlot::default();
        let first = handle();
        let second = handle();

        let first_generation = slot.begin(first.clone());
        let second_generation = slot.begin(second.clone());

        assert!(first.is_canceled());
        assert!(!second.is_canceled());
        assert!(!slot.finish(first_generation));
        assert!(slot.finish(second_generation));
        assert!(!slot.is_active());
    }

    #[test]
    fn result_settling_between_cancel_and_restart_is_dropped() {
        let mut slot = RequestSlot::default();
        let first = handle();
        let first_generation = slot.begin(first.clone());

        // pagination changed; the next request has not been issued yet
        slot.cancel();
        assert!(first.is_canceled());
        assert!(!slot.finish(first_generation));

        let second_generation = slot.begin(handle());
        assert!(slot.finish(second_generation));
    }

    #[test]
    fn slot_teardown_invalidates_the_current_request() {
        let mut slot = RequestSlot::default();
        let active = handle();
        let generation = slot.begin(active.clone());

        slot.cancel();

        assert!(active.is_canceled());
        assert!(!slot.finish(generation));
    }
}
