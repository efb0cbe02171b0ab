use payloads::{
    ClientError, ListParams, PaginatedQuery, PaginationUpdate, QueryStatus,
    Resource, SingleQuery,
};
use reqwest::StatusCode;
use std::time::Duration;

use test_helpers::spawn_app;

#[tokio::test]
async fn slow_response_times_out() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    let client = app.client_with_timeout(Duration::from_millis(100));
    let categories: Resource<payloads::Category> =
        Resource::new(client, "/categories");

    let params = ListParams::default().with_filter("delay_ms", "1000");
    let result = categories.list(&params, "").request.await;

    assert!(matches!(result, Err(ClientError::Timeout)));
    Ok(())
}

#[tokio::test]
async fn timeout_is_reported_on_the_query() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    let client = app.client_with_timeout(Duration::from_millis(100));
    let categories: Resource<payloads::Category> =
        Resource::new(client, "/categories");

    let params = ListParams::default().with_filter("delay_ms", "1000");
    let (mut query, ticket) = PaginatedQuery::start(categories, params);
    assert!(query.resolve(ticket.settle().await));

    let state = query.state();
    assert_eq!(state.status, QueryStatus::Error);
    assert!(!state.is_loading);
    assert!(state.authenticated);
    assert_eq!(
        state.error.as_deref(),
        Some("The server took too long to respond.")
    );
    Ok(())
}

#[tokio::test]
async fn canceled_request_resolves_to_canceled() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;

    let params = ListParams::default().with_filter("delay_ms", "300");
    let pending = app.categories().list(&params, "");
    pending.cancel.cancel();

    assert!(pending.cancel.is_canceled());
    assert!(matches!(pending.request.await, Err(ClientError::Canceled)));
    Ok(())
}

#[tokio::test]
async fn teardown_leaves_state_untouched() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    app.create_categories(3).await?;
    let (mut query, ticket) =
        PaginatedQuery::start(app.categories(), ListParams::default());
    query.resolve(ticket.settle().await);
    let before = query.state().clone();

    let ticket = query.refetch();
    query.teardown();

    assert!(!query.resolve(ticket.settle().await));
    assert_eq!(query.state().data, before.data);
    assert_eq!(query.state().total, 3);
    assert_eq!(query.state().error, None);
    Ok(())
}

#[tokio::test]
async fn unauthorized_list_marks_query_signed_out() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let (mut query, ticket) =
        PaginatedQuery::start(app.categories(), ListParams::default());
    assert!(query.state().authenticated);
    assert!(query.resolve(ticket.settle().await));

    let state = query.state();
    assert!(!state.authenticated);
    assert_eq!(state.status, QueryStatus::Error);
    assert_eq!(state.error.as_deref(), Some("Unauthorized"));
    assert!(state.data.is_empty());
    Ok(())
}

#[tokio::test]
async fn failed_refetch_keeps_last_page() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    app.create_categories(4).await?;
    let (mut query, ticket) =
        PaginatedQuery::start(app.categories(), ListParams::default());
    query.resolve(ticket.settle().await);

    app.expire_sessions()?;
    let ticket = query.set_pagination(PaginationUpdate::search("category"));
    query.resolve(ticket.settle().await);

    let state = query.state();
    assert!(!state.authenticated);
    assert_eq!(state.total, 4);
    assert_eq!(state.data.len(), 4);

    // signing back in recovers
    app.login_admin().await?;
    let ticket = query.refetch();
    query.resolve(ticket.settle().await);
    assert!(query.state().authenticated);
    assert_eq!(query.state().status, QueryStatus::Success);
    Ok(())
}

#[tokio::test]
async fn missing_entity_is_an_error_not_sign_out() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;

    let (mut query, ticket) = SingleQuery::start(
        app.categories()
            .show("00000000-0000-0000-0000-000000000000", ""),
    );
    query.resolve(ticket.settle().await);

    let state = query.state();
    assert_eq!(state.status, QueryStatus::Error);
    assert!(state.authenticated);
    assert_eq!(state.data, None);
    assert_eq!(state.error.as_deref(), Some("Record not found"));
    Ok(())
}

#[tokio::test]
async fn unknown_resource_is_not_found() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    let trophies: Resource<serde_json::Value> =
        Resource::new(app.client.clone(), "/trophies");

    let result = trophies.list(&ListParams::default(), "").request.await;

    let error = result.unwrap_err();
    assert_eq!(error.status(), Some(StatusCode::NOT_FOUND));
    assert_eq!(error.to_string(), "Unknown resource `trophies`");
    Ok(())
}
