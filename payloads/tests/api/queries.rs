use payloads::{
    ListParams, PaginatedQuery, PaginationUpdate, QueryStatus, SingleQuery,
};
use std::collections::BTreeMap;

use test_helpers::spawn_app;

#[tokio::test]
async fn first_page_is_loaded_on_start() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    app.create_categories(12).await?;

    let (mut query, ticket) =
        PaginatedQuery::start(app.categories(), ListParams::default());
    assert!(query.state().is_loading);
    assert_eq!(query.state().status, QueryStatus::Loading);

    assert!(query.resolve(ticket.settle().await));

    let state = query.state();
    assert!(!state.is_loading);
    assert_eq!(state.status, QueryStatus::Success);
    assert_eq!(state.total, 12);
    assert_eq!(state.data.len(), 10);
    assert_eq!(state.data[0].name, "Category 01");
    assert_eq!(state.error, None);
    Ok(())
}

#[tokio::test]
async fn set_pagination_moves_to_next_page() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    app.create_categories(12).await?;
    let (mut query, ticket) =
        PaginatedQuery::start(app.categories(), ListParams::default());
    query.resolve(ticket.settle().await);

    let ticket = query.set_pagination(PaginationUpdate::page(2));
    assert!(query.resolve(ticket.settle().await));

    let state = query.state();
    assert_eq!(query.pagination().page, 2);
    assert_eq!(state.data.len(), 2);
    assert_eq!(state.data[0].name, "Category 11");
    assert_eq!(query.pagination().low_bound(state.total), 11);
    assert_eq!(query.pagination().high_bound(state.total), 12);
    Ok(())
}

#[tokio::test]
async fn deleting_last_row_on_last_page_steps_back() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    let categories = app.create_categories(11).await?;
    let (mut query, ticket) =
        PaginatedQuery::start(app.categories(), ListParams::default());
    query.resolve(ticket.settle().await);
    let ticket = query.set_pagination(PaginationUpdate::page(2));
    query.resolve(ticket.settle().await);
    assert!(query.clamp_to_last_page().is_none());

    app.categories().delete(categories[10].id, "").await?;
    let ticket = query.refetch();
    query.resolve(ticket.settle().await);

    let state = query.state();
    assert!(state.data.is_empty());
    assert_eq!(state.total, 10);
    assert_eq!(query.pagination().low_bound(state.total), 0);
    assert_eq!(query.pagination().high_bound(state.total), 0);

    let ticket = query
        .clamp_to_last_page()
        .expect("page 2 no longer exists");
    assert!(query.resolve(ticket.settle().await));

    let state = query.state();
    assert_eq!(query.pagination().page, 1);
    assert_eq!(state.data.len(), 10);
    assert_eq!(query.pagination().low_bound(state.total), 1);
    assert_eq!(query.pagination().high_bound(state.total), 10);
    assert!(query.clamp_to_last_page().is_none());
    Ok(())
}

#[tokio::test]
async fn short_page_window_is_clamped_to_total() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    app.create_categories(8).await?;

    let (mut query, ticket) =
        PaginatedQuery::start(app.categories(), ListParams::default());
    query.resolve(ticket.settle().await);

    let state = query.state();
    assert_eq!(state.data.len(), 8);
    assert_eq!(state.total, 8);
    assert!(state.data.len() <= query.pagination().per_page as usize);
    assert_eq!(query.pagination().low_bound(state.total), 1);
    assert_eq!(query.pagination().high_bound(state.total), 8);
    Ok(())
}

#[tokio::test]
async fn search_returns_to_first_page() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    app.create_categories(12).await?;
    app.create_category("Radio Features").await?;
    let (mut query, ticket) = PaginatedQuery::start(
        app.categories(),
        ListParams::default().with_per_page(5),
    );
    query.resolve(ticket.settle().await);
    let ticket = query.set_pagination(PaginationUpdate::page(3));
    query.resolve(ticket.settle().await);

    let ticket = query.set_pagination(PaginationUpdate::search("radio"));
    query.resolve(ticket.settle().await);

    assert_eq!(query.pagination().page, 1);
    assert_eq!(query.pagination().search, "radio");
    assert_eq!(query.state().total, 1);
    assert_eq!(query.state().data[0].name, "Radio Features");
    Ok(())
}

#[tokio::test]
async fn refetch_picks_up_new_records() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    let (mut query, ticket) =
        PaginatedQuery::start(app.categories(), ListParams::default());
    query.resolve(ticket.settle().await);
    assert_eq!(query.state().total, 0);

    app.create_category("Health Reporting").await?;
    let ticket = query.refetch();
    query.resolve(ticket.settle().await);

    assert_eq!(query.state().total, 1);
    Ok(())
}

#[tokio::test]
async fn superseded_page_never_overwrites_newer_one() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    app.create_categories(12).await?;

    // page 1 is slow, page 2 is fast
    let slow = ListParams::default().with_filter("delay_ms", "300");
    let (mut query, first) = PaginatedQuery::start(app.categories(), slow);
    let second = query.set_pagination(PaginationUpdate {
        page: Some(2),
        filters: Some(BTreeMap::new()),
        ..Default::default()
    });
    assert!(second.generation() > first.generation());

    let second = second.settle().await;
    let first = first.settle().await;

    assert!(query.resolve(second));
    assert!(!query.resolve(first));

    let state = query.state();
    assert_eq!(query.pagination().page, 2);
    assert_eq!(state.data.len(), 2);
    assert_eq!(state.data[0].name, "Category 11");
    assert_eq!(state.status, QueryStatus::Success);
    Ok(())
}

#[tokio::test]
async fn single_query_loads_one_entity() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    let award = app.create_award("EJAT 2025", 2025).await?;

    let (mut query, ticket) =
        SingleQuery::start(app.awards().show(award.id, ""));
    assert!(query.state().is_loading);
    assert!(query.resolve(ticket.settle().await));

    let state = query.state();
    assert_eq!(state.status, QueryStatus::Success);
    assert_eq!(state.data.as_ref(), Some(&award));
    Ok(())
}

#[tokio::test]
async fn single_query_restart_replaces_entity() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    let old = app.create_award("EJAT 2024", 2024).await?;
    let new = app.create_award("EJAT 2025", 2025).await?;
    let (mut query, first) = SingleQuery::start(app.awards().show(old.id, ""));

    let second = query.restart(app.awards().show(new.id, ""));

    assert!(!query.resolve(first.settle().await));
    assert!(query.resolve(second.settle().await));
    assert_eq!(query.state().data.as_ref().map(|a| a.id), Some(new.id));
    Ok(())
}
