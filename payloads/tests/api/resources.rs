use payloads::responses::ReportSummary;
use payloads::{
    ClientError, Criterion, ListParams, Resource, Upload, requests,
};
use reqwest::StatusCode;
use serde_json::json;

use test_helpers::{assert_status_code, spawn_app};

#[tokio::test]
async fn create_and_show_category() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;

    let created = app.create_category("Investigative Reporting").await?;
    let shown = app.categories().show(created.id, "").request.await?;

    assert!(shown.success);
    assert_eq!(shown.data, created);
    Ok(())
}

#[tokio::test]
async fn duplicate_category_name_rejected() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    app.create_category("Photojournalism").await?;

    let result = app.create_category("photojournalism").await;

    let error = result.unwrap_err().downcast::<ClientError>()?;
    assert_eq!(error.status(), Some(StatusCode::UNPROCESSABLE_ENTITY));
    assert_eq!(error.to_string(), "Name is already taken");
    Ok(())
}

#[tokio::test]
async fn update_sends_identifier_in_path_only() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    let category = app.create_category("Data Journalism").await?;

    // the stand-in API rejects an id in the body
    let details = requests::UpdateCategory {
        id: category.id,
        name: "Data & Visual Journalism".into(),
        description: None,
    };
    let updated = app.categories().update(&details, "").await?.data;

    assert_eq!(updated.id, category.id);
    assert_eq!(updated.name, "Data & Visual Journalism");
    assert_eq!(updated.description, None);
    assert_eq!(updated.created_at, category.created_at);
    Ok(())
}

#[tokio::test]
async fn update_without_identifier_is_not_sent() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;

    let result = app
        .categories()
        .update(&json!({ "name": "Nameless" }), "")
        .await;

    assert!(matches!(result, Err(ClientError::MissingIdentifier(field)) if field == "id"));
    Ok(())
}

#[tokio::test]
async fn delete_category() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    let category = app.create_category("Editorial Cartoon").await?;

    app.categories().delete(category.id, "").await?;

    let result = app.categories().show(category.id, "").request.await;
    assert_status_code(result, StatusCode::NOT_FOUND);
    let result = app.categories().delete(category.id, "").await;
    assert_status_code(result, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn create_with_files_sends_multipart() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;

    let details = requests::CreateCategory {
        name: "Digital Storytelling".into(),
        description: Some("Interactive work".into()),
    };
    let logo = Upload {
        field: "logo".into(),
        file_name: "logo.png".into(),
        mime: Some("image/png".into()),
        bytes: vec![0x89, b'P', b'N', b'G'],
    };
    let created = app
        .categories()
        .create_with_files(&details, vec![logo], "")
        .await?
        .data;

    assert_eq!(created.name, "Digital Storytelling");
    assert_eq!(created.description.as_deref(), Some("Interactive work"));

    // the file part was stored alongside the text fields
    let stored = app.state.store()?.get("categories", &created.id.to_string())?;
    assert_eq!(stored["logo"]["fileName"], "logo.png");
    assert_eq!(stored["logo"]["size"], 4);
    Ok(())
}

#[tokio::test]
async fn create_with_no_files_sends_json() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;

    let details = requests::CreateMediaChannel {
        name: "Harbour Radio".into(),
        website: None,
    };
    let created = app
        .media_channels()
        .create_with_files(&details, Vec::new(), "")
        .await?
        .data;

    assert_eq!(created.name, "Harbour Radio");
    assert_eq!(created.website, None);
    Ok(())
}

#[tokio::test]
async fn list_by_item_scopes_to_parent() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    let print = app.create_category("Print").await?;
    let radio = app.create_category("Radio").await?;
    for (category, name) in [(&print, "Accuracy"), (&print, "Impact"), (&radio, "Impact")] {
        let details = requests::CreateCriterion {
            category_id: category.id,
            name: name.into(),
            weight: 50,
        };
        app.criteria().create(&details, "").await?;
    }

    let page = app
        .criteria()
        .list_by_item(print.id, &ListParams::default(), "/by-category")
        .request
        .await?;

    assert_eq!(page.total, 2);
    assert!(page.data.iter().all(|c: &Criterion| c.category_id == print.id));
    Ok(())
}

#[tokio::test]
async fn fetch_report_summary() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    app.create_categories(3).await?;
    app.create_award("EJAT 2025", 2025).await?;
    let judge = requests::CreateUser {
        name: "Eleanor Wong".into(),
        email: "eleanor@judges.example".into(),
        role: payloads::Role::Judge,
    };
    app.users().create(&judge, "").await?;

    let reports: Resource<ReportSummary> =
        Resource::new(app.client.clone(), "/reports");
    let summary = reports.fetch("/summary").request.await?.data;

    assert_eq!(
        summary,
        ReportSummary {
            categories: 3,
            awards: 1,
            applications: 0,
            judges: 1,
            scores: 0,
        }
    );
    Ok(())
}

#[tokio::test]
async fn list_filters_and_search() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;
    app.create_award("EJAT 2024", 2024).await?;
    app.create_award("EJAT 2025", 2025).await?;
    app.create_award("Press Freedom 2025", 2025).await?;

    let params = ListParams::default().with_filter("year", "2025");
    let page = app.awards().list(&params, "").request.await?;
    assert_eq!(page.total, 2);

    let params = ListParams {
        search: "ejat".into(),
        ..params
    };
    let page = app.awards().list(&params, "").request.await?;
    assert_eq!(page.total, 1);
    assert_eq!(page.data[0].name, "EJAT 2025");
    Ok(())
}
