use payloads::{Role, requests};
use reqwest::StatusCode;

use test_helpers::{ADMIN_EMAIL, admin_credentials, assert_status_code, spawn_app};

#[tokio::test]
async fn admin_can_sign_in() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let session = app.client.login(&admin_credentials()).await?;

    assert!(!session.token.is_empty());
    assert_eq!(session.user.email, ADMIN_EMAIL);
    assert_eq!(session.user.role, Role::SuperAdmin);
    assert!(session.user.role.is_administrator());
    Ok(())
}

#[tokio::test]
async fn wrong_password_rejected() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let details = requests::LoginCredentials {
        email: ADMIN_EMAIL.into(),
        password: "hunter2".into(),
    };
    let result = app.client.login(&details).await;

    assert_status_code(result, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn token_is_read_for_every_request() -> anyhow::Result<()> {
    let app = spawn_app().await;

    let result = app.categories().list(&Default::default(), "").request.await;
    assert_status_code(result, StatusCode::UNAUTHORIZED);

    // same client, token appears after sign-in
    app.login_admin().await?;
    let page = app.categories().list(&Default::default(), "").request.await?;
    assert_eq!(page.total, 0);

    app.logout();
    let result = app.categories().list(&Default::default(), "").request.await;
    assert_status_code(result, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn expired_session_is_unauthorized() -> anyhow::Result<()> {
    let app = spawn_app().await;
    app.login_admin().await?;

    app.expire_sessions()?;
    let result = app.categories().show(uuid_like(), "").request.await;

    assert_status_code(result, StatusCode::UNAUTHORIZED);
    Ok(())
}

fn uuid_like() -> &'static str {
    "00000000-0000-0000-0000-000000000000"
}
