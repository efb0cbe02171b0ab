//! Development server for EJAT admin UI work
//!
//! Serves the in-memory stand-in API, seeded with a realistic dataset, so
//! the browser app can run without the real backend. Configuration comes
//! from the environment (a `.env` file is read if present): `IP_ADDRESS`,
//! `PORT`, `ALLOWED_ORIGINS`, `ADMIN_EMAIL` and `ADMIN_PASSWORD`.
//!
//! Usage: cargo run -p dev-server

use anyhow::Result;
use test_helpers::mock::DevDataset;
use test_helpers::telemetry::{self, LogFormat};
use test_helpers::Config;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; the defaults cover local development.
    dotenvy::dotenv().ok();

    telemetry::init("info", LogFormat::Pretty)?;

    info!("🚀 Starting EJAT development server");

    let config = Config::from_env()?;
    let admin_email = config.admin_email.clone();
    let app = test_helpers::spawn_app_with_config(config)?;

    info!("✅ API server running on http://127.0.0.1:{}", app.port);

    info!("📊 Setting up development data...");
    let dataset = DevDataset::create(&app).await?;

    info!("🎯 Development server ready!");
    info!("   API: http://127.0.0.1:{}/api", app.port);
    info!(
        "   UI:  cd ui && BACKEND_URL=http://127.0.0.1:{} trunk serve",
        app.port
    );
    info!("   Sign in as {admin_email}");
    info!("");
    dataset.print_summary();
    info!("");
    info!("👋 Press Ctrl+C to shutdown");

    tokio::signal::ctrl_c().await?;
    info!("🛑 Shutting down development server");
    Ok(())
}
