use navigo::{app, auth::repo_types::Session, db, images::seed, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "navigo=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let app_state = AppState::init().await?;
    db::migrate(&app_state.db).await?;

    let purged = Session::purge_expired(&app_state.db).await?;
    tracing::info!(purged, "expired sessions removed");

    if app_state.config.seed_on_startup {
        let added = seed::seed_destinations(&app_state.db, app_state.images.as_ref()).await?;
        let refreshed =
            seed::refresh_deprecated_images(&app_state.db, app_state.images.as_ref()).await?;
        tracing::info!(added, refreshed, "destination seeding done");
    }

    let (host, port) = (app_state.config.host.clone(), app_state.config.port);
    app::serve(app::build_app(app_state), &host, port).await
}
