#![recursion_limit = "256"]

mod config;
mod routes;
mod state;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = match config::ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };
    if !config.auth_enabled() {
        tracing::warn!("CHANNEL_APP_SECRET not set; private channel subscriptions will be refused");
    }

    let port = config.port;
    let channel = config.channel_name.clone();
    let state = state::AppState::new(config);

    let app = routes::leptos_app(state).expect("leptos app init failed");
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, %channel, "strangers listening");
    axum::serve(listener, app).await.expect("server failed");
}
