use dotenvy::dotenv;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use matchday_server::config::Config;
use matchday_server::routes::create_routes;
use matchday_server::state::AppState;

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("matchday_server=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env();

    let state = AppState::from_config(&config).expect("Failed to build ServiceNow HTTP client");
    if config.servicenow.credentials().is_err() {
        tracing::warn!("ServiceNow credentials incomplete; /api/routes will report a configuration error");
    }

    let app = create_routes(state, &config);

    let addr = config.bind_addr;
    tracing::info!("🚀 Server running at http://{}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app).await.expect("Server failed");
}
