use std::net::SocketAddr;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chat_relay::infra::config::Config;
use chat_relay::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chat_relay=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let state = AppState::new(config.clone())?;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // 非 API 路径全部走静态文件，未命中的回落到 index.html（SPA 路由）
    let static_files = ServeDir::new(&config.static_dir)
        .not_found_service(ServeFile::new(config.static_dir.join("index.html")));

    let app = Router::new()
        .merge(chat_relay::api::api_router(state))
        .fallback_service(static_files)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr = SocketAddr::new(config.host.parse()?, config.port);
    tracing::info!("🚀 Chat Relay 运行在 http://{} (上游: {})", addr, config.upstream_url);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
