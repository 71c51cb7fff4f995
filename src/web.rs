use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::{api, config::ServerConfig, tips::TipsService};

/// Tips requests are a handful of fields
pub const MAX_BODY_BYTES: usize = 16 * 1024;

pub fn app(service: TipsService, static_dir: Option<&str>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut app = Router::new().nest("/api", api::router(service));
    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
            .layer(cors),
    )
}

pub async fn run(config: &ServerConfig, service: TipsService) -> anyhow::Result<()> {
    let app = app(service, config.static_dir.as_deref());

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Web server running at http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
