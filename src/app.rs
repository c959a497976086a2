use std::net::SocketAddr;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::state::AppState;
use crate::{auth, content, documents, families, gallery, notify, tax};

pub fn build_app(state: AppState) -> Router {
    let admin = Router::new()
        .merge(auth::admin_router())
        .merge(families::admin_router())
        .merge(tax::admin_router())
        .merge(notify::admin_router())
        .merge(content::admin_router())
        .merge(gallery::admin_router());

    let family = Router::new()
        .merge(families::family_router())
        .merge(documents::family_router())
        .merge(tax::family_router());

    let public = Router::new()
        .merge(content::public_router())
        .merge(gallery::public_router());

    let uploads = ServeDir::new(&state.config.upload_dir);

    Router::new()
        .nest("/api/admin", admin)
        .nest("/api/family", family)
        .nest("/api/public", public)
        .route("/api/health", get(|| async { "ok" }))
        .nest_service("/uploads", uploads)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     _latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, "response");
                        } else {
                            tracing::info!(%status, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router) -> anyhow::Result<()> {
    let addr: SocketAddr = format!(
        "{}:{}",
        std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
        std::env::var("APP_PORT").unwrap_or_else(|_| "5000".into())
    )
    .parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
