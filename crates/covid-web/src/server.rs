//! HTTP server for the report site.

use crate::routes::RouteTable;
use axum::extract::{MatchedPath, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use covid_common::Result;
use covid_config::SiteConfig;
use covid_render::TemplateRenderer;
use std::path::Path;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Shared state of the page handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Renderer of the page configs.
    pub renderer: Arc<TemplateRenderer>,
    /// Routes and the configs they render.
    pub routes: Arc<RouteTable>,
}

impl AppState {
    /// State over the site's templates and page configs.
    pub fn from_config(config: &SiteConfig) -> Result<Self> {
        Ok(Self {
            renderer: Arc::new(TemplateRenderer::from_config(config)),
            routes: Arc::new(RouteTable::from_config(config)?),
        })
    }
}

/// Router with one GET route per page config plus the static directories
/// below `site_dir`.
pub fn create_router(state: AppState, site_dir: &Path) -> Router {
    let mut router: Router<AppState> = Router::new();
    for (route, _) in state.routes.iter() {
        router = router.route(route, get(render_page));
    }

    router
        .nest_service("/assets", ServeDir::new(site_dir.join("assets")))
        .nest_service("/figures", ServeDir::new(site_dir.join("figures")))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

/// Render the page config registered for the matched route.
async fn render_page(State(state): State<AppState>, matched: MatchedPath) -> Response {
    let route = matched.as_str().to_string();
    let Some(config) = state.routes.get(&route).map(Path::to_path_buf) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let renderer = Arc::clone(&state.renderer);
    let rendered =
        tokio::task::spawn_blocking(move || renderer.render_from_config_file(&config)).await;
    match rendered {
        Ok(Ok(html)) => Html(html).into_response(),
        Ok(Err(e)) => {
            error!(%route, error = %e, "Page rendering failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "page rendering failed").into_response()
        }
        Err(e) => {
            error!(%route, error = %e, "Page rendering task failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Serve the site on the configured address until Ctrl-C.
pub async fn serve(config: &SiteConfig) -> Result<()> {
    let state = AppState::from_config(config)?;
    let routes = state.routes.len();
    let app = create_router(state, &config.paths.site_dir);

    let listener = tokio::net::TcpListener::bind(config.server.bind.as_str()).await?;
    info!(bind = %config.server.bind, routes, "Report site listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Report site stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Cannot listen for Ctrl-C");
    }
}
