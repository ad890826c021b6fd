//! Blog server implementation.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    response::IntoResponse,
    routing::get,
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use folio_content::PostRepository;
use folio_mdx::HtmlRenderer;
use folio_static::{AssetPipeline, Site, TemplateEngine};

use crate::{api, pages};

/// Configuration for the blog server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Directory holding the `.mdx` posts
    pub content_dir: PathBuf,

    /// Port to listen on
    pub port: u16,

    /// Host to bind to
    pub host: String,

    /// Open browser on start
    pub open: bool,

    /// Title, description and base URL used by the HTML pages
    pub site: Site,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from(folio_content::DEFAULT_CONTENT_DIR),
            port: 3000,
            host: "127.0.0.1".to_string(),
            open: true,
            site: Site::default(),
        }
    }
}

/// Errors that can occur with the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind to {0}: {1}")]
    BindError(String, String),

    #[error("Failed to load templates: {0}")]
    TemplateError(#[from] minijinja::Error),
}

/// Shared, read-only request state.
///
/// Posts are not cached: every request reads the content directory again.
pub(crate) struct AppState {
    pub(crate) repository: PostRepository,
    pub(crate) renderer: HtmlRenderer,
    pub(crate) templates: TemplateEngine,
    pub(crate) site: Site,
}

/// Blog server.
pub struct BlogServer {
    config: ServerConfig,
}

impl BlogServer {
    /// Create a new blog server.
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Build the router serving pages, the JSON API and assets.
    pub fn router(&self) -> Result<Router, ServerError> {
        let state = Arc::new(AppState {
            repository: PostRepository::new(&self.config.content_dir),
            renderer: HtmlRenderer::new(),
            templates: TemplateEngine::new()?,
            site: self.config.site.clone(),
        });

        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

        let api = Router::new()
            .route("/api/blog", get(api::list_posts))
            .route("/api/blog/{slug}", get(api::get_post))
            .layer(cors);

        let app = Router::new()
            .route("/", get(pages::index))
            .route("/blog/{slug}", get(pages::post))
            .route("/category/{category}", get(pages::category))
            .route("/assets/main.css", get(stylesheet))
            .route("/assets/main.js", get(script))
            .merge(api)
            .fallback(pages::not_found)
            .layer(middleware::from_fn(api::log_requests))
            .with_state(state);

        Ok(app)
    }

    /// Start the server and serve until the process exits.
    pub async fn start(self) -> Result<(), ServerError> {
        let app = self.router()?;
        let addr = format!("{}:{}", self.config.host, self.config.port);

        let listener = tokio::net::TcpListener::bind((self.config.host.as_str(), self.config.port))
            .await
            .map_err(|e| ServerError::BindError(addr.clone(), e.to_string()))?;

        tracing::info!("Serving {} at http://{}", self.config.content_dir.display(), addr);

        if self.config.open {
            let url = format!("http://{}", addr);
            if let Err(e) = open::that(&url) {
                tracing::warn!("Failed to open browser: {}", e);
            }
        }

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        Ok(())
    }
}

async fn stylesheet() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, HeaderValue::from_static("text/css"))],
        AssetPipeline::stylesheet(false),
    )
}

async fn script() -> impl IntoResponse {
    (
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/javascript"),
        )],
        AssetPipeline::generate_js(),
    )
}
