//! HTTP server serving the grid page.
//!
//! The router exposes a single `GET /grid` endpoint; everything else is a 404.
//! Configuration is injected through [`ServerConfig`] so tests can point the
//! server at any template and layout.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use gridserve_core::{Error, LayoutDefaults, Result};

use crate::handlers;
use crate::template::{GridTemplate, TemplateSource};

/// Default listen port.
pub const DEFAULT_PORT: u16 = 8080;

/// Default listen address, all interfaces on [`DEFAULT_PORT`].
pub const DEFAULT_ADDR: SocketAddr =
    SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), DEFAULT_PORT);

/// Default template location, relative to the working directory.
pub const DEFAULT_TEMPLATE_PATH: &str = "templates/grid.html";

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address.
    pub addr: SocketAddr,
    /// Template file rendered for every page.
    pub template_path: PathBuf,
    /// Grid defaults and limits.
    pub layout: LayoutDefaults,
    /// Parse the template once at startup instead of on every request.
    pub preload_template: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR,
            template_path: PathBuf::from(DEFAULT_TEMPLATE_PATH),
            layout: LayoutDefaults::default(),
            preload_template: false,
        }
    }
}

impl ServerConfig {
    /// Creates a new server config builder.
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }
}

/// Builder for ServerConfig.
#[derive(Debug, Default)]
pub struct ServerConfigBuilder {
    addr: Option<SocketAddr>,
    template_path: Option<PathBuf>,
    layout: Option<LayoutDefaults>,
    preload_template: Option<bool>,
}

impl ServerConfigBuilder {
    /// Sets the listen address.
    pub fn addr(mut self, addr: SocketAddr) -> Self {
        self.addr = Some(addr);
        self
    }

    /// Sets the template path.
    pub fn template_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.template_path = Some(path.into());
        self
    }

    /// Sets the grid defaults.
    pub fn layout(mut self, layout: LayoutDefaults) -> Self {
        self.layout = Some(layout);
        self
    }

    /// Sets whether the template is parsed once at startup.
    pub fn preload_template(mut self, enabled: bool) -> Self {
        self.preload_template = Some(enabled);
        self
    }

    /// Builds the server config.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the layout defaults are invalid.
    pub fn build(self) -> Result<ServerConfig> {
        let defaults = ServerConfig::default();
        let config = ServerConfig {
            addr: self.addr.unwrap_or(defaults.addr),
            template_path: self.template_path.unwrap_or(defaults.template_path),
            layout: self.layout.unwrap_or(defaults.layout),
            preload_template: self.preload_template.unwrap_or(defaults.preload_template),
        };
        config.layout.validate()?;
        Ok(config)
    }
}

/// Shared application state.
#[derive(Debug)]
pub struct AppState {
    /// Server configuration.
    pub config: ServerConfig,
    /// Template used by the grid handler.
    pub template: TemplateSource,
}

impl AppState {
    /// Creates state that reads the configured template on every request.
    pub fn new(config: ServerConfig) -> Self {
        let template = TemplateSource::File(config.template_path.clone());
        Self { config, template }
    }

    /// Creates state around an already parsed template.
    pub fn with_template(config: ServerConfig, template: GridTemplate) -> Self {
        Self {
            config,
            template: TemplateSource::Preloaded(Arc::new(template)),
        }
    }
}

/// The HTTP server.
pub struct Server {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl Server {
    /// Creates a new server with the given configuration.
    pub fn new(config: ServerConfig) -> Self {
        let state = Arc::new(AppState::new(config.clone()));
        Self { config, state }
    }

    /// Creates a new server around an already parsed template.
    pub fn with_template(config: ServerConfig, template: GridTemplate) -> Self {
        let state = Arc::new(AppState::with_template(config.clone(), template));
        Self { config, state }
    }

    /// Creates the router.
    pub fn router(&self) -> Router {
        build_router(Arc::clone(&self.state))
    }

    /// Runs the server until Ctrl+C or SIGTERM.
    ///
    /// # Errors
    ///
    /// Returns an error if the template cannot be preloaded or the listener
    /// cannot bind.
    pub async fn run(self) -> Result<()> {
        let state = match &self.state.template {
            TemplateSource::File(path) if self.config.preload_template => {
                let template = GridTemplate::load(path).await?;
                tracing::info!(path = %path.display(), "Template preloaded");
                Arc::new(AppState::with_template(self.config.clone(), template))
            },
            _ => Arc::clone(&self.state),
        };

        let addr = self.config.addr;
        tracing::info!(
            addr = %addr,
            template = %state.template.path().display(),
            preloaded = matches!(state.template, TemplateSource::Preloaded(_)),
            "Server starting... Access http://localhost:{}/grid?size=3",
            addr.port()
        );

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(Error::Io)?;
        let router = build_router(state);

        eprintln!("\n\x1b[32m✓\x1b[0m Server listening on http://{}", addr);
        eprintln!("  Press Ctrl+C to stop\n");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(Error::Io)?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/grid", get(handlers::grid))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down");
        },
        () = terminate => {
            tracing::info!("Received SIGTERM, shutting down");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    const CELLS: &str = "<h1>{{ title }}</h1>\n\
        {% for row in rows %}<tr>{% for cell in row %}<td class=\"{{ cell.classes }}\">{{ cell.label }}</td>{% endfor %}</tr>\n{% endfor %}";

    struct Response {
        status: StatusCode,
        content_type: String,
        body: String,
    }

    async fn get(router: Router, uri: &str) -> Response {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_string())
            .unwrap_or_default();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        Response {
            status,
            content_type,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }

    fn server_with_template(dir: &tempfile::TempDir, source: &str) -> Server {
        let path = dir.path().join("grid.html");
        std::fs::write(&path, source).unwrap();
        Server::new(ServerConfig::builder().template_path(path).build().unwrap())
    }

    fn rows(body: &str) -> Vec<&str> {
        body.lines().filter(|l| l.starts_with("<tr>")).collect()
    }

    #[test]
    fn test_server_config_builder() {
        let config = ServerConfig::builder()
            .addr("127.0.0.1:3000".parse().unwrap())
            .template_path("page.html")
            .layout(LayoutDefaults::default().with_multiplier(4))
            .preload_template(true)
            .build()
            .unwrap();

        assert_eq!(config.addr, "127.0.0.1:3000".parse().unwrap());
        assert_eq!(config.template_path, PathBuf::from("page.html"));
        assert_eq!(config.layout.multiplier, 4);
        assert!(config.preload_template);
    }

    #[test]
    fn test_server_config_defaults() {
        let config = ServerConfig::builder().build().unwrap();

        assert_eq!(config.addr, DEFAULT_ADDR);
        assert_eq!(config.addr.to_string(), "0.0.0.0:8080");
        assert_eq!(config.template_path, PathBuf::from(DEFAULT_TEMPLATE_PATH));
        assert_eq!(config.layout, LayoutDefaults::default());
        assert!(!config.preload_template);
    }

    #[test]
    fn test_server_config_rejects_invalid_layout() {
        let result = ServerConfig::builder()
            .layout(LayoutDefaults::default().with_max_dimension(0))
            .build();
        assert!(matches!(result, Err(Error::InvalidConfig { .. })));
    }

    #[tokio::test]
    async fn test_default_grid_is_nine_by_nine() {
        let dir = tempfile::tempdir().unwrap();
        let server = server_with_template(&dir, CELLS);

        let response = get(server.router(), "/grid").await;
        assert_eq!(response.status, StatusCode::OK);
        assert!(response.content_type.starts_with("text/html"));
        assert!(response.body.contains("<h1>9x9 Grid</h1>"));

        let rows = rows(&response.body);
        assert_eq!(rows.len(), 9);
        assert!(rows.iter().all(|r| r.matches("<td").count() == 9));
        assert!(response
            .body
            .contains(r#"<td class="thick-bottom thick-right">3,3</td>"#));
        assert!(response.body.contains(r#"<td class="">9,9</td>"#));
        assert!(response.body.contains(r#"<td class="">1,1</td>"#));
    }

    #[tokio::test]
    async fn test_size_two_renders_six_by_six() {
        let dir = tempfile::tempdir().unwrap();
        let server = server_with_template(&dir, CELLS);

        let response = get(server.router(), "/grid?size=2").await;
        assert_eq!(response.status, StatusCode::OK);
        assert!(response.body.contains("<h1>6x6 Grid</h1>"));

        let rows = rows(&response.body);
        assert_eq!(rows.len(), 6);
        assert!(rows[5].contains(r#"<td class="">6,6</td>"#));
        assert!(!rows[5].contains("thick-bottom"));
        assert!(rows[2].contains(r#"<td class="thick-bottom thick-right">3,3</td>"#));
        assert!(rows[2].contains(r#"<td class="thick-bottom">3,6</td>"#));
        assert!(rows[5].contains(r#"<td class="thick-right">6,3</td>"#));
    }

    #[tokio::test]
    async fn test_invalid_size_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let server = server_with_template(&dir, CELLS);

        for uri in ["/grid?size=abc", "/grid?size=0", "/grid?size=-2", "/grid?size="] {
            let response = get(server.router(), uri).await;
            assert_eq!(response.status, StatusCode::OK, "{uri}");
            assert!(response.body.contains("<h1>9x9 Grid</h1>"), "{uri}");
        }
    }

    #[tokio::test]
    async fn test_independent_rows_and_cols() {
        let dir = tempfile::tempdir().unwrap();
        let server = server_with_template(&dir, CELLS);

        let response = get(server.router(), "/grid?n=2&m=4").await;
        assert_eq!(response.status, StatusCode::OK);
        assert!(response.body.contains("<h1>2x4 Grid</h1>"));

        let rows = rows(&response.body);
        assert_eq!(rows.len(), 2);
        assert!(rows[0].contains(">1,1<"));
        assert!(rows[1].contains(">2,4<"));
        assert!(rows.iter().all(|r| r.matches("<td").count() == 4));
        assert!(!response.body.contains("thick-"));

        let response = get(server.router(), "/grid?n=oops&m=0").await;
        assert!(response.body.contains("<h1>10x10 Grid</h1>"));
    }

    #[tokio::test]
    async fn test_missing_template_is_server_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServerConfig::builder()
            .template_path(dir.path().join("missing.html"))
            .build()
            .unwrap();

        let response = get(Server::new(config).router(), "/grid?size=3").await;
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.content_type.starts_with("text/plain"));
        assert!(!response.body.is_empty());
        assert!(response.body.contains("missing.html"));
    }

    #[tokio::test]
    async fn test_broken_template_is_server_error() {
        let dir = tempfile::tempdir().unwrap();
        let server = server_with_template(&dir, "{% for row in rows %}<tr>");

        let response = get(server.router(), "/grid").await;
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.body.starts_with("failed to parse template"));
    }

    #[tokio::test]
    async fn test_render_failure_writes_no_partial_page() {
        let dir = tempfile::tempdir().unwrap();
        let server = server_with_template(&dir, "<h1>{{ title }}</h1>{{ nope.label }}");

        let response = get(server.router(), "/grid").await;
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.body.starts_with("failed to render template"));
        assert!(!response.body.contains("<h1>"));
    }

    #[tokio::test]
    async fn test_preloaded_template() {
        let template = GridTemplate::from_source("memory.html", CELLS).unwrap();
        let config = ServerConfig::builder()
            .template_path("does-not-exist.html")
            .build()
            .unwrap();

        let response = get(Server::with_template(config, template).router(), "/grid?size=1").await;
        assert_eq!(response.status, StatusCode::OK);
        assert!(response.body.contains("<h1>3x3 Grid</h1>"));
    }

    #[tokio::test]
    async fn test_shipped_template() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../templates/grid.html");
        let config = ServerConfig::builder().template_path(path).build().unwrap();

        let response = get(Server::new(config).router(), "/grid?size=3").await;
        assert_eq!(response.status, StatusCode::OK);
        assert!(response.body.contains("9x9 Grid"));
        assert!(response.body.contains("thick-bottom thick-right"));
        assert!(response.body.contains(">9,9<"));
    }

    #[tokio::test]
    async fn test_run_fails_when_preloaded_template_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServerConfig::builder()
            .addr("127.0.0.1:0".parse().unwrap())
            .template_path(dir.path().join("missing.html"))
            .preload_template(true)
            .build()
            .unwrap();

        let result = Server::new(config).run().await;
        match result {
            Err(Error::TemplateLoad { path, .. }) => {
                assert_eq!(path, dir.path().join("missing.html"));
            },
            other => panic!("expected TemplateLoad, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_run_fails_when_address_is_taken() {
        let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let config = ServerConfig::builder()
            .addr(taken.local_addr().unwrap())
            .build()
            .unwrap();

        let result = Server::new(config).run().await;
        assert!(matches!(result, Err(Error::Io(_))), "{result:?}");
    }

    #[tokio::test]
    async fn test_unknown_path_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let server = server_with_template(&dir, CELLS);

        let response = get(server.router(), "/").await;
        assert_eq!(response.status, StatusCode::NOT_FOUND);
    }
}
