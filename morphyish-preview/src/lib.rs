use anyhow::Result;
use axum::Router;
use std::{net::SocketAddr, path::PathBuf};
use tower_http::services::{ServeDir, ServeFile};

/// Configuration for the preview server
#[derive(Debug, Clone)]
pub struct PreviewConfig {
    /// Host to bind to
    pub host: String,
    /// Port to serve on
    pub port: u16,
    /// Built site to serve
    pub root: PathBuf,
    /// Auto-open browser
    pub open: bool,
    /// Page opened in the browser, relative to the root URL
    pub start_page: String,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            root: PathBuf::from("./build"),
            open: false,
            start_page: String::new(),
        }
    }
}

impl PreviewConfig {
    pub fn addr(&self) -> Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }

    pub fn start_url(&self) -> Result<String> {
        Ok(format!(
            "http://{}/{}",
            self.addr()?,
            self.start_page.trim_start_matches('/')
        ))
    }
}

/// Serves a built site as static files
pub struct PreviewServer {
    config: PreviewConfig,
}

impl PreviewServer {
    pub fn new(config: PreviewConfig) -> Self {
        Self { config }
    }

    pub fn router(&self) -> Router {
        let not_found = self.config.root.join("404.html");
        let serve_dir = ServeDir::new(&self.config.root)
            .append_index_html_on_directories(true)
            .not_found_service(ServeFile::new(not_found));

        Router::new().fallback_service(serve_dir)
    }

    pub async fn run(self) -> Result<()> {
        if !self.config.root.exists() {
            return Err(anyhow::anyhow!(
                "Root directory does not exist: {}",
                self.config.root.display()
            ));
        }

        let addr = self.config.addr()?;
        let app = self.router();

        tracing::info!("Serving {} at http://{}", self.config.root.display(), addr);

        if self.config.open {
            let url = self.config.start_url()?;
            if let Err(e) = open::that(&url) {
                tracing::warn!("Failed to open browser: {}", e);
            }
        }

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_url_points_at_page() {
        let config = PreviewConfig {
            port: 4000,
            start_page: "/svg/".into(),
            ..PreviewConfig::default()
        };
        assert_eq!(config.start_url().unwrap(), "http://127.0.0.1:4000/svg/");
    }

    #[test]
    fn rejects_invalid_host() {
        let config = PreviewConfig {
            host: "not a host".into(),
            ..PreviewConfig::default()
        };
        assert!(config.addr().is_err());
    }

    #[tokio::test]
    async fn missing_root_is_an_error() {
        let server = PreviewServer::new(PreviewConfig {
            root: PathBuf::from("./definitely-not-built"),
            ..PreviewConfig::default()
        });
        assert!(server.run().await.is_err());
    }
}
