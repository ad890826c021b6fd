//! Blog server command.

use anyhow::Result;
use folio_server::{BlogServer, ServerConfig};

use crate::config::Config;

/// Run the blog server.
pub async fn run(config: &Config, port: Option<u16>, open: bool) -> Result<()> {
    let port = port.unwrap_or(config.server.port);
    tracing::info!("Starting blog server on port {}", port);

    let server_config = ServerConfig {
        content_dir: config.content.dir.clone(),
        host: config.server.host.clone(),
        port,
        open,
        site: config.site(),
    };

    BlogServer::new(server_config).start().await?;

    Ok(())
}
