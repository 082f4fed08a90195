//! CLI command implementations.

use std::path::PathBuf;

use clap::Args;
use color_eyre::eyre::Result;

use gridserve_server::Server;

use crate::config::Config;

/// Flags for `gridserve serve`; each overrides the loaded configuration.
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Host to bind to
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Page template file
    #[arg(short, long)]
    pub template: Option<PathBuf>,

    /// Parse the template once at startup instead of on every request
    #[arg(long)]
    pub preload_template: bool,
}

impl ServeArgs {
    /// Applies the command-line overrides on top of `config`.
    pub fn apply(self, mut config: Config) -> Config {
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(template) = self.template {
            config.template_path = template;
        }
        config.preload_template |= self.preload_template;
        config
    }
}

/// Start the grid server.
pub async fn serve(args: ServeArgs, config: Config) -> Result<()> {
    let config = args.apply(config);
    let server_config = config.server_config()?;

    tracing::info!(
        template = %server_config.template_path.display(),
        multiplier = server_config.layout.multiplier,
        preload = server_config.preload_template,
        "Starting gridserve..."
    );

    Server::new(server_config).run().await?;
    Ok(())
}

/// Display version information.
pub fn version() {
    println!("gridserve {}", env!("CARGO_PKG_VERSION"));
}
