use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use workers_ai_proxy::{build_router, AppState, GatewayConfig, SharedLogger};

#[derive(Parser)]
#[command(
    name = "workers-ai-proxy",
    about = "OpenAI-compatible chat completions gateway for Workers AI",
    version
)]
struct Cli {
    /// Path to config file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Cloudflare account ID
    #[arg(long = "id")]
    account_id: Option<String>,

    /// Workers AI model served by this gateway
    #[arg(long)]
    model: Option<String>,

    /// Workers AI API token
    #[arg(long = "token")]
    auth_token: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Key clients must send as a bearer token
    #[arg(long = "key")]
    client_key: Option<String>,

    /// Override the Cloudflare API base URL
    #[arg(long)]
    api_base: Option<String>,

    /// Audit log file path
    #[arg(long, default_value = "workers-ai-proxy.log")]
    log_file: PathBuf,

    /// Print config search paths and exit
    #[arg(long)]
    show_config_paths: bool,
}

impl Cli {
    fn apply(self, config: &mut GatewayConfig) {
        if let Some(account_id) = self.account_id {
            config.account_id = account_id;
        }
        if let Some(model) = self.model {
            config.model = model;
        }
        if let Some(token) = self.auth_token {
            config.auth_token = token;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(key) = self.client_key {
            config.client_key = Some(key);
        }
        if let Some(api_base) = self.api_base {
            config.api_base = api_base;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "workers_ai_proxy=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if cli.show_config_paths {
        println!("Config search paths:");
        for (i, path) in workers_ai_proxy::config::config_search_paths().iter().enumerate() {
            println!("  {}. {}", i + 1, path.display());
        }
        return Ok(());
    }

    let mut config = GatewayConfig::find_and_load(cli.config.as_deref())?;
    let log_file = cli.log_file.clone();
    cli.apply(&mut config);
    config.apply_env();
    config.validate()?;

    let logger = SharedLogger::new(&log_file)?;

    info!("workers-ai-proxy v{}", env!("CARGO_PKG_VERSION"));
    info!("  Model:     {}", config.model);
    info!("  Backend:   {}", config.responses_url());
    info!("  Port:      {}", config.port);
    info!(
        "  Auth:      {}",
        if config.client_key().is_some() { "client key required" } else { "open" }
    );
    info!("  Log file:  {}", log_file.display());

    logger.info(
        "startup",
        format!(
            "Starting workers-ai-proxy model={} port={}",
            config.model, config.port
        ),
    );

    let port = config.port;
    let state = Arc::new(AppState::new(config, logger)?);

    let app = build_router(state);
    let bind_addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    info!("Listening on http://{}", bind_addr);
    info!("  OPENAI_BASE_URL=http://localhost:{}/v1", port);

    axum::serve(listener, app).await?;

    Ok(())
}
