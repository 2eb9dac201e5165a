use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use covidash_core::config::DashConfig;
use covidash_data::{NewsApiClient, UkhsaClient};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod app;
mod dashboard;
mod http;
mod render;

const DEFAULT_LOG_FILTER: &str = "covidash_gateway=info,covidash_data=info,covidash_scheduler=info,tower_http=debug";

#[derive(Parser, Debug)]
#[command(name = "covidash-gateway", version, about = "COVID-19 dashboard server")]
struct Args {
    /// Config file (JSON, or TOML by extension). Falls back to $COVIDASH_CONFIG, then ./config.json.
    #[arg(long)]
    config: Option<String>,
    /// Override gateway.bind.
    #[arg(long)]
    bind: Option<String>,
    /// Override gateway.port.
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // config first: it decides whether logs also go to a file
    let config_path = args.config.or_else(|| std::env::var("COVIDASH_CONFIG").ok());
    let loaded = DashConfig::load(config_path.as_deref());
    let log_file = loaded.as_ref().ok().and_then(|c| c.log_file.clone());
    let _log_guard = init_tracing(log_file.as_deref())?;

    let mut config = loaded.unwrap_or_else(|e| {
        tracing::warn!(code = e.code(), "Config load failed ({}), using defaults", e);
        DashConfig::default()
    });
    if let Some(bind) = args.bind {
        config.gateway.bind = bind;
    }
    if let Some(port) = args.port {
        config.gateway.port = port;
    }

    let timeout = Duration::from_secs(config.request_timeout_secs);
    let cases = Arc::new(UkhsaClient::new(config.case_data.base_url.clone(), timeout)?);
    let news = Arc::new(NewsApiClient::new(
        config.news.base_url.clone(),
        config.api_key.clone(),
        timeout,
    )?);
    info!(
        area = %config.area_name,
        area_type = %config.location_type,
        nation = %config.nation_name,
        case_data = %config.case_data.base_url,
        news = %config.news.base_url,
        "data sources configured"
    );

    let mut dashboard = dashboard::DashboardState::new();
    dashboard.startup(&*cases, &*news, &config).await;

    let addr: SocketAddr = format!("{}:{}", config.gateway.bind, config.gateway.port).parse()?;
    let state = Arc::new(app::AppState::new(config, cases, news, dashboard));
    let router = app::build_router(state);

    info!(
        sha = env!("COVIDASH_GIT_SHA"),
        "Covidash gateway listening on {}", addr
    );
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}

/// Console logging plus an optional plain-text file sink.
///
/// The returned guard flushes the file writer on drop and must live until exit.
fn init_tracing(log_file: Option<&str>) -> anyhow::Result<Option<WorkerGuard>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let path = Path::new(path);
            let dir = path
                .parent()
                .filter(|d| !d.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            std::fs::create_dir_all(dir)?;
            let name = path
                .file_name()
                .ok_or_else(|| anyhow::anyhow!("log_file has no file name: {}", path.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));
            (Some(fmt::layer().with_writer(writer).with_ansi(false)), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .init();
    Ok(guard)
}
