// ============================================================================
// CryptoHouse - Backend HTTP
// ============================================================================
// Binaire serveur : proxifie CoinGecko, sert les citations et persiste le
// portefeuille. Un seul process, event-driven ; aucune erreur de requête
// n'est fatale.
// ============================================================================

use std::net::SocketAddr;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use cryptohouse::server::{build_router, build_state, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Logs vers stdout, filtrés par RUST_LOG (défaut : info)
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info"));
    fmt().with_env_filter(env_filter).with_target(false).init();

    let config = ServerConfig::from_env()?;
    info!(
        addr = %config.bind_addr,
        data_dir = %config.data_dir.display(),
        report = config.report_enabled,
        rate_limit = config.rate_limit_enabled,
        "Starting CryptoHouse backend"
    );

    let state = build_state(&config).await?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Échec du bind sur {}", config.bind_addr))?;

    info!("Backend running on http://{}", config.bind_addr);

    // ConnectInfo expose l'IP cliente au rate limiter
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("Le serveur HTTP s'est arrêté avec une erreur")?;

    Ok(())
}
