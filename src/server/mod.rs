// ============================================================================
// Module : server
// ============================================================================
// Backend HTTP : routes /api, état partagé, configuration et middlewares.
// Les variantes observées du service (avec/sans rapport, avec/sans rate
// limiting) sont des flags de configuration, pas des chemins de code
// séparés.
// ============================================================================

pub mod config;     // Configuration via variables d'environnement
pub mod handlers;   // Une fonction par route /api
pub mod rate_limit; // Limiteur fenêtre fixe par IP
pub mod report;     // Rapport de valorisation imprimable

use std::sync::Arc;

use anyhow::Result;
use axum::http::Method;
use axum::middleware::from_fn_with_state;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::CoinGeckoClient;
use crate::store::{PortfolioStore, PriceCache, QuoteProvider};

pub use config::ServerConfig;
pub use handlers::AppState;
pub use rate_limit::RateLimiter;

/// Construit l'état partagé depuis la configuration
///
/// Le cache de prix démarre vide ; les citations sont chargées une fois
/// (fichier ou liste embarquée).
pub async fn build_state(config: &ServerConfig) -> Result<AppState> {
    let quotes = QuoteProvider::load(&config.data_dir).await?;

    Ok(AppState {
        cache: PriceCache::new(),
        portfolio: PortfolioStore::new(&config.data_dir),
        quotes: Arc::new(quotes),
        upstream: CoinGeckoClient::new(config.upstream_url.clone())?,
    })
}

/// Construit le Router complet (routes + middlewares)
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    let mut api = Router::new()
        .route("/api/prices", get(handlers::get_prices))
        .route("/api/quotes", get(handlers::get_quotes))
        .route(
            "/api/portfolio",
            get(handlers::get_portfolio).post(handlers::save_portfolio),
        );

    // Le rapport est optionnel : route absente quand le flag est coupé
    if config.report_enabled {
        api = api.route("/api/report", get(handlers::get_report));
    }

    let mut router = api.with_state(state);

    // Rate limiting uniforme sur toutes les routes /api
    if config.rate_limit_enabled {
        let limiter = Arc::new(RateLimiter::new(
            config.rate_limit_max,
            config.rate_limit_window,
        ));
        info!(
            max = config.rate_limit_max,
            window_secs = config.rate_limit_window.as_secs(),
            "Rate limiting enabled"
        );
        router = router.layer(from_fn_with_state(limiter, rate_limit::rate_limit));
    }

    // CORS permissif : le dashboard peut tourner sur n'importe quelle origine
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .allow_origin(Any);

    router.layer(TraceLayer::new_for_http()).layer(cors)
}
