// ============================================================================
// Handlers HTTP du backend
// ============================================================================
// Une fonction par route /api. Aucune erreur n'est fatale au process :
// chaque échec (upstream injoignable, disque indisponible) devient une
// réponse d'erreur JSON et la requête suivante repart de zéro.
//
// CONCEPTS RUST :
// 1. State extractor : l'état (cache, stores) est construit dans main et
//    injecté par axum — pas d'état mutable global
// 2. Result<Json, (StatusCode, Json)> : le chemin d'erreur est une réponse
//    comme une autre
// ============================================================================

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use tracing::{error, info};

use crate::api::CoinGeckoClient;
use crate::models::{Portfolio, PriceSnapshot};
use crate::server::report::render_report;
use crate::store::{PortfolioStore, PriceCache, QuoteProvider};

/// État partagé entre les handlers
///
/// Tout est explicitement possédé ici et passé par State : le cache de
/// prix a un seul écrivain (get_prices), les lecteurs passent par current().
#[derive(Clone)]
pub struct AppState {
    pub cache: PriceCache,
    pub portfolio: PortfolioStore,
    pub quotes: Arc<QuoteProvider>,
    pub upstream: CoinGeckoClient,
}

/// Réponse d'erreur JSON uniforme
type ApiError = (StatusCode, Json<Value>);

fn api_error(status: StatusCode, message: &str) -> ApiError {
    (status, Json(json!({ "error": message })))
}

/// GET /api/prices — proxifie la PriceSource pour le set fixe de coins
///
/// Succès : le cache est remplacé et le snapshot renvoyé tel quel
/// ({"bitcoin":{"usd":n},...}). Échec upstream : 500, le snapshot
/// précédent reste servi par /api/report et la valorisation.
pub async fn get_prices(State(state): State<AppState>) -> Result<Json<PriceSnapshot>, ApiError> {
    let upstream = state.upstream.clone();
    match state.cache.refresh_with(|| async move { upstream.fetch_prices().await }).await {
        Ok(snapshot) => Ok(Json(snapshot)),
        Err(e) => {
            error!(error = %e, "Prices fetch error");
            Err(api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to fetch prices",
            ))
        }
    }
}

/// GET /api/quotes — une citation uniformément aléatoire
pub async fn get_quotes(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "quote": state.quotes.next() }))
}

/// GET /api/portfolio — document persisté, {} au premier lancement
pub async fn get_portfolio(State(state): State<AppState>) -> Result<Json<Portfolio>, ApiError> {
    match state.portfolio.load().await {
        Ok(portfolio) => Ok(Json(portfolio)),
        Err(e) => {
            error!(error = %e, "Portfolio load error");
            Err(api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to load portfolio",
            ))
        }
    }
}

/// POST /api/portfolio — écrase le document entier
///
/// Les quantités non numériques sont coercées à zéro plutôt que rejetées ;
/// seule une erreur disque fait échouer la requête.
pub async fn save_portfolio(
    State(state): State<AppState>,
    Json(body): Json<HashMap<String, Value>>,
) -> Result<Json<Value>, ApiError> {
    let portfolio = Portfolio::from_untrusted(&body);

    match state.portfolio.save(&portfolio).await {
        Ok(()) => {
            info!(coins = portfolio.as_map().len(), "Portfolio saved");
            Ok(Json(json!({ "success": true })))
        }
        Err(e) => {
            error!(error = %e, "Portfolio save error");
            Err(api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to save portfolio",
            ))
        }
    }
}

/// GET /api/report — tableau de valorisation imprimable (texte brut)
///
/// Erreur explicite tant qu'aucun snapshot n'a été mis en cache : le
/// rapport valorise les derniers prix connus, pas un fetch à la demande.
pub async fn get_report(State(state): State<AppState>) -> Result<Response, ApiError> {
    let snapshot = state.cache.current().await;
    if snapshot.is_empty() {
        return Err(api_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "No price snapshot cached yet, call /api/prices first",
        ));
    }

    let portfolio = state.portfolio.load().await.map_err(|e| {
        error!(error = %e, "Portfolio load error for report");
        api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to load portfolio",
        )
    })?;

    let report = render_report(&portfolio, &snapshot, chrono::Utc::now());
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        report,
    )
        .into_response())
}
