// ============================================================================
// API Client : CoinGecko
// ============================================================================
// Récupère les prix spot du set fixe de coins depuis l'endpoint
// /simple/price de CoinGecko. C'est la PriceSource externe : le backend
// la proxifie, le cache en garde le dernier snapshot.
//
// CONCEPTS RUST :
// 1. async/await : appel réseau non bloquant
// 2. Result + Context (anyhow) : chaque étape d'I/O annotée
// 3. Serde : la réponse {"bitcoin":{"usd":n},...} se désérialise
//    directement en PriceSnapshot
// ============================================================================

use anyhow::{Context, Result};
use tracing::{debug, error, info, instrument};

use crate::models::{Coin, PriceSnapshot};

/// Base URL par défaut de l'API CoinGecko
pub const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";

/// Client de la PriceSource upstream
#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    client: reqwest::Client,
    base_url: String,
}

impl CoinGeckoClient {
    /// Crée un client sur la base URL donnée
    ///
    /// La base est configurable (tests, déploiements derrière un miroir) ;
    /// en production c'est DEFAULT_BASE_URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("cryptohouse/0.1")
            .build()
            .context("Échec de la création du client HTTP")?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Récupère le snapshot de prix courant pour le set fixe de coins
    ///
    /// Échec réseau ou statut non-2xx : erreur explicite, l'appelant
    /// (PriceCache) conserve son snapshot précédent.
    #[instrument(skip(self))]
    pub async fn fetch_prices(&self) -> Result<PriceSnapshot> {
        let url = build_simple_price_url(&self.base_url);
        debug!(url = %url, "Fetching prices from CoinGecko");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Échec de la requête HTTP vers CoinGecko")?;

        let status = response.status();
        if !status.is_success() {
            error!(status = %status, "CoinGecko returned error status");
            anyhow::bail!("CoinGecko a retourné une erreur : HTTP {}", status);
        }

        let snapshot: PriceSnapshot = response
            .json()
            .await
            .context("Échec du parsing JSON de la réponse CoinGecko")?;

        info!(coins = snapshot.len(), "Prices fetched from CoinGecko");
        Ok(snapshot)
    }
}

/// Construit l'URL /simple/price pour le set fixe de coins
fn build_simple_price_url(base_url: &str) -> String {
    let ids: Vec<&str> = Coin::ALL.iter().map(|c| c.id()).collect();
    format!(
        "{}/simple/price?ids={}&vs_currencies=usd",
        base_url.trim_end_matches('/'),
        ids.join(",")
    )
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_simple_price_url() {
        let url = build_simple_price_url(DEFAULT_BASE_URL);
        assert!(url.starts_with("https://api.coingecko.com/api/v3/simple/price"));
        assert!(url.contains("ids=bitcoin,ethereum,tether"));
        assert!(url.contains("vs_currencies=usd"));
    }

    #[test]
    fn test_build_url_trims_trailing_slash() {
        let url = build_simple_price_url("http://localhost:9000/");
        assert!(url.starts_with("http://localhost:9000/simple/price"));
    }

    #[test]
    fn test_response_shape_parses_into_snapshot() {
        let json = r#"{"bitcoin":{"usd":64250.0},"ethereum":{"usd":3100.25},"tether":{"usd":1.0}}"#;
        let snapshot: PriceSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.usd(Coin::Bitcoin), Some(64250.0));
        assert_eq!(snapshot.usd(Coin::Ethereum), Some(3100.25));
        assert_eq!(snapshot.usd(Coin::Tether), Some(1.0));
    }
}
