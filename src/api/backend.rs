// ============================================================================
// API Client : Backend CryptoHouse
// ============================================================================
// Client utilisé par le dashboard TUI pour parler à notre propre backend
// (/api/prices, /api/quotes, /api/portfolio). Mêmes formes JSON que le
// serveur, mêmes conventions d'erreur que le client CoinGecko.
// ============================================================================

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::models::{Portfolio, PriceSnapshot};

/// Réponse de GET /api/quotes
#[derive(Debug, Deserialize)]
struct QuoteResponse {
    quote: String,
}

/// Réponse de POST /api/portfolio
#[derive(Debug, Deserialize)]
struct SaveResponse {
    success: bool,
}

/// Client du backend CryptoHouse
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    /// Crée un client sur la base URL du backend (ex: "http://127.0.0.1:3000")
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("cryptohouse-dashboard/0.1")
            .build()
            .context("Échec de la création du client HTTP")?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// GET /api/prices : snapshot courant des prix
    #[instrument(skip(self))]
    pub async fn fetch_prices(&self) -> Result<PriceSnapshot> {
        let url = self.url("/api/prices");
        debug!(url = %url, "Fetching prices from backend");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Échec de la requête /api/prices")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Le backend a retourné une erreur : HTTP {}", status);
        }

        response
            .json()
            .await
            .context("Échec du parsing JSON de /api/prices")
    }

    /// GET /api/quotes : une citation aléatoire
    #[instrument(skip(self))]
    pub async fn fetch_quote(&self) -> Result<String> {
        let url = self.url("/api/quotes");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Échec de la requête /api/quotes")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Le backend a retourné une erreur : HTTP {}", status);
        }

        let body: QuoteResponse = response
            .json()
            .await
            .context("Échec du parsing JSON de /api/quotes")?;
        Ok(body.quote)
    }

    /// GET /api/portfolio : document persisté ({} au premier lancement)
    #[instrument(skip(self))]
    pub async fn fetch_portfolio(&self) -> Result<Portfolio> {
        let url = self.url("/api/portfolio");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Échec de la requête /api/portfolio")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Le backend a retourné une erreur : HTTP {}", status);
        }

        response
            .json()
            .await
            .context("Échec du parsing JSON de /api/portfolio")
    }

    /// POST /api/portfolio : écrase le document persisté
    #[instrument(skip(self, portfolio))]
    pub async fn save_portfolio(&self, portfolio: &Portfolio) -> Result<()> {
        let url = self.url("/api/portfolio");
        let response = self
            .client
            .post(&url)
            .json(portfolio)
            .send()
            .await
            .context("Échec de la requête POST /api/portfolio")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Le backend a retourné une erreur : HTTP {}", status);
        }

        let body: SaveResponse = response
            .json()
            .await
            .context("Échec du parsing JSON de POST /api/portfolio")?;
        if !body.success {
            anyhow::bail!("Le backend a refusé la sauvegarde du portefeuille");
        }
        Ok(())
    }

    /// Remet le portefeuille persisté à vide (POST d'un document vide)
    pub async fn reset_portfolio(&self) -> Result<()> {
        self.save_portfolio(&Portfolio::new()).await
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = BackendClient::new("http://localhost:3000/").unwrap();
        assert_eq!(
            client.url("/api/prices"),
            "http://localhost:3000/api/prices"
        );
    }

    #[test]
    fn test_quote_response_shape() {
        let body: QuoteResponse = serde_json::from_str(r#"{"quote":"Zoom out."}"#).unwrap();
        assert_eq!(body.quote, "Zoom out.");
    }
}
