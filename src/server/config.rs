// ============================================================================
// Configuration du backend
// ============================================================================
// Toute la configuration vient de variables d'environnement, avec des
// défauts utilisables : le serveur démarre sans aucune variable définie.
//
// Variables :
// - PORT : port d'écoute (défaut 3000)
// - CRYPTOHOUSE_DATA_DIR : répertoire de portfolio.json / quotes.json
//   (défaut ./data)
// - CRYPTOHOUSE_UPSTREAM_URL : base URL de la PriceSource (défaut CoinGecko)
// - CRYPTOHOUSE_RATE_LIMIT : "0"/"false"/"off" désactive le rate limiting
// - CRYPTOHOUSE_RATE_LIMIT_MAX / CRYPTOHOUSE_RATE_LIMIT_WINDOW_SECS :
//   fenêtre du limiteur (défaut 100 requêtes / 15 minutes)
// - CRYPTOHOUSE_REPORT : "0"/"false"/"off" retire la route /api/report
// ============================================================================

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::api::coingecko::DEFAULT_BASE_URL;

/// Configuration du serveur, chargée une fois au démarrage
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Adresse d'écoute (0.0.0.0:PORT)
    pub bind_addr: SocketAddr,

    /// Répertoire des documents persistés
    pub data_dir: PathBuf,

    /// Base URL de la PriceSource upstream
    pub upstream_url: String,

    /// Rate limiting actif ou non (uniforme sur toutes les routes /api)
    pub rate_limit_enabled: bool,

    /// Requêtes maximum par fenêtre et par IP
    pub rate_limit_max: u32,

    /// Durée de la fenêtre du limiteur
    pub rate_limit_window: Duration,

    /// Route /api/report montée ou non
    pub report_enabled: bool,
}

impl ServerConfig {
    /// Charge la configuration depuis l'environnement
    pub fn from_env() -> Result<Self> {
        let port = env::var("PORT").unwrap_or_else(|_| "3000".into());
        let bind_addr: SocketAddr = format!("0.0.0.0:{}", port)
            .parse()
            .with_context(|| format!("PORT invalide : {}", port))?;

        let data_dir = PathBuf::from(
            env::var("CRYPTOHOUSE_DATA_DIR").unwrap_or_else(|_| "./data".into()),
        );

        let upstream_url =
            env::var("CRYPTOHOUSE_UPSTREAM_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());

        let rate_limit_max = env::var("CRYPTOHOUSE_RATE_LIMIT_MAX")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(100);

        let rate_limit_window = env::var("CRYPTOHOUSE_RATE_LIMIT_WINDOW_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(15 * 60));

        Ok(Self {
            bind_addr,
            data_dir,
            upstream_url,
            rate_limit_enabled: flag_enabled("CRYPTOHOUSE_RATE_LIMIT"),
            rate_limit_max,
            rate_limit_window,
            report_enabled: flag_enabled("CRYPTOHOUSE_REPORT"),
        })
    }
}

/// Lit un flag d'environnement, actif par défaut
///
/// "0", "false" et "off" (insensible à la casse) désactivent.
fn flag_enabled(name: &str) -> bool {
    match env::var(name) {
        Ok(value) => !matches!(
            value.to_ascii_lowercase().as_str(),
            "0" | "false" | "off" | "no"
        ),
        Err(_) => true,
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_enabled_defaults_to_true() {
        assert!(flag_enabled("CRYPTOHOUSE_TEST_FLAG_THAT_DOES_NOT_EXIST"));
    }

    #[test]
    fn test_flag_disabled_values() {
        // Chaque variable porte un nom unique : les tests cargo tournent en
        // parallèle dans le même process
        for (i, value) in ["0", "false", "OFF", "no"].iter().enumerate() {
            let name = format!("CRYPTOHOUSE_TEST_FLAG_OFF_{}", i);
            env::set_var(&name, value);
            assert!(!flag_enabled(&name), "devrait être désactivé : {}", value);
            env::remove_var(&name);
        }
    }

    #[test]
    fn test_flag_enabled_values() {
        let name = "CRYPTOHOUSE_TEST_FLAG_ON";
        env::set_var(name, "1");
        assert!(flag_enabled(name));
        env::remove_var(name);
    }
}
