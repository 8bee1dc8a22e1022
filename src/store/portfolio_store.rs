// ============================================================================
// Structure : PortfolioStore
// ============================================================================
// Persistance fichier du portefeuille : le document JSON entier est lu et
// réécrit en bloc (pas de mise à jour partielle). L'interface load/save/reset
// permet de remplacer le fichier par un vrai store plus tard sans toucher
// aux appelants.
//
// CONCEPTS RUST :
// 1. tokio::fs : I/O fichier asynchrone (pas de blocage des handlers)
// 2. Premier lancement : fichier absent = portefeuille vide, pas une erreur
// 3. Les erreurs disque remontent telles quelles à l'appelant (pas de retry)
// ============================================================================

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{debug, info};

use crate::models::Portfolio;

/// Nom du document persisté dans le répertoire de données
pub const PORTFOLIO_FILE: &str = "portfolio.json";

/// Store fichier du portefeuille
///
/// État mutable partagé sans verrou : deux écrivains concurrents (deux
/// onglets, deux dashboards) font du last-write-wins, limitation assumée.
#[derive(Debug, Clone)]
pub struct PortfolioStore {
    path: PathBuf,
}

impl PortfolioStore {
    /// Crée un store pointant sur `<data_dir>/portfolio.json`
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(PORTFOLIO_FILE),
        }
    }

    /// Chemin du document persisté
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Charge le portefeuille persisté
    ///
    /// Fichier absent : retourne un portefeuille vide (premier lancement).
    /// Contenu invalide : chaque valeur non numérique retombe sur zéro via
    /// la coercition du modèle. Erreur disque : propagée.
    pub async fn load(&self) -> Result<Portfolio> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No portfolio file yet, returning empty");
                return Ok(Portfolio::new());
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Échec de la lecture de {}", self.path.display())
                });
            }
        };

        let document: HashMap<String, Value> = serde_json::from_str(&raw)
            .with_context(|| format!("JSON invalide dans {}", self.path.display()))?;

        Ok(Portfolio::from_untrusted(&document))
    }

    /// Écrase le document persisté avec le portefeuille donné
    pub async fn save(&self, portfolio: &Portfolio) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Échec de la création de {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(portfolio)
            .context("Échec de la sérialisation du portefeuille")?;

        tokio::fs::write(&self.path, json)
            .await
            .with_context(|| format!("Échec de l'écriture de {}", self.path.display()))?;

        info!(path = %self.path.display(), "Portfolio saved");
        Ok(())
    }

    /// Remet le document persisté à vide (équivalent à save({}))
    pub async fn reset(&self) -> Result<()> {
        self.save(&Portfolio::new()).await
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Coin;

    /// Store sur un répertoire temporaire unique par test
    fn temp_store(name: &str) -> PortfolioStore {
        let dir = std::env::temp_dir().join(format!(
            "cryptohouse-test-{}-{}",
            name,
            std::process::id()
        ));
        PortfolioStore::new(&dir)
    }

    #[tokio::test]
    async fn test_load_without_file_is_empty() {
        let store = temp_store("first-run");
        let _ = tokio::fs::remove_file(store.path()).await;

        // Premier lancement : pas une erreur
        let portfolio = store.load().await.unwrap();
        assert!(portfolio.is_empty());
    }

    #[tokio::test]
    async fn test_save_then_load_roundtrip() {
        let store = temp_store("roundtrip");

        let mut portfolio = Portfolio::new();
        portfolio.set_quantity(Coin::Bitcoin, 2.0);
        portfolio.set_quantity(Coin::Ethereum, 0.75);

        store.save(&portfolio).await.unwrap();
        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, portfolio);
    }

    #[tokio::test]
    async fn test_reset_then_load_is_empty() {
        let store = temp_store("reset");

        let mut portfolio = Portfolio::new();
        portfolio.set_quantity(Coin::Tether, 500.0);
        store.save(&portfolio).await.unwrap();

        store.reset().await.unwrap();
        let loaded = store.load().await.unwrap();
        assert!(loaded.is_empty());
        assert_eq!(loaded.quantity(Coin::Tether), 0.0);
    }

    #[tokio::test]
    async fn test_load_coerces_bad_values() {
        let store = temp_store("coerce");
        tokio::fs::create_dir_all(store.path().parent().unwrap())
            .await
            .unwrap();
        tokio::fs::write(store.path(), r#"{"bitcoin": "abc", "ethereum": 1.5}"#)
            .await
            .unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.quantity(Coin::Bitcoin), 0.0);
        assert_eq!(loaded.quantity(Coin::Ethereum), 1.5);
    }
}
