// ============================================================================
// Structure : PriceCache
// ============================================================================
// Détenteur en mémoire du dernier snapshot de prix. Un seul écrivain (le
// handler /api/prices), plusieurs lecteurs (valuation, rapport).
//
// CONCEPTS RUST :
// 1. Arc + RwLock (tokio) : lectures concurrentes, écriture exclusive —
//    un lecteur voit l'ancien snapshot OU le nouveau, jamais un mélange
// 2. Le fetch se fait HORS du verrou : un upstream lent ne bloque pas
//    les lecteurs
// 3. Générique sur la future de fetch : testable sans réseau
// ============================================================================

use std::future::Future;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::models::PriceSnapshot;

/// Cache du snapshot de prix le plus récent
///
/// Créé vide au démarrage du process, remplacé en bloc à chaque fetch
/// réussi. Jamais persisté entre deux redémarrages.
#[derive(Debug, Clone, Default)]
pub struct PriceCache {
    inner: Arc<RwLock<PriceSnapshot>>,
}

impl PriceCache {
    /// Crée un cache vide
    pub fn new() -> Self {
        Self::default()
    }

    /// Retourne le snapshot le plus récent (possiblement vide)
    pub async fn current(&self) -> PriceSnapshot {
        self.inner.read().await.clone()
    }

    /// Rafraîchit le cache via la future de fetch fournie
    ///
    /// Succès : le snapshot est remplacé atomiquement et retourné.
    /// Échec : le snapshot précédent est conservé tel quel et l'erreur
    /// est propagée à l'appelant (pas de mise à jour partielle, pas de
    /// retry — l'appelant décide).
    pub async fn refresh_with<F, Fut>(&self, fetch: F) -> Result<PriceSnapshot>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<PriceSnapshot>>,
    {
        // Fetch hors verrou : les lecteurs continuent sur l'ancien snapshot
        debug!("Refreshing price cache");
        match fetch().await {
            Ok(snapshot) => {
                let mut guard = self.inner.write().await;
                *guard = snapshot.clone();
                info!(coins = snapshot.len(), "Price cache refreshed");
                Ok(snapshot)
            }
            Err(e) => {
                warn!(error = %e, "Price fetch failed, keeping previous snapshot");
                Err(e)
            }
        }
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Coin;
    use anyhow::bail;

    #[tokio::test]
    async fn test_starts_empty() {
        let cache = PriceCache::new();
        assert!(cache.current().await.is_empty());
    }

    #[tokio::test]
    async fn test_refresh_replaces_snapshot_wholesale() {
        let cache = PriceCache::new();

        cache
            .refresh_with(|| async {
                Ok(PriceSnapshot::from_prices([
                    (Coin::Bitcoin, 100.0),
                    (Coin::Ethereum, 10.0),
                ]))
            })
            .await
            .unwrap();

        // Deuxième snapshot sans ethereum : remplacement en bloc, pas de merge
        cache
            .refresh_with(|| async { Ok(PriceSnapshot::from_prices([(Coin::Bitcoin, 120.0)])) })
            .await
            .unwrap();

        let current = cache.current().await;
        assert_eq!(current.usd(Coin::Bitcoin), Some(120.0));
        assert_eq!(current.usd(Coin::Ethereum), None);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_snapshot() {
        let cache = PriceCache::new();
        cache
            .refresh_with(|| async { Ok(PriceSnapshot::from_prices([(Coin::Bitcoin, 100.0)])) })
            .await
            .unwrap();

        // Échec upstream : erreur explicite, snapshot intact
        let result = cache
            .refresh_with(|| async { bail!("upstream unreachable") })
            .await;

        assert!(result.is_err());
        assert_eq!(cache.current().await.usd(Coin::Bitcoin), Some(100.0));
    }
}
