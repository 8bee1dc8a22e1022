// ============================================================================
// Structure : Portfolio
// ============================================================================
// Document de portefeuille : quantité détenue par coin.
//
// CONCEPTS RUST :
// 1. Newtype autour d'une HashMap : l'extérieur passe par les méthodes
// 2. Coercition d'entrées invalides : un document client peut contenir
//    n'importe quoi ("abc", null, -3) — on retombe sur zéro, on ne rejette pas
// 3. Serde : le document persisté est exactement {"bitcoin": 1.5, ...}
// ============================================================================

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::Coin;

/// Portefeuille : quantité détenue pour chaque coin du set fixe
///
/// Persisté en bloc à chaque sauvegarde (pas de mise à jour partielle).
/// Une quantité absente vaut zéro.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Portfolio(HashMap<Coin, f64>);

impl Portfolio {
    /// Crée un portefeuille vide
    pub fn new() -> Self {
        Self::default()
    }

    /// Quantité détenue d'un coin (zéro si absent)
    pub fn quantity(&self, coin: Coin) -> f64 {
        self.0.get(&coin).copied().unwrap_or(0.0)
    }

    /// Fixe la quantité d'un coin
    ///
    /// Les valeurs non finies ou négatives sont coercées à zéro,
    /// l'invariant "quantités finies non négatives" tient toujours.
    pub fn set_quantity(&mut self, coin: Coin, quantity: f64) {
        self.0.insert(coin, coerce_quantity(Some(quantity)));
    }

    /// Vrai si toutes les quantités sont nulles ou absentes
    pub fn is_empty(&self) -> bool {
        self.0.values().all(|&q| q == 0.0)
    }

    /// Construit un portefeuille depuis un document JSON non fiable
    ///
    /// C'est le point d'entrée du POST /api/portfolio : chaque valeur qui
    /// n'est pas un nombre fini non négatif devient 0 (l'UI reste résiliente
    /// aux saisies accidentelles), et les clés hors du set fixe sont
    /// ignorées.
    pub fn from_untrusted(raw: &HashMap<String, Value>) -> Self {
        let mut portfolio = Portfolio::new();
        for (key, value) in raw {
            // Clé inconnue : ignorée (les clés restent un sous-ensemble du set)
            let Some(coin) = Coin::from_id(key) else {
                continue;
            };
            portfolio
                .0
                .insert(coin, coerce_quantity(value.as_f64()));
        }
        portfolio
    }

    /// Accès à la map interne
    pub fn as_map(&self) -> &HashMap<Coin, f64> {
        &self.0
    }
}

/// Coerce une valeur brute en quantité valide
///
/// None (non numérique), NaN, infini ou négatif : retombe sur zéro.
fn coerce_quantity(raw: Option<f64>) -> f64 {
    match raw {
        Some(q) if q.is_finite() && q >= 0.0 => q,
        _ => 0.0,
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn untrusted(value: Value) -> HashMap<String, Value> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_quantity_defaults_to_zero() {
        let portfolio = Portfolio::new();
        assert_eq!(portfolio.quantity(Coin::Bitcoin), 0.0);
        assert!(portfolio.is_empty());
    }

    #[test]
    fn test_non_numeric_quantity_coerced_to_zero() {
        // Quantité "abc" : persiste 0, pas une erreur
        let raw = untrusted(json!({"bitcoin": "abc", "ethereum": 2.5}));
        let portfolio = Portfolio::from_untrusted(&raw);

        assert_eq!(portfolio.quantity(Coin::Bitcoin), 0.0);
        assert_eq!(portfolio.quantity(Coin::Ethereum), 2.5);
    }

    #[test]
    fn test_null_and_negative_coerced_to_zero() {
        let raw = untrusted(json!({"bitcoin": null, "tether": -4.0}));
        let portfolio = Portfolio::from_untrusted(&raw);

        assert_eq!(portfolio.quantity(Coin::Bitcoin), 0.0);
        assert_eq!(portfolio.quantity(Coin::Tether), 0.0);
    }

    #[test]
    fn test_unknown_keys_dropped() {
        let raw = untrusted(json!({"dogecoin": 9999.0, "bitcoin": 1.0}));
        let portfolio = Portfolio::from_untrusted(&raw);

        assert_eq!(portfolio.quantity(Coin::Bitcoin), 1.0);
        assert_eq!(portfolio.as_map().len(), 1);
    }

    #[test]
    fn test_serde_roundtrip() {
        let mut portfolio = Portfolio::new();
        portfolio.set_quantity(Coin::Bitcoin, 2.0);
        portfolio.set_quantity(Coin::Tether, 150.0);

        let json = serde_json::to_string(&portfolio).unwrap();
        let back: Portfolio = serde_json::from_str(&json).unwrap();
        assert_eq!(back, portfolio);
    }

    #[test]
    fn test_set_quantity_coerces_invalid() {
        let mut portfolio = Portfolio::new();
        portfolio.set_quantity(Coin::Bitcoin, f64::NAN);
        portfolio.set_quantity(Coin::Ethereum, -1.0);

        assert_eq!(portfolio.quantity(Coin::Bitcoin), 0.0);
        assert_eq!(portfolio.quantity(Coin::Ethereum), 0.0);
    }
}
