// ============================================================================
// ValuationEngine : valorisation du portefeuille
// ============================================================================
// Fonction pure combinant le snapshot de prix et le portefeuille en valeurs
// USD par coin et totale. Jamais persisté, toujours recalculé.
//
// CONCEPTS RUST :
// 1. Fonction pure : aucun effet de bord, aucun cas d'erreur
// 2. Enum pour "valeur ou indisponible" plutôt qu'un Option nu :
//    l'indisponibilité est un état affiché, pas une absence silencieuse
// ============================================================================

use std::collections::HashMap;

use crate::models::{format_usd, Coin, Portfolio, PriceSnapshot};

/// Valeur d'un coin dans la valorisation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoinValue {
    /// quantité × prix, inclus dans le total
    Usd(f64),

    /// Prix inconnu ou quantité nulle : exclu du total, affiché "--"
    Unavailable,
}

impl CoinValue {
    /// Formate la valeur pour l'affichage ("$123.45" ou "--")
    pub fn display(&self) -> String {
        match self {
            CoinValue::Usd(value) => format!("${}", format_usd(*value)),
            CoinValue::Unavailable => "--".to_string(),
        }
    }
}

/// Valorisation dérivée du portefeuille
#[derive(Debug, Clone, PartialEq)]
pub struct Valuation {
    /// Valeur par coin (tout le set fixe est présent)
    pub per_coin: HashMap<Coin, CoinValue>,

    /// Somme des valeurs disponibles uniquement
    pub total: f64,
}

impl Valuation {
    /// Valeur d'un coin (Unavailable si hors map, par construction impossible)
    pub fn coin_value(&self, coin: Coin) -> CoinValue {
        self.per_coin
            .get(&coin)
            .copied()
            .unwrap_or(CoinValue::Unavailable)
    }

    /// Total formaté à deux décimales, avec séparateur de milliers
    pub fn total_display(&self) -> String {
        format!("${}", format_usd(self.total))
    }
}

/// Valorise un portefeuille contre un snapshot de prix
///
/// Pour chaque coin du set fixe :
/// - prix inconnu OU quantité ≤ 0 : valeur indisponible, exclue du total
/// - sinon : valeur = quantité × prix, incluse dans le total
///
/// Ne panique jamais : prix et quantités manquants dégradent vers
/// `CoinValue::Unavailable`, jamais vers une erreur.
pub fn valuate(portfolio: &Portfolio, snapshot: &PriceSnapshot) -> Valuation {
    let mut per_coin = HashMap::new();
    let mut total = 0.0;

    for coin in Coin::ALL {
        let quantity = portfolio.quantity(coin);
        let value = match snapshot.usd(coin) {
            Some(price) if quantity > 0.0 => {
                let value = quantity * price;
                total += value;
                CoinValue::Usd(value)
            }
            _ => CoinValue::Unavailable,
        };
        per_coin.insert(coin, value);
    }

    Valuation { per_coin, total }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valuate_known_price_and_quantity() {
        let mut portfolio = Portfolio::new();
        portfolio.set_quantity(Coin::Bitcoin, 2.0);
        let snapshot = PriceSnapshot::from_prices([(Coin::Bitcoin, 100.0)]);

        let valuation = valuate(&portfolio, &snapshot);

        assert_eq!(valuation.coin_value(Coin::Bitcoin), CoinValue::Usd(200.0));
        assert_eq!(valuation.total, 200.0);
        assert_eq!(valuation.total_display(), "$200.00");
    }

    #[test]
    fn test_valuate_empty_portfolio() {
        let snapshot = PriceSnapshot::from_prices([(Coin::Bitcoin, 100.0)]);
        let valuation = valuate(&Portfolio::new(), &snapshot);

        // Aucun coin inclus, total à zéro
        assert_eq!(valuation.total, 0.0);
        for coin in Coin::ALL {
            assert_eq!(valuation.coin_value(coin), CoinValue::Unavailable);
        }
        assert_eq!(valuation.total_display(), "$0.00");
    }

    #[test]
    fn test_missing_price_is_unavailable_for_any_quantity() {
        // Ethereum absent du snapshot : indisponible quelle que soit la quantité
        let snapshot = PriceSnapshot::from_prices([(Coin::Bitcoin, 50.0)]);

        for quantity in [0.0, 0.5, 10_000.0] {
            let mut portfolio = Portfolio::new();
            portfolio.set_quantity(Coin::Ethereum, quantity);

            let valuation = valuate(&portfolio, &snapshot);
            assert_eq!(valuation.coin_value(Coin::Ethereum), CoinValue::Unavailable);
            assert_eq!(valuation.total, 0.0);
        }
    }

    #[test]
    fn test_zero_quantity_is_unavailable_even_with_price() {
        let mut portfolio = Portfolio::new();
        portfolio.set_quantity(Coin::Tether, 0.0);
        let snapshot = PriceSnapshot::from_prices([(Coin::Tether, 1.0)]);

        let valuation = valuate(&portfolio, &snapshot);
        assert_eq!(valuation.coin_value(Coin::Tether), CoinValue::Unavailable);
        assert_eq!(valuation.total, 0.0);
    }

    #[test]
    fn test_total_sums_only_available_coins() {
        let mut portfolio = Portfolio::new();
        portfolio.set_quantity(Coin::Bitcoin, 1.0);
        portfolio.set_quantity(Coin::Ethereum, 3.0);
        portfolio.set_quantity(Coin::Tether, 100.0);

        // Pas de prix pour tether : exclu du total
        let snapshot =
            PriceSnapshot::from_prices([(Coin::Bitcoin, 60_000.0), (Coin::Ethereum, 2_000.0)]);

        let valuation = valuate(&portfolio, &snapshot);
        assert_eq!(valuation.total, 66_000.0);
        assert_eq!(valuation.coin_value(Coin::Tether), CoinValue::Unavailable);
        assert_eq!(valuation.total_display(), "$66,000.00");
    }
}
