// ============================================================================
// Structures : Coin et PriceSnapshot
// ============================================================================
// Représente le jeu fixe de cryptomonnaies suivies par l'application et
// le snapshot de prix le plus récent.
//
// CONCEPTS RUST :
// 1. Enum fermée : le compilateur garantit qu'aucun symbole inconnu
//    ne peut entrer dans le système (les clés sont un sous-ensemble du set)
// 2. Newtype : PriceSnapshot enveloppe une HashMap pour contrôler l'accès
// 3. Serde : (dé)sérialisation vers le format CoinGecko {"bitcoin":{"usd":n}}
// ============================================================================

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Symbole d'une cryptomonnaie suivie
///
/// Le set est fixe : bitcoin, ethereum, tether. Toutes les maps de
/// l'application (prix, portfolio) sont indexées par cette enum, donc
/// leurs clés sont toujours un sous-ensemble du set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Coin {
    Bitcoin,
    Ethereum,
    Tether,
}

impl Coin {
    /// Set complet des coins suivis, dans l'ordre d'affichage
    pub const ALL: [Coin; 3] = [Coin::Bitcoin, Coin::Ethereum, Coin::Tether];

    /// Identifiant CoinGecko (et clé JSON) du coin
    pub fn id(&self) -> &'static str {
        match self {
            Coin::Bitcoin => "bitcoin",
            Coin::Ethereum => "ethereum",
            Coin::Tether => "tether",
        }
    }

    /// Nom complet pour l'affichage
    pub fn display_name(&self) -> &'static str {
        match self {
            Coin::Bitcoin => "Bitcoin",
            Coin::Ethereum => "Ethereum",
            Coin::Tether => "Tether",
        }
    }

    /// Symbole court (pour les colonnes du dashboard)
    pub fn symbol(&self) -> &'static str {
        match self {
            Coin::Bitcoin => "BTC",
            Coin::Ethereum => "ETH",
            Coin::Tether => "USDT",
        }
    }

    /// Parse un identifiant en Coin
    ///
    /// Retourne None pour tout symbole hors du set fixe : les clés
    /// inconnues sont silencieusement ignorées par les appelants.
    pub fn from_id(id: &str) -> Option<Coin> {
        Coin::ALL.iter().copied().find(|c| c.id() == id)
    }
}

/// Prix spot d'un coin, au format CoinGecko
///
/// CONCEPT RUST : struct à un champ plutôt que f64 nu
/// - Le JSON upstream est {"usd": n}, on matche exactement la structure
///   pour que serde désérialise automatiquement (comme pour Yahoo)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoinPrice {
    pub usd: f64,
}

/// Snapshot des prix les plus récents
///
/// Remplacé en bloc à chaque fetch réussi, jamais fusionné champ par
/// champ. Une clé absente signifie "prix inconnu", pas zéro.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceSnapshot(HashMap<Coin, CoinPrice>);

impl PriceSnapshot {
    /// Crée un snapshot vide (état au démarrage du process)
    pub fn new() -> Self {
        Self::default()
    }

    /// Construit un snapshot depuis une map coin -> prix USD
    pub fn from_prices(prices: impl IntoIterator<Item = (Coin, f64)>) -> Self {
        Self(
            prices
                .into_iter()
                .map(|(coin, usd)| (coin, CoinPrice { usd }))
                .collect(),
        )
    }

    /// Prix USD d'un coin, None si inconnu
    pub fn usd(&self, coin: Coin) -> Option<f64> {
        self.0.get(&coin).map(|p| p.usd)
    }

    /// Vrai si aucun prix n'a encore été chargé
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Nombre de coins présents dans le snapshot
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Accès à la map interne (pour la sérialisation des handlers)
    pub fn as_map(&self) -> &HashMap<Coin, CoinPrice> {
        &self.0
    }
}

/// Formate un montant USD pour l'affichage
///
/// Au-dessus de 1000 : séparateur de milliers, sinon deux décimales.
pub fn format_usd(amount: f64) -> String {
    if amount >= 1000.0 {
        let whole = amount.trunc() as i64;
        let cents = ((amount.fract() * 100.0).round() as i64).clamp(0, 99);

        // Insère un séparateur tous les 3 chiffres
        let digits = whole.to_string();
        let mut grouped = String::new();
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(c);
        }
        format!("{}.{:02}", grouped, cents)
    } else {
        format!("{:.2}", amount)
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coin_roundtrip_ids() {
        for coin in Coin::ALL {
            assert_eq!(Coin::from_id(coin.id()), Some(coin));
        }
        assert_eq!(Coin::from_id("dogecoin"), None);
    }

    #[test]
    fn test_snapshot_missing_key_is_unknown() {
        let snapshot = PriceSnapshot::from_prices([(Coin::Bitcoin, 100.0)]);
        assert_eq!(snapshot.usd(Coin::Bitcoin), Some(100.0));
        // Absent du snapshot : inconnu, pas zéro
        assert_eq!(snapshot.usd(Coin::Ethereum), None);
    }

    #[test]
    fn test_snapshot_serde_matches_coingecko_shape() {
        let json = r#"{"bitcoin":{"usd":64000.5},"tether":{"usd":1.0}}"#;
        let snapshot: PriceSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.usd(Coin::Bitcoin), Some(64000.5));
        assert_eq!(snapshot.usd(Coin::Tether), Some(1.0));
        assert!(snapshot.usd(Coin::Ethereum).is_none());
    }

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(0.0), "0.00");
        assert_eq!(format_usd(999.999), "1000.00");
        assert_eq!(format_usd(1234.5), "1,234.50");
        assert_eq!(format_usd(1234567.89), "1,234,567.89");
    }
}
