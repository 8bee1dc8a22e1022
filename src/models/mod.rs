// ============================================================================
// Module : models
// ============================================================================
// Structures de données partagées entre le dashboard et le backend
// ============================================================================

pub mod coin;      // Set fixe de coins + snapshot de prix
pub mod portfolio; // Document de portefeuille
pub mod valuation; // Valorisation dérivée (pure)

// Re-export des structures principales pour simplifier les imports
pub use coin::{format_usd, Coin, CoinPrice, PriceSnapshot};
pub use portfolio::Portfolio;
pub use valuation::{valuate, CoinValue, Valuation};
