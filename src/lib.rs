// ============================================================================
// CryptoHouse - Library
// ============================================================================
// Expose les modules publics pour les binaires, exemples et tests
// ============================================================================

pub mod api;       // Clients HTTP (CoinGecko + backend)
pub mod app;       // État de l'application TUI
pub mod models;    // Structures de données
pub mod server;    // Backend HTTP (axum)
pub mod store;     // Cache de prix, persistance, citations
pub mod ui;        // Interface utilisateur
