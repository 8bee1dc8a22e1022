// ============================================================================
// Module : store
// ============================================================================
// Détention de l'état : cache de prix en mémoire, persistance fichier du
// portefeuille, liste de citations. Chaque store expose une interface
// explicite (load/save/reset, current/refresh) pour que la mécanique de
// stockage reste remplaçable sans toucher aux appelants.
// ============================================================================

pub mod portfolio_store; // Persistance document-entier du portefeuille
pub mod price_cache;     // Cache mono-écrivain du snapshot de prix
pub mod quotes;          // Liste statique de citations

pub use portfolio_store::PortfolioStore;
pub use price_cache::PriceCache;
pub use quotes::QuoteProvider;
