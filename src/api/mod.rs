// ============================================================================
// Module : api
// ============================================================================
// Clients HTTP : CoinGecko (PriceSource upstream, côté backend) et le
// backend CryptoHouse lui-même (côté dashboard).
// ============================================================================

pub mod backend;   // Client du backend (utilisé par le dashboard TUI)
pub mod coingecko; // Client CoinGecko (utilisé par le backend)

pub use backend::BackendClient;
pub use coingecko::CoinGeckoClient;
