// ============================================================================
// ReportRenderer : rapport de valorisation imprimable
// ============================================================================
// Formate le dernier snapshot de prix et le portefeuille persisté en un
// tableau texte imprimable, servi par GET /api/report. Pas de moteur PDF :
// le rapport est du texte brut à largeur fixe.
// ============================================================================

use chrono::{DateTime, Utc};

use crate::models::{format_usd, valuate, Coin, CoinValue, Portfolio, PriceSnapshot};

/// Rend le rapport de valorisation en texte imprimable
///
/// L'appelant garantit que le snapshot n'est pas vide (le handler répond
/// une erreur explicite sinon) ; un coin sans prix reste affiché avec le
/// marqueur "--".
pub fn render_report(
    portfolio: &Portfolio,
    snapshot: &PriceSnapshot,
    generated_at: DateTime<Utc>,
) -> String {
    let valuation = valuate(portfolio, snapshot);

    let mut out = String::new();
    out.push_str("CryptoHouse - Portfolio Valuation Report\n");
    out.push_str(&format!(
        "Generated: {}\n",
        generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    out.push_str("\n");
    out.push_str(&format!(
        "{:<10} {:>14} {:>16} {:>16}\n",
        "Coin", "Quantity", "Price (USD)", "Value (USD)"
    ));
    out.push_str(&format!("{}\n", "-".repeat(60)));

    for coin in Coin::ALL {
        let quantity = portfolio.quantity(coin);
        let price = match snapshot.usd(coin) {
            Some(price) => format!("${}", format_usd(price)),
            None => "--".to_string(),
        };
        let value = match valuation.coin_value(coin) {
            CoinValue::Usd(v) => format!("${}", format_usd(v)),
            CoinValue::Unavailable => "--".to_string(),
        };

        out.push_str(&format!(
            "{:<10} {:>14.8} {:>16} {:>16}\n",
            coin.symbol(),
            quantity,
            price,
            value
        ));
    }

    out.push_str(&format!("{}\n", "-".repeat(60)));
    out.push_str(&format!(
        "{:<10} {:>48}\n",
        "TOTAL",
        valuation.total_display()
    ));
    out
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_contains_rows_and_total() {
        let mut portfolio = Portfolio::new();
        portfolio.set_quantity(Coin::Bitcoin, 2.0);

        let snapshot = PriceSnapshot::from_prices([(Coin::Bitcoin, 100.0)]);
        let report = render_report(&portfolio, &snapshot, Utc::now());

        assert!(report.contains("BTC"));
        assert!(report.contains("$200.00"));
        assert!(report.contains("TOTAL"));
    }

    #[test]
    fn test_missing_price_shows_placeholder() {
        let mut portfolio = Portfolio::new();
        portfolio.set_quantity(Coin::Ethereum, 5.0);

        // Snapshot sans ethereum : ligne présente, valeur "--"
        let snapshot = PriceSnapshot::from_prices([(Coin::Bitcoin, 100.0)]);
        let report = render_report(&portfolio, &snapshot, Utc::now());

        assert!(report.contains("ETH"));
        assert!(report.contains("--"));
        assert!(report.contains("$0.00"));
    }
}
