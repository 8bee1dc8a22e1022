// ============================================================================
// Module : ui
// ============================================================================
// Rendu de l'interface : dashboard (prix + citation + particules) et
// overlay portefeuille.
// ============================================================================

pub mod dashboard; // Vue principale
pub mod events;    // Événements clavier et ticks
pub mod particles; // Rendu Canvas du champ de particules
pub mod portfolio; // Overlay portefeuille

use ratatui::Frame;

use crate::app::{App, Screen};

/// Dessine l'interface complète
///
/// Le dashboard est toujours dessiné ; l'overlay portefeuille (et son
/// mode saisie) se superpose dessus.
pub fn render(frame: &mut Frame, app: &App) {
    dashboard::render_dashboard(frame, app);

    match app.current_screen {
        Screen::Dashboard => {}
        Screen::Portfolio | Screen::InputMode => {
            portfolio::render_portfolio_overlay(frame, app);
        }
    }
}
