// ============================================================================
// ParticleField - Rendu Canvas
// ============================================================================
// Dessine le champ de particules décoratif sur un widget Canvas (braille).
// Purement cosmétique : aucune donnée applicative n'entre ici.
// ============================================================================

use ratatui::{
    layout::Rect,
    style::Color,
    symbols,
    widgets::canvas::{Canvas, Points},
    widgets::{Block, Borders},
    Frame,
};

use crate::app::{ParticleField, FIELD_HEIGHT, FIELD_WIDTH};

/// Dessine le champ de particules dans la zone donnée
pub fn render_particles(frame: &mut Frame, field: &ParticleField, area: Rect) {
    let coords = field.positions();

    let canvas = Canvas::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" ✨ "),
        )
        .marker(symbols::Marker::Braille)
        .x_bounds([0.0, FIELD_WIDTH])
        .y_bounds([0.0, FIELD_HEIGHT])
        .paint(|ctx| {
            ctx.draw(&Points {
                coords: &coords,
                color: Color::Magenta,
            });
        });

    frame.render_widget(canvas, area);
}
