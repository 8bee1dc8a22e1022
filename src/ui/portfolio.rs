// ============================================================================
// Portfolio - Overlay d'édition et de valorisation
// ============================================================================
// Dessine l'overlay portefeuille : quantité et valeur par coin, total, et
// la ligne de saisie quand une quantité est en cours d'édition.
//
// CONCEPT : Modal overlay
// - Rect centré par-dessus le dashboard
// - La valorisation affichée est recalculée à chaque frame (jamais stockée)
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};

use crate::app::App;
use crate::models::Coin;

/// Dessine l'overlay portefeuille par-dessus le dashboard
pub fn render_portfolio_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect(60, 60, frame.size());

    // Efface la zone avant de redessiner (sinon le dashboard transparaît)
    frame.render_widget(Clear, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(Coin::ALL.len() as u16 + 2), // Lignes par coin
            Constraint::Length(3),                          // Total
            Constraint::Length(3),                          // Saisie / raccourcis
        ])
        .split(area)
        .to_vec();

    render_holdings(frame, app, chunks[0]);
    render_total(frame, app, chunks[1]);

    if app.is_in_input_mode() {
        render_input_footer(frame, app, chunks[2]);
    } else {
        render_shortcuts(frame, app, chunks[2]);
    }
}

/// Lignes du portefeuille : coin, quantité détenue, valeur ou "--"
fn render_holdings(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green))
        .title(" 💼 Portfolio ")
        .title_alignment(Alignment::Center);

    let valuation = app.valuation();

    let items: Vec<ListItem> = Coin::ALL
        .iter()
        .enumerate()
        .map(|(index, &coin)| {
            let quantity = app.portfolio.quantity(coin);
            let value = valuation.coin_value(coin);

            let line = format!(
                " {:<6} {:>14.8} {:>18}",
                coin.symbol(),
                quantity,
                value.display()
            );

            let mut style = Style::default().fg(Color::White);
            if index == app.selected_index {
                style = style
                    .add_modifier(Modifier::BOLD)
                    .add_modifier(Modifier::REVERSED);
            }
            ListItem::new(line).style(style)
        })
        .collect();

    let list = List::new(items).block(block);
    frame.render_widget(list, area);
}

/// Valeur totale du portefeuille
fn render_total(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let total = app.valuation().total_display();
    let line = Line::from(vec![
        Span::raw("Total: "),
        Span::styled(
            total,
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
    ]);

    let paragraph = Paragraph::new(vec![line])
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

/// Raccourcis de l'overlay (save désactivé pendant une sauvegarde)
fn render_shortcuts(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let save_span = if app.can_save() {
        Span::styled(
            "[s]",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled("[saving…]", Style::default().fg(Color::Gray))
    };

    let line = Line::from(vec![
        Span::styled("[↑↓]", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        Span::raw(" Select  "),
        Span::styled("[Enter]", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        Span::raw(" Edit  "),
        save_span,
        Span::raw(" Save  "),
        Span::styled("[x]", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
        Span::raw(" Reset  "),
        Span::styled("[ESC]", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        Span::raw(" Close"),
    ]);

    let paragraph = Paragraph::new(vec![line])
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

/// Ligne de saisie d'une quantité
fn render_input_footer(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let input_line = Line::from(vec![
        Span::styled(
            &app.input_prompt,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(&app.input_buffer, Style::default().fg(Color::White)),
        Span::styled(
            "█",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::SLOW_BLINK),
        ),
    ]);

    let paragraph = Paragraph::new(vec![input_line])
        .block(block)
        .alignment(Alignment::Left);

    frame.render_widget(paragraph, area);
}

/// Rect centré en pourcentage de la zone donnée
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
