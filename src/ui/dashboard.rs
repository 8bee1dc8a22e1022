// ============================================================================
// Dashboard - Rendu de l'interface principale
// ============================================================================
// Dessine la vue principale : tableau des prix avec flèches de variation,
// citation du moment, champ de particules, footer avec raccourcis.
//
// CONCEPTS RATATUI :
// 1. Layout : découpage vertical de l'écran en zones
// 2. Widgets : Block, Paragraph, List
// 3. Style : couleurs selon le sens de variation des prix
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::app::{App, PriceDirection};
use crate::models::{format_usd, Coin};
use crate::ui::particles;

/// Dessine le dashboard complet
pub fn render_dashboard(frame: &mut Frame, app: &App) {
    let chunks = create_layout(frame.size());

    render_header(frame, chunks[0]);
    render_price_board(frame, app, chunks[1]);
    render_quote_box(frame, app, chunks[2]);
    particles::render_particles(frame, &app.particles, chunks[3]);
    render_footer(frame, app, chunks[4]);
}

/// Layout principal : header, prix, citation, particules, footer
fn create_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),                          // Header
            Constraint::Length(Coin::ALL.len() as u16 + 2), // Tableau des prix
            Constraint::Length(4),                          // Citation
            Constraint::Min(0),                             // Particules
            Constraint::Length(3),                          // Footer
        ])
        .split(area)
        .to_vec()
}

/// Header : titre et heure du dernier poll réussi
fn render_header(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta))
        .title(" CryptoHouse ")
        .title_alignment(Alignment::Center);

    let text = vec![Line::from(Span::styled(
        "💸 Crypto Dashboard 💸",
        Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD),
    ))];

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

/// Tableau des prix : un coin par ligne, flèche et couleur de variation
fn render_price_board(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" 📊 Prices ");

    let items: Vec<ListItem> = Coin::ALL
        .iter()
        .map(|&coin| {
            let (price_str, direction) = match app.prices.usd(coin) {
                Some(price) => (format!("${}", format_usd(price)), app.price_direction(coin)),
                // Prix inconnu : placeholder, jamais zéro
                None => ("N/A".to_string(), None),
            };

            let (arrow, style) = match direction {
                Some(PriceDirection::Up) => (" ↑", Style::default().fg(Color::Green)),
                Some(PriceDirection::Down) => (" ↓", Style::default().fg(Color::Red)),
                Some(PriceDirection::Flat) | None => ("", Style::default().fg(Color::White)),
            };

            let line = format!(
                " {:<6} {:<12} {:>16}{}",
                coin.symbol(),
                coin.display_name(),
                price_str,
                arrow
            );
            ListItem::new(line).style(style)
        })
        .collect();

    let list = List::new(items).block(block);
    frame.render_widget(list, area);
}

/// Citation du moment
fn render_quote_box(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" 💬 Quote ");

    let quote = app.quote.as_deref().unwrap_or("...");
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            quote,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::ITALIC),
        )),
    ];

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

/// Footer : raccourcis, statut et heure de mise à jour
fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let line = if app.is_awaiting_quit_confirmation() {
        Line::from(vec![
            Span::styled(
                "⚠  Appuyez sur ",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "[q]",
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD)
                    .add_modifier(Modifier::SLOW_BLINK),
            ),
            Span::styled(
                " à nouveau pour quitter, ou n'importe quelle autre touche pour annuler ⚠",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
        ])
    } else if let Some(status) = &app.status {
        Line::from(Span::styled(
            status.clone(),
            Style::default().fg(Color::Yellow),
        ))
    } else {
        let updated = app
            .last_updated
            .map(|t| format!("Updated {}", t.format("%H:%M:%S")))
            .unwrap_or_else(|| "Waiting for prices...".to_string());

        Line::from(vec![
            Span::styled("[q]", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::raw(" Quit  "),
            Span::styled("[p]", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw(" Portfolio  "),
            Span::styled("[r]", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::raw(" Refresh   "),
            Span::styled(updated, Style::default().fg(Color::Gray)),
        ])
    };

    let paragraph = Paragraph::new(vec![line])
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}
