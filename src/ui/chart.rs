// ============================================================================
// Chart - Rendu de l'évolution du taux de la paire
// ============================================================================
// Affiche un graphique ligne de la série historique réorientée from → to
//
// CONCEPTS RUST :
// 1. Option handling : gérer l'absence de données
// 2. Iterator chaining : transformer les observations en points (x, y)
//
// CONCEPTS RATATUI :
// 1. Chart widget : graphique ligne
// 2. Dataset : série de données à afficher
// 3. Axis : configuration des axes X et Y
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use crate::app::App;
use crate::models::{series_bounds, series_change_percent};

/// Dessine la vue graphique pour la paire affichée
///
/// Si la série est vide (fetch en échec, paire KRW/KRW...), le
/// graphique est simplement omis au profit d'un message : dégradation
/// gracieuse, jamais d'erreur.
pub fn render_chart(frame: &mut Frame, app: &App, area: Rect) {
    if app.chart_data.is_empty() {
        render_no_data(frame, area, "Pas de données de tendance disponibles");
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Titre : paire + variation
            Constraint::Min(0),    // Graphique
            Constraint::Length(3), // Min / Max / Amplitude
        ])
        .split(area)
        .to_vec();

    render_chart_header(frame, app, chunks[0]);
    render_chart_graph(frame, app, chunks[1]);
    render_chart_range(frame, app, chunks[2]);
}

// ============================================================================
// Header du graphique
// ============================================================================

/// Dessine le header avec la paire, la période et la variation
fn render_chart_header(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(
            " 📈 {} → {} — {} jours ",
            app.from_currency().code,
            app.to_currency().code,
            app.chart_period
        ));

    let text = match series_change_percent(&app.chart_data) {
        Some(change) => {
            let color = if change >= 0.0 { Color::Green } else { Color::Red };
            let arrow = if change >= 0.0 { "▲" } else { "▼" };

            vec![Line::from(vec![
                Span::raw("Variation : "),
                Span::styled(
                    format!("{} {:+.2}%", arrow, change),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::raw("  "),
                Span::styled(
                    "[p]",
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ),
                Span::raw(" 7/30 jours  "),
                Span::styled(
                    "[ESC]",
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ),
                Span::raw(" Retour"),
            ])]
        }
        None => vec![Line::from("Chargement...")],
    };

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

// ============================================================================
// Graphique principal
// ============================================================================

/// Dessine le graphique ligne
fn render_chart_graph(frame: &mut Frame, app: &App, area: Rect) {
    // Convertit les observations en points (x, y)
    let points: Vec<(f64, f64)> = app
        .chart_data
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.rate))
        .collect();

    let (min_rate, max_rate) = match series_bounds(&app.chart_data) {
        Some(bounds) => bounds,
        None => {
            render_no_data(frame, area, "Pas de données à afficher");
            return;
        }
    };

    // Marge de 5% pour que le graphique respire
    let margin = (max_rate - min_rate) * 0.05;
    let y_min = (min_rate - margin).max(0.0);
    let y_max = max_rate + margin;

    let change = series_change_percent(&app.chart_data).unwrap_or(0.0);
    let color = if change >= 0.0 { Color::Green } else { Color::Red };

    let pair_name = format!("{}→{}", app.from_currency().code, app.to_currency().code);
    let datasets = vec![Dataset::default()
        .name(pair_name)
        .marker(symbols::Marker::Dot)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(color))
        .data(&points)];

    // Labels X : première et dernière date de la fenêtre
    let first_date = app.chart_data.first().map(|p| p.date.clone()).unwrap_or_default();
    let last_date = app.chart_data.last().map(|p| p.date.clone()).unwrap_or_default();

    let x_axis = Axis::default()
        .title("Date")
        .style(Style::default().fg(Color::Gray))
        .bounds([0.0, (points.len().saturating_sub(1)).max(1) as f64])
        .labels(vec![
            Span::raw(first_date),
            Span::raw(""),
            Span::raw(last_date),
        ]);

    let y_axis = Axis::default()
        .title("Taux")
        .style(Style::default().fg(Color::Gray))
        .bounds([y_min, y_max])
        .labels(vec![
            Span::raw(format!("{:.2}", y_min)),
            Span::raw(format!("{:.2}", (y_min + y_max) / 2.0)),
            Span::raw(format!("{:.2}", y_max)),
        ]);

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(" Évolution du taux "),
        )
        .x_axis(x_axis)
        .y_axis(y_axis);

    frame.render_widget(chart, area);
}

// ============================================================================
// Footer : Min / Max / Amplitude
// ============================================================================

/// Dessine le résumé de la fenêtre (min, max, amplitude)
fn render_chart_range(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let line = match series_bounds(&app.chart_data) {
        Some((min, max)) => Line::from(vec![
            Span::styled("Min ", Style::default().fg(Color::Gray)),
            Span::styled(format!("{:.2}", min), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("   "),
            Span::styled("Max ", Style::default().fg(Color::Gray)),
            Span::styled(format!("{:.2}", max), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("   "),
            Span::styled("Amplitude ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{:.2}", max - min),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
        None => Line::from(""),
    };

    let paragraph = Paragraph::new(vec![line])
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

// ============================================================================
// Helper : Message quand pas de données
// ============================================================================

/// Affiche un message quand il n'y a pas de données à afficher
fn render_no_data(frame: &mut Frame, area: Rect, message: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(" ⚠ Tendance indisponible ");

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(message, Style::default().fg(Color::Red))),
        Line::from(""),
        Line::from(Span::styled(
            "[ESC] Retour",
            Style::default().fg(Color::Gray),
        )),
    ];

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}
