// ============================================================================
// Converter - Rendu de l'interface principale
// ============================================================================
// Dessine l'écran convertisseur en utilisant les widgets de ratatui
//
// CONCEPTS RATATUI :
// 1. Frame : surface de dessin
// 2. Widgets : composants UI (Block, Paragraph, List, etc.)
// 3. Layout : découpage de l'espace en zones
// 4. Style : couleurs et attributs de texte
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::app::{App, Screen, Side};
use crate::models::foreign_currencies;
use crate::rates::{format_currency, format_display_date, format_unit_rate};
use crate::ui::chart;

/// Dessine l'interface complète
///
/// CONCEPT RUST : Routing avec match sur enum
/// - Pattern matching sur app.current_screen
/// - Le compilateur garantit l'exhaustivité (tous les cas gérés)
pub fn render(frame: &mut Frame, app: &App) {
    match app.current_screen {
        Screen::Converter => render_converter(frame, app),
        Screen::ChartView => chart::render_chart(frame, app, frame.size()),
        Screen::InputMode => render_input_mode(frame, app),
    }
}

/// Dessine l'écran convertisseur (header, paire, liste des taux, footer)
fn render_converter(frame: &mut Frame, app: &App) {
    let chunks = create_layout(frame.size());

    render_header(frame, app, chunks[0]);
    render_pair_card(frame, app, chunks[1]);
    render_rate_list(frame, app, chunks[2]);
    render_footer(frame, app, chunks[3]);
}

/// Crée le layout principal
fn create_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Header : titre + date de référence
            Constraint::Length(10), // Carte de conversion
            Constraint::Min(0),     // Liste des taux KRW
            Constraint::Length(3),  // Footer : raccourcis
        ])
        .split(area)
        .to_vec()
}

// ============================================================================
// Header : Titre et date de référence
// ============================================================================

/// Dessine le header avec le titre et la date "Au ..."
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" LazyForex ")
        .title_alignment(Alignment::Center);

    let as_of = format_display_date(&app.table.reference_date);
    let subtitle = if as_of.is_empty() {
        "Taux Banque de Corée (ECOS)".to_string()
    } else {
        format!("Taux Banque de Corée (ECOS) — {}", as_of)
    };

    let text = vec![Line::from(Span::styled(
        subtitle,
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
    ))];

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

// ============================================================================
// Carte de conversion
// ============================================================================

/// Ligne d'affichage d'un côté de la paire
///
/// Format : "🇺🇸 USD  Dollar américain" avec mise en évidence du côté
/// focalisé (celui que ↑↓ fait défiler)
fn currency_line(app: &App, side: Side) -> Line<'static> {
    let (label, currency) = match side {
        Side::From => ("De   ", app.from_currency()),
        Side::To => ("Vers ", app.to_currency()),
    };

    let focused = app.focused_side == side;
    let marker = if focused { "▸ " } else { "  " };

    let code_style = if focused {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };

    Line::from(vec![
        Span::raw(marker),
        Span::styled(label.to_string(), Style::default().fg(Color::Gray)),
        Span::raw(format!("{} ", currency.flag)),
        Span::styled(format!("{:<4}", currency.code), code_style),
        Span::styled(
            format!(" {}", currency.name),
            Style::default().fg(Color::Gray),
        ),
    ])
}

/// Dessine la carte de conversion (paire, montant, résultat)
fn render_pair_card(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" 💱 Conversion ");

    let mut lines = vec![
        currency_line(app, Side::From),
        Line::from(vec![
            Span::raw("  Montant : "),
            Span::styled(
                format_currency(app.amount, app.from_currency().code),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(" {}", app.from_currency().code)),
        ]),
        Line::from(Span::styled("  ⇅", Style::default().fg(Color::Cyan))),
        currency_line(app, Side::To),
        Line::from(""),
    ];

    // Résultat, erreur ou chargement
    if app.is_loading_data() {
        let message = app
            .loading_message
            .clone()
            .unwrap_or_else(|| "Chargement...".to_string());
        lines.push(Line::from(Span::styled(
            format!("  ⏳ {}", message),
            Style::default().fg(Color::Gray),
        )));
    } else if let Some(error) = &app.error_message {
        lines.push(Line::from(Span::styled(
            format!("  ⚠ {}", error),
            Style::default().fg(Color::Red),
        )));
    } else if let Some(converted) = app.converted_amount() {
        let to = app.to_currency();
        lines.push(Line::from(vec![
            Span::raw("  = "),
            Span::styled(
                format!("{} {}", to.symbol, format_currency(converted, to.code)),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ),
        ]));

        if let Some(rate) = app.current_rate {
            lines.push(Line::from(Span::styled(
                format!(
                    "  1 {} = {} {}",
                    app.from_currency().code,
                    format_unit_rate(rate, to.code),
                    to.code
                ),
                Style::default().fg(Color::Gray),
            )));
        }
    } else {
        lines.push(Line::from(Span::styled(
            "  Taux indisponible",
            Style::default().fg(Color::Gray),
        )));
    }

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}

// ============================================================================
// Liste des taux KRW
// ============================================================================

/// Dessine la liste des taux de référence (base won)
///
/// Une devise dont le fetch a échoué est affichée grisée avec "—" à la
/// place du taux plutôt que masquée.
fn render_rate_list(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" 📊 Taux KRW par unité ");

    if app.table.is_empty() {
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Aucun taux chargé — [r] pour rafraîchir",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center);

        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = foreign_currencies()
        .map(|currency| {
            let line = match app.table.get(currency.code) {
                Some(rate) => format!(
                    " {} {:<4} {:<20} ₩ {:>12}",
                    currency.flag,
                    currency.code,
                    currency.name,
                    format!("{:.2}", rate)
                ),
                None => format!(
                    " {} {:<4} {:<20} {:>14}",
                    currency.flag, currency.code, currency.name, "—"
                ),
            };

            let style = if app.table.get(currency.code).is_some() {
                Style::default()
            } else {
                Style::default().fg(Color::DarkGray)
            };

            ListItem::new(line).style(style)
        })
        .collect();

    let list = List::new(items).block(block);
    frame.render_widget(list, area);
}

// ============================================================================
// Footer : Instructions
// ============================================================================

/// Dessine le footer avec les raccourcis clavier
fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let shortcuts = if app.is_awaiting_quit_confirmation() {
        // CONCEPT : Two-step quit confirmation
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
    } else {
        Line::from(vec![
            Span::styled("[q]", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::raw(" Quitter  "),
            Span::styled("[Tab]", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::raw(" De/Vers  "),
            Span::styled("[↑↓]", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::raw(" Devise  "),
            Span::styled("[s]", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::raw(" Échanger  "),
            Span::styled("[a]", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw(" Montant  "),
            Span::styled("[Enter]", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::raw(" Graphique  "),
            Span::styled("[r]", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::raw(" Rafraîchir"),
        ])
    };

    let paragraph = Paragraph::new(vec![shortcuts])
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

// ============================================================================
// Input Mode : Saisie du montant
// ============================================================================

/// Dessine le convertisseur avec le mode input actif
///
/// CONCEPT : Modal input (Vim-like)
/// - Affiche le convertisseur en arrière-plan
/// - Affiche une ligne d'input en bas pour saisir le montant
/// - ESC annule, Enter valide
fn render_input_mode(frame: &mut Frame, app: &App) {
    let chunks = create_layout(frame.size());

    render_header(frame, app, chunks[0]);
    render_pair_card(frame, app, chunks[1]);
    render_rate_list(frame, app, chunks[2]);
    render_input_footer(frame, app, chunks[3]);
}

/// Dessine le footer en mode input avec la ligne de saisie
fn render_input_footer(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green)); // Vert pour indiquer mode input

    let input_line = Line::from(vec![
        Span::styled(
            app.input_prompt.clone(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(app.input_buffer.clone(), Style::default().fg(Color::White)),
        Span::styled(
            "█", // Curseur
            Style::default().fg(Color::White).add_modifier(Modifier::SLOW_BLINK),
        ),
    ]);

    let help_line = Line::from(vec![
        Span::styled(
            "[Enter]",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" Valider  "),
        Span::styled(
            "[ESC]",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" Annuler"),
    ]);

    let paragraph = Paragraph::new(vec![input_line, help_line])
        .block(block)
        .alignment(Alignment::Left);

    frame.render_widget(paragraph, area);
}
