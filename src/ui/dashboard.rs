// ============================================================================
// Dashboard - Rendu de l'interface principale
// ============================================================================
// Dessine l'interface TUI en utilisant les widgets de ratatui
//
//   ┌ header : titre, recherche, fenêtre, thème ┐
//   ├ liste des coins ─────┬ graphique ─────────┤
//   └ footer : raccourcis ou ligne de saisie ───┘
//
// CONCEPTS RATATUI :
// 1. Frame : surface de dessin
// 2. Layout : découpage de l'espace en zones
// 3. ListState : la liste suit le curseur et scrolle toute seule
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::App;
use crate::models::{Coin, Lookback, Trend};
use crate::ui::chart::render_chart;
use crate::ui::palette::Palette;

/// Message affiché tant que la première liste n'est pas arrivée
pub const LOADING_MESSAGE: &str = "Loading cryptocurrency data...";

/// Message quand le filtre ne garde aucun coin
pub fn no_match_message(query: &str) -> String {
    format!("No cryptocurrencies found matching \"{}\"", query)
}

/// Libellé de la fenêtre ("7 Days"), même hors des valeurs proposées
pub fn lookback_label(days: u32) -> String {
    match Lookback::from_days(days) {
        Some(lookback) => lookback.label().to_string(),
        None => format!("{} Days", days),
    }
}

// ============================================================================
// Fonction principale de rendu
// ============================================================================

/// Dessine l'interface complète
///
/// # Arguments
/// * `frame` - Surface de dessin ratatui
/// * `app` - État de l'application (lecture seule)
pub fn render(frame: &mut Frame, app: &App) {
    let palette = Palette::for_theme(app.theme);
    let size = frame.size();

    // Fond de toute la surface aux couleurs du thème
    frame.render_widget(Block::default().style(palette.base()), size);

    let chunks = create_layout(size);

    render_header(frame, app, &palette, chunks[0]);
    render_body(frame, app, &palette, chunks[1]);

    if app.is_in_search_mode() {
        render_search_footer(frame, app, &palette, chunks[2]);
    } else {
        render_footer(frame, app, &palette, chunks[2]);
    }
}

/// Crée le layout principal (header, content, footer)
fn create_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(4), // Footer : 2 lignes + bordures
        ])
        .split(area)
        .to_vec()
}

// ============================================================================
// Header
// ============================================================================

fn render_header(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.border_style())
        .style(palette.base())
        .title(" Crypto Tracker ")
        .title_alignment(Alignment::Center);

    let key_style = Style::default().fg(palette.accent).add_modifier(Modifier::BOLD);
    let search = if app.search_query.is_empty() {
        Span::styled("(none)", Style::default().fg(palette.muted))
    } else {
        Span::styled(format!("\"{}\"", app.search_query), Style::default().fg(palette.text))
    };

    let line = Line::from(vec![
        Span::styled("Search: ", key_style),
        search,
        Span::raw("   "),
        Span::styled("Lookback: ", key_style),
        Span::raw(lookback_label(app.chart.lookback_days())),
        Span::raw("   "),
        Span::styled("Theme: ", key_style),
        Span::raw(if app.theme.is_dark() { "☾ dark" } else { "☀ light" }),
    ]);

    let paragraph = Paragraph::new(line).block(block).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

// ============================================================================
// Contenu : liste + graphique
// ============================================================================

fn render_body(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    // Le panneau du graphique n'apparaît qu'une fois un coin sélectionné
    if app.chart.selected().is_none() {
        render_coin_list(frame, app, palette, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    render_coin_list(frame, app, palette, chunks[0]);
    render_chart(frame, &app.chart, palette, chunks[1]);
}

fn render_coin_list(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let title = if app.refresh.is_loading() && !app.refresh.coins().is_empty() {
        " Top Cryptocurrencies (refreshing) "
    } else {
        " Top Cryptocurrencies "
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.border_style())
        .style(palette.base())
        .title(title);

    // La liste filtrée est calculée une seule fois par frame
    let coins = app.filtered_coins();

    // Bannière d'erreur au-dessus de la liste (la liste précédente reste visible)
    let (banner_area, list_area) = match app.refresh.last_error() {
        Some(_) => {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(1), Constraint::Min(0)])
                .split(block.inner(area));
            (Some(chunks[0]), chunks[1])
        }
        None => (None, block.inner(area)),
    };

    frame.render_widget(block, area);

    if let (Some(banner), Some(error)) = (banner_area, app.refresh.last_error()) {
        let line = Line::from(Span::styled(
            format!("⚠ {}", error),
            Style::default().fg(palette.error).add_modifier(Modifier::BOLD),
        ));
        frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), banner);
    }

    if coins.is_empty() {
        let message = if !app.search_query.is_empty() && !app.refresh.coins().is_empty() {
            no_match_message(&app.search_query)
        } else if app.refresh.is_loading() {
            LOADING_MESSAGE.to_string()
        } else {
            String::new()
        };

        let text = vec![
            Line::from(""),
            Line::from(Span::styled(message, Style::default().fg(palette.muted))),
        ];
        frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), list_area);
        return;
    }

    let selected_id = app.chart.selected().map(|coin| coin.id.as_str());
    let items: Vec<ListItem> = coins
        .iter()
        .map(|coin| coin_item(coin, palette, selected_id == Some(coin.id.as_str())))
        .collect();

    let list = List::new(items)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD))
        .highlight_symbol("▶ ");

    // CONCEPT RATATUI : render_stateful_widget
    // - ListState garde l'offset de scroll pour que le curseur reste visible
    let mut state = ListState::default().with_selected(Some(app.cursor));
    frame.render_stateful_widget(list, list_area, &mut state);
}

/// Une ligne de la liste : nom, SYMBOLE, prix, variation, capitalisation
fn coin_item<'a>(coin: &'a Coin, palette: &Palette, is_selected: bool) -> ListItem<'a> {
    let change_color = palette.trend(Trend::of(coin));
    let marker = if is_selected { "● " } else { "  " };

    let line = Line::from(vec![
        Span::styled(marker, Style::default().fg(palette.accent)),
        Span::styled(format!("{:<18}", coin.name), Style::default().fg(palette.text)),
        Span::styled(
            format!("{:<6}", coin.symbol.to_uppercase()),
            Style::default().fg(palette.muted),
        ),
        Span::styled(format!("{:>14}", coin.display_price()), Style::default().fg(palette.text)),
        Span::styled(format!("{:>9}", coin.display_change()), Style::default().fg(change_color)),
        Span::styled(
            format!("{:>11}", coin.display_market_cap()),
            Style::default().fg(palette.muted),
        ),
    ]);

    ListItem::new(line)
}

// ============================================================================
// Footer : Instructions
// ============================================================================

fn render_footer(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.border_style())
        .style(palette.base());

    let key = |label: &'static str| {
        Span::styled(label, Style::default().fg(palette.accent).add_modifier(Modifier::BOLD))
    };

    let lines = if app.is_awaiting_quit_confirmation() {
        // CONCEPT : Style avec BLINK pour attirer l'attention
        vec![Line::from(vec![
            Span::styled("⚠  Press ", Style::default().fg(palette.error).add_modifier(Modifier::BOLD)),
            Span::styled(
                "[q]",
                Style::default()
                    .fg(palette.error)
                    .add_modifier(Modifier::BOLD)
                    .add_modifier(Modifier::SLOW_BLINK),
            ),
            Span::styled(
                " again to quit, any other key to cancel ⚠",
                Style::default().fg(palette.error).add_modifier(Modifier::BOLD),
            ),
        ])]
    } else {
        vec![
            Line::from(vec![
                key("[↑↓ / j k]"),
                Span::raw(" Navigate  "),
                key("[Enter]"),
                Span::raw(" Chart  "),
                key("[/]"),
                Span::raw(" Search  "),
                key("[r]"),
                Span::raw(" Refresh"),
            ]),
            Line::from(vec![
                key("[1-4 / h l]"),
                Span::raw(" Lookback  "),
                key("[t]"),
                Span::raw(" Theme  "),
                key("[q]"),
                Span::raw(" Quit"),
            ]),
        ]
    };

    let paragraph = Paragraph::new(lines).block(block).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

/// Footer en mode recherche : la requête est éditée en direct
fn render_search_footer(frame: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.accent).bg(palette.background))
        .style(palette.base());

    let input_line = Line::from(vec![
        Span::styled("Search: ", Style::default().fg(palette.accent).add_modifier(Modifier::BOLD)),
        Span::styled(app.search_query.as_str(), Style::default().fg(palette.text)),
        Span::styled("█", Style::default().fg(palette.text).add_modifier(Modifier::SLOW_BLINK)),
    ]);

    let help_line = Line::from(vec![
        Span::styled("[Enter]", Style::default().fg(palette.positive).add_modifier(Modifier::BOLD)),
        Span::raw(" Keep filter  "),
        Span::styled("[ESC]", Style::default().fg(palette.negative).add_modifier(Modifier::BOLD)),
        Span::raw(" Clear"),
    ]);

    let paragraph = Paragraph::new(vec![input_line, help_line])
        .block(block)
        .alignment(Alignment::Left);

    frame.render_widget(paragraph, area);
}
