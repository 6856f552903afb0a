// ============================================================================
// Chart - Rendu du graphique du coin sélectionné
// ============================================================================
// Affiche l'historique de prix sous forme de graphique ligne
//
// CONCEPTS RUST :
// 1. Option handling : pas de sélection, chargement, erreur
// 2. Iterator chaining : labels de l'axe X pris dans la série
//
// CONCEPTS RATATUI :
// 1. Chart widget : graphique ligne
// 2. Dataset : série de données à afficher
// 3. Axis : configuration des axes X et Y
// ============================================================================

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        block::{Position, Title},
        Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph,
    },
    Frame,
};

use crate::chart_loader::ChartLoader;
use crate::models::{format_price, ChartSeries, Coin};
use crate::ui::palette::Palette;

/// Message affiché pendant le fetch de l'historique
pub const CHART_LOADING_MESSAGE: &str = "Loading chart...";

/// Titre du panneau : "Bitcoin (BTC) - 7 Day Price History"
pub fn chart_title(coin: &Coin, days: u32) -> String {
    format!("{} ({}) - {} Day Price History", coin.name, coin.symbol.to_uppercase(), days)
}

// ============================================================================
// Fonction principale de rendu du graphique
// ============================================================================

/// Dessine le panneau du graphique
///
/// CONCEPT RUST : Early return
/// - Pas de sélection → rien à dessiner
/// - Chargement ou erreur → un message à la place du graphique
pub fn render_chart(frame: &mut Frame, loader: &ChartLoader, palette: &Palette, area: Rect) {
    let Some(coin) = loader.selected() else {
        return;
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.border_style())
        .style(palette.base())
        .title(format!(" {} ", chart_title(coin, loader.lookback_days())));

    if loader.is_loading() {
        render_message(frame, block, area, CHART_LOADING_MESSAGE, Style::default().fg(palette.muted));
        return;
    }

    if let Some(error) = loader.error() {
        render_message(frame, block, area, error, Style::default().fg(palette.error));
        return;
    }

    match loader.visible_series() {
        Some(series) if !series.is_empty() => render_chart_graph(frame, block, series, palette, area),
        _ => render_message(frame, block, area, "No price data", Style::default().fg(palette.muted)),
    }
}

// ============================================================================
// Graphique principal
// ============================================================================

fn render_chart_graph(frame: &mut Frame, block: Block, series: &ChartSeries, palette: &Palette, area: Rect) {
    let points = series.points();
    let Some((y_min, y_max)) = series.bounds() else {
        return;
    };

    // CONCEPT RATATUI : Marker types
    // - Braille : résolution 2x4 par cellule, ligne plus fine
    let color = palette.trend(series.trend);
    let datasets = vec![Dataset::default()
        .name(series.label.as_str())
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(color))
        .data(&points)];

    let axis_style = Style::default().fg(palette.muted);

    let x_axis = Axis::default()
        .style(axis_style)
        .bounds([0.0, points.len().saturating_sub(1) as f64])
        .labels(x_labels(series).into_iter().map(Span::raw).collect());

    let y_axis = Axis::default()
        .style(axis_style)
        .bounds([y_min, y_max])
        .labels(vec![
            Span::raw(format_price(y_min)),
            Span::raw(format_price((y_min + y_max) / 2.0)),
            Span::raw(format_price(y_max)),
        ]);

    let chart = Chart::new(datasets)
        .block(
            block.title(
                Title::from(Span::styled(
                    format!(" {} ", series.title),
                    Style::default().fg(palette.muted).add_modifier(Modifier::ITALIC),
                ))
                .position(Position::Bottom),
            ),
        )
        .style(palette.base())
        .x_axis(x_axis)
        .y_axis(y_axis);

    frame.render_widget(chart, area);
}

/// Labels de l'axe X : première date, date du milieu, dernière date
fn x_labels(series: &ChartSeries) -> Vec<String> {
    match series.labels.len() {
        0 => Vec::new(),
        1 => vec![series.labels[0].clone()],
        n => vec![
            series.labels[0].clone(),
            series.labels[n / 2].clone(),
            series.labels[n - 1].clone(),
        ],
    }
}

/// Message centré à la place du graphique
fn render_message(frame: &mut Frame, block: Block, area: Rect, message: &str, style: Style) {
    let text = vec![Line::from(""), Line::from(Span::styled(message.to_string(), style))];

    let paragraph = Paragraph::new(text).block(block).alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Trend;

    fn series(labels: &[&str]) -> ChartSeries {
        ChartSeries {
            title: "Bitcoin Price Chart (7 days)".to_string(),
            label: "Bitcoin Price (USD)".to_string(),
            labels: labels.iter().map(|l| l.to_string()).collect(),
            values: vec![1.0; labels.len()],
            trend: Trend::Positive,
            lookback_days: 7,
        }
    }

    #[test]
    fn test_chart_title_uppercases_symbol() {
        let coin = Coin::new("bitcoin", "Bitcoin", "btc", 43000.0, 5.0, 8.4e11);
        assert_eq!(chart_title(&coin, 7), "Bitcoin (BTC) - 7 Day Price History");
    }

    #[test]
    fn test_x_labels() {
        assert!(x_labels(&series(&[])).is_empty());
        assert_eq!(x_labels(&series(&["1/1/2024"])), vec!["1/1/2024"]);
        assert_eq!(
            x_labels(&series(&["1/1/2024", "1/2/2024", "1/3/2024", "1/4/2024", "1/5/2024"])),
            vec!["1/1/2024", "1/3/2024", "1/5/2024"]
        );
    }
}
