// ============================================================================
// Dashboard - Rendu de l'interface principale
// ============================================================================
// Dessine le job board et le sélecteur de devise avec ratatui
//
// CONCEPTS RATATUI :
// 1. Frame : surface de dessin
// 2. Widgets : composants UI (Block, Paragraph, List)
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

use crate::app::{App, Screen};
use crate::models::{CurrencyPreference, SUPPORTED_CURRENCIES};
use crate::service::display_label;

/// Dessine l'interface complète
///
/// CONCEPT RUST : Routing avec match sur enum
/// - Le compilateur garantit que chaque écran est géré
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = create_layout(frame.size());
    let preference = app.currency.snapshot();

    render_header(frame, &preference, chunks[0]);

    match app.current_screen {
        Screen::Dashboard => render_jobs(frame, app, chunks[1]),
        Screen::CurrencyPicker => render_picker(frame, app, &preference, chunks[1]),
    }

    render_footer(frame, app, chunks[2]);
}

/// Crée le layout principal (header, content, footer)
fn create_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Footer
        ])
        .split(area)
        .to_vec()
}

// ============================================================================
// Header : devise affichée, devise détectée, badges
// ============================================================================

fn render_header(frame: &mut Frame, preference: &CurrencyPreference, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" boardfx ")
        .title_alignment(Alignment::Center);

    let detected = preference
        .detected_currency
        .as_deref()
        .map(display_label)
        .unwrap_or_else(|| "-".to_string());

    let mut spans = vec![
        Span::styled("Display ", Style::default().fg(Color::Gray)),
        Span::styled(
            display_label(&preference.selected_currency),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        Span::styled("   Detected ", Style::default().fg(Color::Gray)),
        Span::raw(detected),
    ];

    if preference.loading {
        spans.push(Span::styled("   ⟳ loading rates", Style::default().fg(Color::Yellow)));
    }

    // Avertissement passif : jamais bloquant
    if preference.last_error.is_some() {
        spans.push(Span::styled(
            "   ⚠ offline rates",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

// ============================================================================
// Main Content : job cards
// ============================================================================

fn render_jobs(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" 💼 Jobs ");

    if app.jobs.is_empty() {
        let paragraph = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("No jobs posted", Style::default().fg(Color::Gray))),
        ])
        .block(block)
        .alignment(Alignment::Center);

        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = app
        .jobs
        .iter()
        .enumerate()
        .map(|(index, job)| {
            let line = format!(
                " {:<28} {:<12} {:<10} {:>30}",
                job.short_title(28),
                job.company,
                job.location,
                app.salary_label(job)
            );

            let style = Style::default().fg(Color::White);
            if index == app.selected_index {
                ListItem::new(line).style(style.add_modifier(Modifier::BOLD).add_modifier(Modifier::REVERSED))
            } else {
                ListItem::new(line).style(style)
            }
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

// ============================================================================
// Sélecteur de devise
// ============================================================================

fn render_picker(frame: &mut Frame, app: &App, preference: &CurrencyPreference, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green))
        .title(" 💱 Display currency ");

    let items: Vec<ListItem> = SUPPORTED_CURRENCIES
        .iter()
        .enumerate()
        .map(|(index, currency)| {
            let mut markers = String::new();
            if currency.code == preference.selected_currency {
                markers.push_str(" ● current");
            }
            if preference.detected_currency.as_deref() == Some(currency.code) {
                markers.push_str(" ◎ detected");
            }

            let line = format!(
                " {} {:<4} {:<4} {:<20}{}",
                currency.flag, currency.code, currency.symbol.trim(), currency.name, markers
            );

            let style = if index == app.picker_index {
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD)
                    .add_modifier(Modifier::REVERSED)
            } else {
                Style::default().fg(Color::White)
            };

            ListItem::new(line).style(style)
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

// ============================================================================
// Footer : Instructions
// ============================================================================

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let key = |label: &'static str| {
        Span::styled(label, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
    };

    let line = if app.is_awaiting_quit_confirmation() {
        Line::from(vec![
            Span::styled(
                "⚠  Press ",
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
                " again to quit, any other key to cancel ⚠",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
        ])
    } else if app.is_in_picker() {
        Line::from(vec![
            key("[↑↓ / j k]"),
            Span::raw(" Navigate  "),
            key("[Enter]"),
            Span::raw(" Select  "),
            key("[Esc]"),
            Span::raw(" Back"),
        ])
    } else if let Some(message) = &app.status_message {
        Line::from(Span::styled(message.as_str(), Style::default().fg(Color::Green)))
    } else {
        Line::from(vec![
            key("[q]"),
            Span::raw(" Quit  "),
            key("[↑↓ / j k]"),
            Span::raw(" Navigate  "),
            key("[c]"),
            Span::raw(" Currency  "),
            key("[r]"),
            Span::raw(" Refresh rates  "),
            key("[g]"),
            Span::raw(" Detect"),
        ])
    };

    let paragraph = Paragraph::new(vec![line])
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::{sample_jobs, ExchangeRateTable};
    use crate::service::CurrencyService;
    use crate::test_support::{FakeGeoLocator, FakeRateProvider, ManualClock, SharedStore};
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

    fn render_to_string(app: &App) -> String {
        let backend = TestBackend::new(120, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();

        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    fn app() -> App {
        let service = CurrencyService::new(
            Config::default(),
            Arc::new(FakeGeoLocator::country("GB")),
            Arc::new(FakeRateProvider::ok(ExchangeRateTable::new())),
            Box::new(SharedStore::new()),
            Arc::new(ManualClock::new(0)),
        );
        App::with_jobs(Arc::new(service), sample_jobs())
    }

    #[test]
    fn test_dashboard_shows_jobs_and_currency() {
        let screen = render_to_string(&app());
        assert!(screen.contains("boardfx"));
        assert!(screen.contains("GBP"));
        assert!(screen.contains("Paystack"));
    }

    #[test]
    fn test_picker_lists_currencies() {
        let mut app = app();
        app.open_picker();
        let screen = render_to_string(&app);
        assert!(screen.contains("Display currency"));
        assert!(screen.contains("Nigerian Naira"));
        assert!(screen.contains("current"));
    }
}
