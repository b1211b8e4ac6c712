// ============================================================================
// Gestion des événements
// ============================================================================
// Gère les événements clavier et les ticks de l'application
//
// CONCEPTS RUST :
// 1. Enums avec variants : représenter différents types d'événements
// 2. Pattern matching : helpers is_*_event pour chaque raccourci
// 3. Error handling avec Result
// ============================================================================

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind};

/// Événements de l'application
#[derive(Debug, Clone)]
pub enum Event {
    /// Touche pressée
    Key(KeyEvent),

    /// Tick régulier (rafraîchissement de l'affichage)
    Tick,
}

/// Gestionnaire d'événements
pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    pub fn new() -> Self {
        Self {
            tick_rate: Duration::from_millis(250),
        }
    }

    /// Lit le prochain événement (bloquant avec timeout)
    ///
    /// CONCEPT : Non-blocking I/O avec timeout
    /// - poll(timeout) attend au plus tick_rate
    /// - Si pas d'événement, retourne Ok(Event::Tick)
    pub fn next(&self) -> Result<Event> {
        if event::poll(self.tick_rate)? {
            match event::read()? {
                // Sur certains OS, on reçoit Press ET Release : on ne garde que Press
                CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Ok(Event::Key(key)),
                _ => Ok(Event::Tick),
            }
        } else {
            Ok(Event::Tick)
        }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Helpers : Convertir KeyEvent en action
// ============================================================================

fn key_matches(event: &Event, predicate: impl Fn(KeyCode) -> bool) -> bool {
    match event {
        Event::Key(key) => predicate(key.code),
        Event::Tick => false,
    }
}

/// 'q' : quitter (two-step)
pub fn is_quit_event(event: &Event) -> bool {
    key_matches(event, |code| matches!(code, KeyCode::Char('q') | KeyCode::Char('Q')))
}

pub fn is_escape_event(event: &Event) -> bool {
    key_matches(event, |code| matches!(code, KeyCode::Esc))
}

pub fn is_enter_event(event: &Event) -> bool {
    key_matches(event, |code| matches!(code, KeyCode::Enter))
}

/// Flèche haut ou 'k' (vim)
pub fn is_up_event(event: &Event) -> bool {
    key_matches(event, |code| matches!(code, KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K')))
}

/// Flèche bas ou 'j' (vim)
pub fn is_down_event(event: &Event) -> bool {
    key_matches(event, |code| matches!(code, KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J')))
}

/// 'c' : ouvrir le sélecteur de devise
pub fn is_currency_event(event: &Event) -> bool {
    key_matches(event, |code| matches!(code, KeyCode::Char('c') | KeyCode::Char('C')))
}

/// 'r' : vider le cache et recharger les taux
pub fn is_refresh_event(event: &Event) -> bool {
    key_matches(event, |code| matches!(code, KeyCode::Char('r') | KeyCode::Char('R')))
}

/// 'g' : relancer la géolocalisation
pub fn is_detect_event(event: &Event) -> bool {
    key_matches(event, |code| matches!(code, KeyCode::Char('g') | KeyCode::Char('G')))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::empty()))
    }

    #[test]
    fn test_is_quit_event() {
        assert!(is_quit_event(&key(KeyCode::Char('q'))));
        assert!(!is_quit_event(&key(KeyCode::Char('a'))));
        assert!(!is_quit_event(&Event::Tick));
    }

    #[test]
    fn test_navigation_keys() {
        assert!(is_up_event(&key(KeyCode::Up)));
        assert!(is_up_event(&key(KeyCode::Char('k'))));
        assert!(is_down_event(&key(KeyCode::Char('j'))));
        assert!(!is_down_event(&key(KeyCode::Up)));
    }

    #[test]
    fn test_currency_shortcuts() {
        assert!(is_currency_event(&key(KeyCode::Char('c'))));
        assert!(is_refresh_event(&key(KeyCode::Char('r'))));
        assert!(is_detect_event(&key(KeyCode::Char('g'))));
        assert!(!is_refresh_event(&key(KeyCode::Enter)));
    }
}
