// ============================================================================
// Gestion des événements
// ============================================================================
// Gère les événements clavier et les ticks de l'application
//
// CONCEPTS RUST :
// 1. Enums avec variants : représenter différents types d'événements
// 2. Threading : la lecture crossterm est bloquante, elle tourne dans un
//    thread dédié qui transfère les événements vers la boucle async
// 3. Channels tokio : le thread envoie, la boucle principale reçoit
// ============================================================================

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, error};

use crate::models::Lookback;

/// Événements de l'application
#[derive(Debug, Clone)]
pub enum Event {
    /// Touche pressée
    Key(KeyEvent),

    /// Tick régulier (redessine l'écran)
    Tick,
}

/// Gestionnaire d'événements
pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    /// Crée un gestionnaire avec un tick toutes les 250ms
    pub fn new() -> Self {
        Self {
            tick_rate: Duration::from_millis(250),
        }
    }

    /// Lit le prochain événement (bloquant avec timeout)
    ///
    /// - poll(timeout) attend au plus tick_rate
    /// - Si pas d'événement, retourne Ok(Event::Tick)
    pub fn next(&self) -> Result<Event> {
        if event::poll(self.tick_rate)? {
            match event::read()? {
                // Sur certains OS, on reçoit Press ET Release : on ne garde que Press
                CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Ok(Event::Key(key)),
                // Autres événements (resize, mouse, etc.) : simple redraw
                _ => Ok(Event::Tick),
            }
        } else {
            Ok(Event::Tick)
        }
    }

    /// Lance un thread qui lit les événements et les envoie sur `tx`
    ///
    /// Le thread s'arrête dès que le receiver est droppé.
    pub fn spawn_forwarder(self, tx: UnboundedSender<Event>) -> std::thread::JoinHandle<()> {
        std::thread::spawn(move || loop {
            match self.next() {
                Ok(event) => {
                    if tx.send(event).is_err() {
                        debug!("Event receiver dropped, input thread exiting");
                        break;
                    }
                }
                Err(e) => {
                    error!(error = ?e, "Failed to read terminal event");
                    break;
                }
            }
        })
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

fn key_matches(event: &Event, pred: impl Fn(KeyCode) -> bool) -> bool {
    if let Event::Key(key) = event {
        pred(key.code)
    } else {
        false
    }
}

/// 'q' (quitter, two-step)
pub fn is_quit_event(event: &Event) -> bool {
    key_matches(event, |code| matches!(code, KeyCode::Char('q') | KeyCode::Char('Q')))
}

/// Ctrl+C : quitte immédiatement
pub fn is_interrupt_event(event: &Event) -> bool {
    if let Event::Key(key) = event {
        key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
    } else {
        false
    }
}

pub fn is_escape_event(event: &Event) -> bool {
    key_matches(event, |code| code == KeyCode::Esc)
}

pub fn is_enter_event(event: &Event) -> bool {
    key_matches(event, |code| code == KeyCode::Enter)
}

pub fn is_backspace_event(event: &Event) -> bool {
    key_matches(event, |code| code == KeyCode::Backspace)
}

/// Flèche vers le haut ou 'k' (vim)
pub fn is_up_event(event: &Event) -> bool {
    key_matches(event, |code| matches!(code, KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K')))
}

/// Flèche vers le bas ou 'j' (vim)
pub fn is_down_event(event: &Event) -> bool {
    key_matches(event, |code| matches!(code, KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J')))
}

/// '/' : ouvre la recherche (comme dans vim / less)
pub fn is_search_event(event: &Event) -> bool {
    key_matches(event, |code| code == KeyCode::Char('/'))
}

/// 't' : bascule le thème
pub fn is_theme_event(event: &Event) -> bool {
    key_matches(event, |code| matches!(code, KeyCode::Char('t') | KeyCode::Char('T')))
}

/// 'r' : rafraîchissement manuel
pub fn is_refresh_event(event: &Event) -> bool {
    key_matches(event, |code| matches!(code, KeyCode::Char('r') | KeyCode::Char('R')))
}

/// 'l' : fenêtre suivante
pub fn is_next_lookback_event(event: &Event) -> bool {
    key_matches(event, |code| code == KeyCode::Char('l'))
}

/// 'h' : fenêtre précédente
pub fn is_previous_lookback_event(event: &Event) -> bool {
    key_matches(event, |code| code == KeyCode::Char('h'))
}

/// '1'..'4' : choix direct de la fenêtre
pub fn lookback_shortcut(event: &Event) -> Option<Lookback> {
    match get_char_from_event(event)? {
        '1' => Some(Lookback::OneDay),
        '2' => Some(Lookback::OneWeek),
        '3' => Some(Lookback::OneMonth),
        '4' => Some(Lookback::ThreeMonths),
        _ => None,
    }
}

/// Extrait le caractère d'un événement clavier (sans Ctrl/Alt)
pub fn get_char_from_event(event: &Event) -> Option<char> {
    if let Event::Key(key) = event {
        if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
            return None;
        }
        if let KeyCode::Char(c) = key.code {
            return Some(c);
        }
    }
    None
}

// ============================================================================
// Tests
// ============================================================================
