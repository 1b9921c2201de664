//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Events generated from user input in the UI layer
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    // Focus navigation
    NextPanel,
    PrevPanel,

    // Source URL editing
    StartEditing,
    StopEditing,
    CharInput(char),
    Backspace,
    Delete,
    CursorLeft,
    CursorRight,
    CursorHome,
    CursorEnd,

    // Server list
    HighlightNext,
    HighlightPrev,
    SelectHighlighted,

    // Actions
    Refresh,
    CancelRefresh,
    RequestReset,
    ConfirmReset,
    CancelReset,

    // Popups
    ToggleHelp,
    CloseHelp,

    /// Dismiss the screen
    Back,
}

/// Focusable area of the screen
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum Panel {
    Source,
    #[default]
    Servers,
}

impl Panel {
    pub fn next(&self) -> Panel {
        match self {
            Panel::Source => Panel::Servers,
            Panel::Servers => Panel::Source,
        }
    }

    pub fn prev(&self) -> Panel {
        // Two panels: same as next
        self.next()
    }
}

/// Input mode
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Editing,
}

/// Convert a key event to a UiEvent based on current UI context
pub fn key_to_ui_event(
    key: KeyEvent,
    active_panel: Panel,
    input_mode: InputMode,
    show_help: bool,
    show_reset_confirm: bool,
) -> Option<UiEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') => return Some(UiEvent::Back),
            KeyCode::Char('x') => return Some(UiEvent::CancelRefresh),
            _ => {}
        }
    }

    // Popups take every key while open
    if show_help {
        return Some(UiEvent::CloseHelp);
    }

    if show_reset_confirm {
        return match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => Some(UiEvent::ConfirmReset),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(UiEvent::CancelReset),
            _ => None,
        };
    }

    match input_mode {
        InputMode::Normal => match key.code {
            KeyCode::Char('q') | KeyCode::Char('b') | KeyCode::Esc => Some(UiEvent::Back),
            KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
            KeyCode::Char('r') => Some(UiEvent::Refresh),
            KeyCode::Char('x') => Some(UiEvent::RequestReset),
            KeyCode::Tab => Some(UiEvent::NextPanel),
            KeyCode::BackTab => Some(UiEvent::PrevPanel),
            KeyCode::Char('e') | KeyCode::Enter if active_panel == Panel::Source => {
                Some(UiEvent::StartEditing)
            }
            KeyCode::Enter | KeyCode::Char(' ') if active_panel == Panel::Servers => {
                Some(UiEvent::SelectHighlighted)
            }
            KeyCode::Up | KeyCode::Char('k') if active_panel == Panel::Servers => {
                Some(UiEvent::HighlightPrev)
            }
            KeyCode::Down | KeyCode::Char('j') if active_panel == Panel::Servers => {
                Some(UiEvent::HighlightNext)
            }
            _ => None,
        },
        InputMode::Editing => match key.code {
            KeyCode::Esc | KeyCode::Enter => Some(UiEvent::StopEditing),
            KeyCode::Left => Some(UiEvent::CursorLeft),
            KeyCode::Right => Some(UiEvent::CursorRight),
            KeyCode::Home => Some(UiEvent::CursorHome),
            KeyCode::End => Some(UiEvent::CursorEnd),
            KeyCode::Backspace => Some(UiEvent::Backspace),
            KeyCode::Delete => Some(UiEvent::Delete),
            KeyCode::Char(c) => Some(UiEvent::CharInput(c)),
            _ => None,
        },
    }
}
