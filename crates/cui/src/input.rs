use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    None,
    Quit,
    ToggleHelp,
    Dismiss,
    MoveUp,
    MoveDown,
    Activate,
    AddPlayer,
    RemovePlayer,
    RenamePlayer,
    CycleColor,
    HandicapUp,
    HandicapDown,
    ToggleHandicap,
    ToggleShotTimer,
    ClockShorter,
    ClockLonger,
    RestartClock,
    StartMatch,
    EditLocation,
    EnterDistance,
    HoleOut,
    PickClosest,
    ResetChips,
    PuttMade,
    PuttMissed,
    Finalize,
    Next,
    Undo,
    Redo,
    EndMatch,
    SaveState,
    LoadState,
    Export,
}

pub fn map_key(key: KeyEvent) -> InputAction {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('s') => InputAction::SaveState,
            KeyCode::Char('l') => InputAction::LoadState,
            KeyCode::Char('e') => InputAction::Export,
            KeyCode::Char('c') => InputAction::Quit,
            _ => InputAction::None,
        };
    }
    match key.code {
        KeyCode::Esc => InputAction::Dismiss,
        KeyCode::Up => InputAction::MoveUp,
        KeyCode::Down => InputAction::MoveDown,
        KeyCode::Enter => InputAction::Activate,
        KeyCode::Delete => InputAction::RemovePlayer,
        KeyCode::Char('q') => InputAction::Quit,
        KeyCode::Char('?') => InputAction::ToggleHelp,
        KeyCode::Char('k') => InputAction::MoveUp,
        KeyCode::Char('j') => InputAction::MoveDown,
        KeyCode::Char('a') => InputAction::AddPlayer,
        KeyCode::Char('e') => InputAction::RenamePlayer,
        KeyCode::Char('c') => InputAction::CycleColor,
        KeyCode::Char('+') | KeyCode::Char('=') => InputAction::HandicapUp,
        KeyCode::Char('-') => InputAction::HandicapDown,
        KeyCode::Char('g') => InputAction::ToggleHandicap,
        KeyCode::Char('t') => InputAction::ToggleShotTimer,
        KeyCode::Char('[') => InputAction::ClockShorter,
        KeyCode::Char(']') => InputAction::ClockLonger,
        KeyCode::Char('r') => InputAction::RestartClock,
        KeyCode::Char('s') => InputAction::StartMatch,
        KeyCode::Char('l') => InputAction::EditLocation,
        KeyCode::Char('d') => InputAction::EnterDistance,
        KeyCode::Char('o') => InputAction::HoleOut,
        KeyCode::Char(' ') => InputAction::PickClosest,
        KeyCode::Char('z') => InputAction::ResetChips,
        KeyCode::Char('m') => InputAction::PuttMade,
        KeyCode::Char('x') => InputAction::PuttMissed,
        KeyCode::Char('f') => InputAction::Finalize,
        KeyCode::Char('n') => InputAction::Next,
        KeyCode::Char('u') => InputAction::Undo,
        KeyCode::Char('y') => InputAction::Redo,
        KeyCode::Char('E') => InputAction::EndMatch,
        KeyCode::Char('S') => InputAction::SaveState,
        KeyCode::Char('L') => InputAction::LoadState,
        KeyCode::Char('X') => InputAction::Export,
        _ => InputAction::None,
    }
}
