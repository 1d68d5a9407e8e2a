//! Keyboard input mapping.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use xiangqi_board::Coord;

/// What a key press asks the application to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Move the keyboard cursor.
    Cursor(Coord),
    /// Click the cell under the cursor.
    Click,
    /// Start a new game.
    Reset,
    /// Leave the client.
    Quit,
    /// Nothing bound.
    None,
}

/// Moves the cursor with arrow keys or `hjkl`, stopping at the board edge.
pub fn move_cursor(cursor: Coord, key: KeyCode) -> Coord {
    let (drow, dcol) = match key {
        KeyCode::Up | KeyCode::Char('k') => (-1, 0),
        KeyCode::Down | KeyCode::Char('j') => (1, 0),
        KeyCode::Left | KeyCode::Char('h') => (0, -1),
        KeyCode::Right | KeyCode::Char('l') => (0, 1),
        _ => return cursor,
    };
    cursor.offset(drow, dcol).unwrap_or(cursor)
}

/// Maps a key press to an action.
pub fn action_for(key: KeyEvent, cursor: Coord) -> Action {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
        KeyCode::Char('r') => Action::Reset,
        KeyCode::Enter | KeyCode::Char(' ') => Action::Click,
        code => {
            let moved = move_cursor(cursor, code);
            if moved == cursor {
                Action::None
            } else {
                Action::Cursor(moved)
            }
        }
    }
}
