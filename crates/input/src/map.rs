//! Key mapping from terminal events to game actions.

use crate::types::{Axis, Direction, GameCommand, Spin};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What a key press asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    Command(GameCommand),
    /// Orbit the camera one step towards decreasing yaw.
    OrbitLeft,
    /// Orbit the camera one step towards increasing yaw.
    OrbitRight,
}

/// Map keyboard input to an action.
///
/// Letter bindings are case-insensitive. Digits mirror the rotation letters
/// for keypad use.
pub fn map_key(key: KeyEvent) -> Option<InputAction> {
    if should_quit(key) {
        return None;
    }

    let command = match key.code {
        KeyCode::Left => return Some(InputAction::OrbitLeft),
        KeyCode::Right => return Some(InputAction::OrbitRight),

        // Movement
        KeyCode::Char('a') | KeyCode::Char('A') => GameCommand::Move(Direction::Left),
        KeyCode::Char('d') | KeyCode::Char('D') => GameCommand::Move(Direction::Right),
        KeyCode::Char('w') | KeyCode::Char('W') => GameCommand::Move(Direction::Forward),
        KeyCode::Char('s') | KeyCode::Char('S') => GameCommand::Move(Direction::Backward),

        // Rotation
        KeyCode::Char('o') | KeyCode::Char('O') | KeyCode::Char('7') => {
            GameCommand::Rotate(Axis::X, Spin::Ccw)
        }
        KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Char('8') => {
            GameCommand::Rotate(Axis::X, Spin::Cw)
        }
        KeyCode::Char('k') | KeyCode::Char('K') | KeyCode::Char('4') => {
            GameCommand::Rotate(Axis::Y, Spin::Cw)
        }
        KeyCode::Char('l') | KeyCode::Char('L') | KeyCode::Char('5') => {
            GameCommand::Rotate(Axis::Y, Spin::Ccw)
        }
        KeyCode::Char('m') | KeyCode::Char('M') | KeyCode::Char('1') => {
            GameCommand::Rotate(Axis::Z, Spin::Ccw)
        }
        KeyCode::Char(',') | KeyCode::Char('2') => GameCommand::Rotate(Axis::Z, Spin::Cw),

        // Drops
        KeyCode::Char(' ') => GameCommand::HardDrop,
        KeyCode::Down | KeyCode::Char('x') | KeyCode::Char('X') => GameCommand::SoftDrop,

        // Actions
        KeyCode::Char('c') | KeyCode::Char('C') | KeyCode::Tab => GameCommand::Hold,
        KeyCode::Esc => GameCommand::Pause,
        KeyCode::Char('r') | KeyCode::Char('R') => GameCommand::Restart,

        _ => return None,
    };
    Some(InputAction::Command(command))
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn cmd(code: KeyCode) -> Option<GameCommand> {
        match map_key(KeyEvent::from(code)) {
            Some(InputAction::Command(cmd)) => Some(cmd),
            _ => None,
        }
    }

    #[test]
    fn test_movement_keys() {
        assert_eq!(cmd(KeyCode::Char('a')), Some(GameCommand::Move(Direction::Left)));
        assert_eq!(cmd(KeyCode::Char('D')), Some(GameCommand::Move(Direction::Right)));
        assert_eq!(cmd(KeyCode::Char('w')), Some(GameCommand::Move(Direction::Forward)));
        assert_eq!(cmd(KeyCode::Char('s')), Some(GameCommand::Move(Direction::Backward)));
    }

    #[test]
    fn test_rotation_keys_and_keypad_aliases() {
        let pairs = [('o', '7'), ('p', '8'), ('k', '4'), ('l', '5'), ('m', '1'), (',', '2')];
        for (letter, digit) in pairs {
            let by_letter = cmd(KeyCode::Char(letter));
            assert!(matches!(by_letter, Some(GameCommand::Rotate(..))));
            assert_eq!(by_letter, cmd(KeyCode::Char(digit)));
        }
        assert_eq!(cmd(KeyCode::Char('p')), Some(GameCommand::Rotate(Axis::X, Spin::Cw)));
        assert_eq!(cmd(KeyCode::Char('k')), Some(GameCommand::Rotate(Axis::Y, Spin::Cw)));
        assert_eq!(cmd(KeyCode::Char('m')), Some(GameCommand::Rotate(Axis::Z, Spin::Ccw)));
    }

    #[test]
    fn test_action_keys() {
        assert_eq!(cmd(KeyCode::Char(' ')), Some(GameCommand::HardDrop));
        assert_eq!(cmd(KeyCode::Down), Some(GameCommand::SoftDrop));
        assert_eq!(cmd(KeyCode::Tab), Some(GameCommand::Hold));
        assert_eq!(cmd(KeyCode::Esc), Some(GameCommand::Pause));
        assert_eq!(cmd(KeyCode::Char('r')), Some(GameCommand::Restart));
    }

    #[test]
    fn test_arrows_orbit() {
        assert_eq!(map_key(KeyEvent::from(KeyCode::Left)), Some(InputAction::OrbitLeft));
        assert_eq!(map_key(KeyEvent::from(KeyCode::Right)), Some(InputAction::OrbitRight));
        assert_eq!(map_key(KeyEvent::from(KeyCode::Up)), None);
    }

    #[test]
    fn test_quit_keys() {
        assert!(should_quit(KeyEvent::from(KeyCode::Char('q'))));
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(should_quit(ctrl_c));
        assert_eq!(map_key(ctrl_c), None);
        assert!(!should_quit(KeyEvent::from(KeyCode::Char('x'))));
    }
}
