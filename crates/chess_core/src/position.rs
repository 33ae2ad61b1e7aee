use std::fmt;

use crate::board::BOARD_SIZE;

/// A board coordinate. Files and ranks are zero based (a1 is `(0, 0)`).
///
/// Values outside `0..BOARD_SIZE` are representable on purpose: move
/// generation steps off the edge freely and the board reports such
/// squares as empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub file: i8, // a-h (0-7)
    pub rank: i8, // 1-8 (0-7)
}

impl Position {
    pub const fn new(file: i8, rank: i8) -> Self {
        Self { file, rank }
    }

    pub fn is_on_board(self) -> bool {
        (0..BOARD_SIZE).contains(&self.file) && (0..BOARD_SIZE).contains(&self.rank)
    }

    pub const fn offset(self, file_step: i8, rank_step: i8) -> Self {
        Self {
            file: self.file + file_step,
            rank: self.rank + rank_step,
        }
    }

    pub fn from_algebraic(notation: &str) -> Option<Self> {
        let mut chars = notation.chars();
        let file = chars.next()?;
        let rank = chars.next()?;
        if chars.next().is_some() {
            return None;
        }

        if !('a'..='h').contains(&file) || !('1'..='8').contains(&rank) {
            return None;
        }

        Some(Self {
            file: (file as u8 - b'a') as i8,
            rank: (rank as u8 - b'1') as i8,
        })
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_on_board() {
            write!(f, "{}{}", (b'a' + self.file as u8) as char, self.rank + 1)
        } else {
            write!(f, "({}, {})", self.file, self.rank)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn algebraic_corners() {
        assert_eq!(Position::from_algebraic("a1"), Some(Position::new(0, 0)));
        assert_eq!(Position::from_algebraic("h8"), Some(Position::new(7, 7)));
        assert_eq!(Position::from_algebraic("e4").map(|p| p.to_string()), Some("e4".into()));
    }

    #[test]
    fn rejects_bad_notation() {
        assert_eq!(Position::from_algebraic("i1"), None);
        assert_eq!(Position::from_algebraic("a9"), None);
        assert_eq!(Position::from_algebraic("a10"), None);
        assert_eq!(Position::from_algebraic(""), None);
    }

    #[test]
    fn bounds() {
        assert!(Position::new(7, 0).is_on_board());
        assert!(!Position::new(8, 0).is_on_board());
        assert!(!Position::new(0, -1).is_on_board());
        assert_eq!(Position::new(-1, 3).to_string(), "(-1, 3)");
    }
}
