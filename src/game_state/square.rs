//! Validated board coordinates.
//!
//! Files are `x` in `0..=7` (a..h) and ranks are `y` in `1..=8`, matching how
//! squares are written in algebraic notation.

use std::fmt;
use std::str::FromStr;

use crate::errors::{ChessError, ChessResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    x: u8,
    y: u8,
}

impl Square {
    #[inline]
    pub const fn is_valid(x: i32, y: i32) -> bool {
        x >= 0 && x <= 7 && y >= 1 && y <= 8
    }

    pub fn new(x: i32, y: i32) -> ChessResult<Self> {
        if !Self::is_valid(x, y) {
            return Err(ChessError::InvalidSquare { x, y });
        }
        Ok(Self {
            x: x as u8,
            y: y as u8,
        })
    }

    /// Caller guarantees `is_valid(x, y)`; used for fixed squares such as
    /// back-rank castling files.
    #[inline]
    pub(crate) const fn new_unchecked(x: i32, y: i32) -> Self {
        debug_assert!(Self::is_valid(x, y));
        Self {
            x: x as u8,
            y: y as u8,
        }
    }

    /// Square for a `0..64` index where a1 = 0, b1 = 1, ..., h8 = 63.
    pub fn from_index(index: usize) -> ChessResult<Self> {
        if index >= 64 {
            return Err(ChessError::InvalidSquare {
                x: (index % 8) as i32,
                y: (index / 8) as i32 + 1,
            });
        }
        Ok(Self {
            x: (index % 8) as u8,
            y: (index / 8) as u8 + 1,
        })
    }

    #[inline]
    pub const fn x(self) -> i32 {
        self.x as i32
    }

    #[inline]
    pub const fn y(self) -> i32 {
        self.y as i32
    }

    #[inline]
    pub const fn index(self) -> usize {
        (self.y as usize - 1) * 8 + self.x as usize
    }

    #[inline]
    pub const fn bit(self) -> u64 {
        1u64 << self.index()
    }

    /// The square `(dx, dy)` away, if it is still on the board.
    #[inline]
    pub fn offset(self, dx: i32, dy: i32) -> Option<Self> {
        let x = self.x() + dx;
        let y = self.y() + dy;
        if Self::is_valid(x, y) {
            Some(Self {
                x: x as u8,
                y: y as u8,
            })
        } else {
            None
        }
    }
}

impl FromStr for Square {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 || !bytes[0].is_ascii_lowercase() || !bytes[1].is_ascii_digit() {
            return Err(ChessError::InvalidSquareNotation(s.to_owned()));
        }
        let x = i32::from(bytes[0] - b'a');
        let y = i32::from(bytes[1] - b'0');
        Self::new(x, y).map_err(|_| ChessError::InvalidSquareNotation(s.to_owned()))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.x) as char, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_rejects_out_of_range() {
        assert!(Square::new(0, 1).is_ok());
        assert!(Square::new(7, 8).is_ok());
        assert_eq!(
            Square::new(8, 1),
            Err(ChessError::InvalidSquare { x: 8, y: 1 })
        );
        assert!(Square::new(0, 0).is_err());
        assert!(Square::new(-1, 4).is_err());
    }

    #[test]
    fn algebraic_format_and_parse_agree() {
        let e4 = Square::new(4, 4).expect("valid square");
        assert_eq!(e4.to_string(), "e4");
        assert_eq!("e4".parse::<Square>(), Ok(e4));
        assert_eq!("h8".parse::<Square>().map(|s| s.index()), Ok(63));
    }

    #[test]
    fn parse_rejects_bad_notation() {
        for bad in ["", "e", "E4", "e9", "i1", "e44", "4e"] {
            assert!(bad.parse::<Square>().is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn offset_stays_on_board() {
        let a1 = Square::new(0, 1).expect("valid square");
        assert_eq!(a1.offset(-1, 0), None);
        assert_eq!(a1.offset(1, 1).map(|s| s.to_string()), Some("b2".to_owned()));
        assert_eq!(Square::from_index(a1.index()), Ok(a1));
    }
}
