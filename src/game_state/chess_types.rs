//! Core value types shared by the board, move and search layers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ChessError;

/// Side of a piece or move. White moves up the board (+1), black down (-1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Team {
    White,
    Black,
}

impl Team {
    pub const ALL: [Team; 2] = [Team::White, Team::Black];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Team::White => 0,
            Team::Black => 1,
        }
    }

    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Team::White => Team::Black,
            Team::Black => Team::White,
        }
    }

    /// Direction of pawn travel along y.
    #[inline]
    pub const fn sign(self) -> i32 {
        match self {
            Team::White => 1,
            Team::Black => -1,
        }
    }

    #[inline]
    pub const fn from_sign(sign: i32) -> Option<Self> {
        match sign {
            1 => Some(Team::White),
            -1 => Some(Team::Black),
            _ => None,
        }
    }

    /// Rank the pieces of this team start on.
    #[inline]
    pub const fn back_rank(self) -> i32 {
        match self {
            Team::White => 1,
            Team::Black => 8,
        }
    }

    /// Rank a pawn of this team promotes on.
    #[inline]
    pub const fn promotion_rank(self) -> i32 {
        match self {
            Team::White => 8,
            Team::Black => 1,
        }
    }
}

/// Piece kind (team is stored separately on the piece).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

pub const KING_VALUE: f64 = 200.0;
pub const QUEEN_VALUE: f64 = 9.0;
pub const ROOK_VALUE: f64 = 5.0;
pub const BISHOP_VALUE: f64 = 3.3;
pub const KNIGHT_VALUE: f64 = 3.2;
pub const PAWN_VALUE: f64 = 1.0;

/// Stand-in for an unbounded king value in the classical 1/3/3/5/9 scale.
pub const VANILLA_KING_VALUE: f64 = 1.0e6;

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            PieceKind::Pawn => 0,
            PieceKind::Knight => 1,
            PieceKind::Bishop => 2,
            PieceKind::Rook => 3,
            PieceKind::Queen => 4,
            PieceKind::King => 5,
        }
    }

    /// Letter used in move text. Pawns have none.
    pub const fn notation(self) -> &'static str {
        match self {
            PieceKind::Pawn => "",
            PieceKind::Knight => "N",
            PieceKind::Bishop => "B",
            PieceKind::Rook => "R",
            PieceKind::Queen => "Q",
            PieceKind::King => "K",
        }
    }

    pub const fn raw_value(self) -> f64 {
        match self {
            PieceKind::Pawn => PAWN_VALUE,
            PieceKind::Knight => KNIGHT_VALUE,
            PieceKind::Bishop => BISHOP_VALUE,
            PieceKind::Rook => ROOK_VALUE,
            PieceKind::Queen => QUEEN_VALUE,
            PieceKind::King => KING_VALUE,
        }
    }

    pub const fn vanilla_value(self) -> f64 {
        match self {
            PieceKind::Pawn => 1.0,
            PieceKind::Knight => 3.0,
            PieceKind::Bishop => 3.0,
            PieceKind::Rook => 5.0,
            PieceKind::Queen => 9.0,
            PieceKind::King => VANILLA_KING_VALUE,
        }
    }
}

/// Closed set of pieces a pawn may promote to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PromotionPiece {
    Queen,
    Rook,
    Bishop,
    Knight,
}

impl PromotionPiece {
    pub const ALL: [PromotionPiece; 4] = [
        PromotionPiece::Queen,
        PromotionPiece::Rook,
        PromotionPiece::Bishop,
        PromotionPiece::Knight,
    ];

    #[inline]
    pub const fn piece_kind(self) -> PieceKind {
        match self {
            PromotionPiece::Queen => PieceKind::Queen,
            PromotionPiece::Rook => PieceKind::Rook,
            PromotionPiece::Bishop => PieceKind::Bishop,
            PromotionPiece::Knight => PieceKind::Knight,
        }
    }

    pub const fn letter(self) -> char {
        match self {
            PromotionPiece::Queen => 'Q',
            PromotionPiece::Rook => 'R',
            PromotionPiece::Bishop => 'B',
            PromotionPiece::Knight => 'N',
        }
    }
}

impl FromStr for PromotionPiece {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "q" | "queen" => Ok(PromotionPiece::Queen),
            "r" | "rook" => Ok(PromotionPiece::Rook),
            "b" | "bishop" => Ok(PromotionPiece::Bishop),
            "n" | "knight" => Ok(PromotionPiece::Knight),
            _ => Err(ChessError::UnknownPromotion(s.to_owned())),
        }
    }
}

impl fmt::Display for PromotionPiece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn team_sign_round_trips() {
        for team in Team::ALL {
            assert_eq!(Team::from_sign(team.sign()), Some(team));
            assert_eq!(team.opposite().opposite(), team);
        }
        assert_eq!(Team::from_sign(0), None);
    }

    #[test]
    fn promotion_parse_accepts_letters_and_names() {
        assert_eq!("Q".parse::<PromotionPiece>(), Ok(PromotionPiece::Queen));
        assert_eq!("knight".parse::<PromotionPiece>(), Ok(PromotionPiece::Knight));
        assert!(matches!(
            "King".parse::<PromotionPiece>(),
            Err(ChessError::UnknownPromotion(_))
        ));
    }

    #[test]
    fn minor_pieces_are_not_equal_in_raw_value() {
        assert!(PieceKind::Bishop.raw_value() > PieceKind::Knight.raw_value());
        assert_eq!(
            PieceKind::Bishop.vanilla_value(),
            PieceKind::Knight.vanilla_value()
        );
    }
}
