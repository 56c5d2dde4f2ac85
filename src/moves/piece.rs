//! Piece values and per-kind move generation dispatch.
//!
//! A piece is a plain value: kind, team, square and a has-moved flag. It does
//! not hold a reference to its board; move generation borrows the board it is
//! asked about. Equality and hashing use `(team, kind, square)` only, so a
//! forked copy compares equal to the original at the same logical position.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::game_state::board::Board;
use crate::game_state::chess_types::{PieceKind, Team};
use crate::game_state::square::Square;
use crate::moves::bishop_moves::generate_bishop_moves;
use crate::moves::chess_move::Move;
use crate::moves::king_moves::generate_king_moves;
use crate::moves::knight_moves::generate_knight_moves;
use crate::moves::pawn_moves::generate_pawn_moves;
use crate::moves::queen_moves::generate_queen_moves;
use crate::moves::rook_moves::generate_rook_moves;

#[derive(Debug, Clone, Copy)]
pub struct Piece {
    kind: PieceKind,
    team: Team,
    square: Square,
    moved: bool,
}

impl Piece {
    pub const fn new(kind: PieceKind, team: Team, square: Square) -> Self {
        Self {
            kind,
            team,
            square,
            moved: false,
        }
    }

    pub fn with_moved(mut self, moved: bool) -> Self {
        self.moved = moved;
        self
    }

    #[inline]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[inline]
    pub const fn team(&self) -> Team {
        self.team
    }

    #[inline]
    pub const fn square(&self) -> Square {
        self.square
    }

    #[inline]
    pub const fn has_moved(&self) -> bool {
        self.moved
    }

    /// Fixed material value of the piece kind.
    #[inline]
    pub const fn raw_value(&self) -> f64 {
        self.kind.raw_value()
    }

    /// Independent clone that keeps the has-moved flag.
    #[inline]
    pub const fn copy(&self) -> Self {
        *self
    }

    /// Pseudo-legal moves from the current square. Whether the mover's king is
    /// left in check is the board's concern, not the piece's.
    pub fn moves(&self, board: &Board) -> Vec<Move> {
        let mut out = Vec::with_capacity(16);
        self.moves_into(board, &mut out);
        out
    }

    pub fn moves_into(&self, board: &Board, out: &mut Vec<Move>) {
        match self.kind {
            PieceKind::Pawn => generate_pawn_moves(self, board, out),
            PieceKind::Knight => generate_knight_moves(self, board, out),
            PieceKind::Bishop => generate_bishop_moves(self, board, out),
            PieceKind::Rook => generate_rook_moves(self, board, out),
            PieceKind::Queen => generate_queen_moves(self, board, out),
            PieceKind::King => generate_king_moves(self, board, out),
        }
    }

    /// Whether any pseudo-legal move of this piece ends on `end`.
    pub fn reaches(&self, board: &Board, end: Square) -> bool {
        self.moves(board).iter().any(|m| m.end() == end)
    }

    pub(crate) fn relocate(&mut self, to: Square) {
        self.square = to;
        self.moved = true;
    }
}

impl PartialEq for Piece {
    fn eq(&self, other: &Self) -> bool {
        self.team == other.team && self.kind == other.kind && self.square == other.square
    }
}

impl Eq for Piece {}

impl Hash for Piece {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.team.hash(state);
        self.kind.hash(state);
        self.square.hash(state);
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.notation(), self.square)
    }
}

/// Shared target test for stepping pieces (knight, king): empty squares give a
/// quiet move, enemy-occupied squares a capture, own pieces nothing.
pub(crate) fn push_step_target(piece: &Piece, board: &Board, target: Square, out: &mut Vec<Move>) {
    match board.check_square(target) {
        None => out.push(Move::quiet(piece, target)),
        Some(other) if other.team() != piece.team() => out.push(Move::capture(piece, target)),
        Some(_) => {}
    }
}
