//! Move descriptors and their application to a board.
//!
//! A `Move` is an immutable value: team, moving piece kind, start and end
//! squares and a `MoveKind` carrying the variant payload. Castles record the
//! king's start and end; the rook squares are derived from the side and team
//! at apply time. Equality and hashing cover every field, so two promotions
//! to different targets are distinct moves.

use std::fmt;

use crate::errors::{ChessError, ChessResult};
use crate::game_state::board::Board;
use crate::game_state::chess_types::{PieceKind, PromotionPiece, Team};
use crate::game_state::square::Square;
use crate::moves::piece::Piece;

/// File the king starts on (e).
pub const KING_START_FILE: i32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastleSide {
    KingSide,
    QueenSide,
}

impl CastleSide {
    pub const ALL: [CastleSide; 2] = [CastleSide::KingSide, CastleSide::QueenSide];

    pub const fn rook_file(self) -> i32 {
        match self {
            CastleSide::KingSide => 7,
            CastleSide::QueenSide => 0,
        }
    }

    pub const fn king_target_file(self) -> i32 {
        match self {
            CastleSide::KingSide => 6,
            CastleSide::QueenSide => 2,
        }
    }

    pub const fn rook_target_file(self) -> i32 {
        match self {
            CastleSide::KingSide => 5,
            CastleSide::QueenSide => 3,
        }
    }

    /// Files strictly between king and rook; all must be empty.
    pub fn between_files(self) -> &'static [i32] {
        match self {
            CastleSide::KingSide => &[5, 6],
            CastleSide::QueenSide => &[1, 2, 3],
        }
    }

    /// Files the king crosses or lands on; none may be attacked.
    pub fn king_path_files(self) -> &'static [i32] {
        match self {
            CastleSide::KingSide => &[5, 6],
            CastleSide::QueenSide => &[3, 2],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    Quiet,
    Capture,
    KingSideCastle,
    QueenSideCastle,
    Promotion {
        target: PromotionPiece,
        capture: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    team: Team,
    piece: PieceKind,
    start: Square,
    end: Square,
    kind: MoveKind,
}

impl Move {
    pub fn quiet(piece: &Piece, end: Square) -> Self {
        Self::from_piece(piece, end, MoveKind::Quiet)
    }

    pub fn capture(piece: &Piece, end: Square) -> Self {
        Self::from_piece(piece, end, MoveKind::Capture)
    }

    pub fn promote(piece: &Piece, end: Square, target: PromotionPiece, capture: bool) -> Self {
        Self::from_piece(piece, end, MoveKind::Promotion { target, capture })
    }

    pub fn castle(team: Team, side: CastleSide) -> Self {
        let rank = team.back_rank();
        let start = Square::new_unchecked(KING_START_FILE, rank);
        let end = Square::new_unchecked(side.king_target_file(), rank);
        Self {
            team,
            piece: PieceKind::King,
            start,
            end,
            kind: match side {
                CastleSide::KingSide => MoveKind::KingSideCastle,
                CastleSide::QueenSide => MoveKind::QueenSideCastle,
            },
        }
    }

    pub fn king_side_castle(team: Team) -> Self {
        Self::castle(team, CastleSide::KingSide)
    }

    pub fn queen_side_castle(team: Team) -> Self {
        Self::castle(team, CastleSide::QueenSide)
    }

    fn from_piece(piece: &Piece, end: Square, kind: MoveKind) -> Self {
        Self {
            team: piece.team(),
            piece: piece.kind(),
            start: piece.square(),
            end,
            kind,
        }
    }

    #[inline]
    pub const fn team(&self) -> Team {
        self.team
    }

    #[inline]
    pub const fn piece(&self) -> PieceKind {
        self.piece
    }

    #[inline]
    pub const fn start(&self) -> Square {
        self.start
    }

    #[inline]
    pub const fn end(&self) -> Square {
        self.end
    }

    #[inline]
    pub const fn kind(&self) -> MoveKind {
        self.kind
    }

    pub const fn is_capture(&self) -> bool {
        matches!(
            self.kind,
            MoveKind::Capture | MoveKind::Promotion { capture: true, .. }
        )
    }

    pub const fn castle_side(&self) -> Option<CastleSide> {
        match self.kind {
            MoveKind::KingSideCastle => Some(CastleSide::KingSide),
            MoveKind::QueenSideCastle => Some(CastleSide::QueenSide),
            _ => None,
        }
    }

    pub const fn promotion(&self) -> Option<PromotionPiece> {
        match self.kind {
            MoveKind::Promotion { target, .. } => Some(target),
            _ => None,
        }
    }

    /// Applies the move in place. Validation happens before any mutation, so
    /// on error the board is untouched.
    ///
    /// This moves pieces only. History, side to move and repetition counts
    /// are the caller's concern; see `Board::do_move`.
    pub fn apply(&self, board: &mut Board) -> ChessResult<()> {
        match self.castle_side() {
            Some(side) => self.apply_castle(board, side),
            None => self.apply_step(board),
        }
    }

    fn apply_step(&self, board: &mut Board) -> ChessResult<()> {
        let mover = match board.check_square(self.start) {
            Some(p) if p.team() == self.team && p.kind() == self.piece => *p,
            Some(p) => {
                return Err(ChessError::InvalidMove(format!(
                    "{self}: {} does not belong to this move",
                    p
                )))
            }
            None => {
                return Err(ChessError::InvalidMove(format!(
                    "{self}: no piece on {}",
                    self.start
                )))
            }
        };

        if !mover.moves(board).contains(self) {
            return Err(ChessError::InvalidMove(format!(
                "{self}: {} cannot reach {}",
                mover, self.end
            )));
        }

        board.lift_piece(self.end);
        board.lift_piece(self.start);

        match self.kind {
            MoveKind::Promotion { target, .. } => {
                let promoted = Piece::new(target.piece_kind(), self.team, self.end).with_moved(true);
                board.place_piece(promoted);
            }
            _ => {
                let mut moved = mover;
                moved.relocate(self.end);
                board.place_piece(moved);
            }
        }
        Ok(())
    }

    fn apply_castle(&self, board: &mut Board, side: CastleSide) -> ChessResult<()> {
        if !board.can_castle(self.team, side)? {
            return Err(ChessError::InvalidMove(format!(
                "{self}: {:?} cannot castle {:?}",
                self.team, side
            )));
        }

        let rank = self.team.back_rank();
        let rook_from = Square::new_unchecked(side.rook_file(), rank);
        let rook_to = Square::new_unchecked(side.rook_target_file(), rank);

        let (Some(mut king), Some(mut rook)) = (board.lift_piece(self.start), board.lift_piece(rook_from))
        else {
            return Err(ChessError::InvalidMove(format!("{self}: castling pieces missing")));
        };
        king.relocate(self.end);
        rook.relocate(rook_to);
        board.place_piece(king);
        board.place_piece(rook);
        Ok(())
    }
}

/// Long-form text: piece letter, start, `-` or `x`, end, then `=Q` style
/// suffix for promotions. Castles print as `o-o` and `o-o-o`.
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            MoveKind::KingSideCastle => f.write_str("o-o"),
            MoveKind::QueenSideCastle => f.write_str("o-o-o"),
            _ => {
                let sep = if self.is_capture() { 'x' } else { '-' };
                write!(f, "{}{}{}{}", self.piece.notation(), self.start, sep, self.end)?;
                if let Some(target) = self.promotion() {
                    write!(f, "={target}")?;
                }
                Ok(())
            }
        }
    }
}
