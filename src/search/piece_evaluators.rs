//! Per-piece valuation used by the heuristics and by move ordering.

use std::sync::Arc;

use crate::game_state::board::Board;
use crate::game_state::chess_types::{PieceKind, Team};
use crate::moves::piece::Piece;
use crate::search::endgame::{EndgameEvaluator, SpeelmanEndgame};
use crate::search::piece_square_tables::{lookup, table_for};

pub trait PieceEvaluator: Send + Sync {
    /// Value of a single piece considered on its own.
    fn value(&self, piece: &Piece) -> f64;

    /// Material for `team`. Need not equal the sum of individual values.
    fn material_value(&self, board: &Board, team: Team) -> f64 {
        board.pieces_of(team).map(|p| self.value(p)).sum()
    }
}

/// Classical 1/3/3/5/9 counting with no positional term.
#[derive(Debug, Clone, Copy, Default)]
pub struct VanillaPieceEvaluator;

impl PieceEvaluator for VanillaPieceEvaluator {
    fn value(&self, piece: &Piece) -> f64 {
        piece.kind().vanilla_value()
    }
}

/// Raw value plus a piece-square bonus. In the endgame the king is scored on
/// the centralising table instead.
#[derive(Clone)]
pub struct PositionalPieceEvaluator {
    endgame: Arc<dyn EndgameEvaluator>,
}

impl Default for PositionalPieceEvaluator {
    fn default() -> Self {
        Self::new(Arc::new(SpeelmanEndgame))
    }
}

impl PositionalPieceEvaluator {
    pub fn new(endgame: Arc<dyn EndgameEvaluator>) -> Self {
        Self { endgame }
    }

    pub fn value_in_phase(&self, piece: &Piece, endgame: bool) -> f64 {
        let table = table_for(piece.kind(), endgame);
        piece.raw_value() + lookup(table, piece.team(), piece.square())
    }
}

impl std::fmt::Debug for PositionalPieceEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PositionalPieceEvaluator").finish_non_exhaustive()
    }
}

impl PieceEvaluator for PositionalPieceEvaluator {
    fn value(&self, piece: &Piece) -> f64 {
        self.value_in_phase(piece, false)
    }

    fn material_value(&self, board: &Board, team: Team) -> f64 {
        let endgame = self.endgame.in_endgame(board);
        board
            .pieces_of(team)
            .map(|p| self.value_in_phase(p, endgame && p.kind() == PieceKind::King))
            .sum()
    }
}
