//! Endgame switches that decide when the king should centralise.

use crate::game_state::board::Board;
use crate::game_state::chess_types::{PieceKind, Team};

pub trait EndgameEvaluator: Send + Sync {
    fn in_endgame(&self, board: &Board) -> bool;
}

/// Both sides hold at most `SPEELMAN_LIMIT` raw material besides the king.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpeelmanEndgame;

pub const SPEELMAN_LIMIT: f64 = 13.0;

impl EndgameEvaluator for SpeelmanEndgame {
    fn in_endgame(&self, board: &Board) -> bool {
        Team::ALL.into_iter().all(|team| {
            let material: f64 = board
                .pieces_of(team)
                .filter(|p| p.kind() != PieceKind::King)
                .map(|p| p.raw_value())
                .sum();
            material <= SPEELMAN_LIMIT
        })
    }
}

/// At most `MINEV_LIMIT` pieces other than kings and pawns remain in total.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinevEndgame;

pub const MINEV_LIMIT: usize = 4;

impl EndgameEvaluator for MinevEndgame {
    fn in_endgame(&self, board: &Board) -> bool {
        board
            .pieces()
            .iter()
            .filter(|p| !matches!(p.kind(), PieceKind::King | PieceKind::Pawn))
            .count()
            <= MINEV_LIMIT
    }
}
