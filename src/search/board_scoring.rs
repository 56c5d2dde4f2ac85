//! Static position scoring.
//!
//! Search delegates leaf evaluation to the `Heuristic` trait so scoring can be
//! swapped without touching the search. Scores are in pawns and always from
//! the perspective of the `team` argument, not the side to move.

use std::sync::Arc;

use crate::errors::ChessResult;
use crate::game_state::board::Board;
use crate::game_state::chess_types::Team;
use crate::search::piece_evaluators::{PieceEvaluator, PositionalPieceEvaluator};

/// Magnitude added or subtracted when one side is checkmated.
pub const MATE_SCORE: f64 = 1000.0;

/// Scores at or beyond this magnitude denote a forced mate.
pub const MATE_THRESHOLD: f64 = MATE_SCORE - 200.0;

/// Centre of the draw band.
pub const DRAW_SCORE: f64 = 0.0;

/// Half-width of the draw band.
pub const DRAW_EPSILON: f64 = 0.1;

pub trait Heuristic: Send + Sync {
    fn score(&self, board: &Board, team: Team) -> ChessResult<f64>;
}

/// Score of a drawn position for the side whose material lead is `balance`.
/// A side that is ahead sees the draw as slightly bad, one that is behind as
/// slightly good; the result never leaves the epsilon band.
#[inline]
pub fn draw_score(balance: f64) -> f64 {
    DRAW_SCORE - balance.clamp(-DRAW_EPSILON, DRAW_EPSILON)
}

/// Mate found `ply` half-moves from the root, from the winner's side. Shorter
/// mates score higher.
#[inline]
pub fn mate_in(ply: u32) -> f64 {
    MATE_SCORE - f64::from(ply)
}

#[inline]
pub fn is_mate_score(score: f64) -> bool {
    score.abs() >= MATE_THRESHOLD
}

/// Mobility times `space_weight`, plus own material minus the opponent's.
///
/// A checkmate adds `±MATE_SCORE`. Stalemate and threefold repetition
/// collapse the score into the draw band.
#[derive(Clone)]
pub struct MaterialHeuristic {
    space_weight: f64,
    evaluator: Arc<dyn PieceEvaluator>,
}

impl Default for MaterialHeuristic {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl MaterialHeuristic {
    pub fn new(space_weight: f64) -> Self {
        Self::with_evaluator(space_weight, Arc::new(PositionalPieceEvaluator::default()))
    }

    pub fn with_evaluator(space_weight: f64, evaluator: Arc<dyn PieceEvaluator>) -> Self {
        Self {
            space_weight,
            evaluator,
        }
    }

    pub fn space_weight(&self) -> f64 {
        self.space_weight
    }

    pub fn evaluator(&self) -> &dyn PieceEvaluator {
        self.evaluator.as_ref()
    }

    fn balance(&self, board: &Board, team: Team) -> f64 {
        board.material(team, self.evaluator.as_ref())
            - board.material(team.opposite(), self.evaluator.as_ref())
    }
}

impl std::fmt::Debug for MaterialHeuristic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MaterialHeuristic")
            .field("space_weight", &self.space_weight)
            .finish_non_exhaustive()
    }
}

impl Heuristic for MaterialHeuristic {
    fn score(&self, board: &Board, team: Team) -> ChessResult<f64> {
        let balance = self.balance(board, team);

        let to_move = board.side_to_move();
        let stuck = !board.has_legal_move(to_move)?;
        if stuck && !board.in_check(to_move)? || board.is_draw_by_threefold_repetition() {
            return Ok(draw_score(balance));
        }

        let space = if self.space_weight == 0.0 {
            0.0
        } else {
            board.pseudo_moves(team).len() as f64 * self.space_weight
        };

        let mate = if !stuck {
            0.0
        } else if to_move == team {
            -MATE_SCORE
        } else {
            MATE_SCORE
        };

        Ok(space + balance + mate)
    }
}
