//! One-ply positional player.
//!
//! Scores each legal move by the heuristic value of the resulting position,
//! docks the mover's value when it lands on a square the opponent attacks
//! more often than it is defended, and takes any immediate checkmate.

use std::sync::Arc;

use crate::engines::engine_trait::Player;
use crate::errors::{ChessError, ChessResult};
use crate::game_state::board::Board;
use crate::game_state::chess_types::{PieceKind, Team};
use crate::moves::chess_move::Move;
use crate::moves::piece::Piece;
use crate::search::board_scoring::{Heuristic, MaterialHeuristic};

pub const POSITIONAL_SPACE_WEIGHT: f64 = 0.02;
const CHECKMATE_BONUS: f64 = 99_999.0;

pub struct PositionalPlayer {
    team: Team,
    heuristic: Arc<dyn Heuristic>,
}

impl PositionalPlayer {
    pub fn new(team: Team) -> Self {
        Self {
            team,
            heuristic: Arc::new(MaterialHeuristic::new(POSITIONAL_SPACE_WEIGHT)),
        }
    }

    pub fn with_heuristic(team: Team, heuristic: Arc<dyn Heuristic>) -> Self {
        Self { team, heuristic }
    }

    /// Score of playing `mv` on `board`, from this player's point of view.
    pub fn score_move(&self, board: &Board, mv: &Move) -> ChessResult<f64> {
        let mut after = board.fork();
        after.do_move(mv)?;

        if after.in_checkmate(self.team.opposite())? {
            return Ok(CHECKMATE_BONUS + self.heuristic.score(&after, self.team)?);
        }

        let mut score = self.heuristic.score(&after, self.team)?;
        if !self.is_safe(board, &after, mv)? {
            score -= mv.piece().raw_value();
        }
        Ok(score)
    }

    fn is_safe(&self, before: &Board, after: &Board, mv: &Move) -> ChessResult<bool> {
        if mv.piece() == PieceKind::Pawn || mv.castle_side().is_some() {
            return Ok(true);
        }
        if let Some(victim) = before.check_square(mv.end()) {
            if victim.raw_value() >= mv.piece().raw_value() {
                return Ok(true);
            }
        }

        let end = mv.end();
        let attackers = after.attackers(end, self.team.opposite());
        if attackers == 0 {
            return Ok(true);
        }

        // Count recaptures: put an enemy on the landing square and see which
        // of our remaining pieces reach it.
        let mut probe = after.fork();
        let landed = probe.remove_piece(end)?;
        probe.add_piece(Piece::new(landed.kind(), self.team.opposite(), end))?;
        let defenders = probe.attackers(end, self.team);
        Ok(defenders >= attackers)
    }
}

impl Player for PositionalPlayer {
    fn team(&self) -> Team {
        self.team
    }

    fn name(&self) -> &str {
        "PositionalPlayer"
    }

    fn choose_move(&mut self, board: &Board) -> ChessResult<Move> {
        let mut best: Option<(f64, Move)> = None;
        for mv in board.legal_moves(self.team)? {
            let score = self.score_move(board, mv)?;
            match best {
                Some((b, _)) if b >= score => {}
                _ => best = Some((score, *mv)),
            }
        }
        best.map(|(_, mv)| mv)
            .ok_or_else(|| ChessError::SearchExhausted(format!("{:?} has no legal move", self.team)))
    }
}
