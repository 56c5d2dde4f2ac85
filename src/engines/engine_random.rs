//! Random-move player.
//!
//! Selects uniformly from legal moves and is primarily used for diagnostics,
//! match smoke tests, and low-strength gameplay.

use rand::prelude::IndexedRandom;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::engines::engine_trait::Player;
use crate::errors::{ChessError, ChessResult};
use crate::game_state::board::Board;
use crate::game_state::chess_types::Team;
use crate::moves::chess_move::Move;

pub struct RandomPlayer {
    team: Team,
    rng: StdRng,
}

impl RandomPlayer {
    pub fn new(team: Team) -> Self {
        Self {
            team,
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn seeded(team: Team, seed: u64) -> Self {
        Self {
            team,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Player for RandomPlayer {
    fn team(&self) -> Team {
        self.team
    }

    fn name(&self) -> &str {
        "RandomPlayer"
    }

    fn choose_move(&mut self, board: &Board) -> ChessResult<Move> {
        let legal = board.legal_moves(self.team)?;
        legal.choose(&mut self.rng).copied().ok_or_else(|| {
            ChessError::SearchExhausted(format!("{:?} has no legal move", self.team))
        })
    }
}
