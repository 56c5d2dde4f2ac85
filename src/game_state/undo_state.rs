use std::collections::HashMap;

use crate::game_state::chess_types::Team;
use crate::game_state::fingerprint::PositionFingerprint;
use crate::moves::chess_move::Move;
use crate::moves::piece::Piece;

/// Everything needed to put a board back exactly as it was: pieces, move
/// history, repetition counts and side to move. Derived caches are not saved;
/// they are rebuilt on the next read.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardSnapshot {
    pub(crate) pieces: Vec<Piece>,
    pub(crate) history: Vec<Move>,
    pub(crate) repetitions: HashMap<PositionFingerprint, u32>,
    pub(crate) side_to_move: Team,
}

impl BoardSnapshot {
    pub fn side_to_move(&self) -> Team {
        self.side_to_move
    }

    pub fn ply(&self) -> usize {
        self.history.len()
    }
}
