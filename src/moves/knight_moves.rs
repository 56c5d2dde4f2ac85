use crate::game_state::board::Board;
use crate::moves::chess_move::Move;
use crate::moves::piece::{push_step_target, Piece};

pub const KNIGHT_OFFSETS: [(i32, i32); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

/// Knights jump, so intervening pieces never block them.
pub fn generate_knight_moves(piece: &Piece, board: &Board, out: &mut Vec<Move>) {
    for (dx, dy) in KNIGHT_OFFSETS {
        if let Some(target) = piece.square().offset(dx, dy) {
            push_step_target(piece, board, target, out);
        }
    }
}
