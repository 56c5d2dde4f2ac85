use crate::game_state::board::Board;
use crate::moves::chess_move::Move;
use crate::moves::piece::Piece;
use crate::moves::rook_moves::trace_ray;

pub const BISHOP_DIRECTIONS: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

pub fn generate_bishop_moves(piece: &Piece, board: &Board, out: &mut Vec<Move>) {
    for (dx, dy) in BISHOP_DIRECTIONS {
        trace_ray(piece, board, dx, dy, out);
    }
}
