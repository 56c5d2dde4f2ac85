use crate::game_state::board::Board;
use crate::moves::chess_move::Move;
use crate::moves::piece::Piece;

pub const ROOK_DIRECTIONS: [(i32, i32); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

pub fn generate_rook_moves(piece: &Piece, board: &Board, out: &mut Vec<Move>) {
    for (dx, dy) in ROOK_DIRECTIONS {
        trace_ray(piece, board, dx, dy, out);
    }
}

/// Extends a ray until it leaves the board or hits a piece. An enemy at the
/// end of the ray is a capture; an own piece ends the ray with no move.
pub(crate) fn trace_ray(piece: &Piece, board: &Board, dx: i32, dy: i32, out: &mut Vec<Move>) {
    let mut current = piece.square().offset(dx, dy);

    while let Some(target) = current {
        match board.check_square(target) {
            None => out.push(Move::quiet(piece, target)),
            Some(other) => {
                if other.team() != piece.team() {
                    out.push(Move::capture(piece, target));
                }
                break;
            }
        }
        current = target.offset(dx, dy);
    }
}
