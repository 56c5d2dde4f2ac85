//! Pawn pushes, double pushes, diagonal captures and promotions.
//!
//! There is no en-passant. A pawn landing on its promotion rank produces one
//! move per promotion target instead of a plain move, for pushes and captures
//! alike.

use crate::game_state::board::Board;
use crate::game_state::chess_types::PromotionPiece;
use crate::game_state::square::Square;
use crate::moves::chess_move::Move;
use crate::moves::piece::Piece;

const CAPTURE_FILES: [i32; 2] = [-1, 1];

pub fn generate_pawn_moves(piece: &Piece, board: &Board, out: &mut Vec<Move>) {
    let team = piece.team();
    let dir = team.sign();
    let from = piece.square();

    if let Some(one) = from.offset(0, dir) {
        if board.check_square(one).is_none() {
            push_pawn_target(piece, one, false, out);

            if !piece.has_moved() {
                if let Some(two) = one.offset(0, dir) {
                    if board.check_square(two).is_none() {
                        out.push(Move::quiet(piece, two));
                    }
                }
            }
        }
    }

    for dx in CAPTURE_FILES {
        let Some(target) = from.offset(dx, dir) else {
            continue;
        };
        if matches!(board.check_square(target), Some(other) if other.team() != team) {
            push_pawn_target(piece, target, true, out);
        }
    }
}

fn push_pawn_target(piece: &Piece, target: Square, capture: bool, out: &mut Vec<Move>) {
    if target.y() == piece.team().promotion_rank() {
        for promotion in PromotionPiece::ALL {
            out.push(Move::promote(piece, target, promotion, capture));
        }
    } else if capture {
        out.push(Move::capture(piece, target));
    } else {
        out.push(Move::quiet(piece, target));
    }
}
