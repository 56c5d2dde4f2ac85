//! King stepping moves.
//!
//! Only the eight adjacent squares are generated here. Castling is produced by
//! the board, which owns the eligibility rules, and self-check is filtered by
//! the board as well.

use crate::game_state::board::Board;
use crate::moves::chess_move::Move;
use crate::moves::piece::{push_step_target, Piece};

pub const KING_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

pub fn generate_king_moves(piece: &Piece, board: &Board, out: &mut Vec<Move>) {
    for (dx, dy) in KING_OFFSETS {
        if let Some(target) = piece.square().offset(dx, dy) {
            push_step_target(piece, board, target, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::game_state::board::Board;
    use crate::game_state::chess_types::{PieceKind, Team};
    use crate::moves::piece::Piece;

    fn sq(s: &str) -> crate::game_state::square::Square {
        s.parse().expect("valid square")
    }

    #[test]
    fn corner_king_has_three_moves() {
        let mut board = Board::new();
        let king = Piece::new(PieceKind::King, Team::White, sq("a1"));
        board.add_piece(king).expect("empty square");
        assert_eq!(king.moves(&board).len(), 3);
    }

    #[test]
    fn king_may_step_into_attacked_square_pseudo_legally() {
        let mut board = Board::new();
        let king = Piece::new(PieceKind::King, Team::White, sq("e1"));
        board.add_piece(king).expect("empty square");
        board
            .add_piece(Piece::new(PieceKind::Rook, Team::Black, sq("a2")))
            .expect("empty square");
        let ends: Vec<String> = king.moves(&board).iter().map(|m| m.end().to_string()).collect();
        assert!(ends.contains(&"e2".to_owned()));
    }
}
