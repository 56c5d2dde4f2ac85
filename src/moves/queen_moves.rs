use crate::game_state::board::Board;
use crate::moves::bishop_moves::generate_bishop_moves;
use crate::moves::chess_move::Move;
use crate::moves::piece::Piece;
use crate::moves::rook_moves::generate_rook_moves;

/// Union of the bishop and rook rays.
pub fn generate_queen_moves(piece: &Piece, board: &Board, out: &mut Vec<Move>) {
    generate_bishop_moves(piece, board, out);
    generate_rook_moves(piece, board, out);
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
    fn queen_from_d4_has_twenty_seven_moves() {
        let mut board = Board::new();
        let queen = Piece::new(PieceKind::Queen, Team::White, sq("d4"));
        board.add_piece(queen).expect("empty square");
        assert_eq!(queen.moves(&board).len(), 27);
    }
}
