//! Starting layout and the game-state machine derived from a board.

use crate::errors::ChessResult;
use crate::game_state::board::Board;
use crate::game_state::chess_types::{PieceKind, Team};
use crate::game_state::square::Square;
use crate::moves::piece::Piece;

/// Back-rank piece order from the a-file to the h-file.
pub const BACK_RANK_LAYOUT: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// The 32 pieces of the standard starting position, white first.
pub fn standard_pieces() -> Vec<Piece> {
    let mut pieces = Vec::with_capacity(32);
    for team in Team::ALL {
        let back = team.back_rank();
        let pawn_rank = back + team.sign();
        for (file, kind) in BACK_RANK_LAYOUT.iter().enumerate() {
            let file = file as i32;
            pieces.push(Piece::new(*kind, team, Square::new_unchecked(file, back)));
            pieces.push(Piece::new(
                PieceKind::Pawn,
                team,
                Square::new_unchecked(file, pawn_rank),
            ));
        }
    }
    pieces
}

/// Where a game stands for the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    /// Still playing; the side to move is in check.
    Check,
    Checkmate {
        winner: Team,
    },
    Stalemate,
    DrawByRepetition,
}

impl GameStatus {
    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            GameStatus::Checkmate { .. } | GameStatus::Stalemate | GameStatus::DrawByRepetition
        )
    }
}

pub fn game_status(board: &Board) -> ChessResult<GameStatus> {
    let team = board.side_to_move();
    if board.in_checkmate(team)? {
        return Ok(GameStatus::Checkmate {
            winner: team.opposite(),
        });
    }
    if board.in_stalemate(team)? {
        return Ok(GameStatus::Stalemate);
    }
    if board.is_draw_by_threefold_repetition() {
        return Ok(GameStatus::DrawByRepetition);
    }
    if board.in_check(team)? {
        return Ok(GameStatus::Check);
    }
    Ok(GameStatus::Playing)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_layout_has_thirty_two_pieces() {
        let pieces = standard_pieces();
        assert_eq!(pieces.len(), 32);
        let kings: Vec<String> = pieces
            .iter()
            .filter(|p| p.kind() == PieceKind::King)
            .map(|p| p.square().to_string())
            .collect();
        assert_eq!(kings, vec!["e1", "e8"]);
    }

    #[test]
    fn fresh_game_is_playing() {
        let board = Board::standard().expect("standard setup");
        assert_eq!(game_status(&board), Ok(GameStatus::Playing));
        assert!(!GameStatus::Check.is_terminal());
        assert!(GameStatus::Stalemate.is_terminal());
    }
}
