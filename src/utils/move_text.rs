//! Text-to-move conversion for externally entered moves.
//!
//! Accepts the crate's own display form (`e2-e4`, `Ng1-f3`, `Bc4xf7`,
//! `e7-e8=Q`, `o-o`, `o-o-o`) and bare coordinates (`e2e4`, `e7e8q`). Text is
//! resolved against the legal moves of the given team, so a successful parse
//! always yields a move that can be applied.

use crate::errors::{ChessError, ChessResult};
use crate::game_state::board::Board;
use crate::game_state::chess_types::{PieceKind, PromotionPiece, Team};
use crate::game_state::square::Square;
use crate::moves::chess_move::{CastleSide, Move};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MoveText {
    Castle(CastleSide),
    Step {
        piece: Option<PieceKind>,
        start: Square,
        end: Square,
        promotion: Option<PromotionPiece>,
    },
}

fn piece_from_letter(c: char) -> Option<PieceKind> {
    match c {
        'N' => Some(PieceKind::Knight),
        'B' => Some(PieceKind::Bishop),
        'R' => Some(PieceKind::Rook),
        'Q' => Some(PieceKind::Queen),
        'K' => Some(PieceKind::King),
        _ => None,
    }
}

fn tokenize(text: &str) -> ChessResult<MoveText> {
    let trimmed = text.trim();
    match trimmed.to_ascii_lowercase().replace('0', "o").as_str() {
        "o-o" => return Ok(MoveText::Castle(CastleSide::KingSide)),
        "o-o-o" => return Ok(MoveText::Castle(CastleSide::QueenSide)),
        _ => {}
    }

    let compact: String = trimmed
        .chars()
        .filter(|c| !matches!(c, '-' | 'x' | '=' | '+' | '#'))
        .collect();
    let mut rest = compact.as_str();

    let mut piece = None;
    if let Some(first) = rest.chars().next() {
        if let Some(kind) = piece_from_letter(first) {
            piece = Some(kind);
            rest = &rest[first.len_utf8()..];
        }
    }

    if rest.len() < 4 || !rest.is_char_boundary(2) || !rest.is_char_boundary(4) {
        return Err(ChessError::MoveParse(text.to_owned()));
    }
    let parse_square =
        |s: &str| s.parse::<Square>().map_err(|_| ChessError::MoveParse(text.to_owned()));
    let start = parse_square(&rest[..2])?;
    let end = parse_square(&rest[2..4])?;
    let promotion = match &rest[4..] {
        "" => None,
        suffix => Some(suffix.parse::<PromotionPiece>()?),
    };

    Ok(MoveText::Step {
        piece,
        start,
        end,
        promotion,
    })
}

/// Resolves `text` to one of `team`'s legal moves on `board`.
///
/// A promotion entered without a target promotes to a queen.
pub fn parse_move(board: &Board, team: Team, text: &str) -> ChessResult<Move> {
    let parsed = tokenize(text)?;
    let legal = board.legal_moves(team)?;

    let found = match parsed {
        MoveText::Castle(side) => legal.iter().find(|m| m.castle_side() == Some(side)),
        MoveText::Step {
            piece,
            start,
            end,
            promotion,
        } => {
            let wanted = promotion.unwrap_or(PromotionPiece::Queen);
            legal.iter().find(|m| {
                m.start() == start
                    && m.end() == end
                    && piece.map_or(true, |p| p == m.piece())
                    && m.promotion().map_or(true, |t| t == wanted)
                    && (promotion.is_none() || m.promotion().is_some())
            })
        }
    };

    found.copied().ok_or_else(|| {
        ChessError::InvalidMove(format!("{} is not a legal move for {team:?}", text.trim()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::piece::Piece;

    fn piece(kind: PieceKind, team: Team, square: &str) -> Piece {
        Piece::new(kind, team, square.parse().expect("valid square"))
    }

    #[test]
    fn display_and_coordinate_forms_agree() {
        let board = Board::standard().expect("standard setup");
        let a = parse_move(&board, Team::White, "Ng1-f3").expect("display form");
        let b = parse_move(&board, Team::White, "g1f3").expect("coordinate form");
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "Ng1-f3");
        assert_eq!(
            parse_move(&board, Team::White, " e2-e4 ").expect("pawn push").to_string(),
            "e2-e4"
        );
    }

    #[test]
    fn display_text_round_trips_for_every_legal_move() {
        let board = Board::standard().expect("standard setup");
        for mv in board.legal_moves(Team::White).expect("king present") {
            let text = mv.to_string();
            assert_eq!(parse_move(&board, Team::White, &text).expect("own format"), *mv);
        }
    }

    #[test]
    fn promotions_default_to_queen() {
        let board = Board::from_pieces(
            [
                piece(PieceKind::King, Team::White, "a1"),
                piece(PieceKind::King, Team::Black, "a8"),
                piece(PieceKind::Pawn, Team::White, "e7").with_moved(true),
                piece(PieceKind::Rook, Team::Black, "d8"),
            ],
            Team::White,
        )
        .expect("valid position");
        let queen = parse_move(&board, Team::White, "e7e8").expect("default promotion");
        assert_eq!(queen.promotion(), Some(PromotionPiece::Queen));
        let knight = parse_move(&board, Team::White, "e7xd8=N").expect("capture promotion");
        assert_eq!(knight.to_string(), "e7xd8=N");
        assert_eq!(
            parse_move(&board, Team::White, "e7e8n").expect("lowercase target").promotion(),
            Some(PromotionPiece::Knight)
        );
        assert!(matches!(
            parse_move(&board, Team::White, "e7e8k"),
            Err(ChessError::UnknownPromotion(_))
        ));
    }

    #[test]
    fn castling_by_name_or_king_squares() {
        let board = Board::from_pieces(
            [
                piece(PieceKind::King, Team::White, "e1"),
                piece(PieceKind::Rook, Team::White, "h1"),
                piece(PieceKind::Rook, Team::White, "a1"),
                piece(PieceKind::King, Team::Black, "e8"),
            ],
            Team::White,
        )
        .expect("valid position");
        let short = parse_move(&board, Team::White, "O-O").expect("castle");
        assert_eq!(short.castle_side(), Some(CastleSide::KingSide));
        assert_eq!(parse_move(&board, Team::White, "0-0-0").expect("castle").to_string(), "o-o-o");
        assert_eq!(parse_move(&board, Team::White, "e1g1").expect("king squares"), short);
    }

    #[test]
    fn garbage_and_illegal_text_are_rejected() {
        let board = Board::standard().expect("standard setup");
        assert!(matches!(parse_move(&board, Team::White, "hello"), Err(ChessError::MoveParse(_))));
        assert!(matches!(parse_move(&board, Team::White, "e2"), Err(ChessError::MoveParse(_))));
        assert!(matches!(parse_move(&board, Team::White, "e2e5"), Err(ChessError::InvalidMove(_))));
        assert!(matches!(parse_move(&board, Team::White, "Bg1-f3"), Err(ChessError::InvalidMove(_))));
        assert!(parse_move(&board, Team::White, "o-o").is_err());
    }
}
