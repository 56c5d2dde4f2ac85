//! Positional bonus tables, in pawns.
//!
//! Each table is written as it looks from white's side of a printed board:
//! row 0 is rank 8, row 7 is rank 1, columns run a..h. White reads the table
//! upright and black reads it mirrored vertically, so the same table rewards
//! both sides symmetrically.

use crate::game_state::chess_types::{PieceKind, Team};
use crate::game_state::square::Square;

pub type PieceSquareTable = [[f64; 8]; 8];

pub const KING_TABLE: PieceSquareTable = [
    [-0.3, -0.4, -0.4, -0.5, -0.5, -0.4, -0.4, -0.3],
    [-0.3, -0.4, -0.4, -0.5, -0.5, -0.4, -0.4, -0.3],
    [-0.3, -0.4, -0.4, -0.5, -0.5, -0.4, -0.4, -0.3],
    [-0.3, -0.4, -0.4, -0.5, -0.5, -0.4, -0.4, -0.3],
    [-0.2, -0.3, -0.3, -0.4, -0.4, -0.3, -0.3, -0.2],
    [-0.1, -0.2, -0.2, -0.2, -0.2, -0.2, -0.2, -0.1],
    [-0.05, -0.05, -0.05, -0.1, -0.1, -0.05, -0.05, -0.05],
    [0.2, 0.3, 0.3, 0.0, 0.0, 0.0, 0.3, 0.2],
];

/// Replaces `KING_TABLE` once the endgame rule fires: the king belongs in the
/// centre.
pub const KING_ENDGAME_TABLE: PieceSquareTable = [
    [-0.5, -0.4, -0.3, -0.2, -0.2, -0.3, -0.4, -0.5],
    [-0.3, -0.2, -0.1, 0.0, 0.0, -0.1, -0.2, -0.3],
    [-0.3, -0.1, 0.2, 0.3, 0.3, 0.2, -0.1, -0.3],
    [-0.3, -0.1, 0.3, 0.4, 0.4, 0.3, -0.1, -0.3],
    [-0.3, -0.1, 0.3, 0.4, 0.4, 0.3, -0.1, -0.3],
    [-0.3, -0.1, 0.2, 0.3, 0.3, 0.2, -0.1, -0.3],
    [-0.3, -0.3, 0.0, 0.0, 0.0, 0.0, -0.3, -0.3],
    [-0.5, -0.3, -0.3, -0.3, -0.3, -0.3, -0.3, -0.5],
];

pub const QUEEN_TABLE: PieceSquareTable = [
    [-0.2, -0.1, -0.1, -0.05, -0.05, -0.1, -0.1, -0.2],
    [-0.1, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, -0.1],
    [-0.1, 0.0, 0.05, 0.05, 0.05, 0.05, 0.0, -0.1],
    [-0.05, 0.0, 0.05, 0.05, 0.05, 0.05, 0.0, -0.05],
    [0.0, 0.0, 0.05, 0.05, 0.05, 0.05, 0.0, -0.05],
    [-0.1, 0.05, 0.05, 0.05, 0.05, 0.05, 0.0, -0.1],
    [-0.1, 0.0, 0.05, 0.0, 0.0, 0.0, 0.0, -0.1],
    [-0.2, -0.1, -0.1, -0.05, -0.05, -0.1, -0.1, -0.2],
];

pub const BISHOP_TABLE: PieceSquareTable = [
    [-0.2, -0.1, -0.1, -0.1, -0.1, -0.1, -0.1, -0.2],
    [-0.1, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, -0.1],
    [-0.1, 0.0, 0.05, 0.1, 0.1, 0.05, 0.0, -0.1],
    [-0.1, 0.05, 0.05, 0.1, 0.1, 0.05, 0.05, -0.1],
    [-0.1, 0.0, 0.1, 0.1, 0.1, 0.1, 0.0, -0.1],
    [-0.1, 0.1, 0.1, 0.1, 0.1, 0.1, 0.1, -0.1],
    [-0.1, 0.05, 0.0, 0.0, 0.0, 0.0, 0.05, -0.1],
    [-0.2, -0.1, -0.1, -0.1, -0.1, -0.1, -0.1, -0.2],
];

pub const KNIGHT_TABLE: PieceSquareTable = [
    [-0.5, -0.4, -0.3, -0.3, -0.3, -0.3, -0.4, -0.5],
    [-0.4, -0.2, 0.0, 0.0, 0.0, 0.0, -0.2, -0.4],
    [-0.3, 0.0, 0.1, 0.15, 0.15, 0.1, 0.0, -0.3],
    [-0.3, 0.05, 0.15, 0.2, 0.2, 0.15, 0.05, -0.3],
    [-0.3, 0.0, 0.15, 0.2, 0.2, 0.15, 0.0, -0.3],
    [-0.3, 0.05, 0.1, 0.15, 0.15, 0.1, 0.05, -0.3],
    [-0.4, -0.2, 0.0, 0.05, 0.05, 0.0, -0.2, -0.4],
    [-0.5, -0.4, -0.3, -0.3, -0.3, -0.3, -0.4, -0.5],
];

pub const ROOK_TABLE: PieceSquareTable = [
    [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [0.05, 0.1, 0.1, 0.1, 0.1, 0.1, 0.1, 0.05],
    [-0.05, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, -0.05],
    [-0.05, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, -0.05],
    [-0.05, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, -0.05],
    [-0.05, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, -0.05],
    [-0.05, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, -0.05],
    [0.0, 0.0, 0.0, 0.05, 0.05, 0.0, 0.0, 0.0],
];

pub const PAWN_TABLE: PieceSquareTable = [
    [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0],
    [0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5],
    [0.1, 0.1, 0.2, 0.3, 0.3, 0.2, 0.1, 0.1],
    [0.05, 0.05, 0.1, 0.25, 0.25, 0.1, 0.05, 0.05],
    [0.0, 0.0, 0.0, 0.2, 0.2, 0.0, 0.0, 0.0],
    [0.05, -0.05, -0.1, 0.0, 0.0, -0.1, -0.05, 0.05],
    [0.05, 0.1, 0.1, -0.3, -0.3, 0.1, 0.1, 0.05],
    [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
];

#[inline]
pub const fn table_for(kind: PieceKind, endgame: bool) -> &'static PieceSquareTable {
    match kind {
        PieceKind::Pawn => &PAWN_TABLE,
        PieceKind::Knight => &KNIGHT_TABLE,
        PieceKind::Bishop => &BISHOP_TABLE,
        PieceKind::Rook => &ROOK_TABLE,
        PieceKind::Queen => &QUEEN_TABLE,
        PieceKind::King if endgame => &KING_ENDGAME_TABLE,
        PieceKind::King => &KING_TABLE,
    }
}

/// Table entry for `team` standing on `square`.
#[inline]
pub fn lookup(table: &PieceSquareTable, team: Team, square: Square) -> f64 {
    let row = match team {
        Team::White => 8 - square.y(),
        Team::Black => square.y() - 1,
    };
    table[row as usize][square.x() as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().expect("valid square")
    }

    #[test]
    fn tables_mirror_between_teams() {
        for kind in PieceKind::ALL {
            let table = table_for(kind, false);
            assert_eq!(
                lookup(table, Team::White, sq("c2")),
                lookup(table, Team::Black, sq("c7"))
            );
        }
    }

    #[test]
    fn advanced_pawns_are_worth_more() {
        assert_eq!(lookup(&PAWN_TABLE, Team::White, sq("a7")), 0.5);
        assert_eq!(lookup(&PAWN_TABLE, Team::Black, sq("a2")), 0.5);
        assert_eq!(lookup(&PAWN_TABLE, Team::White, sq("d2")), -0.3);
    }

    #[test]
    fn endgame_king_prefers_centre() {
        let corner = lookup(&KING_ENDGAME_TABLE, Team::White, sq("a1"));
        let centre = lookup(&KING_ENDGAME_TABLE, Team::White, sq("e4"));
        assert!(centre > corner);
        assert!(lookup(&KING_TABLE, Team::White, sq("g1")) > lookup(&KING_TABLE, Team::White, sq("e4")));
    }
}
