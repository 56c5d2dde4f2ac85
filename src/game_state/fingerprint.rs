//! Position fingerprints for repetition counting and cache lookups.
//!
//! A fingerprint is the side to move plus one occupancy mask per
//! `(team, piece kind)`. It identifies piece placement exactly, ignoring the
//! has-moved flags. `hash_key` folds it into a single `u64` for shard
//! selection.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::game_state::chess_types::{PieceKind, Team};
use crate::game_state::square::Square;
use crate::moves::piece::Piece;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PositionFingerprint {
    side_to_move: Team,
    masks: [[u64; 6]; 2],
}

impl PositionFingerprint {
    pub fn from_pieces<'a>(side_to_move: Team, pieces: impl IntoIterator<Item = &'a Piece>) -> Self {
        let mut masks = [[0u64; 6]; 2];
        for piece in pieces {
            masks[piece.team().index()][piece.kind().index()] |= piece.square().bit();
        }
        Self {
            side_to_move,
            masks,
        }
    }

    #[inline]
    pub const fn side_to_move(&self) -> Team {
        self.side_to_move
    }

    #[inline]
    pub const fn mask(&self, team: Team, kind: PieceKind) -> u64 {
        self.masks[team.index()][kind.index()]
    }

    /// Unkeyed SipHash of the masks and side to move, stable within a build.
    pub fn hash_key(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }

    /// Occupied squares for one team and kind, a1 first.
    pub fn squares(&self, team: Team, kind: PieceKind) -> impl Iterator<Item = Square> {
        let mut bb = self.mask(team, kind);
        std::iter::from_fn(move || {
            if bb == 0 {
                return None;
            }
            let sq = bb.trailing_zeros() as usize;
            bb &= bb - 1;
            Square::from_index(sq).ok()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().expect("valid square")
    }

    #[test]
    fn fingerprint_ignores_piece_order_and_moved_flag() {
        let a = Piece::new(PieceKind::Rook, Team::White, sq("a1"));
        let b = Piece::new(PieceKind::King, Team::Black, sq("e8")).with_moved(true);
        let one = PositionFingerprint::from_pieces(Team::White, [&a, &b]);
        let two = PositionFingerprint::from_pieces(Team::White, [&b, &a.with_moved(true)]);
        assert_eq!(one, two);
        assert_eq!(one.hash_key(), two.hash_key());
    }

    #[test]
    fn side_to_move_changes_fingerprint_and_key() {
        let k = Piece::new(PieceKind::King, Team::White, sq("e1"));
        let white = PositionFingerprint::from_pieces(Team::White, [&k]);
        let black = PositionFingerprint::from_pieces(Team::Black, [&k]);
        assert_ne!(white, black);
        assert_ne!(white.hash_key(), black.hash_key());
    }

    #[test]
    fn hash_key_tracks_placement() {
        let k = Piece::new(PieceKind::King, Team::White, sq("e1"));
        let here = PositionFingerprint::from_pieces(Team::White, [&k]);
        let moved = Piece::new(PieceKind::King, Team::White, sq("e2"));
        let there = PositionFingerprint::from_pieces(Team::White, [&moved]);
        assert_eq!(here.hash_key(), here.hash_key());
        assert_ne!(here.hash_key(), there.hash_key());
    }

    #[test]
    fn squares_iterates_mask_bits() {
        let pieces = [
            Piece::new(PieceKind::Knight, Team::Black, sq("g8")),
            Piece::new(PieceKind::Knight, Team::Black, sq("b8")),
        ];
        let fp = PositionFingerprint::from_pieces(Team::White, pieces.iter());
        let squares: Vec<String> = fp
            .squares(Team::Black, PieceKind::Knight)
            .map(|s| s.to_string())
            .collect();
        assert_eq!(squares, vec!["b8", "g8"]);
        assert_eq!(fp.mask(Team::White, PieceKind::Knight), 0);
    }
}
