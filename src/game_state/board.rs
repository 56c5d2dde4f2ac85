//! The mutable board aggregate.
//!
//! `Board` owns an ordered piece list, the move history, a repetition counter
//! keyed by position fingerprint, and the side to move. Everything else
//! (occupancy index, king squares, per-team pseudo-legal, castle and legal
//! moves, check status, fingerprint) is derived lazily and cached in
//! `OnceLock` cells. Every mutation drops the whole cache, so reads never see
//! stale data.
//!
//! Forking is a plain deep clone: pieces are values, so a fork shares nothing
//! with its source.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::errors::{ChessError, ChessResult};
use crate::game_state::chess_rules::standard_pieces;
use crate::game_state::chess_types::{PieceKind, Team};
use crate::game_state::fingerprint::PositionFingerprint;
use crate::game_state::square::Square;
use crate::game_state::undo_state::BoardSnapshot;
use crate::moves::chess_move::{CastleSide, Move, KING_START_FILE};
use crate::moves::piece::Piece;
use crate::search::piece_evaluators::PieceEvaluator;

#[derive(Debug, Clone, Default)]
struct BoardCache {
    index: OnceLock<[Option<usize>; 64]>,
    kings: [OnceLock<Option<Square>>; 2],
    pseudo: [OnceLock<Vec<Move>>; 2],
    castles: [OnceLock<Vec<Move>>; 2],
    check: [OnceLock<bool>; 2],
    legal: [OnceLock<Vec<Move>>; 2],
    any_legal: [OnceLock<bool>; 2],
    fingerprint: OnceLock<PositionFingerprint>,
}

#[derive(Debug, Clone)]
pub struct Board {
    pieces: Vec<Piece>,
    history: Vec<Move>,
    repetitions: HashMap<PositionFingerprint, u32>,
    side_to_move: Team,
    cache: BoardCache,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Empty board, white to move, no history.
    pub fn new() -> Self {
        Self {
            pieces: Vec::with_capacity(32),
            history: Vec::new(),
            repetitions: HashMap::new(),
            side_to_move: Team::White,
            cache: BoardCache::default(),
        }
    }

    /// Board in the standard starting position.
    pub fn standard() -> ChessResult<Self> {
        let mut board = Self::new();
        board.setup()?;
        Ok(board)
    }

    /// Custom position. The starting position counts as its first occurrence.
    pub fn from_pieces(
        pieces: impl IntoIterator<Item = Piece>,
        side_to_move: Team,
    ) -> ChessResult<Self> {
        let mut board = Self::new();
        board.side_to_move = side_to_move;
        for piece in pieces {
            board.add_piece(piece)?;
        }
        board.record_position();
        Ok(board)
    }

    /// Resets to the standard starting position with white to move.
    pub fn setup(&mut self) -> ChessResult<()> {
        *self = Self::new();
        for piece in standard_pieces() {
            self.add_piece(piece)?;
        }
        self.record_position();
        Ok(())
    }

    #[inline]
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn pieces_of(&self, team: Team) -> impl Iterator<Item = &Piece> + '_ {
        self.pieces.iter().filter(move |p| p.team() == team)
    }

    #[inline]
    pub fn side_to_move(&self) -> Team {
        self.side_to_move
    }

    #[inline]
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    pub fn last_move(&self) -> Option<&Move> {
        self.history.last()
    }

    pub fn check_square(&self, square: Square) -> Option<&Piece> {
        let index = self.cache.index.get_or_init(|| {
            let mut index = [None; 64];
            for (i, piece) in self.pieces.iter().enumerate() {
                index[piece.square().index()] = Some(i);
            }
            index
        });
        index[square.index()].map(|i| &self.pieces[i])
    }

    /// Puts a piece on an empty square.
    pub fn add_piece(&mut self, piece: Piece) -> ChessResult<()> {
        if let Some(existing) = self.check_square(piece.square()) {
            return Err(ChessError::InvalidMove(format!(
                "cannot add {piece}: {} occupies {}",
                existing,
                piece.square()
            )));
        }
        self.place_piece(piece);
        Ok(())
    }

    pub fn remove_piece(&mut self, square: Square) -> ChessResult<Piece> {
        self.lift_piece(square)
            .ok_or_else(|| ChessError::InvalidMove(format!("no piece on {square}")))
    }

    /// Removes whatever stands on `square`, keeping the order of the rest.
    pub(crate) fn lift_piece(&mut self, square: Square) -> Option<Piece> {
        let i = self.pieces.iter().position(|p| p.square() == square)?;
        self.invalidate();
        Some(self.pieces.remove(i))
    }

    pub(crate) fn place_piece(&mut self, piece: Piece) {
        self.invalidate();
        self.pieces.push(piece);
    }

    fn invalidate(&mut self) {
        self.cache = BoardCache::default();
    }

    pub fn king_square(&self, team: Team) -> ChessResult<Square> {
        let king = self.cache.kings[team.index()].get_or_init(|| {
            self.pieces
                .iter()
                .find(|p| p.team() == team && p.kind() == PieceKind::King)
                .map(|p| p.square())
        });
        king.ok_or(ChessError::KingMissing(team))
    }

    /// Union of the pseudo-legal moves of every piece of `team`, castles
    /// excluded.
    pub fn pseudo_moves(&self, team: Team) -> &[Move] {
        self.cache.pseudo[team.index()].get_or_init(|| {
            let mut out = Vec::with_capacity(48);
            for piece in self.pieces_of(team) {
                piece.moves_into(self, &mut out);
            }
            out
        })
    }

    /// Castle moves `team` may currently make.
    pub fn castle_moves(&self, team: Team) -> &[Move] {
        self.cache.castles[team.index()].get_or_init(|| {
            CastleSide::ALL
                .into_iter()
                .filter(|side| matches!(self.can_castle(team, *side), Ok(true)))
                .map(|side| Move::castle(team, side))
                .collect()
        })
    }

    /// Pseudo-legal moves for `team`, optionally with eligible castles.
    pub fn moves(&self, team: Team, include_castle: bool) -> Vec<Move> {
        let mut out = self.pseudo_moves(team).to_vec();
        if include_castle {
            out.extend_from_slice(self.castle_moves(team));
        }
        out
    }

    /// Whether any enemy pseudo-legal move ends on `square`.
    pub fn is_attacked(&self, square: Square, by: Team) -> bool {
        self.pseudo_moves(by).iter().any(|m| m.end() == square)
    }

    /// Number of `team`'s pieces with a pseudo-legal move ending on `square`.
    pub fn attackers(&self, square: Square, team: Team) -> usize {
        self.pieces_of(team)
            .filter(|p| p.square() != square && p.reaches(self, square))
            .count()
    }

    pub fn in_check(&self, team: Team) -> ChessResult<bool> {
        let king = self.king_square(team)?;
        Ok(*self.cache.check[team.index()]
            .get_or_init(|| self.is_attacked(king, team.opposite())))
    }

    /// Castling eligibility: king and rook unmoved on their home squares, the
    /// squares between them empty, the king not in check, and no square the
    /// king crosses or lands on attacked.
    pub fn can_castle(&self, team: Team, side: CastleSide) -> ChessResult<bool> {
        let rank = team.back_rank();
        let king_home = Square::new_unchecked(KING_START_FILE, rank);
        let rook_home = Square::new_unchecked(side.rook_file(), rank);

        let home_piece = |square: Square, kind: PieceKind| {
            matches!(
                self.check_square(square),
                Some(p) if p.team() == team && p.kind() == kind && !p.has_moved()
            )
        };
        if !home_piece(king_home, PieceKind::King) || !home_piece(rook_home, PieceKind::Rook) {
            return Ok(false);
        }

        let path_clear = side
            .between_files()
            .iter()
            .all(|&file| self.check_square(Square::new_unchecked(file, rank)).is_none());
        if !path_clear || self.in_check(team)? {
            return Ok(false);
        }

        for &file in side.king_path_files() {
            let mut probe = self.scratch();
            if let Some(mut king) = probe.lift_piece(king_home) {
                king.relocate(Square::new_unchecked(file, rank));
                probe.place_piece(king);
            }
            if probe.in_check(team)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Moves of `team` (castles included) that do not leave its king in check.
    pub fn legal_moves(&self, team: Team) -> ChessResult<&[Move]> {
        if let Some(legal) = self.cache.legal[team.index()].get() {
            return Ok(legal.as_slice());
        }
        let mut legal = Vec::new();
        for mv in self.moves(team, true) {
            let mut probe = self.scratch();
            if mv.apply(&mut probe).is_ok() && !probe.in_check(team)? {
                legal.push(mv);
            }
        }
        Ok(self.cache.legal[team.index()].get_or_init(|| legal).as_slice())
    }

    /// Like `!legal_moves(team)?.is_empty()` but stops at the first legal
    /// move when the legal list is not cached yet.
    pub fn has_legal_move(&self, team: Team) -> ChessResult<bool> {
        if let Some(legal) = self.cache.legal[team.index()].get() {
            return Ok(!legal.is_empty());
        }
        if let Some(any) = self.cache.any_legal[team.index()].get() {
            return Ok(*any);
        }
        let mut any = false;
        for mv in self.moves(team, true) {
            let mut probe = self.scratch();
            if mv.apply(&mut probe).is_ok() && !probe.in_check(team)? {
                any = true;
                break;
            }
        }
        Ok(*self.cache.any_legal[team.index()].get_or_init(|| any))
    }

    /// In check, and every pseudo-legal reply still leaves the king attacked.
    pub fn in_checkmate(&self, team: Team) -> ChessResult<bool> {
        Ok(self.in_check(team)? && !self.has_legal_move(team)?)
    }

    /// Not in check, yet no move avoids leaving the king attacked.
    pub fn in_stalemate(&self, team: Team) -> ChessResult<bool> {
        Ok(!self.in_check(team)? && !self.has_legal_move(team)?)
    }

    pub fn fingerprint(&self) -> PositionFingerprint {
        *self
            .cache
            .fingerprint
            .get_or_init(|| PositionFingerprint::from_pieces(self.side_to_move, &self.pieces))
    }

    pub fn hash_key(&self) -> u64 {
        self.fingerprint().hash_key()
    }

    /// How often `fingerprint` has been reached in this game.
    pub fn occurrences(&self, fingerprint: &PositionFingerprint) -> u32 {
        self.repetitions.get(fingerprint).copied().unwrap_or(0)
    }

    pub fn current_occurrences(&self) -> u32 {
        self.occurrences(&self.fingerprint())
    }

    pub fn is_draw_by_threefold_repetition(&self) -> bool {
        self.current_occurrences() >= 3
    }

    /// Applies `mv`, appends it to the history, hands the turn to the other
    /// side and counts the resulting position. The board is unchanged on error.
    pub fn do_move(&mut self, mv: &Move) -> ChessResult<()> {
        mv.apply(self)?;
        self.history.push(*mv);
        self.side_to_move = mv.team().opposite();
        self.invalidate();
        self.record_position();
        Ok(())
    }

    /// Independent copy for speculative exploration. Derived caches are not
    /// carried over; the fork rebuilds them on demand.
    pub fn fork(&self) -> Board {
        Board {
            pieces: self.pieces.clone(),
            history: self.history.clone(),
            repetitions: self.repetitions.clone(),
            side_to_move: self.side_to_move,
            cache: BoardCache::default(),
        }
    }

    /// Piece-only copy for legality probes. History and repetition counts are
    /// left behind.
    fn scratch(&self) -> Board {
        Board {
            pieces: self.pieces.clone(),
            history: Vec::new(),
            repetitions: HashMap::new(),
            side_to_move: self.side_to_move,
            cache: BoardCache::default(),
        }
    }

    pub fn save_state(&self) -> BoardSnapshot {
        BoardSnapshot {
            pieces: self.pieces.clone(),
            history: self.history.clone(),
            repetitions: self.repetitions.clone(),
            side_to_move: self.side_to_move,
        }
    }

    pub fn restore_state(&mut self, snapshot: &BoardSnapshot) {
        self.pieces = snapshot.pieces.clone();
        self.history = snapshot.history.clone();
        self.repetitions = snapshot.repetitions.clone();
        self.side_to_move = snapshot.side_to_move;
        self.invalidate();
    }

    fn record_position(&mut self) {
        let fingerprint = self.fingerprint();
        *self.repetitions.entry(fingerprint).or_insert(0) += 1;
    }

    /// Material of `team` as judged by `evaluator`.
    pub fn material<E: PieceEvaluator + ?Sized>(&self, team: Team, evaluator: &E) -> f64 {
        evaluator.material_value(self, team)
    }

    /// Leaf count of the legal move tree from the side to move.
    pub fn perft(&self, depth: u32) -> ChessResult<u64> {
        if depth == 0 {
            return Ok(1);
        }
        let legal = self.legal_moves(self.side_to_move)?;
        if depth == 1 {
            return Ok(legal.len() as u64);
        }
        let mut nodes = 0;
        for mv in legal {
            let mut child = self.scratch();
            child.do_move(mv)?;
            nodes += child.perft(depth - 1)?;
        }
        Ok(nodes)
    }
}
