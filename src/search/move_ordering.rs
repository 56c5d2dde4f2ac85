//! Move ordering for alpha-beta.
//!
//! Captures come first, best trade first (victim value minus attacker value,
//! both positional). Quiet moves follow, ranked by the history heuristic.
//! Ordering only changes how much gets pruned, never which moves are searched.

use std::cmp::Ordering;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use crate::game_state::board::Board;
use crate::game_state::chess_types::Team;
use crate::moves::chess_move::Move;
use crate::search::piece_evaluators::{PieceEvaluator, PositionalPieceEvaluator};

const HISTORY_SLOTS: usize = 2 * 64 * 64;
const MAX_HISTORY_SHIFT: u32 = 30;

/// Cutoff counts indexed by `[team][from][to]`.
///
/// Counters are relaxed atomics so parallel workers can share one table;
/// a lost update only perturbs ordering.
#[derive(Debug)]
pub struct HistoryTable {
    scores: Box<[AtomicU64]>,
}

impl Default for HistoryTable {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryTable {
    pub fn new() -> Self {
        Self {
            scores: (0..HISTORY_SLOTS).map(|_| AtomicU64::new(0)).collect(),
        }
    }

    #[inline]
    fn slot(team: Team, mv: &Move) -> usize {
        (team.index() * 64 + mv.start().index()) * 64 + mv.end().index()
    }

    pub fn score(&self, mv: &Move) -> u64 {
        self.scores[Self::slot(mv.team(), mv)].load(AtomicOrdering::Relaxed)
    }

    /// Credits a quiet move that caused a beta cutoff with `depth_remaining`
    /// plies still to search. Deeper remaining searches earn more.
    pub fn record_cutoff(&self, mv: &Move, depth_remaining: u32) {
        if mv.is_capture() {
            return;
        }
        let bonus = 1u64 << depth_remaining.min(MAX_HISTORY_SHIFT);
        self.scores[Self::slot(mv.team(), mv)].fetch_add(bonus, AtomicOrdering::Relaxed);
    }

    pub fn clear(&self) {
        for s in self.scores.iter() {
            s.store(0, AtomicOrdering::Relaxed);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum OrderKey {
    Capture(f64),
    Quiet(u64),
}

impl OrderKey {
    /// Descending priority.
    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (OrderKey::Capture(a), OrderKey::Capture(b)) => b.total_cmp(a),
            (OrderKey::Capture(_), OrderKey::Quiet(_)) => Ordering::Less,
            (OrderKey::Quiet(_), OrderKey::Capture(_)) => Ordering::Greater,
            (OrderKey::Quiet(a), OrderKey::Quiet(b)) => b.cmp(a),
        }
    }
}

/// Expected gain of a capture: victim value minus attacker value.
pub fn capture_gain(board: &Board, mv: &Move, evaluator: &PositionalPieceEvaluator) -> f64 {
    let victim = board.check_square(mv.end()).map_or(0.0, |p| evaluator.value(p));
    let attacker = board.check_square(mv.start()).map_or(0.0, |p| evaluator.value(p));
    victim - attacker
}

/// Sorts `moves` in place, best candidates first. The sort is stable, so
/// equal keys keep generation order.
pub fn order_moves(
    board: &Board,
    moves: &mut Vec<Move>,
    history: &HistoryTable,
    evaluator: &PositionalPieceEvaluator,
) {
    let mut keyed: Vec<(OrderKey, Move)> = moves
        .drain(..)
        .map(|mv| {
            let key = if mv.is_capture() {
                OrderKey::Capture(capture_gain(board, &mv, evaluator))
            } else {
                OrderKey::Quiet(history.score(&mv))
            };
            (key, mv)
        })
        .collect();
    keyed.sort_by(|a, b| a.0.compare(&b.0));
    moves.extend(keyed.into_iter().map(|(_, mv)| mv));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::chess_types::PieceKind;
    use crate::moves::piece::Piece;

    fn piece(kind: PieceKind, team: Team, square: &str) -> Piece {
        Piece::new(kind, team, square.parse().expect("valid square"))
    }

    #[test]
    fn captures_first_best_trade_first() {
        let pieces = [
            piece(PieceKind::King, Team::White, "a1"),
            piece(PieceKind::King, Team::Black, "h8"),
            piece(PieceKind::Queen, Team::White, "d1"),
            piece(PieceKind::Pawn, Team::White, "c3").with_moved(true),
            piece(PieceKind::Knight, Team::Black, "d4"),
            piece(PieceKind::Pawn, Team::Black, "d7"),
        ];
        let board = Board::from_pieces(pieces, Team::White).expect("valid position");
        let mut moves = board.moves(Team::White, true);
        order_moves(&board, &mut moves, &HistoryTable::new(), &PositionalPieceEvaluator::default());

        assert_eq!(moves[0].to_string(), "c3xd4");
        assert_eq!(moves[1].to_string(), "Qd1xd4");
        assert!(moves[2..].iter().all(|m| !m.is_capture()));
    }

    #[test]
    fn history_promotes_quiet_moves() {
        let board = Board::standard().expect("standard setup");
        let history = HistoryTable::new();
        let mut moves = board.moves(Team::White, true);
        let target = *moves
            .iter()
            .find(|m| m.to_string() == "h2-h3")
            .expect("h2-h3 generated");

        history.record_cutoff(&target, 3);
        assert_eq!(history.score(&target), 8);
        order_moves(&board, &mut moves, &history, &PositionalPieceEvaluator::default());
        assert_eq!(moves[0], target);
        assert_eq!(moves.len(), 20);

        history.clear();
        assert_eq!(history.score(&target), 0);
    }

    #[test]
    fn captures_never_enter_history() {
        let rook = piece(PieceKind::Rook, Team::White, "a1");
        let capture = Move::capture(&rook, "a8".parse().expect("valid square"));
        let history = HistoryTable::new();
        history.record_cutoff(&capture, 5);
        assert_eq!(history.score(&capture), 0);
    }
}
