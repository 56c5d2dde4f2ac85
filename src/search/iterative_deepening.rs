//! Iterative deepening over `Searcher::search_depth`.
//!
//! Depths 1, 2, ... are searched in turn, each seeded with the previous
//! ranking, until the budget runs out, a forced mate is found or the optional
//! depth cap is reached. The clock is only consulted between iterations: an
//! iteration in flight always runs to completion, and if it finishes past the
//! deadline its result is thrown away whole. The first iteration is always
//! kept so a move is available even under a zero budget.

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::errors::ChessResult;
use crate::game_state::board::Board;
use crate::game_state::chess_types::Team;
use crate::search::alpha_beta::{SearchOutcome, Searcher};
use crate::search::board_scoring::is_mate_score;

/// Hard ceiling on iterations; mate scores stay distinct well past it.
pub const DEPTH_LIMIT: u32 = 64;

/// Deepens until `budget` expires or `max_depth` is reached. Without a budget
/// the cap falls back to the searcher's configured depth.
pub fn iterative_deepening_search(
    searcher: &Searcher,
    board: &Board,
    team: Team,
    max_depth: Option<u32>,
    budget: Option<Duration>,
) -> ChessResult<SearchOutcome> {
    let started = Instant::now();
    let deadline = budget.map(|b| started + b);
    let max_depth = match (max_depth, budget) {
        (Some(depth), _) => depth,
        (None, Some(_)) => DEPTH_LIMIT,
        (None, None) => searcher.config().depth,
    }
    .clamp(1, DEPTH_LIMIT);

    let mut kept = searcher.search_depth(board, team, 1, &[])?;
    log_iteration(&kept);
    let mut total = kept.stats;

    for depth in 2..=max_depth {
        if deadline.is_some_and(|d| Instant::now() >= d) {
            break;
        }
        if kept.best().is_some_and(|c| is_mate_score(c.score)) {
            debug!(depth = depth - 1, "forced mate found, stopping early");
            break;
        }

        let outcome = searcher.search_depth(board, team, depth, &kept.candidates)?;
        total.accumulate(&outcome.stats);

        if deadline.is_some_and(|d| Instant::now() > d) {
            warn!(
                depth,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "depth finished past the time budget, discarding it"
            );
            break;
        }
        log_iteration(&outcome);
        kept = outcome;
    }

    total.depth_reached = kept.stats.depth_reached;
    total.elapsed = started.elapsed();
    Ok(SearchOutcome {
        candidates: kept.candidates,
        stats: total,
    })
}

fn log_iteration(outcome: &SearchOutcome) {
    let stats = &outcome.stats;
    debug!(
        depth = stats.depth_reached,
        best = %outcome.best().map(|c| c.to_string()).unwrap_or_default(),
        nodes = stats.nodes,
        cache_hits = stats.cache_hits,
        cutoffs = stats.cutoffs,
        elapsed_ms = stats.elapsed.as_millis() as u64,
        "completed depth"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::chess_types::PieceKind;
    use crate::moves::piece::Piece;
    use crate::search::alpha_beta::SearchConfig;

    fn searcher(depth: u32) -> Searcher {
        let mut config = SearchConfig::pruned(depth, 0);
        config.threads = 1;
        Searcher::new(config).expect("valid config")
    }

    #[test]
    fn unlimited_budget_reaches_max_depth() {
        let board = Board::standard().expect("standard setup");
        let outcome = iterative_deepening_search(&searcher(3), &board, Team::White, None, None)
            .expect("search succeeds");
        assert_eq!(outcome.stats.depth_reached, 3);
        assert!(!outcome.candidates.is_empty());
    }

    #[test]
    fn zero_budget_still_returns_first_depth() {
        let board = Board::standard().expect("standard setup");
        let outcome = iterative_deepening_search(
            &searcher(6),
            &board,
            Team::White,
            None,
            Some(Duration::ZERO),
        )
        .expect("search succeeds");
        assert_eq!(outcome.stats.depth_reached, 1);
        assert_eq!(outcome.candidates.len(), 3);
    }

    #[test]
    fn budget_deepens_past_the_configured_depth() {
        let board = Board::from_pieces(
            [
                Piece::new(PieceKind::King, Team::White, "e1".parse().expect("valid square")),
                Piece::new(PieceKind::Pawn, Team::White, "e2".parse().expect("valid square")),
                Piece::new(PieceKind::King, Team::Black, "e8".parse().expect("valid square")),
            ],
            Team::White,
        )
        .expect("valid position");
        let outcome = iterative_deepening_search(
            &searcher(1),
            &board,
            Team::White,
            None,
            Some(Duration::from_millis(300)),
        )
        .expect("search succeeds");
        assert!(outcome.stats.depth_reached >= 3, "{:?}", outcome.stats);
    }

    #[test]
    fn depth_cap_bounds_a_generous_budget() {
        let board = Board::standard().expect("standard setup");
        let outcome = iterative_deepening_search(
            &searcher(1),
            &board,
            Team::White,
            Some(3),
            Some(Duration::from_secs(600)),
        )
        .expect("search succeeds");
        assert_eq!(outcome.stats.depth_reached, 3);
    }

    #[test]
    fn stops_deepening_once_mate_is_found() {
        let board = Board::from_pieces(
            [
                Piece::new(PieceKind::King, Team::White, "g1".parse().expect("valid square")),
                Piece::new(PieceKind::Rook, Team::White, "a1".parse().expect("valid square")),
                Piece::new(PieceKind::King, Team::Black, "g8".parse().expect("valid square")),
                Piece::new(PieceKind::Pawn, Team::Black, "f7".parse().expect("valid square")),
                Piece::new(PieceKind::Pawn, Team::Black, "g7".parse().expect("valid square")),
                Piece::new(PieceKind::Pawn, Team::Black, "h7".parse().expect("valid square")),
            ],
            Team::White,
        )
        .expect("valid position");
        let outcome = iterative_deepening_search(
            &searcher(1),
            &board,
            Team::White,
            None,
            Some(Duration::from_secs(600)),
        )
        .expect("search succeeds");
        assert_eq!(outcome.best().expect("candidate").mv.to_string(), "Ra1-a8");
        assert!(outcome.stats.depth_reached < 5);
    }
}
