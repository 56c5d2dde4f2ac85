//! Search-backed player.
//!
//! Wraps a `Searcher` and a selector. Each turn the caches are reset, the
//! position is searched (to a fixed depth, or by iterative deepening until the
//! time budget runs out when one is configured) and the selector picks from
//! the shortlist.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use crate::engines::engine_trait::Player;
use crate::errors::{ChessError, ChessResult};
use crate::game_state::board::Board;
use crate::game_state::chess_types::Team;
use crate::moves::chess_move::Move;
use crate::search::alpha_beta::{SearchConfig, SearchOutcome, Searcher};
use crate::search::board_scoring::Heuristic;
use crate::search::iterative_deepening::iterative_deepening_search;
use crate::search::selectors::{Selector, SelectorKind};

pub struct SearchEngine {
    team: Team,
    name: String,
    searcher: Searcher,
    selector: Box<dyn Selector>,
    rng: StdRng,
    last_outcome: Option<SearchOutcome>,
}

impl SearchEngine {
    pub fn new(team: Team, config: SearchConfig, selector: SelectorKind) -> ChessResult<Self> {
        Ok(Self::from_searcher(team, Searcher::new(config)?, selector.build()))
    }

    pub fn with_heuristic(
        team: Team,
        config: SearchConfig,
        heuristic: Arc<dyn Heuristic>,
        selector: SelectorKind,
    ) -> ChessResult<Self> {
        Ok(Self::from_searcher(
            team,
            Searcher::with_heuristic(config, heuristic)?,
            selector.build(),
        ))
    }

    fn from_searcher(team: Team, searcher: Searcher, selector: Box<dyn Selector>) -> Self {
        let config = searcher.config();
        let name = format!(
            "SearchEngine(depth={}, {}, {})",
            config.depth,
            if config.pruning { "alpha-beta" } else { "minimax" },
            selector.name()
        );
        Self {
            team,
            name,
            searcher,
            selector,
            rng: StdRng::from_os_rng(),
            last_outcome: None,
        }
    }

    /// Reseeds the selector RNG for reproducible games.
    pub fn seeded(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn config(&self) -> &SearchConfig {
        self.searcher.config()
    }

    /// Shortlist and statistics from the most recent `choose_move`.
    pub fn last_outcome(&self) -> Option<&SearchOutcome> {
        self.last_outcome.as_ref()
    }

    pub fn search(&self, board: &Board) -> ChessResult<SearchOutcome> {
        self.searcher.reset();
        let config = self.searcher.config();
        match config.time_budget() {
            Some(budget) => iterative_deepening_search(
                &self.searcher,
                board,
                self.team,
                config.max_depth,
                Some(budget),
            ),
            None => self.searcher.search_depth(board, self.team, config.depth, &[]),
        }
    }
}

impl Player for SearchEngine {
    fn team(&self) -> Team {
        self.team
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn choose_move(&mut self, board: &Board) -> ChessResult<Move> {
        let outcome = self.search(board)?;
        let scores: Vec<f64> = outcome.candidates.iter().map(|c| c.score).collect();
        let pick = self
            .selector
            .select_index(&scores, &mut self.rng)
            .and_then(|i| outcome.candidates.get(i))
            .copied()
            .ok_or_else(|| ChessError::SearchExhausted("selector returned no candidate".to_owned()))?;

        let shortlist: Vec<String> = outcome.candidates.iter().map(|c| c.to_string()).collect();
        info!(
            team = ?self.team,
            chosen = %pick,
            shortlist = ?shortlist,
            depth = outcome.stats.depth_reached,
            nodes = outcome.stats.nodes,
            branching = outcome.stats.branching_factor(),
            elapsed_ms = outcome.stats.elapsed.as_millis() as u64,
            "search move"
        );
        self.last_outcome = Some(outcome);
        Ok(pick.mv)
    }

    fn new_game(&mut self) {
        self.searcher.reset();
        self.last_outcome = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::chess_types::PieceKind;
    use crate::moves::piece::Piece;

    fn piece(kind: PieceKind, team: Team, square: &str) -> Piece {
        Piece::new(kind, team, square.parse().expect("valid square"))
    }

    fn config(depth: u32) -> SearchConfig {
        let mut config = SearchConfig::pruned(depth, 1);
        config.threads = 1;
        config
    }

    #[test]
    fn greedy_engine_takes_the_mate() {
        let board = Board::from_pieces(
            [
                piece(PieceKind::King, Team::White, "g1"),
                piece(PieceKind::Rook, Team::White, "a1"),
                piece(PieceKind::King, Team::Black, "g8"),
                piece(PieceKind::Pawn, Team::Black, "f7").with_moved(true),
                piece(PieceKind::Pawn, Team::Black, "g7").with_moved(true),
                piece(PieceKind::Pawn, Team::Black, "h7").with_moved(true),
            ],
            Team::White,
        )
        .expect("valid position");
        let mut engine =
            SearchEngine::new(Team::White, config(2), SelectorKind::Greedy).expect("valid config");
        let mv = engine.choose_move(&board).expect("move found");
        assert_eq!(mv.to_string(), "Ra1-a8");
        assert!(engine.last_outcome().is_some());
    }

    #[test]
    fn chosen_move_comes_from_the_shortlist() {
        let board = Board::standard().expect("standard setup");
        let mut engine = SearchEngine::new(Team::White, config(2), SelectorKind::Softplus)
            .expect("valid config")
            .seeded(9);
        let mv = engine.choose_move(&board).expect("move found");
        let outcome = engine.last_outcome().expect("outcome kept");
        assert!(outcome.candidates.iter().any(|c| c.mv == mv));
        assert!(board.legal_moves(Team::White).expect("king present").contains(&mv));
    }

    #[test]
    fn time_budget_searches_past_the_nominal_depth() {
        let board = Board::standard().expect("standard setup");
        let mut cfg = config(2);
        cfg.time_budget_ms = Some(600_000);
        cfg.max_depth = Some(3);
        let engine = SearchEngine::new(Team::White, cfg, SelectorKind::Greedy).expect("valid config");
        let outcome = engine.search(&board).expect("search succeeds");
        assert!(outcome.stats.depth_reached > engine.config().depth);
        assert_eq!(outcome.stats.depth_reached, 3);
    }

    #[test]
    fn name_describes_the_configuration() {
        let engine = SearchEngine::new(Team::Black, SearchConfig::minimax(2), SelectorKind::Random)
            .expect("valid config");
        assert_eq!(engine.name(), "SearchEngine(depth=2, minimax, RandomSelector)");
        assert_eq!(engine.team(), Team::Black);
    }
}
