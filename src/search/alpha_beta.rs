//! Fixed-depth minimax search with optional alpha-beta pruning.
//!
//! Scores are always from the root team's point of view: nodes where the root
//! team moves maximise, the others minimise. Every node forks the board,
//! applies each pseudo-legal move and discards those that leave the mover in
//! check. A node with no surviving move is checkmate (scored `±mate_in(ply)`)
//! or stalemate (scored by the heuristic's draw band).
//!
//! The root returns an exact ranked shortlist of the best `keep_moves`
//! candidates rather than a single move. Each root child is searched with
//! alpha set to the current K-th best exact score; a child that fails low
//! cannot enter the shortlist, and one that clears the threshold is exact.
//! Root children run on a rayon pool; everything below the root is
//! sequential, sharing only the history table and the transposition table.
//!
//! Positions already seen three times score as draws. Captures extend the
//! horizon by up to `capture_extension` plies.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::{Deserialize, Serialize};

use crate::errors::{ChessError, ChessResult};
use crate::game_state::board::Board;
use crate::game_state::chess_types::Team;
use crate::moves::chess_move::Move;
use crate::search::board_scoring::{mate_in, Heuristic, MaterialHeuristic, MATE_THRESHOLD};
use crate::search::move_ordering::{order_moves, HistoryTable};
use crate::search::piece_evaluators::PositionalPieceEvaluator;
use crate::search::transposition_table::{
    Bound, SharedTranspositionTable, TTEntry, TTStats, TranspositionKey,
};

const TT_SHARDS: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Nominal plies searched from the root.
    pub depth: u32,
    /// Extra plies allowed after a capture, beyond `depth`.
    pub capture_extension: u32,
    pub pruning: bool,
    pub use_transposition_table: bool,
    /// Entries across all shards.
    pub tt_capacity: usize,
    /// Shortlist size handed to the selector.
    pub keep_moves: usize,
    /// Worker threads for the root split; 0 uses rayon's global pool.
    pub threads: usize,
    /// Switches to iterative deepening, which keeps going past `depth`
    /// until this budget runs out.
    pub time_budget_ms: Option<u64>,
    /// Deepest iteration under a time budget; unbounded when unset.
    pub max_depth: Option<u32>,
    /// Mobility weight of the default heuristic.
    pub space_weight: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::pruned(4, 2)
    }
}

impl SearchConfig {
    /// Exhaustive minimax: no pruning, no cache, no capture extension.
    pub fn minimax(depth: u32) -> Self {
        Self {
            depth,
            capture_extension: 0,
            pruning: false,
            use_transposition_table: false,
            tt_capacity: 1,
            keep_moves: 3,
            threads: 0,
            time_budget_ms: None,
            max_depth: None,
            space_weight: 0.0,
        }
    }

    /// Alpha-beta with history ordering and the transposition table.
    pub fn pruned(depth: u32, capture_extension: u32) -> Self {
        Self {
            depth,
            capture_extension,
            pruning: true,
            use_transposition_table: true,
            tt_capacity: 1 << 20,
            keep_moves: 3,
            threads: 0,
            time_budget_ms: None,
            max_depth: None,
            space_weight: 0.0,
        }
    }

    pub fn validate(&self) -> ChessResult<()> {
        if self.depth == 0 {
            return Err(ChessError::Config("search depth must be at least 1".to_owned()));
        }
        if self.max_depth == Some(0) {
            return Err(ChessError::Config("max_depth must be at least 1".to_owned()));
        }
        if self.keep_moves == 0 {
            return Err(ChessError::Config("keep_moves must be at least 1".to_owned()));
        }
        if !self.space_weight.is_finite() {
            return Err(ChessError::Config("space_weight must be finite".to_owned()));
        }
        Ok(())
    }

    pub fn time_budget(&self) -> Option<Duration> {
        self.time_budget_ms.map(Duration::from_millis)
    }
}

/// A root move and its score for the root team.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveCandidate {
    pub mv: Move,
    pub score: f64,
}

impl fmt::Display for MoveCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {:5.2}", self.mv, self.score)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SearchStats {
    pub nodes: u64,
    pub interior_nodes: u64,
    pub cache_hits: u64,
    pub cutoffs: u64,
    pub depth_reached: u32,
    pub elapsed: Duration,
}

impl SearchStats {
    pub fn branching_factor(&self) -> f64 {
        if self.interior_nodes == 0 {
            return 0.0;
        }
        self.nodes as f64 / self.interior_nodes as f64
    }

    pub fn nodes_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs <= 0.0 {
            return 0.0;
        }
        self.nodes as f64 / secs
    }

    pub fn accumulate(&mut self, other: &SearchStats) {
        self.nodes += other.nodes;
        self.interior_nodes += other.interior_nodes;
        self.cache_hits += other.cache_hits;
        self.cutoffs += other.cutoffs;
        self.depth_reached = self.depth_reached.max(other.depth_reached);
        self.elapsed += other.elapsed;
    }
}

/// Ranked shortlist, best first, plus the statistics of the search that
/// produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub candidates: Vec<MoveCandidate>,
    pub stats: SearchStats,
}

impl SearchOutcome {
    pub fn best(&self) -> Option<&MoveCandidate> {
        self.candidates.first()
    }
}

#[derive(Debug, Default)]
struct SearchCounters {
    nodes: AtomicU64,
    interior: AtomicU64,
    cache_hits: AtomicU64,
    cutoffs: AtomicU64,
}

impl SearchCounters {
    #[inline]
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self, depth: u32, elapsed: Duration) -> SearchStats {
        SearchStats {
            nodes: self.nodes.load(Ordering::Relaxed),
            interior_nodes: self.interior.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cutoffs: self.cutoffs.load(Ordering::Relaxed),
            depth_reached: depth,
            elapsed,
        }
    }
}

/// Mate scores are stored relative to the node so they stay valid when the
/// same position is reached at a different ply.
#[inline]
fn score_to_table(score: f64, ply: u32) -> f64 {
    if score >= MATE_THRESHOLD {
        score + f64::from(ply)
    } else if score <= -MATE_THRESHOLD {
        score - f64::from(ply)
    } else {
        score
    }
}

#[inline]
fn score_from_table(score: f64, ply: u32) -> f64 {
    if score >= MATE_THRESHOLD {
        score - f64::from(ply)
    } else if score <= -MATE_THRESHOLD {
        score + f64::from(ply)
    } else {
        score
    }
}

/// Search state that lives across calls: configuration, heuristic, history
/// table, transposition table and worker pool.
///
/// Cached scores are relative to one root team, so `reset` must run before
/// searching for a different side.
pub struct Searcher {
    config: SearchConfig,
    heuristic: Arc<dyn Heuristic>,
    ordering: PositionalPieceEvaluator,
    history: HistoryTable,
    table: Arc<SharedTranspositionTable>,
    pool: Option<ThreadPool>,
}

impl fmt::Debug for Searcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Searcher")
            .field("config", &self.config)
            .field("tt_entries", &self.table.len())
            .finish_non_exhaustive()
    }
}

impl Searcher {
    pub fn new(config: SearchConfig) -> ChessResult<Self> {
        let heuristic = Arc::new(MaterialHeuristic::new(config.space_weight));
        Self::with_heuristic(config, heuristic)
    }

    pub fn with_heuristic(config: SearchConfig, heuristic: Arc<dyn Heuristic>) -> ChessResult<Self> {
        config.validate()?;
        let pool = if config.threads > 1 {
            let pool = ThreadPoolBuilder::new()
                .num_threads(config.threads)
                .thread_name(|i| format!("search-worker-{i}"))
                .build()
                .map_err(|e| ChessError::Config(format!("failed to build search pool: {e}")))?;
            Some(pool)
        } else {
            None
        };
        let capacity = if config.use_transposition_table {
            config.tt_capacity
        } else {
            1
        };
        Ok(Self {
            config,
            heuristic,
            ordering: PositionalPieceEvaluator::default(),
            history: HistoryTable::new(),
            table: SharedTranspositionTable::new(capacity, TT_SHARDS),
            pool,
        })
    }

    #[inline]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn heuristic(&self) -> &dyn Heuristic {
        self.heuristic.as_ref()
    }

    /// Clears the transposition and history tables.
    pub fn reset(&self) {
        self.table.clear();
        self.history.clear();
    }

    pub fn table_stats(&self) -> TTStats {
        self.table.stats()
    }

    /// Searches `depth` plies for `team`, which must be the side to move.
    ///
    /// `previous` is the ranking from a shallower iteration; those moves are
    /// tried first.
    pub fn search_depth(
        &self,
        board: &Board,
        team: Team,
        depth: u32,
        previous: &[MoveCandidate],
    ) -> ChessResult<SearchOutcome> {
        if board.side_to_move() != team {
            return Err(ChessError::InvalidMove(format!("{team:?} is not to move")));
        }
        let depth = depth.max(1);
        let started = Instant::now();
        let counters = SearchCounters::default();
        SearchCounters::bump(&counters.nodes);

        let mut moves = board.moves(team, true);
        if self.config.pruning {
            order_moves(board, &mut moves, &self.history, &self.ordering);
        }
        if !previous.is_empty() {
            moves.sort_by_key(|m| {
                previous
                    .iter()
                    .position(|c| c.mv == *m)
                    .unwrap_or(usize::MAX)
            });
        }

        let mut children = Vec::with_capacity(moves.len());
        for mv in moves {
            let mut child = board.fork();
            child.do_move(&mv)?;
            if child.in_check(team)? {
                continue;
            }
            children.push((mv, child));
        }
        if children.is_empty() {
            return Err(ChessError::SearchExhausted(format!(
                "{team:?} has no legal move to search"
            )));
        }
        SearchCounters::bump(&counters.interior);

        let keep = self.config.keep_moves.max(1);
        let shortlist: Mutex<Vec<(usize, MoveCandidate)>> = Mutex::new(Vec::new());

        let run = |(index, (mv, child)): (usize, (Move, Board))| -> ChessResult<()> {
            let threshold = self.threshold(&shortlist, keep);
            let score = self.node(
                &child,
                team,
                depth as i32 - 1,
                1,
                mv.is_capture(),
                threshold,
                f64::INFINITY,
                &counters,
            )?;
            if score > threshold {
                if let Ok(mut list) = shortlist.lock() {
                    list.push((index, MoveCandidate { mv, score }));
                }
            }
            Ok(())
        };

        match (&self.pool, self.config.threads) {
            (_, 1) => children.into_iter().enumerate().try_for_each(run)?,
            (Some(pool), _) => {
                pool.install(|| children.into_par_iter().enumerate().try_for_each(run))?
            }
            (None, _) => children.into_par_iter().enumerate().try_for_each(run)?,
        }

        let mut ranked = shortlist
            .into_inner()
            .map_err(|_| ChessError::SearchExhausted("shortlist lock poisoned".to_owned()))?;
        ranked.sort_by(|a, b| b.1.score.total_cmp(&a.1.score).then(a.0.cmp(&b.0)));
        ranked.truncate(keep);
        if ranked.is_empty() {
            return Err(ChessError::SearchExhausted(
                "no root candidate produced an exact score".to_owned(),
            ));
        }

        Ok(SearchOutcome {
            candidates: ranked.into_iter().map(|(_, c)| c).collect(),
            stats: counters.snapshot(depth, started.elapsed()),
        })
    }

    /// Lowest score that can still enter the shortlist. Without pruning every
    /// root child is searched with an open window.
    fn threshold(&self, shortlist: &Mutex<Vec<(usize, MoveCandidate)>>, keep: usize) -> f64 {
        if !self.config.pruning {
            return f64::NEG_INFINITY;
        }
        let Ok(list) = shortlist.lock() else {
            return f64::NEG_INFINITY;
        };
        if list.len() < keep {
            return f64::NEG_INFINITY;
        }
        let mut scores: Vec<f64> = list.iter().map(|(_, c)| c.score).collect();
        scores.sort_by(|a, b| b.total_cmp(a));
        scores[keep - 1]
    }

    #[inline]
    fn table_depth(&self, remaining: i32) -> u32 {
        (remaining + self.config.capture_extension as i32).max(0) as u32
    }

    #[allow(clippy::too_many_arguments)]
    fn node(
        &self,
        board: &Board,
        root: Team,
        remaining: i32,
        ply: u32,
        did_capture: bool,
        mut alpha: f64,
        mut beta: f64,
        counters: &SearchCounters,
    ) -> ChessResult<f64> {
        SearchCounters::bump(&counters.nodes);
        let to_move = board.side_to_move();

        if board.is_draw_by_threefold_repetition() {
            return self.heuristic.score(board, root);
        }

        let extend = did_capture && remaining > -(self.config.capture_extension as i32);
        if remaining <= 0 && !extend {
            if !board.has_legal_move(to_move)? {
                return self.terminal(board, root, to_move, ply);
            }
            return self.heuristic.score(board, root);
        }

        let table_depth = self.table_depth(remaining);
        let key = self
            .config
            .use_transposition_table
            .then(|| TranspositionKey::of(board));
        let mut hinted = None;
        if let Some(key) = &key {
            if let Some(entry) = self.table.probe(key) {
                let (lo, hi) = (score_to_table(alpha, ply), score_to_table(beta, ply));
                if let Some(score) = entry.cutoff_score(table_depth, lo, hi) {
                    SearchCounters::bump(&counters.cache_hits);
                    return Ok(score_from_table(score, ply));
                }
                hinted = entry.best_move;
            }
        }

        let (alpha0, beta0) = (alpha, beta);
        let maximizing = to_move == root;

        let mut moves = board.moves(to_move, true);
        if self.config.pruning {
            order_moves(board, &mut moves, &self.history, &self.ordering);
            if let Some(hint) = hinted {
                if let Some(i) = moves.iter().position(|m| *m == hint) {
                    moves[..=i].rotate_right(1);
                }
            }
        }

        let mut best: Option<(f64, Move)> = None;
        for mv in moves {
            let mut child = board.fork();
            child.do_move(&mv)?;
            if child.in_check(to_move)? {
                continue;
            }

            let score = self.node(
                &child,
                root,
                remaining - 1,
                ply + 1,
                mv.is_capture(),
                alpha,
                beta,
                counters,
            )?;

            let improves = match best {
                None => true,
                Some((b, _)) if maximizing => score > b,
                Some((b, _)) => score < b,
            };
            if improves {
                best = Some((score, mv));
            }

            if maximizing {
                alpha = alpha.max(score);
            } else {
                beta = beta.min(score);
            }
            if self.config.pruning && beta <= alpha {
                SearchCounters::bump(&counters.cutoffs);
                self.history.record_cutoff(&mv, remaining.max(0) as u32);
                break;
            }
        }

        let Some((score, best_move)) = best else {
            return self.terminal(board, root, to_move, ply);
        };
        SearchCounters::bump(&counters.interior);

        if let Some(key) = key {
            let bound = if score <= alpha0 {
                Bound::Upper
            } else if score >= beta0 {
                Bound::Lower
            } else {
                Bound::Exact
            };
            self.table.store(
                key,
                TTEntry {
                    depth: table_depth,
                    score: score_to_table(score, ply),
                    bound,
                    best_move: Some(best_move),
                },
            );
        }
        Ok(score)
    }

    /// Score of a node whose side to move has no legal move.
    fn terminal(&self, board: &Board, root: Team, to_move: Team, ply: u32) -> ChessResult<f64> {
        if board.in_check(to_move)? {
            let mate = mate_in(ply);
            return Ok(if to_move == root { -mate } else { mate });
        }
        self.heuristic.score(board, root)
    }
}
