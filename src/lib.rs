//! Crate root module declarations for the Quince chess engine.
//!
//! Exposes the rules engine (board, pieces, moves), the alpha-beta search
//! stack, the players built on top of it, and utility helpers so binaries,
//! benches and external tooling can import stable module paths.

pub mod config;
pub mod errors;

pub mod game_state {
    pub mod board;
    pub mod chess_rules;
    pub mod chess_types;
    pub mod fingerprint;
    pub mod square;
    pub mod undo_state;
}

pub mod moves {
    pub mod bishop_moves;
    pub mod chess_move;
    pub mod king_moves;
    pub mod knight_moves;
    pub mod pawn_moves;
    pub mod piece;
    pub mod queen_moves;
    pub mod rook_moves;
}

pub mod search {
    pub mod alpha_beta;
    pub mod board_scoring;
    pub mod endgame;
    pub mod iterative_deepening;
    pub mod move_ordering;
    pub mod piece_evaluators;
    pub mod piece_square_tables;
    pub mod selectors;
    pub mod transposition_table;
}

pub mod engines {
    pub mod engine_channel;
    pub mod engine_positional;
    pub mod engine_random;
    pub mod engine_search;
    pub mod engine_trait;
}

pub mod utils {
    pub mod match_harness;
    pub mod move_text;
}
