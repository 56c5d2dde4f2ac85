//! Errors used throughout the chess engine.
//!
//! `ChessError` is the single error type across the crate. Variants fall into
//! three families:
//! - invalid input (bad squares, unparsable or illegal moves, unknown
//!   promotion targets). These are recoverable: the caller rejects the
//!   candidate and the board is left exactly as it was before the call.
//! - corrupted state (`KingMissing`). The board invariant of one king per
//!   team is broken; the current operation must abort.
//! - internal search failures (`SearchExhausted`). A search node produced no
//!   scorable candidates where one was required. Checkmate and stalemate are
//!   never reported through this path; they are scored explicitly.

use thiserror::Error;

use crate::game_state::chess_types::Team;

pub type ChessResult<T> = Result<T, ChessError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChessError {
    /// Coordinates outside x in 0..=7, y in 1..=8.
    #[error("invalid square coordinates ({x}, {y})")]
    InvalidSquare { x: i32, y: i32 },

    /// Algebraic square notation such as "e4" could not be parsed.
    #[error("invalid square notation: {0:?}")]
    InvalidSquareNotation(String),

    /// The move cannot be applied to the current board.
    #[error("invalid move: {0}")]
    InvalidMove(String),

    /// Promotion target is not one of queen, rook, bishop or knight.
    #[error("unrecognized promotion piece: {0:?}")]
    UnknownPromotion(String),

    /// Move text did not match any generated move.
    #[error("could not parse move {0:?}")]
    MoveParse(String),

    /// A team has no king on the board.
    #[error("{0:?} king not present on board")]
    KingMissing(Team),

    #[error("search exhausted: {0}")]
    SearchExhausted(String),

    /// The external move request was cancelled before a reply arrived.
    #[error("move input cancelled")]
    InputCancelled,

    /// The external move provider went away.
    #[error("move input channel disconnected")]
    InputDisconnected,

    #[error("configuration error: {0}")]
    Config(String),
}

impl ChessError {
    /// True for errors a caller can handle by rejecting the input and retrying.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ChessError::InvalidSquare { .. }
                | ChessError::InvalidSquareNotation(_)
                | ChessError::InvalidMove(_)
                | ChessError::UnknownPromotion(_)
                | ChessError::MoveParse(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_input_is_recoverable() {
        assert!(ChessError::InvalidMove("blocked".to_owned()).is_recoverable());
        assert!(ChessError::UnknownPromotion("K".to_owned()).is_recoverable());
        assert!(ChessError::InvalidSquare { x: 8, y: 1 }.is_recoverable());
    }

    #[test]
    fn corruption_and_search_failures_are_not_recoverable() {
        assert!(!ChessError::KingMissing(Team::White).is_recoverable());
        assert!(!ChessError::SearchExhausted("root".to_owned()).is_recoverable());
        assert!(!ChessError::InputCancelled.is_recoverable());
    }

    #[test]
    fn messages_name_the_problem() {
        let err = ChessError::KingMissing(Team::Black);
        assert_eq!(err.to_string(), "Black king not present on board");
    }
}
