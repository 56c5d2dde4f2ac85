//! Head-to-head match runner.
//!
//! Alternates two `Player`s on one board until the game ends, a ply cap is
//! reached, or a player keeps producing invalid moves. Invalid moves never
//! stick: the board is rolled back to the pre-move snapshot and the player is
//! asked again, up to `max_invalid_attempts` times per turn.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::engines::engine_trait::Player;
use crate::errors::{ChessError, ChessResult};
use crate::game_state::board::Board;
use crate::game_state::chess_rules::{game_status, GameStatus};
use crate::game_state::chess_types::Team;
use crate::moves::chess_move::Move;

#[derive(Debug, Clone)]
pub struct MatchConfig {
    pub max_plies: u32,
    pub max_invalid_attempts: u32,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            max_plies: 300,
            max_invalid_attempts: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    Checkmate { winner: Team },
    Stalemate,
    DrawByRepetition,
    MaxPlies,
    /// `loser` exhausted its invalid-move attempts.
    Forfeit { loser: Team, reason: String },
}

impl MatchOutcome {
    pub fn winner(&self) -> Option<Team> {
        match self {
            MatchOutcome::Checkmate { winner } => Some(*winner),
            MatchOutcome::Forfeit { loser, .. } => Some(loser.opposite()),
            _ => None,
        }
    }

    pub fn result_tag(&self) -> &'static str {
        match self.winner() {
            Some(Team::White) => "1-0",
            Some(Team::Black) => "0-1",
            None if *self == MatchOutcome::MaxPlies => "*",
            None => "1/2-1/2",
        }
    }
}

impl fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchOutcome::Checkmate { winner } => write!(f, "{winner:?} wins by checkmate"),
            MatchOutcome::Stalemate => f.write_str("draw by stalemate"),
            MatchOutcome::DrawByRepetition => f.write_str("draw by threefold repetition"),
            MatchOutcome::MaxPlies => f.write_str("unfinished, ply limit reached"),
            MatchOutcome::Forfeit { loser, reason } => write!(f, "{loser:?} forfeits: {reason}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GameRecord {
    pub white: String,
    pub black: String,
    pub outcome: MatchOutcome,
    pub moves: Vec<Move>,
    pub started: DateTime<Utc>,
    pub finished: DateTime<Utc>,
    pub final_board: Board,
}

impl GameRecord {
    /// Tag pairs, then numbered move pairs ending with the result.
    pub fn notation(&self) -> String {
        let mut headers = BTreeMap::<&str, String>::new();
        headers.insert("Date", self.started.format("%Y.%m.%d").to_string());
        headers.insert("White", self.white.clone());
        headers.insert("Black", self.black.clone());
        headers.insert("Result", self.outcome.result_tag().to_owned());
        headers.insert("Termination", self.outcome.to_string());

        let mut out = String::new();
        for (key, value) in &headers {
            out.push_str(&format!("[{key} \"{}\"]\n", value.replace('"', "'")));
        }
        out.push('\n');

        let mut parts = Vec::with_capacity(self.moves.len() + 1);
        for (ply, mv) in self.moves.iter().enumerate() {
            if ply % 2 == 0 {
                parts.push(format!("{}. {mv}", ply / 2 + 1));
            } else {
                parts.push(mv.to_string());
            }
        }
        parts.push(self.outcome.result_tag().to_owned());
        out.push_str(&parts.join(" "));
        out.push('\n');
        out
    }

    pub fn duration(&self) -> chrono::Duration {
        self.finished - self.started
    }
}

/// Plays a game from the standard starting position.
pub fn play_match(
    white: &mut dyn Player,
    black: &mut dyn Player,
    config: &MatchConfig,
) -> ChessResult<GameRecord> {
    play_match_from(Board::standard()?, white, black, config)
}

/// Plays a game from `board`, starting with its side to move.
pub fn play_match_from(
    mut board: Board,
    white: &mut dyn Player,
    black: &mut dyn Player,
    config: &MatchConfig,
) -> ChessResult<GameRecord> {
    if white.team() != Team::White || black.team() != Team::Black {
        return Err(ChessError::Config(format!(
            "players seated on the wrong side: {} plays {:?}, {} plays {:?}",
            white.name(),
            white.team(),
            black.name(),
            black.team()
        )));
    }
    white.new_game();
    black.new_game();

    let started = Utc::now();
    let mut moves = Vec::new();

    let outcome = loop {
        match game_status(&board)? {
            GameStatus::Checkmate { winner } => break MatchOutcome::Checkmate { winner },
            GameStatus::Stalemate => break MatchOutcome::Stalemate,
            GameStatus::DrawByRepetition => break MatchOutcome::DrawByRepetition,
            GameStatus::Playing | GameStatus::Check => {}
        }
        if moves.len() as u32 >= config.max_plies {
            break MatchOutcome::MaxPlies;
        }

        let team = board.side_to_move();
        let turn = match team {
            Team::White => play_turn(&mut board, white, config.max_invalid_attempts)?,
            Team::Black => play_turn(&mut board, black, config.max_invalid_attempts)?,
        };
        match turn {
            Ok(mv) => {
                let player = match team {
                    Team::White => white.name(),
                    Team::Black => black.name(),
                };
                info!(ply = moves.len() + 1, player, mv = %mv, "move played");
                moves.push(mv);
            }
            Err(reason) => break MatchOutcome::Forfeit { loser: team, reason },
        }
    };

    info!(
        white = white.name(),
        black = black.name(),
        plies = moves.len(),
        result = outcome.result_tag(),
        "game finished: {outcome}"
    );
    Ok(GameRecord {
        white: white.name().to_owned(),
        black: black.name().to_owned(),
        outcome,
        moves,
        started,
        finished: Utc::now(),
        final_board: board,
    })
}

/// One turn with retries. The inner `Err` carries the forfeit reason; the
/// outer error is reserved for failures that end the match outright.
fn play_turn(
    board: &mut Board,
    player: &mut dyn Player,
    max_invalid_attempts: u32,
) -> ChessResult<Result<Move, String>> {
    let team = board.side_to_move();
    let mut last_error = String::new();

    for attempt in 1..=max_invalid_attempts.max(1) {
        let mv = match player.choose_move(board) {
            Ok(mv) => mv,
            Err(err) if err.is_recoverable() => {
                warn!(player = player.name(), attempt, error = %err, "player produced no valid move");
                last_error = err.to_string();
                continue;
            }
            Err(err) => return Err(err),
        };

        let snapshot = board.save_state();
        let applied = match board.do_move(&mv) {
            Ok(()) if mv.team() != team => Err(ChessError::InvalidMove(format!(
                "{mv} moves a {:?} piece on {team:?}'s turn",
                mv.team()
            ))),
            Ok(()) if board.in_check(team)? => Err(ChessError::InvalidMove(format!(
                "{mv} leaves the {team:?} king in check"
            ))),
            other => other,
        };
        match applied {
            Ok(()) => return Ok(Ok(mv)),
            Err(err) if err.is_recoverable() => {
                board.restore_state(&snapshot);
                warn!(player = player.name(), attempt, error = %err, "rejected invalid move");
                last_error = err.to_string();
            }
            Err(err) => {
                board.restore_state(&snapshot);
                return Err(err);
            }
        }
    }
    Ok(Err(last_error))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::engine_random::RandomPlayer;
    use crate::game_state::chess_types::PieceKind;
    use crate::moves::piece::Piece;
    use crate::utils::move_text::parse_move;

    /// Plays a fixed list of moves, then falls silent.
    struct Scripted {
        team: Team,
        moves: Vec<&'static str>,
        next: usize,
    }

    impl Scripted {
        fn new(team: Team, moves: &[&'static str]) -> Self {
            Self {
                team,
                moves: moves.to_vec(),
                next: 0,
            }
        }
    }

    impl Player for Scripted {
        fn team(&self) -> Team {
            self.team
        }

        fn name(&self) -> &str {
            "Scripted"
        }

        fn choose_move(&mut self, board: &Board) -> ChessResult<Move> {
            let text = self
                .moves
                .get(self.next)
                .ok_or_else(|| ChessError::MoveParse("script exhausted".to_owned()))?;
            self.next += 1;
            parse_move(board, self.team, text)
        }
    }

    /// Always answers with a move that leaves its own king in check.
    struct Suicidal;

    impl Player for Suicidal {
        fn team(&self) -> Team {
            Team::Black
        }

        fn name(&self) -> &str {
            "Suicidal"
        }

        fn choose_move(&mut self, board: &Board) -> ChessResult<Move> {
            board
                .moves(Team::Black, false)
                .into_iter()
                .find(|mv| {
                    let mut probe = board.fork();
                    probe.do_move(mv).is_ok() && probe.in_check(Team::Black).unwrap_or(false)
                })
                .ok_or_else(|| ChessError::InvalidMove("no self-check available".to_owned()))
        }
    }

    #[test]
    fn fools_mate_ends_in_checkmate() {
        let mut white = Scripted::new(Team::White, &["f2-f3", "g2-g4"]);
        let mut black = Scripted::new(Team::Black, &["e7-e5", "Qd8-h4"]);
        let record = play_match(&mut white, &mut black, &MatchConfig::default()).expect("game completes");

        assert_eq!(record.outcome, MatchOutcome::Checkmate { winner: Team::Black });
        assert_eq!(record.moves.len(), 4);
        assert!(record.finished >= record.started);
        let notation = record.notation();
        assert!(notation.contains("[Result \"0-1\"]"), "{notation}");
        assert!(notation.ends_with("1. f2-f3 e7-e5 2. g2-g4 Qd8-h4 0-1\n"), "{notation}");
    }

    #[test]
    fn ply_cap_stops_the_game() {
        let mut white = RandomPlayer::seeded(Team::White, 1);
        let mut black = RandomPlayer::seeded(Team::Black, 2);
        let config = MatchConfig {
            max_plies: 6,
            ..MatchConfig::default()
        };
        let record = play_match(&mut white, &mut black, &config).expect("game completes");
        assert_eq!(record.outcome, MatchOutcome::MaxPlies);
        assert_eq!(record.moves.len(), 6);
        assert_eq!(record.final_board.history().len(), 6);
        assert_eq!(record.outcome.result_tag(), "*");
    }

    #[test]
    fn boxed_players_alternate_turns() {
        let mut white: Box<dyn Player> = Box::new(RandomPlayer::seeded(Team::White, 5));
        let mut black: Box<dyn Player> = Box::new(RandomPlayer::seeded(Team::Black, 6));
        let config = MatchConfig {
            max_plies: 4,
            ..MatchConfig::default()
        };
        let record = play_match(white.as_mut(), black.as_mut(), &config).expect("game completes");
        assert_eq!(record.moves.len(), 4);
        for (ply, mv) in record.moves.iter().enumerate() {
            let mover = if ply % 2 == 0 { Team::White } else { Team::Black };
            assert_eq!(mv.team(), mover, "ply {ply}");
        }
    }

    #[test]
    fn repeated_invalid_moves_forfeit_and_leave_the_board_intact() {
        let start = Board::from_pieces(
            [
                Piece::new(PieceKind::King, Team::White, "e1".parse().expect("valid square")),
                Piece::new(PieceKind::Rook, Team::White, "a7".parse().expect("valid square")),
                Piece::new(PieceKind::King, Team::Black, "e8".parse().expect("valid square")),
            ],
            Team::Black,
        )
        .expect("valid position");
        let mut white = RandomPlayer::seeded(Team::White, 3);
        let mut black = Suicidal;
        let record = play_match_from(start.fork(), &mut white, &mut black, &MatchConfig::default())
            .expect("game completes");

        assert!(matches!(record.outcome, MatchOutcome::Forfeit { loser: Team::Black, .. }));
        assert!(record.moves.is_empty());
        assert_eq!(record.final_board.pieces(), start.pieces());
        assert_eq!(record.outcome.result_tag(), "1-0");
    }

    #[test]
    fn players_must_sit_on_their_own_side() {
        let mut a = RandomPlayer::seeded(Team::Black, 1);
        let mut b = RandomPlayer::seeded(Team::Black, 2);
        assert!(matches!(
            play_match(&mut a, &mut b, &MatchConfig::default()),
            Err(ChessError::Config(_))
        ));
    }
}
