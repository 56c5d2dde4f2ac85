//! Externally driven player.
//!
//! `choose_move` publishes a `MoveRequest` on a channel and blocks until the
//! other side (a UI, a console reader, a test) answers on the request's reply
//! channel, or until the request is cancelled. Replies are validated against
//! the legal moves; an invalid reply is rejected and the request re-issued
//! with the rejection attached.

use crossbeam_channel::{bounded, select, unbounded, Receiver, Sender};
use tracing::warn;

use crate::engines::engine_trait::Player;
use crate::errors::{ChessError, ChessResult};
use crate::game_state::board::Board;
use crate::game_state::chess_types::Team;
use crate::moves::chess_move::Move;
use crate::utils::move_text::parse_move;

/// Answer to a `MoveRequest`: a generated move, or text for `parse_move`.
#[derive(Debug, Clone, PartialEq)]
pub enum MoveReply {
    Move(Move),
    Text(String),
}

#[derive(Debug)]
pub struct MoveRequest {
    pub team: Team,
    /// Independent copy of the position to move in.
    pub board: Board,
    /// Why the previous reply to this request was refused, if it was.
    pub rejected: Option<ChessError>,
    reply: Sender<MoveReply>,
}

impl MoveRequest {
    /// Sends the answer. Fails only if the player stopped waiting.
    pub fn respond(&self, reply: MoveReply) -> ChessResult<()> {
        self.reply.send(reply).map_err(|_| ChessError::InputDisconnected)
    }

    pub fn respond_text(&self, text: impl Into<String>) -> ChessResult<()> {
        self.respond(MoveReply::Text(text.into()))
    }
}

/// Cancels the request a `ChannelPlayer` is currently blocked on.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    tx: Sender<()>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        let _ = self.tx.send(());
    }
}

pub struct ChannelPlayer {
    team: Team,
    requests: Sender<MoveRequest>,
    cancel_rx: Receiver<()>,
    // Keeps the cancel channel connected while no handle is alive.
    cancel_tx: Sender<()>,
}

impl ChannelPlayer {
    /// Player plus the receiving end the move provider listens on.
    pub fn new(team: Team) -> (Self, Receiver<MoveRequest>) {
        let (requests, request_rx) = unbounded();
        let (cancel_tx, cancel_rx) = unbounded();
        (
            Self {
                team,
                requests,
                cancel_rx,
                cancel_tx,
            },
            request_rx,
        )
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            tx: self.cancel_tx.clone(),
        }
    }

    fn resolve(&self, board: &Board, reply: MoveReply) -> ChessResult<Move> {
        match reply {
            MoveReply::Text(text) => parse_move(board, self.team, &text),
            MoveReply::Move(mv) => {
                if board.legal_moves(self.team)?.contains(&mv) {
                    Ok(mv)
                } else {
                    Err(ChessError::InvalidMove(format!("{mv} is not legal here")))
                }
            }
        }
    }
}

impl Player for ChannelPlayer {
    fn team(&self) -> Team {
        self.team
    }

    fn name(&self) -> &str {
        "ChannelPlayer"
    }

    /// Blocks until a valid reply arrives. Cancellations sent before this
    /// call are discarded.
    fn choose_move(&mut self, board: &Board) -> ChessResult<Move> {
        while self.cancel_rx.try_recv().is_ok() {}

        let mut rejected = None;
        loop {
            let (reply_tx, reply_rx) = bounded(1);
            let request = MoveRequest {
                team: self.team,
                board: board.fork(),
                rejected: rejected.take(),
                reply: reply_tx,
            };
            self.requests
                .send(request)
                .map_err(|_| ChessError::InputDisconnected)?;

            let reply = select! {
                recv(reply_rx) -> msg => msg.map_err(|_| ChessError::InputDisconnected)?,
                recv(self.cancel_rx) -> _ => return Err(ChessError::InputCancelled),
            };

            match self.resolve(board, reply) {
                Ok(mv) => return Ok(mv),
                Err(err) if err.is_recoverable() => {
                    warn!(team = ?self.team, error = %err, "rejected move input");
                    rejected = Some(err);
                }
                Err(err) => return Err(err),
            }
        }
    }
}
