//! Conversation with the external tour solver.
//!
//! The editor talks to the solver through the [`SolverLink`] trait: it submits
//! [`SolveRequest`]s without waiting and drains [`SolverEvent`]s once per tick.
//! [`SolverChannel`] is the WebSocket implementation; tests can plug in any
//! in-memory link.

pub mod channel;
pub mod protocol;

pub use channel::{Notifier, SendPolicy, SolverChannel, SolverConfig};
pub use protocol::{SolveRequest, SolverParams, TourUpdate, decode_message};

use crate::error::SolverResult;

/// Connection state of a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    Connecting,
    Open,
    /// Disconnected; the channel is waiting to retry or has shut down.
    Closed,
}

impl LinkStatus {
    pub fn label(&self) -> &'static str {
        match self {
            LinkStatus::Connecting => "connecting",
            LinkStatus::Open => "connected",
            LinkStatus::Closed => "offline",
        }
    }
}

/// Something that happened on the solver side.
#[derive(Debug, Clone, PartialEq)]
pub enum SolverEvent {
    Tour(TourUpdate),
    Status(LinkStatus),
}

/// Non-blocking, message-oriented access to a solver.
pub trait SolverLink {
    /// Hand a request to the link. Must not block; a link that is not yet
    /// connected queues or drops the request according to its own policy.
    fn submit(&mut self, request: SolveRequest) -> SolverResult<()>;

    /// Next pending event, if any.
    fn poll_event(&mut self) -> Option<SolverEvent>;

    fn status(&self) -> LinkStatus;
}
